use crate::graph::Graph;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const KEY_PREFIX: &str = "graph/";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Named snapshots of merged graphs.
pub struct GraphStore {
    db: Db,
}

impl GraphStore {
    /// Opens or creates a graph store at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Saves a graph under `name`, replacing any previous snapshot.
    ///
    /// Graphs are stored as JSON so self-describing payloads such as
    /// `serde_json::Value` load back intact.
    pub fn save<N, E>(&self, name: &str, graph: &Graph<N, E>) -> Result<(), StoreError>
    where
        N: Serialize,
        E: Serialize,
    {
        let bytes = serde_json::to_vec(graph)?;
        debug!(name, bytes = bytes.len(), "saving graph snapshot");
        self.db.insert(key(name), bytes)?;
        self.db.flush()?;
        Ok(())
    }

    /// Loads the graph saved under `name`.
    pub fn load<N, E>(&self, name: &str) -> Result<Option<Graph<N, E>>, StoreError>
    where
        N: DeserializeOwned,
        E: DeserializeOwned,
    {
        if let Some(bytes) = self.db.get(key(name))? {
            let graph: Graph<N, E> = serde_json::from_slice(&bytes)?;
            Ok(Some(graph))
        } else {
            Ok(None)
        }
    }

    /// Removes a snapshot. Returns whether one existed.
    pub fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let existed = self.db.remove(key(name))?.is_some();
        self.db.flush()?;
        Ok(existed)
    }

    /// Lists snapshot names in order.
    pub fn names(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in self.db.scan_prefix(KEY_PREFIX) {
            let (key, _) = entry?;
            let name = String::from_utf8_lossy(&key[KEY_PREFIX.len()..]).into_owned();
            names.push(name);
        }
        Ok(names)
    }
}

fn key(name: &str) -> String {
    format!("{}{}", KEY_PREFIX, name)
}

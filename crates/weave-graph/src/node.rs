use serde::{Deserialize, Serialize};
use weave_core::Identifier;

/// A node contributed by a plugin.
///
/// `P` is the plugin's payload. The merge engine never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<P> {
    pub id: Identifier,

    /// Ids of edges touching this node.
    ///
    /// Advisory only: the graph's edge map is authoritative, and this list may
    /// be incomplete when another producer adds edges to the node.
    #[serde(default)]
    pub edges: Vec<Identifier>,

    pub payload: P,
}

impl<P> Node<P> {
    /// Creates a node with no recorded adjacency.
    pub fn new(id: Identifier, payload: P) -> Self {
        Self {
            id,
            edges: Vec::new(),
            payload,
        }
    }

    /// Sets the advisory adjacency list.
    pub fn with_edges(mut self, edges: Vec<Identifier>) -> Self {
        self.edges = edges;
        self
    }
}

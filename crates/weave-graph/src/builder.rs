//! Graph builder for producers.
//!
//! A producer (a plugin crawling one source) mints every identifier inside its
//! own plugin/source namespace. The builder does the minting so producers
//! never assemble tokens by hand, and fills in each node's advisory edge list
//! when the graph is built.

use crate::edge::Edge;
use crate::error::{EntityKind, GraphError};
use crate::graph::Graph;
use crate::node::Node;
use weave_core::{encode, Identifier};

/// Builds one producer's graph.
pub struct GraphBuilder<N, E> {
    plugin: String,
    source: String,
    graph: Graph<N, E>,
}

impl<N, E> GraphBuilder<N, E> {
    /// Creates a builder minting ids under `plugin` and `source`.
    pub fn new(plugin: impl Into<String>, source: impl Into<String>) -> Result<Self, GraphError> {
        let (plugin, source, _) = Identifier::new(plugin, source, "")?.into_parts();
        Ok(Self {
            plugin,
            source,
            graph: Graph::new(),
        })
    }

    /// Mints an identifier in this builder's namespace.
    pub fn id(&self, local: impl Into<String>) -> Result<Identifier, GraphError> {
        Ok(Identifier::new(
            self.plugin.clone(),
            self.source.clone(),
            local,
        )?)
    }

    /// Adds a node named `local`.
    pub fn add_node(&mut self, local: &str, payload: N) -> Result<Identifier, GraphError> {
        let id = self.id(local)?;
        let token = encode(&id)?;
        if self.graph.contains_node(&token) {
            return Err(GraphError::DuplicateId {
                kind: EntityKind::Node,
                token,
            });
        }

        self.graph.insert_node(Node::new(id.clone(), payload))?;
        Ok(id)
    }

    /// Adds an edge between two nodes of this namespace.
    pub fn add_edge(
        &mut self,
        local: &str,
        source_local: &str,
        dest_local: &str,
        weight: f64,
        payload: E,
    ) -> Result<Identifier, GraphError> {
        let source_id = self.id(source_local)?;
        let dest_id = self.id(dest_local)?;
        self.add_edge_between(local, source_id, dest_id, weight, payload)
    }

    /// Adds an edge whose endpoints may belong to other plugins or sources.
    pub fn add_edge_between(
        &mut self,
        local: &str,
        source_id: Identifier,
        dest_id: Identifier,
        weight: f64,
        payload: E,
    ) -> Result<Identifier, GraphError> {
        let id = self.id(local)?;
        let token = encode(&id)?;
        if self.graph.contains_edge(&token) {
            return Err(GraphError::DuplicateId {
                kind: EntityKind::Edge,
                token,
            });
        }

        encode(&source_id)?;
        encode(&dest_id)?;

        let edge = Edge::new(id.clone(), source_id, dest_id, weight, payload)?;
        self.graph.insert_edge(edge)?;
        Ok(id)
    }

    /// Finishes building and returns the graph.
    ///
    /// Nodes present in this graph get the ids of every edge touching them.
    pub fn build(mut self) -> Graph<N, E> {
        let mut touches: Vec<(String, Identifier)> = Vec::new();
        for edge in self.graph.edges.values() {
            for endpoint in edge.endpoints() {
                if let Ok(token) = encode(endpoint) {
                    touches.push((token, edge.id.clone()));
                }
            }
        }

        for (token, edge_id) in touches {
            if let Some(node) = self.graph.nodes.get_mut(&token) {
                if !node.edges.contains(&edge_id) {
                    node.edges.push(edge_id);
                }
            }
        }

        self.graph
    }
}

//! Core graph data structure.
//!
//! A `Graph` is two maps keyed by identifier token: one for nodes and one for
//! edges. Each producer builds one, and the merge engine folds them together.

use crate::edge::{check_weight, Edge};
use crate::error::{EndpointRole, EntityKind, GraphError};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weave_core::{encode, Identifier};

/// Nodes and edges from one or more plugins, keyed by token.
///
/// Edge endpoints are expected to resolve to nodes in the same graph, but
/// this is not enforced. See [`Graph::dangling_edges`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph<N, E> {
    #[serde(default = "BTreeMap::new")]
    pub(crate) nodes: BTreeMap<String, Node<N>>,

    #[serde(default = "BTreeMap::new")]
    pub(crate) edges: BTreeMap<String, Edge<E>>,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// An edge endpoint with no matching node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingEndpoint {
    /// Token of the edge.
    pub edge: String,
    pub endpoint: Identifier,
    pub role: EndpointRole,
}

impl<N, E> Graph<N, E> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    /// Inserts a node under its token, returning any node it replaced.
    pub fn insert_node(&mut self, node: Node<N>) -> Result<Option<Node<N>>, GraphError> {
        let token = encode(&node.id)?;
        Ok(self.nodes.insert(token, node))
    }

    /// Inserts an edge under its token, returning any edge it replaced.
    pub fn insert_edge(&mut self, edge: Edge<E>) -> Result<Option<Edge<E>>, GraphError> {
        let token = encode(&edge.id)?;
        Ok(self.edges.insert(token, edge))
    }

    /// Gets a node by token.
    pub fn node(&self, token: &str) -> Option<&Node<N>> {
        self.nodes.get(token)
    }

    /// Gets an edge by token.
    pub fn edge(&self, token: &str) -> Option<&Edge<E>> {
        self.edges.get(token)
    }

    /// Gets a node by identifier.
    pub fn node_by_id(&self, id: &Identifier) -> Option<&Node<N>> {
        let token = encode(id).ok()?;
        self.nodes.get(&token)
    }

    /// Gets an edge by identifier.
    pub fn edge_by_id(&self, id: &Identifier) -> Option<&Edge<E>> {
        let token = encode(id).ok()?;
        self.edges.get(&token)
    }

    pub fn contains_node(&self, token: &str) -> bool {
        self.nodes.contains_key(token)
    }

    pub fn contains_edge(&self, token: &str) -> bool {
        self.edges.contains_key(token)
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Iterates over `(token, node)` pairs in token order.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Node<N>)> {
        self.nodes.iter().map(|(token, node)| (token.as_str(), node))
    }

    /// Iterates over `(token, edge)` pairs in token order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &Edge<E>)> {
        self.edges.iter().map(|(token, edge)| (token.as_str(), edge))
    }

    /// Nodes minted by the given plugin.
    pub fn nodes_for_plugin<'a>(&'a self, plugin: &'a str) -> impl Iterator<Item = &'a Node<N>> {
        self.nodes.values().filter(move |node| node.id.plugin() == plugin)
    }

    /// Edges minted by the given plugin.
    pub fn edges_for_plugin<'a>(&'a self, plugin: &'a str) -> impl Iterator<Item = &'a Edge<E>> {
        self.edges.values().filter(move |edge| edge.id.plugin() == plugin)
    }

    /// Splits the graph into its node and edge maps.
    pub fn into_parts(self) -> (BTreeMap<String, Node<N>>, BTreeMap<String, Edge<E>>) {
        (self.nodes, self.edges)
    }

    /// Lists every edge endpoint that has no node in this graph.
    pub fn dangling_edges(&self) -> Vec<DanglingEndpoint> {
        let mut dangling = Vec::new();

        for (token, edge) in &self.edges {
            let roles = [EndpointRole::Source, EndpointRole::Destination];
            for (role, endpoint) in roles.into_iter().zip(edge.endpoints()) {
                if !self.resolves(endpoint) {
                    dangling.push(DanglingEndpoint {
                        edge: token.clone(),
                        endpoint: endpoint.clone(),
                        role,
                    });
                }
            }
        }

        dangling
    }

    /// Checks that every entry is stored under its own identifier's token and
    /// that every edge weight is finite and non-negative.
    ///
    /// Graphs built through `insert_*` with edges from [`Edge::new`] always
    /// pass. Graphs deserialized from an external document may not.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (token, node) in &self.nodes {
            check_token(EntityKind::Node, token, &node.id)?;
        }
        for (token, edge) in &self.edges {
            check_token(EntityKind::Edge, token, &edge.id)?;
            check_weight(&edge.id, edge.weight)?;
        }
        Ok(())
    }

    fn resolves(&self, id: &Identifier) -> bool {
        encode(id)
            .map(|token| self.nodes.contains_key(&token))
            .unwrap_or(false)
    }
}

fn check_token(kind: EntityKind, token: &str, id: &Identifier) -> Result<(), GraphError> {
    if encode(id)? != token {
        return Err(GraphError::TokenMismatch {
            kind,
            token: token.to_string(),
            id: id.clone(),
        });
    }
    Ok(())
}

/// Per-plugin entity counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginStats {
    pub nodes: usize,
    pub edges: usize,
}

/// Graph statistics for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub plugins: BTreeMap<String, PluginStats>,
}

impl<N, E> Graph<N, E> {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        let mut plugins: BTreeMap<String, PluginStats> = BTreeMap::new();

        for node in self.nodes.values() {
            plugins.entry(node.id.plugin().to_string()).or_default().nodes += 1;
        }
        for edge in self.edges.values() {
            plugins.entry(edge.id.plugin().to_string()).or_default().edges += 1;
        }

        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            plugins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(plugin: &str, local: &str) -> Identifier {
        Identifier::new(plugin, "weave", local).unwrap()
    }

    fn sample() -> Graph<&'static str, ()> {
        let mut graph = Graph::new();
        graph.insert_node(Node::new(id("git", "a"), "file")).unwrap();
        graph.insert_node(Node::new(id("github", "b"), "issue")).unwrap();

        let edge = Edge::new(id("github", "e"), id("github", "b"), id("git", "a"), 1.0, ());
        graph.insert_edge(edge.unwrap()).unwrap();
        graph
    }

    #[test]
    fn test_insert_and_lookup() {
        let graph = sample();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node("git$weave$a").unwrap().payload, "file");
        assert!(graph.node_by_id(&id("github", "b")).is_some());
        assert!(graph.edge("github$weave$e").is_some());
        assert!(graph.contains_edge("github$weave$e"));
        assert!(!graph.contains_node("git$weave$missing"));
    }

    #[test]
    fn test_document_rejects_extra_separator() {
        let json = serde_json::json!({
            "nodes": {
                "git$we$ave$a": { "id": "git$we$ave$a", "payload": null }
            }
        });
        assert!(serde_json::from_value::<Graph<(), ()>>(json).is_err());
    }

    #[test]
    fn test_insert_returns_replaced() {
        let mut graph: Graph<u32, ()> = Graph::new();
        assert!(graph.insert_node(Node::new(id("git", "a"), 1)).unwrap().is_none());
        let old = graph.insert_node(Node::new(id("git", "a"), 2)).unwrap();
        assert_eq!(old.unwrap().payload, 1);
        assert_eq!(graph.node("git$weave$a").unwrap().payload, 2);
    }

    #[test]
    fn test_plugin_filters_and_stats() {
        let graph = sample();

        assert_eq!(graph.nodes_for_plugin("git").count(), 1);
        assert_eq!(graph.edges_for_plugin("github").count(), 1);
        assert_eq!(graph.edges_for_plugin("git").count(), 0);

        let stats = graph.stats();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.plugins["github"], PluginStats { nodes: 1, edges: 1 });
        assert_eq!(stats.plugins["git"], PluginStats { nodes: 1, edges: 0 });
    }

    #[test]
    fn test_dangling_edges() {
        let mut graph = sample();
        assert!(graph.dangling_edges().is_empty());

        let edge = Edge::new(id("git", "e2"), id("git", "a"), id("git", "gone"), 0.5, ());
        graph.insert_edge(edge.unwrap()).unwrap();

        let dangling = graph.dangling_edges();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].edge, "git$weave$e2");
        assert_eq!(dangling[0].endpoint, id("git", "gone"));
        assert_eq!(dangling[0].role, EndpointRole::Destination);
    }

    #[test]
    fn test_json_document_shape() {
        let graph = sample();
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["nodes"]["git$weave$a"]["payload"], "file");
        assert_eq!(json["edges"]["github$weave$e"]["weight"], 1.0);

        let back: Graph<String, ()> = serde_json::from_value(json).unwrap();
        assert_eq!(back.node_count(), 2);
        assert!(back.validate().is_ok());
    }

    #[test]
    fn test_validate_detects_mismatch() {
        let json = serde_json::json!({
            "nodes": {
                "git$weave$a": { "id": "git$weave$b", "payload": null }
            }
        });
        let graph: Graph<(), ()> = serde_json::from_value(json).unwrap();
        assert!(matches!(
            graph.validate(),
            Err(GraphError::TokenMismatch { kind: EntityKind::Node, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_weight() {
        for weight in [-5.0, -0.0] {
            let json = serde_json::json!({
                "edges": {
                    "git$weave$e": {
                        "id": "git$weave$e",
                        "source_id": "git$weave$a",
                        "dest_id": "git$weave$b",
                        "weight": weight,
                        "payload": null
                    }
                }
            });
            let graph: Graph<(), ()> = serde_json::from_value(json).unwrap();
            assert!(matches!(
                graph.validate(),
                Err(GraphError::InvalidWeight { .. })
            ));
        }
    }
}

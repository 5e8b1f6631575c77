//! Read-only traversal over a merged graph.
//!
//! The token maps answer lookups but not "what is connected to this node".
//! `GraphView` indexes the graph into a petgraph `DiGraph` for that. Edges
//! with a dangling endpoint are left out of the index.

use crate::edge::Edge;
use crate::graph::Graph;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use weave_core::{encode, Identifier};

/// A borrowed, indexed view of a graph.
pub struct GraphView<'g, N, E> {
    graph: &'g Graph<N, E>,

    /// Node weights are node tokens, edge weights are edge tokens.
    index: DiGraph<&'g str, &'g str>,

    by_token: HashMap<&'g str, NodeIndex>,
}

impl<'g, N, E> GraphView<'g, N, E> {
    /// Indexes `graph`.
    pub fn new(graph: &'g Graph<N, E>) -> Self {
        let mut index = DiGraph::with_capacity(graph.node_count(), graph.edge_count());
        let mut by_token = HashMap::with_capacity(graph.node_count());

        for (token, _) in graph.nodes() {
            by_token.insert(token, index.add_node(token));
        }

        for (token, edge) in graph.edges() {
            let from = resolve(&by_token, &edge.source_id);
            let to = resolve(&by_token, &edge.dest_id);
            if let (Some(from), Some(to)) = (from, to) {
                index.add_edge(from, to, token);
            }
        }

        Self {
            graph,
            index,
            by_token,
        }
    }

    /// Tokens of nodes adjacent to `token` in the given direction.
    ///
    /// `Outgoing` follows edges from `token`, `Incoming` follows edges into it.
    /// Each neighbor appears once even when several edges connect them.
    pub fn neighbors(&self, token: &str, direction: Direction) -> Vec<&'g str> {
        let Some(&start) = self.by_token.get(token) else {
            return Vec::new();
        };

        let mut neighbors: Vec<&'g str> = self
            .index
            .neighbors_directed(start, direction)
            .filter_map(|idx| self.index.node_weight(idx).copied())
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    /// Edges leaving the node `token`.
    pub fn edges_from(&self, token: &str) -> Vec<&'g Edge<E>> {
        let Some(&start) = self.by_token.get(token) else {
            return Vec::new();
        };

        let graph = self.graph;
        let mut edges: Vec<&'g Edge<E>> = self
            .index
            .edges_directed(start, Direction::Outgoing)
            .filter_map(|edge_ref| graph.edge(edge_ref.weight()))
            .collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        edges
    }

    /// Finds a path with the fewest hops from `from` to `to`, as node tokens.
    pub fn find_path(&self, from: &str, to: &str) -> Option<Vec<&'g str>> {
        let start = *self.by_token.get(from)?;
        let goal = *self.by_token.get(to)?;

        let (_, path) = petgraph::algo::astar(
            &self.index,
            start,
            |finish| finish == goal,
            |_| 1,
            |_| 0,
        )?;

        Some(
            path.into_iter()
                .filter_map(|idx| self.index.node_weight(idx).copied())
                .collect(),
        )
    }

    /// Number of edges whose endpoints both resolved.
    pub fn indexed_edge_count(&self) -> usize {
        self.index.edge_count()
    }
}

fn resolve(by_token: &HashMap<&str, NodeIndex>, id: &Identifier) -> Option<NodeIndex> {
    let token = encode(id).ok()?;
    by_token.get(token.as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;

    fn chain() -> Graph<(), ()> {
        let mut builder = GraphBuilder::new("git", "weave").unwrap();
        for local in ["a", "b", "c", "d"] {
            builder.add_node(local, ()).unwrap();
        }
        builder.add_edge("ab", "a", "b", 1.0, ()).unwrap();
        builder.add_edge("ab2", "a", "b", 2.0, ()).unwrap();
        builder.add_edge("bc", "b", "c", 1.0, ()).unwrap();
        builder.add_edge("cx", "c", "missing", 1.0, ()).unwrap();
        builder.build()
    }

    #[test]
    fn test_neighbors() {
        let graph = chain();
        let view = GraphView::new(&graph);

        assert_eq!(
            view.neighbors("git$weave$a", Direction::Outgoing),
            vec!["git$weave$b"]
        );
        assert_eq!(
            view.neighbors("git$weave$c", Direction::Incoming),
            vec!["git$weave$b"]
        );
        assert!(view.neighbors("git$weave$d", Direction::Outgoing).is_empty());
        assert!(view.neighbors("nope", Direction::Outgoing).is_empty());
    }

    #[test]
    fn test_dangling_edges_skipped() {
        let graph = chain();
        let view = GraphView::new(&graph);

        assert_eq!(graph.edge_count(), 4);
        assert_eq!(view.indexed_edge_count(), 3);
        assert!(view.edges_from("git$weave$c").is_empty());
    }

    #[test]
    fn test_edges_from() {
        let graph = chain();
        let view = GraphView::new(&graph);

        let edges = view.edges_from("git$weave$a");
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].id.local(), "ab");
        assert_eq!(edges[1].weight, 2.0);
    }

    #[test]
    fn test_find_path() {
        let graph = chain();
        let view = GraphView::new(&graph);

        let path = view.find_path("git$weave$a", "git$weave$c").unwrap();
        assert_eq!(path, vec!["git$weave$a", "git$weave$b", "git$weave$c"]);
        assert!(view.find_path("git$weave$c", "git$weave$a").is_none());
        assert!(view.find_path("git$weave$a", "git$weave$d").is_none());
    }
}

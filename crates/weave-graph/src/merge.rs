//! The graph merge engine.
//!
//! Graphs are folded left to right into a fresh accumulator. For each
//! incoming graph, tokens new to the accumulator are inserted as-is and tokens
//! already present are resolved through the node or edge policy. Entries the
//! incoming graph does not mention are left alone.
//!
//! The first policy failure aborts the merge. No partial graph is returned.

use crate::edge::Edge;
use crate::error::MergeError;
use crate::graph::Graph;
use crate::node::Node;
use crate::policy::{ConflictPolicy, Consistent, LastWriteWins};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// What to do with edges whose endpoints are missing from the merged graph.
///
/// Checked once, after all graphs are folded, since one producer may rely on
/// another to supply an edge's endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityPolicy {
    /// Do not check.
    #[default]
    Ignore,
    /// Log each dangling endpoint and keep the edge.
    Warn,
    /// Fail the merge on the first dangling endpoint.
    Reject,
}

impl std::fmt::Display for IntegrityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ignore => "ignore",
            Self::Warn => "warn",
            Self::Reject => "reject",
        };
        write!(f, "{}", s)
    }
}

/// Merge settings that are not conflict policies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    #[serde(default)]
    pub integrity: IntegrityPolicy,
}

/// A merge strategy: one policy for nodes, one for edges.
#[derive(Debug, Clone, Default)]
pub struct Merger<NP, EP> {
    node_policy: NP,
    edge_policy: EP,
    options: MergeOptions,
}

impl<NP, EP> Merger<NP, EP> {
    /// Creates a merger with default options.
    pub fn new(node_policy: NP, edge_policy: EP) -> Self {
        Self {
            node_policy,
            edge_policy,
            options: MergeOptions::default(),
        }
    }

    /// Replaces the merge options.
    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Folds `graphs` into one new graph.
    pub fn merge<N, E, I>(&self, graphs: I) -> Result<Graph<N, E>, MergeError>
    where
        I: IntoIterator<Item = Graph<N, E>>,
        NP: ConflictPolicy<Node<N>>,
        EP: ConflictPolicy<Edge<E>>,
    {
        fold(graphs, &self.node_policy, &self.edge_policy, &self.options)
    }
}

impl Merger<Consistent, Consistent> {
    /// Merger that fails on any disagreement.
    pub fn consistent() -> Self {
        Self::new(Consistent, Consistent)
    }
}

impl Merger<LastWriteWins, LastWriteWins> {
    /// Merger where later graphs win.
    pub fn arbitrary() -> Self {
        Self::new(LastWriteWins, LastWriteWins)
    }
}

/// Merges graphs with caller-supplied node and edge policies.
pub fn merge_graphs<N, E, NP, EP>(
    graphs: impl IntoIterator<Item = Graph<N, E>>,
    node_policy: &NP,
    edge_policy: &EP,
) -> Result<Graph<N, E>, MergeError>
where
    NP: ConflictPolicy<Node<N>>,
    EP: ConflictPolicy<Edge<E>>,
{
    fold(graphs, node_policy, edge_policy, &MergeOptions::default())
}

/// Merges graphs, failing with [`MergeError::Conflict`] when two graphs
/// disagree on any node or edge.
pub fn merge_graphs_consistent<N, E>(
    graphs: impl IntoIterator<Item = Graph<N, E>>,
) -> Result<Graph<N, E>, MergeError>
where
    N: PartialEq,
    E: PartialEq,
{
    merge_graphs(graphs, &Consistent, &Consistent)
}

/// Merges graphs, keeping the later graph's value on every conflict.
pub fn merge_graphs_arbitrary<N, E>(graphs: impl IntoIterator<Item = Graph<N, E>>) -> Graph<N, E> {
    match fold(graphs, &LastWriteWins, &LastWriteWins, &MergeOptions::default()) {
        Ok(merged) => merged,
        // LastWriteWins never fails and the default integrity policy ignores
        // dangling edges.
        Err(e) => unreachable!("arbitrary merge failed: {e}"),
    }
}

fn fold<N, E, NP, EP>(
    graphs: impl IntoIterator<Item = Graph<N, E>>,
    node_policy: &NP,
    edge_policy: &EP,
    options: &MergeOptions,
) -> Result<Graph<N, E>, MergeError>
where
    NP: ConflictPolicy<Node<N>>,
    EP: ConflictPolicy<Edge<E>>,
{
    let mut merged = Graph::new();
    let mut count = 0usize;

    for graph in graphs {
        let (nodes, edges) = graph.into_parts();
        let node_conflicts = absorb(&mut merged.nodes, nodes, node_policy)?;
        let edge_conflicts = absorb(&mut merged.edges, edges, edge_policy)?;

        trace!(
            graph = count,
            node_conflicts,
            edge_conflicts,
            "folded graph into accumulator"
        );
        count += 1;
    }

    check_integrity(&merged, options.integrity)?;

    debug!(
        graphs = count,
        nodes = merged.node_count(),
        edges = merged.edge_count(),
        "merged graphs"
    );

    Ok(merged)
}

/// Moves `incoming` into `acc`, resolving shared tokens through `policy`.
/// Returns how many tokens were shared.
fn absorb<T, P>(
    acc: &mut BTreeMap<String, T>,
    incoming: BTreeMap<String, T>,
    policy: &P,
) -> Result<usize, MergeError>
where
    P: ConflictPolicy<T>,
{
    let mut conflicts = 0;

    for (token, value) in incoming {
        match acc.entry(token) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(slot) => {
                let (token, existing) = slot.remove_entry();
                let resolved = policy.resolve(&token, existing, value)?;
                acc.insert(token, resolved);
                conflicts += 1;
            }
        }
    }

    Ok(conflicts)
}

fn check_integrity<N, E>(graph: &Graph<N, E>, policy: IntegrityPolicy) -> Result<(), MergeError> {
    if policy == IntegrityPolicy::Ignore {
        return Ok(());
    }

    for dangling in graph.dangling_edges() {
        match policy {
            IntegrityPolicy::Reject => {
                return Err(MergeError::DanglingEdge {
                    edge: dangling.edge,
                    endpoint: dangling.endpoint,
                    role: dangling.role,
                });
            }
            _ => {
                warn!(
                    edge = %dangling.edge,
                    endpoint = %dangling.endpoint,
                    role = %dangling.role,
                    "dangling edge endpoint in merged graph"
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::Identifier;

    fn id(local: &str) -> Identifier {
        Identifier::new("p", "r", local).unwrap()
    }

    fn graph(nodes: &[(&str, u32)]) -> Graph<u32, ()> {
        let mut graph = Graph::new();
        for (local, payload) in nodes {
            graph.insert_node(Node::new(id(local), *payload)).unwrap();
        }
        graph
    }

    #[test]
    fn test_merge_nothing_is_empty() {
        let merged = merge_graphs_consistent(Vec::<Graph<u32, ()>>::new()).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_disjoint_graphs_union() {
        let merged = merge_graphs_consistent(vec![graph(&[("a", 1)]), graph(&[("b", 2)])]).unwrap();
        assert_eq!(merged.node_count(), 2);
    }

    #[test]
    fn test_conflict_stops_at_first_token() {
        let err = merge_graphs_consistent(vec![
            graph(&[("a", 1), ("b", 1)]),
            graph(&[("a", 2), ("b", 2)]),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            MergeError::Conflict {
                kind: crate::error::EntityKind::Node,
                token: "p$r$a".to_string(),
            }
        );
    }

    #[test]
    fn test_untouched_entries_survive() {
        let merged = merge_graphs_arbitrary(vec![
            graph(&[("a", 1), ("b", 1)]),
            graph(&[("b", 5)]),
            graph(&[("c", 9)]),
        ]);

        assert_eq!(merged.node("p$r$a").unwrap().payload, 1);
        assert_eq!(merged.node("p$r$b").unwrap().payload, 5);
        assert_eq!(merged.node("p$r$c").unwrap().payload, 9);
    }

    #[test]
    fn test_arbitrary_matches_last_write_wins_merger() {
        let inputs = || vec![graph(&[("a", 1), ("b", 1)]), graph(&[("a", 3)])];

        let merged = merge_graphs_arbitrary(inputs());
        assert_eq!(merged, Merger::arbitrary().merge(inputs()).unwrap());
        assert_eq!(merged, merge_graphs(inputs(), &LastWriteWins, &LastWriteWins).unwrap());
    }

    #[test]
    fn test_closure_policy_sees_fold_order() {
        let sum = |a: Node<u32>, b: Node<u32>| Node::new(a.id, a.payload + b.payload);
        let merged = merge_graphs(
            vec![graph(&[("a", 1)]), graph(&[("a", 2)]), graph(&[("a", 4)])],
            &sum,
            &LastWriteWins,
        )
        .unwrap();

        assert_eq!(merged.node("p$r$a").unwrap().payload, 7);
    }

    #[test]
    fn test_integrity_reject_and_warn() {
        let mut g = graph(&[("a", 1)]);
        g.insert_edge(Edge::new(id("e"), id("a"), id("missing"), 1.0, ()).unwrap())
            .unwrap();

        let rejecting = Merger::consistent().with_options(MergeOptions {
            integrity: IntegrityPolicy::Reject,
        });
        let err = rejecting.merge(vec![g.clone()]).unwrap_err();
        assert!(matches!(err, MergeError::DanglingEdge { ref edge, .. } if edge == "p$r$e"));

        let warning = Merger::consistent().with_options(MergeOptions {
            integrity: IntegrityPolicy::Warn,
        });
        let merged = warning.merge(vec![g.clone()]).unwrap();
        assert_eq!(merged, g);
    }

    #[test]
    fn test_integrity_checked_after_fold() {
        let mut edges_only: Graph<u32, ()> = Graph::new();
        edges_only
            .insert_edge(Edge::new(id("e"), id("a"), id("b"), 1.0, ()).unwrap())
            .unwrap();

        let merger = Merger::arbitrary().with_options(MergeOptions {
            integrity: IntegrityPolicy::Reject,
        });
        let merged = merger
            .merge(vec![edges_only, graph(&[("a", 1), ("b", 2)])])
            .unwrap();
        assert_eq!(merged.edge_count(), 1);
    }

    #[test]
    fn test_options_deserialize_with_default() {
        let options: MergeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.integrity, IntegrityPolicy::Ignore);

        let options: MergeOptions = serde_json::from_str(r#"{"integrity":"reject"}"#).unwrap();
        assert_eq!(options.integrity, IntegrityPolicy::Reject);
    }
}

//! Conflict policies for the merge engine.
//!
//! When two graphs carry an entry under the same token, the merge engine
//! hands both values to a policy and keeps whatever it returns. Two policies
//! ship ready-made:
//!
//! - [`Consistent`] demands the values be equal and fails otherwise. Use it
//!   when several plugins may compute the same fact independently.
//! - [`LastWriteWins`] keeps the later value. Use it when later graphs are
//!   known to supersede earlier ones.
//!
//! Any `Fn(T, T) -> T` closure is also a policy, e.g. one that sums edge
//! weights. Implement [`ConflictPolicy`] directly when a custom rule needs to
//! fail.
//!
//! The engine folds left to right. If the final result must not depend on
//! input order, the policy has to be associative and commutative.

use crate::edge::Edge;
use crate::error::{EntityKind, MergeError};
use crate::node::Node;

/// Resolves two values stored under the same token.
pub trait ConflictPolicy<T> {
    /// Returns the value to keep. `existing` comes from earlier graphs,
    /// `incoming` from the graph being merged in.
    fn resolve(&self, token: &str, existing: T, incoming: T) -> Result<T, MergeError>;
}

impl<T, F> ConflictPolicy<T> for F
where
    F: Fn(T, T) -> T,
{
    fn resolve(&self, _token: &str, existing: T, incoming: T) -> Result<T, MergeError> {
        Ok(self(existing, incoming))
    }
}

/// A graph entity the merge engine can name in errors.
pub trait Entity {
    const KIND: EntityKind;
}

impl<P> Entity for Node<P> {
    const KIND: EntityKind = EntityKind::Node;
}

impl<P> Entity for Edge<P> {
    const KIND: EntityKind = EntityKind::Edge;
}

/// Accepts a conflict only when both values are structurally equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Consistent;

impl<T> ConflictPolicy<T> for Consistent
where
    T: Entity + PartialEq,
{
    fn resolve(&self, token: &str, existing: T, incoming: T) -> Result<T, MergeError> {
        if existing == incoming {
            Ok(existing)
        } else {
            Err(MergeError::Conflict {
                kind: T::KIND,
                token: token.to_string(),
            })
        }
    }
}

/// Keeps the incoming value on every conflict.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastWriteWins;

impl<T> ConflictPolicy<T> for LastWriteWins {
    fn resolve(&self, _token: &str, _existing: T, incoming: T) -> Result<T, MergeError> {
        Ok(incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::Identifier;

    fn node(payload: u32) -> Node<u32> {
        Node::new(Identifier::new("p", "r", "a").unwrap(), payload)
    }

    #[test]
    fn test_consistent_accepts_equal() {
        let resolved = Consistent.resolve("p$r$a", node(1), node(1)).unwrap();
        assert_eq!(resolved, node(1));
    }

    #[test]
    fn test_consistent_rejects_different_payload() {
        let err = Consistent.resolve("p$r$a", node(1), node(2)).unwrap_err();
        assert_eq!(
            err,
            MergeError::Conflict {
                kind: EntityKind::Node,
                token: "p$r$a".to_string(),
            }
        );
    }

    #[test]
    fn test_consistent_compares_adjacency() {
        let with_edges = node(1).with_edges(vec![Identifier::new("p", "r", "e").unwrap()]);
        assert!(Consistent.resolve("p$r$a", node(1), with_edges).is_err());
    }

    #[test]
    fn test_last_write_wins() {
        let resolved = LastWriteWins.resolve("p$r$a", node(1), node(2)).unwrap();
        assert_eq!(resolved.payload, 2);
    }

    #[test]
    fn test_closure_policy() {
        let keep_max = |a: Node<u32>, b: Node<u32>| if a.payload >= b.payload { a } else { b };
        let resolved = keep_max.resolve("p$r$a", node(7), node(3)).unwrap();
        assert_eq!(resolved.payload, 7);
    }
}

//! Weighted edges between nodes.
//!
//! The weight belongs to the plugin that produced the edge. Weave only checks
//! that it is a finite, non-negative number and otherwise carries it as-is.
//! Negative zero counts as negative.

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use weave_core::Identifier;

/// A directed, weighted edge contributed by a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<P> {
    pub id: Identifier,

    /// Node the edge starts at.
    pub source_id: Identifier,

    /// Node the edge points to.
    pub dest_id: Identifier,

    pub weight: f64,

    pub payload: P,
}

impl<P> Edge<P> {
    /// Creates an edge, rejecting negative, infinite or NaN weights.
    pub fn new(
        id: Identifier,
        source_id: Identifier,
        dest_id: Identifier,
        weight: f64,
        payload: P,
    ) -> Result<Self, GraphError> {
        check_weight(&id, weight)?;

        Ok(Self {
            id,
            source_id,
            dest_id,
            weight,
            payload,
        })
    }

    /// Returns both endpoints, source first.
    pub fn endpoints(&self) -> [&Identifier; 2] {
        [&self.source_id, &self.dest_id]
    }
}

pub(crate) fn check_weight(id: &Identifier, weight: f64) -> Result<(), GraphError> {
    if !weight.is_finite() || weight.is_sign_negative() {
        return Err(GraphError::InvalidWeight {
            edge: id.clone(),
            weight,
        });
    }
    Ok(())
}

use serde::{Deserialize, Serialize};
use thiserror::Error;
use weave_core::{Identifier, IdentityError};

/// Which kind of graph entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Node,
    Edge,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

/// Which end of an edge an endpoint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointRole {
    Source,
    Destination,
}

impl std::fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Destination => write!(f, "destination"),
        }
    }
}

/// Errors raised while building or loading a graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Invalid weight {weight} on edge {edge}: weights must be finite and non-negative")]
    InvalidWeight { edge: Identifier, weight: f64 },

    #[error("Duplicate {kind} {token}")]
    DuplicateId { kind: EntityKind, token: String },

    #[error("{kind} stored under {token} has identifier {id}")]
    TokenMismatch {
        kind: EntityKind,
        token: String,
        id: Identifier,
    },
}

/// Errors raised by the merge engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("Merge conflict on {kind} {token}: graphs disagree on its value")]
    Conflict { kind: EntityKind, token: String },

    #[error("Edge {edge} has a dangling {role} endpoint {endpoint}")]
    DanglingEdge {
        edge: String,
        endpoint: Identifier,
        role: EndpointRole,
    },
}

//! Weave Graph - Merging graphs from independent producers
//!
//! Each producer (a plugin reading one source) builds a small [`Graph`] of
//! nodes and weighted edges, named by plugin-scoped identifiers. This crate
//! folds any number of those graphs into one, resolving shared ids through a
//! pluggable [`ConflictPolicy`].
//!
//! # Architecture
//!
//! - [`Graph`] maps identifier tokens to [`Node`]s and [`Edge`]s.
//! - [`GraphBuilder`] mints ids for a producer and assembles its graph.
//! - [`Merger`] and the `merge_graphs*` functions fold graphs together.
//! - [`GraphView`] answers traversal queries over a merged graph.
//! - [`GraphStore`] keeps named snapshots on disk.
//!
//! # Example
//!
//! ```
//! use weave_graph::{merge_graphs_consistent, GraphBuilder};
//!
//! let mut git = GraphBuilder::new("git", "weave").unwrap();
//! git.add_node("file/src/lib.rs", "file".to_string()).unwrap();
//!
//! let mut github = GraphBuilder::new("github", "weave").unwrap();
//! github.add_node("issue/1", "issue".to_string()).unwrap();
//!
//! let merged = merge_graphs_consistent::<String, ()>(vec![git.build(), github.build()]).unwrap();
//! assert_eq!(merged.node_count(), 2);
//! ```

mod builder;
mod edge;
mod error;
mod graph;
mod merge;
mod node;
mod policy;
mod store;
mod view;

pub use builder::GraphBuilder;
pub use edge::Edge;
pub use error::{EndpointRole, EntityKind, GraphError, MergeError};
pub use graph::{DanglingEndpoint, Graph, GraphStats, PluginStats};
pub use merge::{
    merge_graphs, merge_graphs_arbitrary, merge_graphs_consistent, IntegrityPolicy, MergeOptions,
    Merger,
};
pub use node::Node;
pub use policy::{ConflictPolicy, Consistent, Entity, LastWriteWins};
pub use store::{GraphStore, StoreError};
pub use view::GraphView;

pub use petgraph::Direction;
pub use weave_core::{decode, encode, Identifier, IdentityError, SEPARATOR};

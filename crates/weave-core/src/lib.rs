//! Weave Core - Identity for multi-source graphs
//!
//! Independent plugins each build a small graph of nodes and edges. For their
//! graphs to merge without collisions, every entity carries an [`Identifier`]
//! scoped by plugin, source and local name, and every map is keyed by the
//! identifier's token.
//!
//! # Example
//!
//! ```
//! use weave_core::{decode, encode, Identifier};
//!
//! let id = Identifier::new("git", "weave", "src/lib.rs").unwrap();
//! let token = encode(&id).unwrap();
//! assert_eq!(token, "git$weave$src/lib.rs");
//! assert_eq!(decode(&token).unwrap(), id);
//! ```

mod error;
mod identity;

pub use error::{IdentifierField, IdentityError};
pub use identity::{decode, encode, Identifier, SEPARATOR};

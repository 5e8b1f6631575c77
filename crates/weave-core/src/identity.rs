//! Plugin-scoped identifiers and their token encoding.
//!
//! Every node and edge in a Weave graph is named by an [`Identifier`]: the
//! plugin that produced it, the source (usually a repository) it was read
//! from, and a name local to that source. Graphs key their maps by the
//! identifier's token, which joins the three parts with [`SEPARATOR`].
//!
//! Tokens must only ever be produced by [`encode`]. Building one with
//! `format!` skips the separator check and can collide with another id.

use crate::error::{IdentifierField, IdentityError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Reserved character joining the parts of a token.
///
/// Plugin names, source names and local names must never contain it.
pub const SEPARATOR: char = '$';

/// Names a single node or edge across all plugins.
///
/// Only [`Identifier::new`] and [`decode`] build one, so every part is free of
/// the separator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    /// Plugin that minted this id, e.g. `git` or `github`.
    plugin: String,

    /// Source the plugin read from, usually a repository name.
    source: String,

    /// Name unique within the plugin and source.
    local: String,
}

impl Identifier {
    /// Creates an identifier, rejecting any part that contains the separator.
    pub fn new(
        plugin: impl Into<String>,
        source: impl Into<String>,
        local: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let id = Self {
            plugin: plugin.into(),
            source: source.into(),
            local: local.into(),
        };
        id.validate()?;
        Ok(id)
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    /// Splits the identifier into `(plugin, source, local)`.
    pub fn into_parts(self) -> (String, String, String) {
        (self.plugin, self.source, self.local)
    }

    /// Checks every part against the separator.
    pub fn validate(&self) -> Result<(), IdentityError> {
        for (field, value) in self.fields() {
            if value.contains(SEPARATOR) {
                return Err(IdentityError::InvalidIdentifier {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the canonical token. Shorthand for [`encode`].
    pub fn token(&self) -> Result<String, IdentityError> {
        encode(self)
    }

    fn fields(&self) -> [(IdentifierField, &str); 3] {
        [
            (IdentifierField::Plugin, self.plugin.as_str()),
            (IdentifierField::Source, self.source.as_str()),
            (IdentifierField::Local, self.local.as_str()),
        ]
    }
}

/// Encodes an identifier into its token.
///
/// Fails with [`IdentityError::InvalidIdentifier`] naming the first part that
/// contains the separator. Nothing is escaped or truncated. Identifiers from
/// [`Identifier::new`] and [`decode`] always encode.
pub fn encode(id: &Identifier) -> Result<String, IdentityError> {
    id.validate()?;

    let mut token =
        String::with_capacity(id.plugin.len() + id.source.len() + id.local.len() + 2);
    token.push_str(&id.plugin);
    token.push(SEPARATOR);
    token.push_str(&id.source);
    token.push(SEPARATOR);
    token.push_str(&id.local);
    Ok(token)
}

/// Decodes a token back into its identifier.
///
/// The token must split into exactly three parts. Tokens read from outside
/// the process can carry extra separators even though [`encode`] never
/// produces them, so both too few and too many parts are rejected.
pub fn decode(token: &str) -> Result<Identifier, IdentityError> {
    let parts: Vec<&str> = token.split(SEPARATOR).collect();

    match parts.as_slice() {
        [plugin, source, local] => Ok(Identifier {
            plugin: (*plugin).to_string(),
            source: (*source).to_string(),
            local: (*local).to_string(),
        }),
        _ => Err(IdentityError::MalformedToken {
            token: token.to_string(),
            parts: parts.len(),
        }),
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.plugin,
            self.source,
            self.local,
            sep = SEPARATOR
        )
    }
}

impl FromStr for Identifier {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

// Identifiers travel as tokens in every serialized document.
impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let token = encode(self).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&token)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        decode(&token).map_err(serde::de::Error::custom)
    }
}

use thiserror::Error;

/// One of the three parts of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierField {
    Plugin,
    Source,
    Local,
}

impl std::fmt::Display for IdentifierField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Plugin => "plugin",
            Self::Source => "source",
            Self::Local => "local",
        };
        write!(f, "{}", s)
    }
}

/// Errors raised while encoding or decoding identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Invalid identifier: {field} name {value:?} contains the reserved separator")]
    InvalidIdentifier {
        field: IdentifierField,
        value: String,
    },

    #[error("Malformed token {token:?}: expected 3 parts, found {parts}")]
    MalformedToken { token: String, parts: usize },
}

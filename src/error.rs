//! Error types for wow.

use thiserror::Error;

/// A route registration mistake.
///
/// These only happen while routes are being set up and mean the program is
/// wired incorrectly, so they should stop startup rather than be handled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("catch-all segment must be the last segment in pattern '{0}'")]
    CatchAllNotLast(String),

    #[error("pattern conflict: '{pattern}' resolves to the same route as '{existing}'")]
    PatternConflict { pattern: String, existing: String },

    #[error("wildcard segment '{segment}' conflicts with existing wildcard '{existing}'")]
    WildcardConflict { segment: String, existing: String },

    #[error("segment '{segment}' cannot be added after catch-all '{existing}'")]
    CatchAllConflict { segment: String, existing: String },

    #[error("HTTP method can not be empty")]
    EmptyMethod,

    #[error("path must begin with '/' in path '{0}'")]
    MissingLeadingSlash(String),

    #[error("there must be at least one handler for '{0}'")]
    EmptyHandlerChain(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("route error: {0}")]
    Route(#[from] RouteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

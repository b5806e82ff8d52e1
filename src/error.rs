//! Error taxonomy for the resolution pass.

use thiserror::Error;

/// Errors that abort a resolution pass.
///
/// Every variant is fatal: callers get either a complete overlay or an
/// error, never a partially resolved one.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A key required to continue resolution is absent.
    #[error("missing required configuration key '{0}'")]
    MissingConfiguration(String),

    /// A fetched payload could not be parsed as a JSON object.
    #[error("value of '{name}' is not a JSON object: {message}")]
    Parse { name: String, message: String },

    /// The external store could not be reached or refused the request.
    #[error("{store} fetch failed for '{name}': {message}")]
    Fetch {
        store: &'static str,
        name: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ResolveError>;

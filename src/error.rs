use thiserror::Error;

/// Failure talking to the backend. Every variant takes the same user-facing path;
/// the distinction only shows up in the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {path} returned HTTP {status}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
    },

    #[error("could not decode the response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Refusal that carries no HTTP status, from backends that are not HTTP.
    #[error("backend rejected the request: {0}")]
    Rejected(String),
}

/// Client-side form validation failure. Raised before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Category name is required")]
    EmptyName,

    #[error("Title required")]
    EmptyTitle,

    #[error("Invalid date '{0}'. Use YYYY-MM-DD.")]
    BadDate(String),
}

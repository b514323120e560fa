//! Registry client error types.

/// Errors talking to the presence registry or the schema source.
///
/// Any of these aborts the whole run: without the published baseline every
/// per-entry verdict would be meaningless.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The HTTP client could not be constructed.
    #[error("failed to initialise HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The endpoint returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The GraphQL layer reported errors or returned no data.
    #[error("{endpoint} rejected the query: {message}")]
    Query { endpoint: String, message: String },
}

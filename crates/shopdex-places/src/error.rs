use thiserror::Error;

/// Errors returned by the places provider gateway.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a status outside {OK, ZERO_RESULTS}.
    #[error("places provider returned status {status}: {message}")]
    Provider { status: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The remote provider is disabled by configuration.
    #[error("places provider is disabled")]
    Disabled,
}

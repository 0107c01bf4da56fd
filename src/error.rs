/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code from the warehouse endpoint.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Statement rejected by the warehouse.
    #[error("statement {index} failed: {message}")]
    Statement {
        /// Zero-based position of the failing statement in its batch.
        index: usize,
        /// Error message text from the warehouse.
        message: String,
        /// Optional warehouse-specific error code.
        code: Option<String>,
    },
    /// Response decoding or protocol-shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
    /// Missing or malformed connection string.
    #[error("configuration error: {0}")]
    Config(String),
}

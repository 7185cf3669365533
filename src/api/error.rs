use thiserror::Error;

/// Longest server error body kept in a message
const MAX_BODY_CHARS: usize = 200;

/// Why a request reached its failure callback. The Display text is what a
/// page shows in its status area.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Request-level timeout from config expired
    #[error("request timed out")]
    Timeout,

    /// Connection refused, DNS failure, TLS failure
    #[error("connection failed: {0}")]
    Connect(String),

    /// Non-success HTTP status
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not valid JSON
    #[error("invalid response payload: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Other(String),
}

impl FetchError {
    /// Classify a reqwest error
    pub fn from_reqwest_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else if let Some(status) = error.status() {
            Self::from_status(status.as_u16(), "")
        } else if error.is_decode() {
            FetchError::Decode(error.to_string())
        } else {
            FetchError::Other(error.to_string())
        }
    }

    pub fn from_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = if body.is_empty() {
            "no response body".to_string()
        } else if body.chars().count() > MAX_BODY_CHARS {
            let truncated: String = body.chars().take(MAX_BODY_CHARS).collect();
            format!("{}...", truncated)
        } else {
            body.to_string()
        };
        FetchError::Status { status, body }
    }
}

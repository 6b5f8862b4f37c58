use thiserror::Error;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// The response decoded but lacks the expected payload
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<reqwest::Error> for SocialError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SocialError::Parse(err.to_string())
        } else {
            SocialError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SocialError {
    fn from(err: serde_json::Error) -> Self {
        SocialError::Parse(err.to_string())
    }
}

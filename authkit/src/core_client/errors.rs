//! Error type for the remote-core request sender

use thiserror::Error;

/// Failure talking to the remote authentication core
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    /// The request never produced an HTTP response
    #[error("request to authentication core failed: {0}")]
    Transport(String),

    /// The core answered with a non-success status
    #[error("authentication core returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The core answered 2xx but the body was not the expected JSON
    #[error("failed to decode core response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NetworkError::Status {
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "authentication core returned status 503: down"
        );
    }
}

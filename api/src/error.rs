//! Error taxonomy for everything the node can do to us.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a non-success HTTP status.
    #[error("node returned {status}: {body}")]
    Node { status: u16, body: String },

    /// The node answered 200 but the body did not parse.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The node processed the request and refused it (wrong password,
    /// unknown wallet, insufficient funds, ...).
    #[error("{0}")]
    Rejected(String),

    /// The push channel dropped or could not be established.
    #[error("push channel: {0}")]
    Channel(String),
}

impl ApiError {
    /// Whether this error means the node itself is not reachable, as opposed
    /// to a request it received and declined.
    ///
    /// Connectivity failures collapse into the UNREACHABLE session state;
    /// everything else stays local to the call site.
    pub fn is_connection_error(&self) -> bool {
        match self {
            ApiError::Transport(e) => e.is_connect() || e.is_timeout(),
            ApiError::Channel(_) => true,
            ApiError::Node { .. } | ApiError::Decode(_) | ApiError::Rejected(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_is_not_a_connection_error() {
        let err = ApiError::Rejected("wrong password".to_string());
        assert!(!err.is_connection_error());
        assert_eq!(err.to_string(), "wrong password");
    }

    #[test]
    fn channel_drop_is_a_connection_error() {
        assert!(ApiError::Channel("connection reset".to_string()).is_connection_error());
    }

    #[test]
    fn node_status_is_not_a_connection_error() {
        let err = ApiError::Node {
            status: 500,
            body: "internal error".to_string(),
        };
        assert!(!err.is_connection_error());
    }
}

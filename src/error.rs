use http::StatusCode;
use thiserror::Error;

/// Failures surfaced by the token cache. Nothing here is retried internally.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Network failure, timeout or unreachable identity service
    #[error("identity service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Identity service answered with a non-success status (rejected credentials included)
    #[error("identity service responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Body is not JSON or lacks the `signInResponse` envelope
    #[error("unable to decode sign-in response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("sign-in response carried an empty token")]
    EmptyToken,
}

impl AuthError {
    /// `true` for failures that happened on the wire rather than while decoding.
    pub fn is_transport(&self) -> bool {
        matches!(self, AuthError::Transport(_) | AuthError::Status { .. })
    }

    /// Short label used for the failure metric.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::Transport(_) => "transport",
            AuthError::Status { .. } => "status",
            AuthError::Decode(_) => "decode",
            AuthError::EmptyToken => "empty_token",
        }
    }
}

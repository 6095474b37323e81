use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatBackendError {
    #[error("request to model backend failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model backend returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed backend response: {reason}")]
    MalformedResponse { reason: String },
}

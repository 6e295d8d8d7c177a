pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Non-success response from the quiz service. Carries the server's
    /// `detail` message when one was provided, else a generic fallback.
    #[error("{0}")]
    Api(String),

    /// Defensive checks: missing questions, missing attempt id.
    #[error("{0}")]
    Integrity(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Single human-readable line shown by the views.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(msg) | Error::Integrity(msg) => msg.clone(),
            Error::Validation(errs) => errs.to_string(),
            Error::Reqwest(err) => format!("Network error: {}", err),
            other => other.to_string(),
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store is not valid session json: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Anything that keeps a reply from arriving. All variants are handled the
/// same way by the conversation; the detail only reaches the log.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("chat request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat endpoint answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("chat endpoint returned an unreadable body: {0}")]
    Decode(String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LingoError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API Error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Translation failed: {0}")]
    Translation(String),
}

/// Outcomes of the translation relay that reach the caller
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Missing text or target")]
    MissingInput,

    #[error("No valid translation returned")]
    InvalidUpstream,

    #[error("Internal server error")]
    Internal(#[source] LingoError),
}

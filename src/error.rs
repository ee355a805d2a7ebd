use thiserror::Error;

/// Riddle error types
#[derive(Error, Debug)]
pub enum RiddleError {
    #[error("No unused short prompt matches letter '{letter}' (position {position})")]
    ExhaustedPool { letter: char, position: usize },

    #[error("Prompt lookup unavailable: {0}")]
    LookupUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RiddleError {
    /// Short machine-readable name for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            RiddleError::ExhaustedPool { .. } => "exhausted_pool",
            RiddleError::LookupUnavailable(_) => "lookup_unavailable",
            RiddleError::InvalidInput(_) => "invalid_request",
            RiddleError::Json(_) => "json_error",
            RiddleError::Io(_) => "io_error",
        }
    }
}

/// Result type alias for riddle operations
pub type Result<T> = std::result::Result<T, RiddleError>;

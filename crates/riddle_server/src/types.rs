//! Request/response types for the riddle server

use serde::{Deserialize, Serialize};

/// Error payload returned with every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                kind: kind.into(),
            },
        }
    }
}

/// Letters from the `/spL/{letters}` path, whitespace dropped
pub fn parse_letters(raw: &str) -> Vec<char> {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

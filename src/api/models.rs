use serde::{Deserialize, Serialize};

use crate::data_models::SearchStatus;

/// Raw search body. Everything is optional so that a missing field becomes a
/// validation message instead of a deserialization error; `null` counts as missing.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub username: Option<String>,
    pub pattern: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: SearchStatus,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> ErrorResponse {
        ErrorResponse {
            status: SearchStatus::Error,
            message: message.into(),
        }
    }
}

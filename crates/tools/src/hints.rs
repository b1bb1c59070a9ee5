//! Structured tool failures and remote error classification

use serde::Serialize;
use serde_json::Value;

/// Failure record returned by entity tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolFailure {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ToolFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Success payload or failure record; both serialize as the tool's response
pub type ToolResult = std::result::Result<Value, ToolFailure>;

/// Coarse class of a remote error, decided from its text alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Permission,
    NotFound,
    Other,
}

impl ErrorClass {
    /// Permission wins over not-found when both match
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("permission") || text.contains("403") {
            ErrorClass::Permission
        } else if lower.contains("not found") || text.contains("404") {
            ErrorClass::NotFound
        } else {
            ErrorClass::Other
        }
    }
}

/// Per-operation hint texts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hints {
    pub permission: String,
    pub not_found: String,
}

impl Hints {
    pub fn new(permission: impl Into<String>, not_found: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
            not_found: not_found.into(),
        }
    }

    /// Failure for `error`, with the hint its class selects
    pub fn failure(&self, error: impl std::fmt::Display) -> ToolFailure {
        let error = error.to_string();
        let hint = match ErrorClass::classify(&error) {
            ErrorClass::Permission => Some(&self.permission),
            ErrorClass::NotFound => Some(&self.not_found),
            ErrorClass::Other => None,
        };
        let failure = ToolFailure::new(error);
        match hint {
            Some(hint) => failure.with_message(hint.clone()),
            None => failure,
        }
    }
}

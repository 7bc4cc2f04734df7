//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for RecipeBox
///
/// Serialized as `{"type": "...", "message": "..."}` so the UI can branch on
/// the variant without parsing text.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum RecipeBoxError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Resource busy: {0}")]
    Busy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RecipeBoxError {
    /// Stable label for the variant, matching the serialized `type` tag.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Database(_) => "Database",
            Self::Storage(_) => "Storage",
            Self::Network(_) => "Network",
            Self::PermissionDenied(_) => "PermissionDenied",
            Self::Validation(_) => "Validation",
            Self::NotFound(_) => "NotFound",
            Self::Busy(_) => "Busy",
            Self::Config(_) => "Config",
            Self::Internal(_) => "Internal",
        }
    }
}

/// Result type alias for RecipeBox operations
pub type Result<T> = std::result::Result<T, RecipeBoxError>;

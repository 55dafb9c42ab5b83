//! Error types with fix suggestions
//!
//! The rendering core never fails; these errors cover the collaborators
//! around it (data loading, configuration, the TCP transport).

use std::path::PathBuf;

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ─────────────────────────────────────────────────────────────
    // Portfolio data
    // ─────────────────────────────────────────────────────────────
    #[error("Data file not found at: {}", path.display())]
    DataNotFound { path: PathBuf },

    #[error("Unsupported data format: {} (expected .json, .yaml or .yml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Data validation failed: {reason}")]
    Validation { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Server
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Transport error: {reason}")]
    Transport { reason: String },
}

impl FixSuggestion for FolioError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            FolioError::Io(_) => Some("Check file path and permissions"),
            FolioError::Json(_) => Some("Check JSON syntax: trailing commas and quoting"),
            FolioError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
            FolioError::DataNotFound { .. } => {
                Some("Create the data file or pass --data with a different path")
            }
            FolioError::UnsupportedFormat { .. } => {
                Some("Rename the data file with a .json or .yaml extension")
            }
            FolioError::Validation { .. } => {
                Some("Fill in name, email, experiences and skills (percentages 0..=100)")
            }
            FolioError::Config { .. } => Some("Run with --help to see accepted ranges"),
            FolioError::Transport { .. } => Some("Check that the port is free and reachable"),
        }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;

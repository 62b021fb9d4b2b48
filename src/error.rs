//! Reconciliation errors.
//!
//! Every variant is fatal: a run that hits one of these produces no valid
//! output. Soft conditions (unrecognized operation shapes, lines that belong
//! to no open session) are reported through `tracing` instead.

use std::path::PathBuf;

/// Errors that abort a reconciliation run.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("{value} is not a component id ({line})")]
    MalformedComponentId { value: String, line: String },

    #[error("{value} is not a simpledoc id ({line})")]
    MalformedSubdocId { value: String, line: String },

    #[error("{value} is not a wysiwyg basename ({line})")]
    MalformedBasename { value: String, line: String },

    #[error("Expected {what} not found on line: {line}")]
    MissingToken { what: &'static str, line: String },

    #[error("The component id {component} has already been started")]
    SessionAlreadyOpen { component: String },

    #[error("The component id {component} has not been started or has already ended")]
    SessionNotOpen { component: String },

    #[error("Given log is not a regular file: {}", .path.display())]
    NotAFile { path: PathBuf },

    #[error("Output would overwrite the log being rewritten: {}", .path.display())]
    OutputIsInput { path: PathBuf },

    #[error("Invalid default language '{0}': expected two ASCII letters")]
    InvalidLanguage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReconcileError {
    pub(crate) fn missing(what: &'static str, line: &str) -> Self {
        Self::MissingToken {
            what,
            line: line.to_string(),
        }
    }

    /// Whether the error comes from the log content rather than the environment.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedComponentId { .. }
                | Self::MalformedSubdocId { .. }
                | Self::MalformedBasename { .. }
                | Self::MissingToken { .. }
        )
    }

    /// Whether the error is a session open/close protocol violation.
    pub fn is_session_violation(&self) -> bool {
        matches!(
            self,
            Self::SessionAlreadyOpen { .. } | Self::SessionNotOpen { .. }
        )
    }
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, ReconcileError>;

//! Share port: Trait for handing a report to the user's sharing facility.

use std::path::PathBuf;

use crate::ports::ReportDocument;

/// Errors from a share attempt.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    /// The user backed out of the share. Not a failure.
    #[error("Share cancelled")]
    Cancelled,

    /// This target cannot share in the current environment.
    #[error("Sharing unavailable: {0}")]
    Unavailable(String),

    #[error("Share failed: {0}")]
    Failed(String),
}

impl From<std::io::Error> for ShareError {
    fn from(e: std::io::Error) -> Self {
        Self::Failed(e.to_string())
    }
}

/// What to share.
#[derive(Debug, Clone)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
    pub file_name: String,
    pub document: Option<ReportDocument>,
}

/// How a share completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Delivered through the native facility (file dropped at `path`).
    Shared { path: PathBuf },
    /// Native sharing unavailable; a text summary and link were copied.
    Copied { text: String },
}

/// Trait for share destinations.
pub trait ShareTarget: Send + Sync {
    /// Whether this target can share right now.
    fn is_available(&self) -> bool;

    /// Deliver the payload.
    ///
    /// # Errors
    /// Returns `ShareError::Cancelled` for user cancellation and other
    /// variants for real failures.
    fn share(&self, payload: &SharePayload) -> Result<ShareOutcome, ShareError>;
}

/// Text-only sink used when no native target is available.
pub trait Clipboard: Send + Sync {
    /// Copy `text` to the user's clipboard.
    ///
    /// # Errors
    /// Returns `ShareError::Failed` if the text could not be delivered.
    fn copy(&self, text: &str) -> Result<(), ShareError>;
}

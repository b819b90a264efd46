//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (prediction service, report
//! rendering, sharing).

mod predictor;
mod report;
mod share;

pub use predictor::{PredictionError, Predictor};
pub use report::{ExportError, ReportContext, ReportDocument, ReportRenderer};
pub use share::{Clipboard, ShareError, ShareOutcome, SharePayload, ShareTarget};

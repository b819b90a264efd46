//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod assessment;
pub mod composer;
mod controller;
mod export;

pub use assessment::AssessmentService;
pub use composer::ResultsComposer;
pub use controller::{AppState, Controller, CycleGate, EntrySignal};
pub use export::{ExportService, ShareStatus, SHARE_FILE_NAME};

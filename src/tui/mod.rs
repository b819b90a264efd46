//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides the assessment flow as four screens:
//! - Landing page
//! - Multi-step health intake
//! - Staged processing animation
//! - Results dashboard with report export

mod animation;
mod app;
mod styles;
mod ui;
mod worker;

pub use animation::{ProcessingAnimation, STAGES};
pub use app::App;
pub use styles::Theme;
pub use worker::{
    Disconnected, ExportProgress, ExportWorker, PredictionProgress, PredictionWorker, WorkerHandle,
};

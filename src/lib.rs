//! # CardioAI
//!
//! Cardiovascular risk assessment in the terminal.
//!
//! This crate provides:
//! - A four-step health intake form with per-step validation
//! - A client for an external risk prediction service
//! - A results dashboard with explanatory factors and insights
//! - A printable one-page PDF report, downloadable or shareable
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (intake, wire request, display model)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (reqwest, resvg/PDF, share targets)
//! - `application`: Use cases and the application state machine
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{HealthInput, HealthRequest, PredictionResult, PredictionResultData};

/// Main error type for CardioAI
///
/// Prediction failures never surface here: they degrade to a fallback result.
#[derive(Debug, thiserror::Error)]
pub enum CardioError {
    #[error("Export failed: {0}")]
    Export(#[from] ports::ExportError),

    #[error("Share failed: {0}")]
    Share(#[from] ports::ShareError),
}

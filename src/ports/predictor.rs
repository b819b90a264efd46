//! Predictor port: Trait for the external risk prediction service.

use crate::domain::{HealthRequest, PredictionResult};

/// Errors surfaced by a prediction call.
///
/// Every variant means "no result"; callers recover by substituting a
/// degraded display model.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("Prediction service URL is not configured")]
    NotConfigured,

    #[error("Prediction request failed: {0}")]
    Transport(String),

    #[error("Prediction service returned HTTP {0}")]
    Status(u16),

    #[error("Prediction response could not be decoded: {0}")]
    Decode(String),

    #[error("Prediction response is invalid: {0}")]
    InvalidResponse(String),
}

/// Trait for risk prediction backends.
///
/// One call per submission cycle: no retry, no caching, no partial result.
pub trait Predictor: Send + Sync {
    /// Submit a normalized request and return the service's score and label.
    ///
    /// # Errors
    /// Returns `PredictionError` whenever the service does not report success.
    fn predict(&self, request: &HealthRequest) -> Result<PredictionResult, PredictionError>;
}

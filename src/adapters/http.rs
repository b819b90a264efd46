//! HTTP adapter: Implementation of `Predictor` over `POST {base_url}/predict`.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::{HealthRequest, PredictionResult};
use crate::ports::{PredictionError, Predictor};

/// Blocking JSON client for the prediction service.
///
/// Intended to be driven from a worker thread, never from the UI loop.
pub struct HttpPredictor {
    base_url: Option<String>,
    client: Client,
}

impl HttpPredictor {
    /// Create a client for `base_url` with a bounded request timeout.
    ///
    /// A missing base URL is accepted here and reported on the first call.
    ///
    /// # Errors
    /// Returns `PredictionError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, PredictionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictionError::Transport(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self) -> Result<String, PredictionError> {
        let base = self.base_url.as_deref().ok_or(PredictionError::NotConfigured)?;
        Ok(format!("{}/predict", base.trim_end_matches('/')))
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, request: &HealthRequest) -> Result<PredictionResult, PredictionError> {
        let url = self.endpoint()?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| PredictionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::Status(status.as_u16()));
        }

        let result: PredictionResult = response
            .json()
            .map_err(|e| PredictionError::Decode(e.to_string()))?;

        if !result.risk_score.is_finite() {
            return Err(PredictionError::InvalidResponse(
                "risk_score is not a finite number".to_string(),
            ));
        }
        if result.prediction > 1 {
            return Err(PredictionError::InvalidResponse(format!(
                "prediction must be 0 or 1, got {}",
                result.prediction
            )));
        }

        Ok(result)
    }
}

//! Assessment service: One prediction cycle from intake to display model.

use std::sync::Arc;

use crate::application::ResultsComposer;
use crate::domain::{HealthInput, HealthRequest, PredictionResultData};
use crate::ports::Predictor;

/// Runs a prediction and composes the display model.
///
/// Never fails: any problem reaching the service yields the degraded result,
/// so the results view is always reachable.
pub struct AssessmentService {
    predictor: Arc<dyn Predictor>,
    composer: ResultsComposer,
}

impl AssessmentService {
    pub fn new(predictor: Arc<dyn Predictor>, composer: ResultsComposer) -> Self {
        Self {
            predictor,
            composer,
        }
    }

    /// Assess a submitted intake.
    pub fn assess(&mut self, input: &HealthInput) -> PredictionResultData {
        let request = match HealthRequest::try_from(input) {
            Ok(request) => request,
            Err(errors) => {
                tracing::warn!("Submitted intake failed validation ({} fields)", errors.len());
                return ResultsComposer::degraded();
            }
        };

        match self.predictor.predict(&request) {
            Ok(result) => {
                tracing::info!("Prediction received (label {})", result.prediction);
                self.composer.compose(input, &result)
            }
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                ResultsComposer::degraded()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::composer::CONNECTION_FAILED_MESSAGE;
    use crate::domain::{InsightKind, PredictionResult};
    use crate::ports::PredictionError;
    use std::sync::Mutex;

    struct FakePredictor {
        response: Result<PredictionResult, fn() -> PredictionError>,
        seen: Mutex<Vec<HealthRequest>>,
    }

    impl Predictor for FakePredictor {
        fn predict(&self, request: &HealthRequest) -> Result<PredictionResult, PredictionError> {
            self.seen.lock().expect("lock").push(*request);
            self.response.map_err(|make| make())
        }
    }

    fn service(response: Result<PredictionResult, fn() -> PredictionError>) -> (AssessmentService, Arc<FakePredictor>) {
        let fake = Arc::new(FakePredictor {
            response,
            seen: Mutex::new(Vec::new()),
        });
        (
            AssessmentService::new(fake.clone(), ResultsComposer::seeded(3)),
            fake,
        )
    }

    #[test]
    fn test_successful_cycle() {
        let (mut service, fake) = service(Ok(PredictionResult {
            risk_score: 64.4,
            prediction: 1,
        }));
        let data = service.assess(&HealthInput::sample());

        assert_eq!(data.risk_score(), 64);
        assert_eq!(data.factors().len(), 4);
        assert_eq!(data.insights()[0].kind, InsightKind::Warning);

        let seen = fake.seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].ap_hi, 135);
    }

    #[test]
    fn test_transport_failure_degrades() {
        let (mut service, _) = service(Err(|| PredictionError::Transport("refused".to_string())));
        let data = service.assess(&HealthInput::sample());
        assert_eq!(data, PredictionResultData::degraded(CONNECTION_FAILED_MESSAGE));
    }

    #[test]
    fn test_invalid_input_never_reaches_service() {
        let (mut service, fake) = service(Ok(PredictionResult {
            risk_score: 1.0,
            prediction: 0,
        }));
        let data = service.assess(&HealthInput::default());
        assert_eq!(data.risk_score(), 0);
        assert!(fake.seen.lock().expect("lock").is_empty());
    }
}

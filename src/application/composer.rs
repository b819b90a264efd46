//! Results composer: Builds the dashboard display model from a prediction.
//!
//! The prediction service only returns a score and a label. The confidence
//! figure and the four explanatory factors are synthesized here from the
//! intake and are placeholders, not model outputs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::domain::intake::parse_int;
use crate::domain::{
    Factor, HealthInput, Impact, Insight, InsightKind, Level, PredictionResult, PredictionResultData,
};

pub const HIGH_RISK_MESSAGE: &str =
    "Your risk score indicates a higher probability of cardiovascular issues. Please consult a doctor.";
pub const LOW_RISK_MESSAGE: &str =
    "Your cardiovascular risk is within a healthy range. Keep up the good work!";
pub const LIFESTYLE_MESSAGE: &str =
    "Maintaining a balanced diet and regular exercise can further improve your heart health.";
pub const CONNECTION_FAILED_MESSAGE: &str =
    "Failed to connect to analysis server. Please check your connection.";

/// Systolic pressure above which blood pressure counts against the user.
const SYSTOLIC_THRESHOLD: i64 = 130;

/// Placeholder confidence range, `[low, high)`.
const CONFIDENCE_RANGE: std::ops::Range<u8> = 85..95;

pub struct ResultsComposer {
    rng: ChaCha20Rng,
}

impl Default for ResultsComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsComposer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Composer with a reproducible confidence sequence.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Combine the service response with locally derived factors and insights.
    pub fn compose(&mut self, input: &HealthInput, result: &PredictionResult) -> PredictionResultData {
        let confidence = self.rng.gen_range(CONFIDENCE_RANGE);
        PredictionResultData::new(result.risk_score, confidence, factors(input), insights(result))
    }

    /// Display model used when no prediction could be obtained.
    #[must_use]
    pub fn degraded() -> PredictionResultData {
        PredictionResultData::degraded(CONNECTION_FAILED_MESSAGE)
    }
}

fn factors(input: &HealthInput) -> Vec<Factor> {
    let systolic_high = parse_int(&input.systolic_bp).is_some_and(|v| v > SYSTOLIC_THRESHOLD);
    let bmi = input
        .bmi()
        .map_or_else(|| "N/A".to_string(), |bmi| format!("{bmi:.1}"));
    let cholesterol_normal = Level::from_code(&input.cholesterol) == Some(Level::Normal);

    vec![
        Factor {
            name: "Blood Pressure".to_string(),
            importance: 85,
            user_value: format!("{}/{} mmHg", input.systolic_bp.trim(), input.diastolic_bp.trim()),
            avg_value: "120/80 mmHg".to_string(),
            impact: if systolic_high { Impact::Negative } else { Impact::Positive },
        },
        Factor {
            name: "BMI".to_string(),
            importance: 75,
            user_value: bmi,
            avg_value: "25.0".to_string(),
            impact: Impact::Negative,
        },
        Factor {
            name: "Age".to_string(),
            importance: 65,
            user_value: format!("{} years", input.age.trim()),
            avg_value: "45 years".to_string(),
            impact: Impact::Negative,
        },
        Factor {
            name: "Cholesterol".to_string(),
            importance: 60,
            user_value: input.cholesterol.replace('_', " "),
            avg_value: "Normal".to_string(),
            impact: if cholesterol_normal { Impact::Positive } else { Impact::Negative },
        },
    ]
}

fn insights(result: &PredictionResult) -> Vec<Insight> {
    let outcome = if result.is_high_risk() {
        Insight::new(InsightKind::Warning, HIGH_RISK_MESSAGE)
    } else {
        Insight::new(InsightKind::Success, LOW_RISK_MESSAGE)
    };
    vec![outcome, Insight::new(InsightKind::Info, LIFESTYLE_MESSAGE)]
}

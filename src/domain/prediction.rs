//! Prediction results and the dashboard display model.

use serde::{Deserialize, Serialize};

/// Raw response of the prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Risk on a 0-100 scale.
    pub risk_score: f64,

    /// Binary label (0 = low risk, 1 = elevated risk).
    pub prediction: u8,
}

impl PredictionResult {
    #[must_use]
    pub fn is_high_risk(&self) -> bool {
        self.prediction == 1
    }
}

/// Whether a factor raises or lowers risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
}

impl Impact {
    /// Label used in the report table.
    #[must_use]
    pub fn report_label(self) -> &'static str {
        match self {
            Self::Positive => "Protective",
            Self::Negative => "Risk Factor",
        }
    }
}

/// One explanatory clinical indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    /// Relative weight in 0-100, used only for bar scaling.
    pub importance: u8,
    pub user_value: String,
    pub avg_value: String,
    pub impact: Impact,
}

/// Tone of an insight message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Info,
    Success,
}

impl InsightKind {
    /// Heading used in the printed report.
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::Warning => "Attention Required",
            Self::Success => "Positive Indicator",
            Self::Info => "Health Note",
        }
    }
}

/// One short natural-language observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
}

impl Insight {
    #[must_use]
    pub fn new(kind: InsightKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Display model for the results dashboard and report.
///
/// Immutable once built; `risk_score` and `confidence` are always within `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResultData {
    risk_score: u8,
    confidence: u8,
    factors: Vec<Factor>,
    insights: Vec<Insight>,
}

impl PredictionResultData {
    /// Build a display model, rounding and clamping the score into `[0, 100]`.
    #[must_use]
    pub fn new(risk_score: f64, confidence: u8, factors: Vec<Factor>, insights: Vec<Insight>) -> Self {
        let risk_score = if risk_score.is_finite() {
            risk_score.round().clamp(0.0, 100.0) as u8
        } else {
            0
        };
        Self {
            risk_score,
            confidence: confidence.min(100),
            factors,
            insights,
        }
    }

    /// Zero-valued result carrying a single warning, used when no prediction is available.
    #[must_use]
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            risk_score: 0,
            confidence: 0,
            factors: Vec::new(),
            insights: vec![Insight::new(InsightKind::Warning, message)],
        }
    }

    #[must_use]
    pub fn risk_score(&self) -> u8 {
        self.risk_score
    }

    #[must_use]
    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    #[must_use]
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    #[must_use]
    pub fn insights(&self) -> &[Insight] {
        &self.insights
    }

    /// Number of factors with a negative impact.
    #[must_use]
    pub fn risk_factor_count(&self) -> usize {
        self.factors.iter().filter(|f| f.impact == Impact::Negative).count()
    }

    /// Number of factors with a positive impact.
    #[must_use]
    pub fn protective_factor_count(&self) -> usize {
        self.factors.iter().filter(|f| f.impact == Impact::Positive).count()
    }

    #[must_use]
    pub fn band(&self) -> RiskBand {
        RiskBand::from_score(self.risk_score)
    }
}

/// Coarse risk classification for colouring and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    /// Gauge thresholds: below 15 low, below 45 moderate.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        if score < 15 {
            Self::Low
        } else if score < 45 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Report thresholds: above 45 high, above 15 moderate.
    #[must_use]
    pub fn for_report(score: u8) -> Self {
        if score > 45 {
            Self::High
        } else if score > 15 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }

    /// Explanatory paragraph printed next to the score.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::High => "The analysis indicates a heavily elevated probability of cardiovascular issues. Immediate consultation with a healthcare professional is strongly recommended to verify these findings and discuss potential interventions.",
            Self::Moderate => "The analysis indicates a moderate risk profile. While not critical, proactive lifestyle adjustments and regular monitoring are advisable to prevent progression to higher risk categories.",
            Self::Low => "The analysis indicates a low probability of cardiovascular issues based on provided data. Maintaining a healthy lifestyle is recommended to preserve this status.",
        }
    }

    /// RGB colour (emerald, amber, rose).
    #[must_use]
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129),
            Self::Moderate => (245, 158, 11),
            Self::High => (225, 29, 72),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_rounded_and_clamped() {
        assert_eq!(PredictionResultData::new(42.5, 90, vec![], vec![]).risk_score(), 43);
        assert_eq!(PredictionResultData::new(-3.0, 90, vec![], vec![]).risk_score(), 0);
        assert_eq!(PredictionResultData::new(180.0, 90, vec![], vec![]).risk_score(), 100);
        assert_eq!(PredictionResultData::new(f64::NAN, 90, vec![], vec![]).risk_score(), 0);
        assert_eq!(PredictionResultData::new(50.0, 250, vec![], vec![]).confidence(), 100);
    }

    #[test]
    fn test_degraded_result() {
        let data = PredictionResultData::degraded("offline");
        assert_eq!(data.risk_score(), 0);
        assert_eq!(data.confidence(), 0);
        assert!(data.factors().is_empty());
        assert_eq!(data.insights().len(), 1);
        assert_eq!(data.insights()[0].kind, InsightKind::Warning);
    }

    #[test]
    fn test_risk_bands() {
        assert_eq!(RiskBand::from_score(14), RiskBand::Low);
        assert_eq!(RiskBand::from_score(15), RiskBand::Moderate);
        assert_eq!(RiskBand::from_score(45), RiskBand::High);

        assert_eq!(RiskBand::for_report(15), RiskBand::Low);
        assert_eq!(RiskBand::for_report(16), RiskBand::Moderate);
        assert_eq!(RiskBand::for_report(45), RiskBand::Moderate);
        assert_eq!(RiskBand::for_report(46), RiskBand::High);
    }

    #[test]
    fn test_impact_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Impact::Negative).expect("json"), "\"negative\"");
        assert_eq!(serde_json::to_string(&InsightKind::Success).expect("json"), "\"success\"");
    }

    #[test]
    fn test_response_deserializes() {
        let result: PredictionResult =
            serde_json::from_str(r#"{"risk_score": 63.2, "prediction": 1}"#).expect("json");
        assert!(result.is_high_risk());
        assert!((result.risk_score - 63.2).abs() < f64::EPSILON);
    }
}

//! Domain layer: Core business types and rules.
//!
//! Pure Rust types with no I/O. Intake validation, the wire encoding of the
//! prediction request and the dashboard display model live here.

mod health;
pub mod intake;
mod prediction;

pub use health::{
    AlcoholLevel, ExerciseLevel, Gender, HealthInput, HealthRequest, Level, SmokingStatus,
};
pub use intake::{Choice, Field, FieldErrors, FieldKind, FormStep};
pub use prediction::{
    Factor, Impact, Insight, InsightKind, PredictionResult, PredictionResultData, RiskBand,
};

//! Health intake data for cardiovascular risk prediction.
//!
//! `HealthInput` is the raw, text-typed form state. `HealthRequest` is the
//! normalized payload sent to the prediction service and is only ever built
//! from an input that passes every intake step.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::intake::{self, Field, FieldErrors, FormStep};

/// Raw form state. Every field is held as text until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct HealthInput {
    pub age: String,
    pub gender: String,
    pub height: String,
    pub weight: String,
    pub systolic_bp: String,
    pub diastolic_bp: String,
    pub cholesterol: String,
    pub glucose: String,
    pub smoking: String,
    pub alcohol: String,
    pub exercise: String,
}

impl HealthInput {
    /// Current text of a field.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Age => &self.age,
            Field::Gender => &self.gender,
            Field::Height => &self.height,
            Field::Weight => &self.weight,
            Field::SystolicBp => &self.systolic_bp,
            Field::DiastolicBp => &self.diastolic_bp,
            Field::Cholesterol => &self.cholesterol,
            Field::Glucose => &self.glucose,
            Field::Smoking => &self.smoking,
            Field::Alcohol => &self.alcohol,
            Field::Exercise => &self.exercise,
        }
    }

    /// Mutable text buffer of a field.
    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Age => &mut self.age,
            Field::Gender => &mut self.gender,
            Field::Height => &mut self.height,
            Field::Weight => &mut self.weight,
            Field::SystolicBp => &mut self.systolic_bp,
            Field::DiastolicBp => &mut self.diastolic_bp,
            Field::Cholesterol => &mut self.cholesterol,
            Field::Glucose => &mut self.glucose,
            Field::Smoking => &mut self.smoking,
            Field::Alcohol => &mut self.alcohol,
            Field::Exercise => &mut self.exercise,
        }
    }

    /// Replace the text of a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.value_mut(field) = value.into();
    }

    /// Sample intake used by the `[S]` shortcut on the form.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            age: "45".to_string(),
            gender: Gender::Male.code().to_string(),
            height: "175".to_string(),
            weight: "70".to_string(),
            systolic_bp: "135".to_string(),
            diastolic_bp: "85".to_string(),
            cholesterol: Level::Normal.code().to_string(),
            glucose: Level::Normal.code().to_string(),
            smoking: SmokingStatus::Never.code().to_string(),
            alcohol: AlcoholLevel::None.code().to_string(),
            exercise: ExerciseLevel::Moderate.code().to_string(),
        }
    }

    /// Body mass index from height (cm) and weight (kg), if both parse.
    #[must_use]
    pub fn bmi(&self) -> Option<f64> {
        let height_m = intake::parse_float(&self.height)? / 100.0;
        let weight = intake::parse_float(&self.weight)?;
        if height_m <= 0.0 {
            return None;
        }
        Some(weight / (height_m * height_m))
    }
}

macro_rules! category {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => ($code:literal, $label:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every value, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Form code as stored in `HealthInput`.
            #[must_use]
            pub fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            /// Human-readable option label.
            #[must_use]
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Parse a form code. Unknown or empty codes are rejected.
            #[must_use]
            pub fn from_code(code: &str) -> Option<Self> {
                match code.trim() {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

category!(
    /// Biological sex as encoded by the training dataset.
    Gender {
        Male => ("male", "Male"),
        Female => ("female", "Female"),
    }
);

category!(
    /// Three-level lab category used for both cholesterol and glucose.
    Level {
        Normal => ("normal", "Normal"),
        AboveNormal => ("above_normal", "Above Normal"),
        High => ("high", "High"),
    }
);

category!(
    SmokingStatus {
        Never => ("never", "Never Smoked"),
        Former => ("former", "Former Smoker"),
        Current => ("current", "Current Smoker"),
    }
);

category!(
    AlcoholLevel {
        None => ("none", "None"),
        Moderate => ("moderate", "Moderate"),
        Heavy => ("heavy", "Heavy"),
    }
);

category!(
    ExerciseLevel {
        Sedentary => ("sedentary", "Sedentary"),
        Light => ("light", "Light (1-2 days/week)"),
        Moderate => ("moderate", "Moderate (3-4 days/week)"),
        Active => ("active", "Active (5+ days/week)"),
    }
);

impl Gender {
    /// Dataset encoding: female = 1, male = 2.
    #[must_use]
    pub fn wire(self) -> u8 {
        match self {
            Self::Female => 1,
            Self::Male => 2,
        }
    }
}

impl Level {
    /// Dataset encoding: normal = 1, above normal = 2, high = 3.
    #[must_use]
    pub fn wire(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::AboveNormal => 2,
            Self::High => 3,
        }
    }
}

/// Normalized payload for `POST {base_url}/predict`.
///
/// Field names and types are the wire contract; no extras, no omissions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthRequest {
    pub age: i64,
    pub gender: u8,
    pub height: i64,
    pub weight: f64,
    pub ap_hi: i64,
    pub ap_lo: i64,
    pub cholesterol: u8,
    pub gluc: u8,
    pub smoke: u8,
    pub alco: u8,
    pub active: u8,
}

impl TryFrom<&HealthInput> for HealthRequest {
    type Error = FieldErrors;

    /// Validate every intake step, then project the input onto the wire encoding.
    fn try_from(input: &HealthInput) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();
        for step in FormStep::ALL {
            errors.merge(intake::validate_step(input, *step));
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let int = |field: Field| {
            intake::parse_int(input.value(field)).ok_or_else(|| FieldErrors::single(field))
        };
        let float = |field: Field| {
            intake::parse_float(input.value(field)).ok_or_else(|| FieldErrors::single(field))
        };
        let gender = Gender::from_code(&input.gender).ok_or_else(|| FieldErrors::single(Field::Gender))?;
        let cholesterol =
            Level::from_code(&input.cholesterol).ok_or_else(|| FieldErrors::single(Field::Cholesterol))?;
        let glucose = Level::from_code(&input.glucose).ok_or_else(|| FieldErrors::single(Field::Glucose))?;
        let smoking =
            SmokingStatus::from_code(&input.smoking).ok_or_else(|| FieldErrors::single(Field::Smoking))?;
        let alcohol =
            AlcoholLevel::from_code(&input.alcohol).ok_or_else(|| FieldErrors::single(Field::Alcohol))?;
        let exercise =
            ExerciseLevel::from_code(&input.exercise).ok_or_else(|| FieldErrors::single(Field::Exercise))?;

        Ok(Self {
            age: int(Field::Age)?,
            gender: gender.wire(),
            height: int(Field::Height)?,
            weight: float(Field::Weight)?,
            ap_hi: int(Field::SystolicBp)?,
            ap_lo: int(Field::DiastolicBp)?,
            cholesterol: cholesterol.wire(),
            gluc: glucose.wire(),
            smoke: u8::from(smoking == SmokingStatus::Current),
            alco: u8::from(alcohol == AlcoholLevel::Heavy),
            active: u8::from(exercise != ExerciseLevel::Sedentary),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_maps_to_expected_request() {
        let request = HealthRequest::try_from(&HealthInput::sample()).expect("sample is valid");
        assert_eq!(
            request,
            HealthRequest {
                age: 45,
                gender: 2,
                height: 175,
                weight: 70.0,
                ap_hi: 135,
                ap_lo: 85,
                cholesterol: 1,
                gluc: 1,
                smoke: 0,
                alco: 0,
                active: 1,
            }
        );
    }

    #[test]
    fn test_category_encodings() {
        let mut input = HealthInput::sample();

        input.gender = "female".to_string();
        input.cholesterol = "above_normal".to_string();
        input.glucose = "high".to_string();
        input.smoking = "current".to_string();
        input.alcohol = "heavy".to_string();
        input.exercise = "sedentary".to_string();
        let request = HealthRequest::try_from(&input).expect("valid");
        assert_eq!(request.gender, 1);
        assert_eq!(request.cholesterol, 2);
        assert_eq!(request.gluc, 3);
        assert_eq!(request.smoke, 1);
        assert_eq!(request.alco, 1);
        assert_eq!(request.active, 0);

        input.smoking = "former".to_string();
        input.alcohol = "moderate".to_string();
        input.exercise = "light".to_string();
        let request = HealthRequest::try_from(&input).expect("valid");
        assert_eq!(request.smoke, 0);
        assert_eq!(request.alco, 0);
        assert_eq!(request.active, 1);
    }

    #[test]
    fn test_request_serializes_exact_wire_fields() {
        let request = HealthRequest::try_from(&HealthInput::sample()).expect("valid");
        let value = serde_json::to_value(request).expect("serializable");
        let object = value.as_object().expect("object");

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "active",
                "age",
                "alco",
                "ap_hi",
                "ap_lo",
                "cholesterol",
                "gender",
                "gluc",
                "height",
                "smoke",
                "weight"
            ]
        );
        assert_eq!(object["height"], serde_json::json!(175));
        assert_eq!(object["weight"], serde_json::json!(70.0));
    }

    #[test]
    fn test_invalid_input_is_rejected_with_field_errors() {
        let mut input = HealthInput::sample();
        input.age = "120".to_string();
        input.exercise.clear();

        let errors = HealthRequest::try_from(&input).expect_err("should fail");
        assert!(errors.get(Field::Age).is_some());
        assert!(errors.get(Field::Exercise).is_some());
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_bmi() {
        let bmi = HealthInput::sample().bmi().expect("bmi");
        assert_eq!(format!("{bmi:.1}"), "22.9");
    }

    #[test]
    fn test_zeroize_clears_every_field() {
        let mut input = HealthInput::sample();
        input.zeroize();
        assert_eq!(input, HealthInput::default());
    }
}

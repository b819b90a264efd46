//! Multi-step intake form rules.
//!
//! The form has four ordered steps. Validation runs for one step at a time and
//! produces field-scoped messages; it never fails the caller.

use std::collections::BTreeMap;

use super::health::{AlcoholLevel, ExerciseLevel, Gender, HealthInput, Level, SmokingStatus};

/// One page of the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormStep {
    BasicInfo,
    Vitals,
    BloodWork,
    Lifestyle,
}

impl FormStep {
    pub const ALL: &'static [Self] = &[Self::BasicInfo, Self::Vitals, Self::BloodWork, Self::Lifestyle];

    /// 1-based position, as shown in the step indicator.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::BasicInfo => 1,
            Self::Vitals => 2,
            Self::BloodWork => 3,
            Self::Lifestyle => 4,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::Vitals => "Vitals",
            Self::BloodWork => "Blood Work",
            Self::Lifestyle => "Lifestyle",
        }
    }

    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::BasicInfo => "Let's start with some basic information about you.",
            Self::Vitals => "Enter your blood pressure measurements.",
            Self::BloodWork => "Share your recent blood work results.",
            Self::Lifestyle => "Tell us about your lifestyle habits.",
        }
    }

    /// Fields displayed (and validated) on this step, in order.
    #[must_use]
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::BasicInfo => &[Field::Age, Field::Gender, Field::Height, Field::Weight],
            Self::Vitals => &[Field::SystolicBp, Field::DiastolicBp],
            Self::BloodWork => &[Field::Cholesterol, Field::Glucose],
            Self::Lifestyle => &[Field::Smoking, Field::Alcohol, Field::Exercise],
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::BasicInfo => Some(Self::Vitals),
            Self::Vitals => Some(Self::BloodWork),
            Self::BloodWork => Some(Self::Lifestyle),
            Self::Lifestyle => None,
        }
    }

    #[must_use]
    pub fn prev(self) -> Option<Self> {
        match self {
            Self::BasicInfo => None,
            Self::Vitals => Some(Self::BasicInfo),
            Self::BloodWork => Some(Self::Vitals),
            Self::Lifestyle => Some(Self::BloodWork),
        }
    }

    #[must_use]
    pub fn is_first(self) -> bool {
        self.prev().is_none()
    }

    #[must_use]
    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

/// A selectable option of a choice field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub code: &'static str,
    pub label: &'static str,
}

/// How a field is edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free numeric text with a placeholder hint.
    Numeric { hint: &'static str },
    /// One of a closed set of options.
    Choice(Vec<Choice>),
}

/// Every input on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Age,
    Gender,
    Height,
    Weight,
    SystolicBp,
    DiastolicBp,
    Cholesterol,
    Glucose,
    Smoking,
    Alcohol,
    Exercise,
}

impl Field {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::Height => "Height (cm)",
            Self::Weight => "Weight (kg)",
            Self::SystolicBp => "Systolic BP (upper)",
            Self::DiastolicBp => "Diastolic BP (lower)",
            Self::Cholesterol => "Cholesterol Level",
            Self::Glucose => "Glucose Level",
            Self::Smoking => "Smoking Status",
            Self::Alcohol => "Alcohol Consumption",
            Self::Exercise => "Physical Activity",
        }
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        fn choices<T: Copy>(all: &[T], code: fn(T) -> &'static str, label: fn(T) -> &'static str) -> FieldKind {
            FieldKind::Choice(
                all.iter()
                    .map(|v| Choice {
                        code: code(*v),
                        label: label(*v),
                    })
                    .collect(),
            )
        }

        match self {
            Self::Age => FieldKind::Numeric { hint: "e.g., 45" },
            Self::Height => FieldKind::Numeric { hint: "e.g., 175" },
            Self::Weight => FieldKind::Numeric { hint: "e.g., 70" },
            Self::SystolicBp => FieldKind::Numeric { hint: "e.g., 120" },
            Self::DiastolicBp => FieldKind::Numeric { hint: "e.g., 80" },
            Self::Gender => choices(Gender::ALL, Gender::code, Gender::label),
            Self::Cholesterol | Self::Glucose => choices(Level::ALL, Level::code, Level::label),
            Self::Smoking => choices(SmokingStatus::ALL, SmokingStatus::code, SmokingStatus::label),
            Self::Alcohol => choices(AlcoholLevel::ALL, AlcoholLevel::code, AlcoholLevel::label),
            Self::Exercise => choices(ExerciseLevel::ALL, ExerciseLevel::code, ExerciseLevel::label),
        }
    }

    /// Message shown when the field fails validation.
    #[must_use]
    pub fn error_message(self) -> &'static str {
        match self {
            Self::Age => "Enter a valid age (1-119)",
            Self::Gender => "Select your gender",
            Self::Height => "Enter valid height (<230 cm)",
            Self::Weight => "Enter valid weight (<200 kg)",
            Self::SystolicBp => "Enter valid systolic BP (70-250)",
            Self::DiastolicBp => "Enter valid diastolic BP (40-150)",
            Self::Cholesterol => "Select cholesterol level",
            Self::Glucose => "Select glucose level",
            Self::Smoking => "Select smoking status",
            Self::Alcohol => "Select alcohol consumption",
            Self::Exercise => "Select physical activity level",
        }
    }

    /// Whether `value` is acceptable for this field.
    ///
    /// Integer fields: age `[1, 119]`, systolic `[70, 250]`, diastolic `[40, 150]`.
    /// Float fields: height `[50, 230)`, weight `[20, 200)`.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Age => parse_int(value).is_some_and(|v| (1..=119).contains(&v)),
            Self::Height => parse_float(value).is_some_and(|v| (50.0..230.0).contains(&v)),
            Self::Weight => parse_float(value).is_some_and(|v| (20.0..200.0).contains(&v)),
            Self::SystolicBp => parse_int(value).is_some_and(|v| (70..=250).contains(&v)),
            Self::DiastolicBp => parse_int(value).is_some_and(|v| (40..=150).contains(&v)),
            Self::Gender => Gender::from_code(value).is_some(),
            Self::Cholesterol | Self::Glucose => Level::from_code(value).is_some(),
            Self::Smoking => SmokingStatus::from_code(value).is_some(),
            Self::Alcohol => AlcoholLevel::from_code(value).is_some(),
            Self::Exercise => ExerciseLevel::from_code(value).is_some(),
        }
    }
}

/// Field-scoped validation messages for the displayed step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    /// Errors containing only the standard message for `field`.
    #[must_use]
    pub fn single(field: Field) -> Self {
        let mut errors = Self::default();
        errors.insert(field, field.error_message());
        errors
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Drop the error of one field, leaving the others untouched.
    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Validate only the fields of `step`.
#[must_use]
pub fn validate_step(input: &HealthInput, step: FormStep) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for field in step.fields() {
        if !field.accepts(input.value(*field)) {
            errors.insert(*field, field.error_message());
        }
    }
    errors
}

/// Parse leading integer text. Decimal input is truncated toward zero.
#[must_use]
pub fn parse_int(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    let v = trimmed.parse::<f64>().ok().filter(|v| v.is_finite())?.trunc();
    if v.abs() > i64::MAX as f64 {
        return None;
    }
    Some(v as i64)
}

/// Parse finite decimal text.
#[must_use]
pub fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

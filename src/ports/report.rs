//! Report port: Trait for turning a display model into a printable document.
//!
//! The rendering technique is hidden behind this boundary; callers only need
//! "given a display model, produce a document".

use chrono::NaiveDate;

use crate::domain::PredictionResultData;

/// Errors raised while producing or delivering a report.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Report layout failed: {0}")]
    Layout(String),

    #[error("Report rasterization failed: {0}")]
    Raster(String),

    #[error("Report encoding failed: {0}")]
    Encode(String),

    #[error("Report could not be written: {0}")]
    Io(#[from] std::io::Error),
}

/// Inputs to a render besides the display model.
///
/// Rendering is a pure function of `(data, context)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportContext {
    pub generated_on: NaiveDate,
}

impl ReportContext {
    #[must_use]
    pub fn new(generated_on: NaiveDate) -> Self {
        Self { generated_on }
    }

    /// Context for a report generated today, by the UTC calendar.
    #[must_use]
    pub fn today() -> Self {
        Self::new(chrono::Utc::now().date_naive())
    }
}

/// A finished single-page document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
}

impl ReportDocument {
    #[must_use]
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            media_type: "application/pdf",
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Trait for report renderers.
pub trait ReportRenderer: Send + Sync {
    /// Render the fixed report layout for `data`.
    ///
    /// Implementations must not keep mutable state between calls: the same
    /// inputs always produce the same bytes.
    ///
    /// # Errors
    /// Returns `ExportError` if any rendering stage fails.
    fn render(
        &self,
        data: &PredictionResultData,
        context: &ReportContext,
    ) -> Result<ReportDocument, ExportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_today_follows_utc_calendar() {
        let before = Utc::now().date_naive();
        let today = ReportContext::today().generated_on;
        let after = Utc::now().date_naive();
        assert!(today == before || today == after);
        assert!(today <= before + Duration::days(1));
    }
}

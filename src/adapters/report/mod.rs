//! Report adapter: SVG layout, rasterized and wrapped as a one-page PDF.

mod layout;
mod pdf;
mod raster;

pub use layout::report_reference;

use crate::domain::PredictionResultData;
use crate::ports::{ExportError, ReportContext, ReportDocument, ReportRenderer};

const DEFAULT_SCALE: f32 = 2.0;

/// Renders the fixed report layout to PDF.
///
/// Stateless: each call builds its own canvas, so repeated renders of the
/// same input are byte-identical.
#[derive(Debug, Clone, Copy)]
pub struct SvgPdfRenderer {
    scale: f32,
}

impl Default for SvgPdfRenderer {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }
}

impl SvgPdfRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different rasterization scale (2.0 by default).
    #[must_use]
    pub fn with_scale(scale: f32) -> Self {
        Self {
            scale: if scale.is_finite() && scale > 0.0 { scale } else { DEFAULT_SCALE },
        }
    }
}

impl ReportRenderer for SvgPdfRenderer {
    fn render(
        &self,
        data: &PredictionResultData,
        context: &ReportContext,
    ) -> Result<ReportDocument, ExportError> {
        let svg = layout::render_svg(data, context);
        let image = raster::rasterize(&svg, layout::PAGE_WIDTH, layout::PAGE_HEIGHT, self.scale)?;
        let png = raster::encode_png(&image)?;
        let idat = raster::idat_payload(&png)?;

        let bytes = pdf::write_single_page(
            &pdf::FlateImage {
                width: image.width,
                height: image.height,
                data: &idat,
            },
            pdf::PageSize::from_css_pixels(layout::PAGE_WIDTH, layout::PAGE_HEIGHT),
            "CardioAI Full Report",
        )?;

        tracing::debug!(
            "Rendered report {}x{} ({} bytes)",
            image.width,
            image.height,
            bytes.len()
        );
        Ok(ReportDocument::pdf(bytes))
    }
}

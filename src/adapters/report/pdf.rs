//! Minimal single-page PDF writer.
//!
//! The page holds one full-bleed RGB image. PNG IDAT data is already a zlib
//! stream of predictor-filtered rows, which PDF's `FlateDecode` filter reads
//! directly with `/Predictor 15`, so no recompression is needed.

use std::io::Write;

use crate::ports::ExportError;

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// Size of a page whose layout was authored in CSS pixels (96 dpi).
    #[must_use]
    pub fn from_css_pixels(width: u32, height: u32) -> Self {
        Self {
            width: f64::from(width) * 0.75,
            height: f64::from(height) * 0.75,
        }
    }
}

/// Image already encoded as PNG IDAT payload.
pub struct FlateImage<'a> {
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

/// Write a one-page document showing `image` stretched over `page`.
///
/// Output contains no timestamps or random identifiers.
///
/// # Errors
/// Returns `ExportError::Io` if writing to the buffer fails.
pub fn write_single_page(image: &FlateImage<'_>, page: PageSize, title: &str) -> Result<Vec<u8>, ExportError> {
    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();

    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    offsets.push(out.len());
    out.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    offsets.push(out.len());
    out.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");

    offsets.push(out.len());
    write!(
        out,
        "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {w} {h}] \
         /Resources << /XObject << /Im0 4 0 R >> >> /Contents 5 0 R >>\nendobj\n",
        w = number(page.width),
        h = number(page.height),
    )?;

    offsets.push(out.len());
    write!(
        out,
        "4 0 obj\n<< /Type /XObject /Subtype /Image /Width {w} /Height {h} \
         /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode \
         /DecodeParms << /Predictor 15 /Colors 3 /BitsPerComponent 8 /Columns {w} >> \
         /Length {len} >>\nstream\n",
        w = image.width,
        h = image.height,
        len = image.data.len(),
    )?;
    out.extend_from_slice(image.data);
    out.extend_from_slice(b"\nendstream\nendobj\n");

    let content = format!(
        "q {} 0 0 {} 0 0 cm /Im0 Do Q",
        number(page.width),
        number(page.height)
    );
    offsets.push(out.len());
    write!(
        out,
        "5 0 obj\n<< /Length {} >>\nstream\n{content}\nendstream\nendobj\n",
        content.len()
    )?;

    offsets.push(out.len());
    write!(
        out,
        "6 0 obj\n<< /Title ({}) /Producer ({}) >>\nendobj\n",
        escape_string(title),
        escape_string(crate::config::PRODUCT_NAME)
    )?;

    let xref_at = out.len();
    write!(out, "xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1)?;
    for offset in &offsets {
        write!(out, "{offset:010} 00000 n \n")?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R /Info 6 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        offsets.len() + 1
    )?;

    Ok(out)
}

/// PDF real: no exponent, trailing zeros dropped.
fn number(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn escape_string(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pdf() -> Vec<u8> {
        let data = [0x78, 0x9c, 0x01, 0x02, 0x03];
        let image = FlateImage {
            width: 4,
            height: 2,
            data: &data,
        };
        write_single_page(&image, PageSize::from_css_pixels(794, 1123), "Report (draft)").expect("pdf")
    }

    #[test]
    fn test_page_size_in_points() {
        let page = PageSize::from_css_pixels(794, 1123);
        assert_eq!(number(page.width), "595.5");
        assert_eq!(number(page.height), "842.25");
        assert_eq!(number(600.0), "600");
    }

    #[test]
    fn test_document_structure() {
        let pdf = sample_pdf();
        let text = String::from_utf8_lossy(&pdf);
        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("/MediaBox [0 0 595.5 842.25]"));
        assert!(text.contains("/Predictor 15 /Colors 3 /BitsPerComponent 8 /Columns 4"));
        assert!(text.contains("/Title (Report \\(draft\\))"));
        assert!(text.contains("q 595.5 0 0 842.25 0 0 cm /Im0 Do Q"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = sample_pdf();
        let marker = b"startxref\n";
        let startxref = pdf
            .windows(marker.len())
            .rposition(|w| w == marker)
            .expect("startxref")
            + marker.len();
        let tail = std::str::from_utf8(&pdf[startxref..]).expect("ascii tail");
        let xref_at: usize = tail.lines().next().and_then(|l| l.parse().ok()).expect("offset");

        let table = std::str::from_utf8(&pdf[xref_at..]).expect("ascii table");
        assert!(table.starts_with("xref\n0 7\n"));

        let entries: Vec<usize> = table
            .lines()
            .skip(3)
            .take(6)
            .map(|l| l[..10].parse().expect("entry"))
            .collect();
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(
                pdf[*offset..].starts_with(expected.as_bytes()),
                "object {} misplaced",
                i + 1
            );
        }
    }

    #[test]
    fn test_output_is_deterministic() {
        assert_eq!(sample_pdf(), sample_pdf());
    }
}

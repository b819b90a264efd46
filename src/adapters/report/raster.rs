//! SVG rasterization and PNG encoding.

use std::sync::{Arc, OnceLock};

use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};

use crate::ports::ExportError;

/// Families tried, in order, as the target of the generic `sans-serif`.
const SANS_SERIF_CANDIDATES: [&str; 6] = [
    "Arial",
    "Helvetica",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "FreeSans",
];

/// System fonts, scanned once per process.
pub(super) fn system_fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    Arc::clone(FONTS.get_or_init(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        match sans_serif_family(&db) {
            Some(family) => {
                tracing::debug!("Report sans-serif font: {}", family);
                db.set_sans_serif_family(family);
            }
            None => tracing::warn!("No system fonts found; report text will not render"),
        }
        Arc::new(db)
    }))
}

/// First candidate that is installed, else any installed family.
fn sans_serif_family(db: &fontdb::Database) -> Option<String> {
    let installed = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };
    SANS_SERIF_CANDIDATES
        .iter()
        .find(|name| installed(name))
        .map(|name| (*name).to_string())
        .or_else(|| {
            db.faces()
                .find_map(|face| face.families.first().map(|(family, _)| family.clone()))
        })
}

/// Opaque 8-bit RGB image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Rasterize `svg` (authored at `width`x`height`) at `scale` onto a white page.
///
/// # Errors
/// `ExportError::Layout` if the markup does not parse, `ExportError::Raster`
/// if the canvas cannot be allocated.
pub fn rasterize(svg: &str, width: u32, height: u32, scale: f32) -> Result<RgbImage, ExportError> {
    let options = Options {
        fontdb: system_fonts(),
        ..Options::default()
    };

    let tree = Tree::from_data(svg.as_bytes(), &options)
        .map_err(|err| ExportError::Layout(format!("{err:?}")))?;

    let out_width = (width as f32 * scale).round() as u32;
    let out_height = (height as f32 * scale).round() as u32;
    let mut pixmap = Pixmap::new(out_width, out_height).ok_or_else(|| {
        ExportError::Raster(format!("cannot allocate {out_width}x{out_height} canvas"))
    })?;
    pixmap.fill(Color::WHITE);

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    // The page background is opaque, so premultiplied RGBA equals straight RGB.
    let pixels = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    Ok(RgbImage {
        width: out_width,
        height: out_height,
        pixels,
    })
}

/// Encode an RGB image as PNG.
///
/// # Errors
/// Returns `ExportError::Encode` if the encoder rejects the image.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width, image.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|err| ExportError::Encode(err.to_string()))?;
        writer
            .write_image_data(&image.pixels)
            .map_err(|err| ExportError::Encode(err.to_string()))?;
        writer
            .finish()
            .map_err(|err| ExportError::Encode(err.to_string()))?;
    }
    Ok(out)
}

/// Concatenated IDAT payload of a PNG stream (a zlib stream of filtered rows).
///
/// # Errors
/// Returns `ExportError::Encode` on a malformed stream.
pub fn idat_payload(png_bytes: &[u8]) -> Result<Vec<u8>, ExportError> {
    const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    if png_bytes.len() < SIGNATURE.len() || png_bytes[..SIGNATURE.len()] != SIGNATURE {
        return Err(ExportError::Encode("missing PNG signature".to_string()));
    }

    let mut payload = Vec::new();
    let mut pos = SIGNATURE.len();
    while pos + 8 <= png_bytes.len() {
        let length = u32::from_be_bytes([
            png_bytes[pos],
            png_bytes[pos + 1],
            png_bytes[pos + 2],
            png_bytes[pos + 3],
        ]) as usize;
        let kind = &png_bytes[pos + 4..pos + 8];
        let data_start = pos + 8;
        let data_end = data_start + length;
        if data_end + 4 > png_bytes.len() {
            return Err(ExportError::Encode("truncated PNG chunk".to_string()));
        }
        match kind {
            b"IDAT" => payload.extend_from_slice(&png_bytes[data_start..data_end]),
            b"IEND" => break,
            _ => {}
        }
        pos = data_end + 4;
    }

    if payload.is_empty() {
        return Err(ExportError::Encode("PNG has no image data".to_string()));
    }
    Ok(payload)
}

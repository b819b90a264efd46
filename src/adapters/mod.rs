//! Adapters layer: Concrete implementations of ports.
//!
//! - `http`: reqwest client for the prediction service
//! - `report`: SVG layout rendered through resvg into a one-page PDF
//! - `share`: drop-directory share target and OSC 52 clipboard
//! - `sanitize`: health-data filtering for logs

pub mod http;
pub mod report;
pub mod sanitize;
pub mod share;

pub use http::HttpPredictor;
pub use report::SvgPdfRenderer;
pub use share::{Osc52Clipboard, ShareDirectory};

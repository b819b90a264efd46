//! Fixed report layout as SVG markup.
//!
//! The page is laid out at 794x1123 px (A4 at 96 dpi). Markup is a pure
//! function of the display model and the report context.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::config::PRODUCT_NAME;
use crate::domain::{Impact, InsightKind, PredictionResultData, RiskBand};
use crate::ports::ReportContext;

pub const PAGE_WIDTH: u32 = 794;
pub const PAGE_HEIGHT: u32 = 1123;

const MARGIN: f64 = 48.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH as f64 - 2.0 * MARGIN;
const FONT: &str =
    "Inter, Segoe UI, Helvetica, Arial, DejaVu Sans, Liberation Sans, Noto Sans, sans-serif";

const SLATE_900: &str = "#0f172a";
const SLATE_700: &str = "#334155";
const SLATE_600: &str = "#475569";
const SLATE_500: &str = "#64748b";
const SLATE_400: &str = "#94a3b8";
const SLATE_200: &str = "#e2e8f0";
const SLATE_100: &str = "#f1f5f9";
const SLATE_50: &str = "#f8fafc";

const DISCLAIMER: &str = "DISCLAIMER: This report is generated by an artificial intelligence model and is intended for informational and educational purposes only. It utilizes statistical analysis of historical health data to estimate probabilities. This report does NOT constitute a medical diagnosis, prognosis, or treatment plan. Always consult with a qualified healthcare provider for interpretation of these results and before making any medical decisions.";

/// Short, stable report reference derived from the content being printed.
#[must_use]
pub fn report_reference(data: &PredictionResultData, context: &ReportContext) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(data).unwrap_or_default());
    hasher.update(context.generated_on.to_string().as_bytes());
    let digest = hasher.finalize();
    digest
        .iter()
        .take(5)
        .map(|b| format!("{b:02X}"))
        .collect::<String>()
        .chars()
        .take(9)
        .collect()
}

/// Render the full report page.
#[must_use]
pub fn render_svg(data: &PredictionResultData, context: &ReportContext) -> String {
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{PAGE_WIDTH}' height='{PAGE_HEIGHT}' viewBox='0 0 {PAGE_WIDTH} {PAGE_HEIGHT}'>"
    );
    let _ = writeln!(
        svg,
        "  <rect width='{PAGE_WIDTH}' height='{PAGE_HEIGHT}' fill='#ffffff'/>"
    );

    write_header(&mut svg, data, context);
    write_summary(&mut svg, data);
    write_score(&mut svg, data);
    let table_bottom = write_factor_table(&mut svg, data);
    write_insights(&mut svg, data, table_bottom + 40.0);
    write_footer(&mut svg);

    let _ = writeln!(svg, "</svg>");
    svg
}

fn write_header(svg: &mut String, data: &PredictionResultData, context: &ReportContext) {
    text(svg, MARGIN, 84.0, 30.0, SLATE_900, "700", "start", PRODUCT_NAME);
    let _ = writeln!(
        svg,
        "  <rect x='210' y='63' width='118' height='24' rx='4' fill='{SLATE_100}' stroke='{SLATE_200}'/>"
    );
    text(svg, 269.0, 80.0, 11.0, SLATE_900, "600", "middle", "MEDICAL REPORT");
    text(
        svg,
        MARGIN,
        110.0,
        13.0,
        SLATE_500,
        "400",
        "start",
        "Advanced Cardiovascular Risk Assessment Analysis",
    );

    let right = MARGIN + CONTENT_WIDTH;
    let date = context.generated_on.format("%B %-d, %Y").to_string();
    text(svg, right, 80.0, 13.0, SLATE_600, "400", "end", &date);
    let reference = format!("Ref: {}", report_reference(data, context));
    text(svg, right, 102.0, 13.0, SLATE_600, "400", "end", &reference);

    let _ = writeln!(
        svg,
        "  <line x1='{MARGIN}' y1='130' x2='{right}' y2='130' stroke='{SLATE_900}' stroke-width='2'/>"
    );
}

fn write_summary(svg: &mut String, data: &PredictionResultData) {
    let top = 154.0;
    let _ = writeln!(
        svg,
        "  <rect x='{MARGIN}' y='{top}' width='{CONTENT_WIDTH}' height='132' rx='8' fill='{SLATE_50}' stroke='{SLATE_200}'/>"
    );
    text(svg, MARGIN + 24.0, top + 30.0, 14.0, SLATE_900, "600", "start", "Assessment Summary");
    let _ = writeln!(
        svg,
        "  <line x1='{}' y1='{}' x2='{}' y2='{}' stroke='{SLATE_200}'/>",
        MARGIN + 24.0,
        top + 42.0,
        MARGIN + CONTENT_WIDTH - 24.0,
        top + 42.0
    );

    let confidence = format!("{}%", data.confidence());
    let factors = format!("{} Clinical Indicators", data.factors().len());
    let rows = [
        ("Analysis Type", "Random Forest Classifier", "Model Confidence", confidence.as_str()),
        ("Factors Analyzed", factors.as_str(), "Assessment Status", "Complete"),
    ];

    let column = (CONTENT_WIDTH - 48.0 - 48.0) / 2.0;
    for (i, (l1, v1, l2, v2)) in rows.iter().enumerate() {
        let y = top + 74.0 + i as f64 * 34.0;
        let left = MARGIN + 24.0;
        let second = left + column + 48.0;
        text(svg, left, y, 13.0, SLATE_500, "400", "start", l1);
        text(svg, left + column, y, 13.0, SLATE_900, "500", "end", v1);
        text(svg, second, y, 13.0, SLATE_500, "400", "start", l2);
        let color = if *v2 == "Complete" { "#047857" } else { SLATE_900 };
        text(svg, second + column, y, 13.0, color, "500", "end", v2);
    }
}

fn write_score(svg: &mut String, data: &PredictionResultData) {
    section_heading(svg, 334.0, "Risk Assessment Result");

    let top = 352.0;
    let height = 176.0;
    let _ = writeln!(
        svg,
        "  <rect x='{MARGIN}' y='{top}' width='{CONTENT_WIDTH}' height='{height}' rx='12' fill='#ffffff' stroke='{SLATE_200}'/>"
    );

    let score = data.risk_score();
    let band = RiskBand::for_report(score);
    let (r, g, b) = band.color();
    let cx = MARGIN + 88.0;
    let cy = top + height / 2.0;
    let radius = 52.0;
    let circumference = 2.0 * std::f64::consts::PI * radius;
    let filled = circumference * f64::from(score) / 100.0;

    let _ = writeln!(
        svg,
        "  <circle cx='{cx}' cy='{cy}' r='{radius}' fill='none' stroke='{SLATE_100}' stroke-width='13'/>"
    );
    if score > 0 {
        let _ = writeln!(
            svg,
            "  <circle cx='{cx}' cy='{cy}' r='{radius}' fill='none' stroke='rgb({r},{g},{b})' stroke-width='13' stroke-linecap='round' stroke-dasharray='{filled:.2} {circumference:.2}' transform='rotate(-90 {cx} {cy})'/>"
        );
    }
    text(svg, cx, cy + 11.0, 30.0, SLATE_900, "700", "middle", &format!("{score}%"));

    let text_x = cx + radius + 56.0;
    let badge = band.label().to_ascii_uppercase();
    let badge_width = 18.0 + badge.len() as f64 * 8.6;
    let (bg, fg) = match band {
        RiskBand::High => ("#ffe4e6", "#9f1239"),
        RiskBand::Moderate => ("#fef3c7", "#92400e"),
        RiskBand::Low => ("#d1fae5", "#065f46"),
    };
    let _ = writeln!(
        svg,
        "  <rect x='{text_x}' y='{}' width='{badge_width:.1}' height='24' rx='12' fill='{bg}'/>",
        top + 34.0
    );
    text(svg, text_x + 9.0, top + 51.0, 12.0, fg, "700", "start", &badge);

    let available = MARGIN + CONTENT_WIDTH - 24.0 - text_x;
    for (i, line) in wrap(band.description(), chars_for(available, 13.0)).iter().enumerate() {
        text(svg, text_x, top + 86.0 + i as f64 * 20.0, 13.0, SLATE_600, "400", "start", line);
    }
}

/// Draw the factor table and return its bottom edge.
fn write_factor_table(svg: &mut String, data: &PredictionResultData) -> f64 {
    section_heading(svg, 568.0, "Clinical Indicators Analysis");

    let top = 586.0;
    let header_height = 36.0;
    let row_height = 34.0;
    let columns = [MARGIN + 24.0, MARGIN + 210.0, MARGIN + 390.0, MARGIN + 548.0];
    let rows = data.factors().len().max(1);
    let height = header_height + rows as f64 * row_height;

    let _ = writeln!(
        svg,
        "  <rect x='{MARGIN}' y='{top}' width='{CONTENT_WIDTH}' height='{height}' rx='8' fill='#ffffff' stroke='{SLATE_200}'/>"
    );
    let _ = writeln!(
        svg,
        "  <rect x='{}' y='{}' width='{}' height='{}' fill='{SLATE_100}'/>",
        MARGIN + 1.0,
        top + 1.0,
        CONTENT_WIDTH - 2.0,
        header_height - 1.0
    );
    for (x, title) in columns
        .iter()
        .zip(["Factor Name", "Recorded Value", "Population Avg", "Impact"])
    {
        text(svg, *x, top + 23.0, 13.0, SLATE_700, "600", "start", title);
    }

    if data.factors().is_empty() {
        text(
            svg,
            columns[0],
            top + header_height + 22.0,
            13.0,
            SLATE_500,
            "400",
            "start",
            "No clinical indicators available.",
        );
    }

    for (i, factor) in data.factors().iter().enumerate() {
        let row_top = top + header_height + i as f64 * row_height;
        if i % 2 == 1 {
            let _ = writeln!(
                svg,
                "  <rect x='{}' y='{row_top}' width='{}' height='{row_height}' fill='{SLATE_50}'/>",
                MARGIN + 1.0,
                CONTENT_WIDTH - 2.0
            );
        }
        let _ = writeln!(
            svg,
            "  <line x1='{MARGIN}' y1='{row_top}' x2='{}' y2='{row_top}' stroke='{SLATE_200}'/>",
            MARGIN + CONTENT_WIDTH
        );
        let baseline = row_top + 22.0;
        text(svg, columns[0], baseline, 13.0, SLATE_900, "500", "start", &factor.name);
        text(svg, columns[1], baseline, 13.0, SLATE_600, "400", "start", &factor.user_value);
        text(svg, columns[2], baseline, 13.0, SLATE_500, "400", "start", &factor.avg_value);

        let (dot, label_color, weight) = match factor.impact {
            Impact::Negative => ("#f43f5e", "#be123c", "500"),
            Impact::Positive => ("#10b981", "#047857", "400"),
        };
        let _ = writeln!(
            svg,
            "  <circle cx='{}' cy='{}' r='4' fill='{dot}'/>",
            columns[3] + 4.0,
            baseline - 4.0
        );
        text(
            svg,
            columns[3] + 16.0,
            baseline,
            13.0,
            label_color,
            weight,
            "start",
            factor.impact.report_label(),
        );
    }

    top + height
}

fn write_insights(svg: &mut String, data: &PredictionResultData, heading_y: f64) {
    section_heading(svg, heading_y, "Actionable Insights");

    let mut y = heading_y + 18.0;
    let text_x = MARGIN + 52.0;
    let per_line = chars_for(CONTENT_WIDTH - 72.0, 13.0);

    for insight in data.insights() {
        let (bg, border, icon_bg, accent, title) = match insight.kind {
            InsightKind::Warning => ("#fffbeb", "#fde68a", "#fef3c7", "#78350f", "#d97706"),
            InsightKind::Success => ("#ecfdf5", "#a7f3d0", "#d1fae5", "#064e3b", "#059669"),
            InsightKind::Info => ("#eff6ff", "#bfdbfe", "#dbeafe", "#1e3a8a", "#2563eb"),
        };
        let lines = wrap(&insight.text, per_line);
        let height = 44.0 + lines.len() as f64 * 18.0;

        let _ = writeln!(
            svg,
            "  <rect x='{MARGIN}' y='{y}' width='{CONTENT_WIDTH}' height='{height}' rx='8' fill='{bg}' stroke='{border}'/>"
        );
        let _ = writeln!(
            svg,
            "  <circle cx='{}' cy='{}' r='11' fill='{icon_bg}'/>",
            MARGIN + 26.0,
            y + 26.0
        );
        let glyph = match insight.kind {
            InsightKind::Warning => "!",
            InsightKind::Success => "\u{2713}",
            InsightKind::Info => "i",
        };
        text(svg, MARGIN + 26.0, y + 31.0, 13.0, title, "700", "middle", glyph);
        text(svg, text_x, y + 24.0, 13.0, accent, "700", "start", insight.kind.heading());
        for (i, line) in lines.iter().enumerate() {
            text(svg, text_x, y + 44.0 + i as f64 * 18.0, 13.0, SLATE_700, "400", "start", line);
        }
        y += height + 12.0;
    }
}

fn write_footer(svg: &mut String) {
    let top = 992.0;
    let center = f64::from(PAGE_WIDTH) / 2.0;
    let _ = writeln!(
        svg,
        "  <line x1='{MARGIN}' y1='{top}' x2='{}' y2='{top}' stroke='{SLATE_200}'/>",
        MARGIN + CONTENT_WIDTH
    );
    text(
        svg,
        center,
        top + 26.0,
        12.0,
        SLATE_900,
        "600",
        "middle",
        &format!("{PRODUCT_NAME} Medical Analysis System"),
    );
    for (i, line) in wrap(DISCLAIMER, 110).iter().enumerate() {
        text(svg, center, top + 46.0 + i as f64 * 14.0, 10.0, SLATE_500, "400", "middle", line);
    }
    text(
        svg,
        center,
        top + 116.0,
        10.0,
        SLATE_400,
        "400",
        "middle",
        &format!("Page 1 of 1 \u{2022} Generated via {PRODUCT_NAME} v1.2"),
    );
}

fn section_heading(svg: &mut String, y: f64, title: &str) {
    let _ = writeln!(
        svg,
        "  <rect x='{MARGIN}' y='{}' width='4' height='24' fill='{SLATE_900}'/>",
        y - 19.0
    );
    text(svg, MARGIN + 14.0, y, 19.0, SLATE_900, "700", "start", title);
}

#[allow(clippy::too_many_arguments)]
fn text(svg: &mut String, x: f64, y: f64, size: f64, fill: &str, weight: &str, anchor: &str, content: &str) {
    let _ = writeln!(
        svg,
        "  <text x='{x:.1}' y='{y:.1}' fill='{fill}' font-family='{FONT}' font-size='{size}' font-weight='{weight}' text-anchor='{anchor}'>{}</text>",
        escape_text(content)
    );
}

/// Approximate characters per line for a given width and font size.
fn chars_for(width: f64, font_size: f64) -> usize {
    ((width / (font_size * 0.52)).floor() as usize).max(8)
}

/// Greedy word wrap on whitespace.
fn wrap(input: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in input.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}

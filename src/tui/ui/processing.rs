//! Processing screen: stage list and overall progress.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::tui::animation::{Frame as AnimationFrame, STAGES};
use crate::tui::styles::Theme;

pub fn render_processing(f: &mut Frame, area: Rect, frame: &AnimationFrame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Gauge
            Constraint::Length(STAGES.len() as u16 * 2 + 2),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled("Analyzing Your Health Data", Theme::title())),
        Line::from(Span::styled(
            "Our AI model is processing your information",
            Theme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    let percent = (frame.overall * 100.0).round().clamp(0.0, 100.0) as u16;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .gauge_style(Theme::accent())
        .percent(percent)
        .label(format!("{percent}%"));
    f.render_widget(gauge, chunks[1]);

    let mut lines = Vec::with_capacity(STAGES.len() * 2);
    for (i, stage) in STAGES.iter().enumerate() {
        let (marker, style) = if i < frame.completed {
            ("✓", Theme::success())
        } else if i == frame.stage {
            ("●", Theme::accent())
        } else {
            ("○", Theme::text_muted())
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(stage.label, style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", stage.detail),
            Theme::text_muted(),
        )));
    }

    let stages = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(stages, chunks[2]);
}

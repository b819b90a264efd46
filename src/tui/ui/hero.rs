//! Landing screen.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::{Theme, LOGO};

const HIGHLIGHTS: [(&str, &str); 3] = [
    ("11 clinical indicators", "Age, vitals, blood work and lifestyle"),
    ("Random Forest model", "Trained on 70,000+ patient records"),
    ("Printable report", "One-page PDF you can download or share"),
];

pub fn render_hero(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Logo
            Constraint::Length(4), // Tagline
            Constraint::Min(5),    // Highlights
            Constraint::Length(2), // Footer
        ])
        .split(area);

    let logo: Vec<Line> = LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l, Theme::accent())))
        .collect();
    f.render_widget(Paragraph::new(logo).alignment(Alignment::Center), chunks[0]);

    let tagline = Paragraph::new(vec![
        Line::from(Span::styled(
            "AI-Powered Cardiovascular Risk Assessment",
            Theme::title(),
        )),
        Line::from(Span::styled(
            "Answer a few questions about your health and get an instant, explainable risk estimate.",
            Theme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(tagline, chunks[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .horizontal_margin(2)
        .split(chunks[2]);

    for (column, (title, body)) in columns.iter().zip(HIGHLIGHTS) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(title, Theme::accent())),
            Line::from(Span::styled(body, Theme::text_secondary())),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );
        f.render_widget(card, *column);
    }

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[Enter] ", Theme::key_hint()),
        Span::styled("Get Started ", Theme::key_desc()),
        Span::styled("[Ctrl+Q] ", Theme::key_hint()),
        Span::styled("Quit", Theme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border()),
    );
    f.render_widget(footer, chunks[3]);
}

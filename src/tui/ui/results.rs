//! Results dashboard with three tabs.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::domain::{Impact, PredictionResultData};
use crate::tui::styles::Theme;

const RECOMMENDED_ACTIONS: [&str; 4] = [
    "Schedule a consultation with a healthcare provider to discuss your blood pressure.",
    "Aim for at least 150 minutes of moderate aerobic activity per week.",
    "Consider dietary changes to help manage cholesterol levels.",
    "Re-evaluate your risk in 6 months after implementing lifestyle changes.",
];

const MODEL_DETAILS: [(&str, &str); 4] = [
    ("Algorithm", "Random Forest"),
    ("Training Data", "70,000+ records"),
    ("AUC-ROC", "0.91"),
    ("Features", "11"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultsTab {
    #[default]
    Overview,
    Explainability,
    Insights,
}

impl ResultsTab {
    pub const ALL: [Self; 3] = [Self::Overview, Self::Explainability, Self::Insights];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Explainability => "AI Explainability",
            Self::Insights => "Health Insights",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Overview => Self::Explainability,
            Self::Explainability => Self::Insights,
            Self::Insights => Self::Overview,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

pub fn render_results(f: &mut Frame, area: Rect, data: &PredictionResultData, tab: ResultsTab) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(2), // Footer
        ])
        .split(area);

    let tabs = Tabs::new(ResultsTab::ALL.iter().map(|t| t.title()))
        .select(tab.index())
        .style(Theme::text_secondary())
        .highlight_style(Theme::selected())
        .block(
            Block::default()
                .title(Span::styled(" Your Results ", Theme::title()))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );
    f.render_widget(tabs, chunks[0]);

    match tab {
        ResultsTab::Overview => render_overview(f, chunks[1], data),
        ResultsTab::Explainability => render_explainability(f, chunks[1], data),
        ResultsTab::Insights => render_insights(f, chunks[1], data),
    }

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[Tab] ", Theme::key_hint()),
        Span::styled("Switch View ", Theme::key_desc()),
        Span::styled("[D] ", Theme::key_hint()),
        Span::styled("Download Report ", Theme::key_desc()),
        Span::styled("[S] ", Theme::key_hint()),
        Span::styled("Share Results ", Theme::key_desc()),
        Span::styled("[N] ", Theme::key_hint()),
        Span::styled("New Analysis", Theme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border()),
    );
    f.render_widget(footer, chunks[2]);
}

fn render_overview(f: &mut Frame, area: Rect, data: &PredictionResultData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Score
            Constraint::Length(3), // Confidence
            Constraint::Length(5), // Summary
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    let band = data.band();
    let score = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Cardiovascular Risk Score ", Theme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .gauge_style(Theme::band(band))
        .percent(u16::from(data.risk_score()))
        .label(Span::styled(
            format!("{}%  {}", data.risk_score(), band.label()),
            Theme::title(),
        ));
    f.render_widget(score, chunks[0]);

    let confidence = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Model Confidence ", Theme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .gauge_style(Theme::info())
        .percent(u16::from(data.confidence()))
        .label(format!("{}%", data.confidence()));
    f.render_widget(confidence, chunks[1]);

    let primary_concern = data
        .factors()
        .iter()
        .find(|f| f.impact == Impact::Negative)
        .map_or("None identified", |f| f.name.as_str());

    let summary = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Risk factors: ", Theme::text_secondary()),
            Span::styled(data.risk_factor_count().to_string(), Theme::danger()),
            Span::styled("   Protective factors: ", Theme::text_secondary()),
            Span::styled(data.protective_factor_count().to_string(), Theme::success()),
        ]),
        Line::from(vec![
            Span::styled("Primary concern: ", Theme::text_secondary()),
            Span::styled(primary_concern, Theme::text()),
        ]),
        Line::from(Span::styled(
            data.insights().first().map_or("", |i| i.text.as_str()),
            data.insights()
                .first()
                .map_or(Theme::text_muted(), |i| Theme::insight(i.kind)),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Summary ", Theme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(summary, chunks[2]);
}

/// Horizontal bar scaled against the largest importance.
fn importance_bar(importance: u8, max: u8, width: usize) -> String {
    if max == 0 {
        return " ".repeat(width);
    }
    let filled = (usize::from(importance) * width + usize::from(max) / 2) / usize::from(max);
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_explainability(f: &mut Frame, area: Rect, data: &PredictionResultData) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .margin(1)
        .split(area);

    let max = data.factors().iter().map(|f| f.importance).max().unwrap_or(0);
    let mut lines = Vec::new();
    if data.factors().is_empty() {
        lines.push(Line::from(Span::styled(
            "No factor analysis available for this result.",
            Theme::text_muted(),
        )));
    }
    for factor in data.factors() {
        let style = Theme::impact(factor.impact);
        lines.push(Line::from(vec![
            Span::styled(format!("{:<16}", factor.name), Theme::text()),
            Span::styled(importance_bar(factor.importance, max, 20), style),
            Span::styled(format!(" {}", factor.impact.report_label()), style),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  You: ", Theme::text_muted()),
            Span::styled(factor.user_value.clone(), Theme::text_secondary()),
            Span::styled("   Avg: ", Theme::text_muted()),
            Span::styled(factor.avg_value.clone(), Theme::text_secondary()),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![
        Span::styled("█ ", Theme::danger()),
        Span::styled("Increases risk   ", Theme::text_muted()),
        Span::styled("█ ", Theme::success()),
        Span::styled("Decreases risk", Theme::text_muted()),
    ]));

    let factors = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Feature Importance ", Theme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(factors, chunks[0]);

    let details: Vec<Line> = MODEL_DETAILS
        .iter()
        .map(|(k, v)| {
            Line::from(vec![
                Span::styled(format!("{k}: "), Theme::text_muted()),
                Span::styled(*v, Theme::text()),
            ])
        })
        .collect();
    let model = Paragraph::new(details).block(
        Block::default()
            .title(Span::styled(" Model Details ", Theme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(model, chunks[1]);
}

fn render_insights(f: &mut Frame, area: Rect, data: &PredictionResultData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(data.insights().len() as u16 * 2 + 2),
            Constraint::Length(RECOMMENDED_ACTIONS.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    let mut lines = Vec::new();
    for insight in data.insights() {
        let style = Theme::insight(insight.kind);
        lines.push(Line::from(Span::styled(
            insight.kind.heading(),
            style.add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(insight.text.clone(), Theme::text())));
    }
    let insights = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(Span::styled(" AI-Generated Insights ", Theme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(insights, chunks[0]);

    let actions: Vec<Line> = RECOMMENDED_ACTIONS
        .iter()
        .enumerate()
        .map(|(i, a)| {
            Line::from(vec![
                Span::styled(format!(" {}. ", i + 1), Theme::accent()),
                Span::styled(*a, Theme::text()),
            ])
        })
        .collect();
    let actions = Paragraph::new(actions).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::styled(" Recommended Actions ", Theme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(actions, chunks[1]);

    let note = Paragraph::new(Line::from(Span::styled(
        "These insights are generated from statistical patterns and are not a diagnosis.",
        Theme::text_muted(),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(note, chunks[2]);
}

//! UI module: View components for the TUI.

pub mod hero;
pub mod intake;
pub mod processing;
pub mod results;

use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::Theme;

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// Transient toast shown in the corner of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    shown_at: Instant,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTIFICATION_TTL
    }
}

pub fn render_notification(f: &mut Frame, area: Rect, notification: &Notification) {
    let width = 48.min(area.width);
    let height = 4.min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height,
    };

    let style = match notification.kind {
        NotificationKind::Info => Theme::info(),
        NotificationKind::Success => Theme::success(),
        NotificationKind::Error => Theme::danger(),
    };

    let toast = Paragraph::new(Line::from(Span::styled(
        notification.message.clone(),
        Theme::text(),
    )))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(format!(" {} ", notification.title), style))
            .borders(Borders::ALL)
            .border_style(style),
    );

    f.render_widget(Clear, rect);
    f.render_widget(toast, rect);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "DISCLAIMER: This tool estimates risk from statistical patterns and does not replace professional medical evaluation.",
        Theme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Theme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

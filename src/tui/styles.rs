//! Color palette and preset styles.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{Impact, InsightKind, RiskBand};

/// Application theme.
pub struct Theme;

impl Theme {
    // === Brand ===

    /// Rose, the heart accent
    pub const PRIMARY: Color = Color::Rgb(225, 29, 72); // #E11D48
    pub const PRIMARY_LIGHT: Color = Color::Rgb(251, 113, 133); // #FB7185

    // === Semantic ===

    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981
    pub const WARNING: Color = Color::Rgb(245, 158, 11); // #F59E0B
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    // === Surfaces and text ===

    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A
    pub const BORDER: Color = Color::Rgb(71, 85, 105); // #475569
    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn accent() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Focused form field or active tab
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn band(band: RiskBand) -> Style {
        match band {
            RiskBand::Low => Self::success(),
            RiskBand::Moderate => Self::warning(),
            RiskBand::High => Self::danger(),
        }
    }

    #[must_use]
    pub fn impact(impact: Impact) -> Style {
        match impact {
            Impact::Positive => Self::success(),
            Impact::Negative => Self::danger(),
        }
    }

    #[must_use]
    pub fn insight(kind: InsightKind) -> Style {
        match kind {
            InsightKind::Warning => Self::warning(),
            InsightKind::Success => Self::success(),
            InsightKind::Info => Self::info(),
        }
    }
}

/// Hero banner
pub const LOGO: &str = r"
  ___              _ _          _   ___
 / __|__ _ _ _ __| (_)___     /_\ |_ _|
| (__/ _` | '_/ _` | / _ \   / _ \ | |
 \___\__,_|_| \__,_|_\___/  /_/ \_\___|
";

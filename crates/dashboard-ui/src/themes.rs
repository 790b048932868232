use dashboard_core::source::SourceChannel;
use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Every style used by the dashboard widgets.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,
    pub warning: Style,

    // ── KPI cards ────────────────────────────────────────────────────────────
    pub kpi_title: Style,
    pub kpi_value: Style,

    // ── Bars ─────────────────────────────────────────────────────────────────
    pub bar: Style,
    pub bar_empty: Style,
    pub bar_label: Style,

    // ── Sales channels ───────────────────────────────────────────────────────
    pub channel_apps: Style,
    pub channel_erp: Style,
    pub channel_blank: Style,
    pub channel_other: Style,

    // ── Panels & table ───────────────────────────────────────────────────────
    pub panel_border: Style,
    pub panel_title: Style,
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,

    // ── Filter sidebar ───────────────────────────────────────────────────────
    pub focus_border: Style,
    pub checked: Style,
    pub unchecked: Style,
    pub cursor: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),

            kpi_title: Style::default().fg(Color::Gray),
            kpi_value: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            bar: Style::default().fg(Color::Blue),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::Gray),

            channel_apps: Style::default().fg(Color::Cyan),
            channel_erp: Style::default().fg(Color::Magenta),
            channel_blank: Style::default().fg(Color::DarkGray),
            channel_other: Style::default().fg(Color::Yellow),

            panel_border: Style::default().fg(Color::DarkGray),
            panel_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            focus_border: Style::default().fg(Color::Cyan),
            checked: Style::default().fg(Color::Green),
            unchecked: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Red),

            kpi_title: Style::default().fg(Color::DarkGray),
            kpi_value: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            bar: Style::default().fg(Color::Blue),
            bar_empty: Style::default().fg(Color::Gray),
            bar_label: Style::default().fg(Color::DarkGray),

            channel_apps: Style::default().fg(Color::Blue),
            channel_erp: Style::default().fg(Color::Magenta),
            channel_blank: Style::default().fg(Color::Gray),
            channel_other: Style::default().fg(Color::Red),

            panel_border: Style::default().fg(Color::Gray),
            panel_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            focus_border: Style::default().fg(Color::Blue),
            checked: Style::default().fg(Color::Green),
            unchecked: Style::default().fg(Color::Gray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    /// Classic theme using only the basic 8-colour ANSI palette and no bold.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_sparkle: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),
            warning: Style::default().fg(Color::Yellow),

            kpi_title: Style::default().fg(Color::Gray),
            kpi_value: Style::default().fg(Color::Cyan),

            bar: Style::default().fg(Color::Green),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::White),

            channel_apps: Style::default().fg(Color::Cyan),
            channel_erp: Style::default().fg(Color::Magenta),
            channel_blank: Style::default().fg(Color::White),
            channel_other: Style::default().fg(Color::Yellow),

            panel_border: Style::default().fg(Color::DarkGray),
            panel_title: Style::default().fg(Color::White),
            table_header: Style::default().fg(Color::Cyan),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),

            focus_border: Style::default().fg(Color::Cyan),
            checked: Style::default().fg(Color::Green),
            unchecked: Style::default().fg(Color::DarkGray),
            cursor: Style::default().fg(Color::Black).bg(Color::White),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Segment colour for a sales channel.
    pub fn channel_style(&self, channel: &SourceChannel) -> Style {
        match channel {
            SourceChannel::Apps => self.channel_apps,
            SourceChannel::Erp => self.channel_erp,
            SourceChannel::Blank => self.channel_blank,
            SourceChannel::Other(_) => self.channel_other,
        }
    }

    /// Border style for a panel, highlighted when it has keyboard focus.
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            self.focus_border
        } else {
            self.panel_border
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

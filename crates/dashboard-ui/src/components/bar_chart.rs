use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::themes::Theme;

/// Widest label column a bar chart will reserve, in terminal columns.
pub const MAX_LABEL_WIDTH: usize = 24;

const FILLED_CHAR: char = '\u{2588}'; // █  FULL BLOCK
const EMPTY_CHAR: char = '\u{2591}'; // ░  LIGHT SHADE

/// Cut `text` so that it occupies at most `max_width` display columns,
/// ending in `…` when anything was removed.
///
/// ```
/// use dashboard_ui::components::bar_chart::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Shampoo", 10), "Shampoo");
/// assert_eq!(truncate_to_width("Hydrating Face Serum", 10), "Hydrating…");
/// ```
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Pad `text` with trailing spaces up to `width` display columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(pad))
}

/// Horizontal bar chart: one labelled bar per row, scaled to the largest
/// value.
pub struct HorizontalBarChart<'a> {
    pub title: &'a str,
    pub rows: Vec<(String, f64)>,
    pub format_value: fn(f64) -> String,
    pub bar_style: Style,
    pub theme: &'a Theme,
}

impl<'a> HorizontalBarChart<'a> {
    pub fn new(
        title: &'a str,
        rows: Vec<(String, f64)>,
        format_value: fn(f64) -> String,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            rows,
            format_value,
            bar_style: theme.bar,
            theme,
        }
    }

    /// Use a different fill style than the theme's default bar colour.
    pub fn with_bar_style(mut self, style: Style) -> Self {
        self.bar_style = style;
        self
    }

    /// Build one line per row for a panel `width` columns wide.
    pub fn to_lines(&self, width: usize) -> Vec<Line<'a>> {
        let label_width = self
            .rows
            .iter()
            .map(|(name, _)| name.width())
            .max()
            .unwrap_or(0)
            .min(MAX_LABEL_WIDTH);
        let values: Vec<String> = self.rows.iter().map(|(_, v)| (self.format_value)(*v)).collect();
        let value_width = values.iter().map(|v| v.width()).max().unwrap_or(0);
        let bar_width = width.saturating_sub(label_width + value_width + 2);
        let max_value = self
            .rows
            .iter()
            .map(|(_, v)| *v)
            .fold(0.0_f64, f64::max);

        self.rows
            .iter()
            .zip(values)
            .map(|((name, value), formatted)| {
                let filled = if max_value > 0.0 {
                    ((value.max(0.0) / max_value) * bar_width as f64).round() as usize
                } else {
                    0
                };
                let empty = bar_width.saturating_sub(filled);
                let label = pad_to_width(&truncate_to_width(name, label_width), label_width);
                let value_pad = " ".repeat(value_width.saturating_sub(formatted.width()));

                Line::from(vec![
                    Span::styled(label, self.theme.bar_label),
                    Span::raw(" "),
                    Span::styled(FILLED_CHAR.to_string().repeat(filled), self.bar_style),
                    Span::styled(EMPTY_CHAR.to_string().repeat(empty), self.theme.bar_empty),
                    Span::raw(" "),
                    Span::styled(format!("{}{}", value_pad, formatted), self.theme.value),
                ])
            })
            .collect()
    }

    /// Draw the chart inside a bordered panel.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let lines = if self.rows.is_empty() {
            vec![Line::from(Span::styled("No data", self.theme.dim))]
        } else {
            self.to_lines(inner_width)
        };

        let panel = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.panel_border)
                .title(Span::styled(format!(" {} ", self.title), self.theme.panel_title)),
        );
        frame.render_widget(panel, area);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

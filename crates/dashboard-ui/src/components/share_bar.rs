use dashboard_core::formatting::format_share;
use dashboard_core::source::SourceChannel;
use dashboard_data::aggregator::ChannelShareRow;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::components::bar_chart::{pad_to_width, truncate_to_width, MAX_LABEL_WIDTH};
use crate::themes::Theme;

/// Channel shares of one month, in the order the channels first appear.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthShares {
    pub month_label: String,
    pub segments: Vec<(SourceChannel, f64)>,
}

/// Regroup flat month × channel rows into one entry per month, keeping
/// month order.
pub fn group_by_month(rows: &[ChannelShareRow]) -> Vec<MonthShares> {
    let mut months: Vec<MonthShares> = Vec::new();
    for row in rows {
        match months.iter_mut().find(|m| m.month_label == row.month_label) {
            Some(month) => month.segments.push((row.source.clone(), row.revenue_share)),
            None => months.push(MonthShares {
                month_label: row.month_label.clone(),
                segments: vec![(row.source.clone(), row.revenue_share)],
            }),
        }
    }
    months
}

/// Split `width` columns across the shares using largest remainders so the
/// segments always add up to the full width when any share is positive.
fn segment_widths(shares: &[f64], width: usize) -> Vec<usize> {
    let total: f64 = shares.iter().map(|s| s.max(0.0)).sum();
    if total <= 0.0 {
        return vec![0; shares.len()];
    }

    let exact: Vec<f64> = shares
        .iter()
        .map(|s| s.max(0.0) / total * width as f64)
        .collect();
    let mut widths: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();
    let mut remaining = width.saturating_sub(widths.iter().sum());

    let mut order: Vec<usize> = (0..exact.len()).collect();
    order.sort_by(|&a, &b| (exact[b] - exact[b].floor()).total_cmp(&(exact[a] - exact[a].floor())));
    for idx in order {
        if remaining == 0 {
            break;
        }
        widths[idx] += 1;
        remaining -= 1;
    }
    widths
}

/// A 100% stacked bar for one month, one coloured segment per channel.
pub struct ChannelShareBar<'a> {
    pub shares: &'a MonthShares,
    pub label_width: usize,
    pub theme: &'a Theme,
}

impl<'a> ChannelShareBar<'a> {
    pub fn new(shares: &'a MonthShares, label_width: usize, theme: &'a Theme) -> Self {
        Self {
            shares,
            label_width,
            theme,
        }
    }

    /// Render as `<month> <stacked bar>` filling `width` columns.
    pub fn to_line(&self, width: usize) -> Line<'a> {
        let label_width = self.label_width.min(MAX_LABEL_WIDTH);
        let bar_width = width.saturating_sub(label_width + 1);
        let fractions: Vec<f64> = self.shares.segments.iter().map(|(_, s)| *s).collect();
        let widths = segment_widths(&fractions, bar_width);

        let mut spans = vec![
            Span::styled(
                pad_to_width(
                    &truncate_to_width(&self.shares.month_label, label_width),
                    label_width,
                ),
                self.theme.bar_label,
            ),
            Span::raw(" "),
        ];

        for ((channel, share), cols) in self.shares.segments.iter().zip(widths) {
            if cols == 0 {
                continue;
            }
            // Print the percentage inside the segment when it fits.
            let pct = format_share(*share);
            let content = if pct.width() + 2 <= cols {
                let left = (cols - pct.width()) / 2;
                let right = cols - pct.width() - left;
                format!("{}{}{}", "█".repeat(left), pct, "█".repeat(right))
            } else {
                "█".repeat(cols)
            };
            spans.push(Span::styled(content, self.theme.channel_style(channel)));
        }

        Line::from(spans)
    }
}

/// Legend line listing each channel that appears in `months`.
pub fn legend_line<'a>(months: &[MonthShares], theme: &'a Theme) -> Line<'a> {
    let mut seen: Vec<&SourceChannel> = Vec::new();
    for month in months {
        for (channel, _) in &month.segments {
            if !seen.contains(&channel) {
                seen.push(channel);
            }
        }
    }

    let mut spans = Vec::with_capacity(seen.len() * 2);
    for channel in seen {
        spans.push(Span::styled("■ ", theme.channel_style(channel)));
        spans.push(Span::styled(format!("{}  ", channel.label()), theme.label));
    }
    Line::from(spans)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

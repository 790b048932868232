//! Full-screen dashboard view.
//!
//! The screen is split into a filter sidebar on the left (branch and month
//! checklists) and the report on the right: header, KPI cards, the six chart
//! panels and the branch summary table.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use dashboard_core::formatting::{format_compact, format_count, format_share};
use dashboard_data::analysis::{DashboardReport, FilterOptions};
use dashboard_runtime::session::{DashboardSession, FilterDimension};

use crate::components::bar_chart::HorizontalBarChart;
use crate::components::header::Header;
use crate::components::kpi_cards::KpiCards;
use crate::components::share_bar::{group_by_month, legend_line, ChannelShareBar};
use crate::table_view;
use crate::themes::Theme;

/// Width of the filter sidebar in columns.
pub const SIDEBAR_WIDTH: u16 = 30;

// ── Sidebar state ─────────────────────────────────────────────────────────────

/// Keyboard focus and cursor positions of the two filter lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarState {
    pub focus: FilterDimension,
    pub branch_cursor: usize,
    pub month_cursor: usize,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self {
            focus: FilterDimension::Branch,
            branch_cursor: 0,
            month_cursor: 0,
        }
    }
}

impl SidebarState {
    pub fn cursor(&self, dimension: FilterDimension) -> usize {
        match dimension {
            FilterDimension::Branch => self.branch_cursor,
            FilterDimension::Month => self.month_cursor,
        }
    }

    pub fn cursor_mut(&mut self, dimension: FilterDimension) -> &mut usize {
        match dimension {
            FilterDimension::Branch => &mut self.branch_cursor,
            FilterDimension::Month => &mut self.month_cursor,
        }
    }
}

/// Build the checklist lines for one filter, scrolled so that the cursor
/// stays inside `height` rows.
pub fn filter_list_lines<'a>(
    options: &[String],
    is_selected: impl Fn(&str) -> bool,
    cursor: Option<usize>,
    height: usize,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let offset = match cursor {
        Some(c) if height > 0 && c >= height => c + 1 - height,
        _ => 0,
    };

    options
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, option)| {
            let checked = is_selected(option);
            let (mark, mark_style) = if checked {
                ("[x] ", theme.checked)
            } else {
                ("[ ] ", theme.unchecked)
            };
            let text_style = if cursor == Some(i) {
                theme.cursor
            } else {
                theme.text
            };
            Line::from(vec![
                Span::styled(mark, mark_style),
                Span::styled(option.clone(), text_style),
            ])
        })
        .collect()
}

// ── Render ────────────────────────────────────────────────────────────────────

/// Render the whole dashboard for the session's current report.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    session: &DashboardSession<'_>,
    sidebar: &SidebarState,
    theme: &Theme,
) {
    let [side, main] = Layout::horizontal([
        Constraint::Length(SIDEBAR_WIDTH),
        Constraint::Min(40),
    ])
    .areas(area);

    render_sidebar(frame, side, session, sidebar, theme);
    render_report(frame, main, session.report(), session.store().options(), theme);
}

fn render_sidebar(
    frame: &mut Frame,
    area: Rect,
    session: &DashboardSession<'_>,
    sidebar: &SidebarState,
    theme: &Theme,
) {
    let [branches, months, help] = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Min(5),
        Constraint::Length(7),
    ])
    .areas(area);

    for (dimension, title, list_area) in [
        (FilterDimension::Branch, " Branch ", branches),
        (FilterDimension::Month, " Month ", months),
    ] {
        let focused = sidebar.focus == dimension;
        let height = list_area.height.saturating_sub(2) as usize;
        let lines = filter_list_lines(
            session.options(dimension),
            |value| session.is_selected(dimension, value),
            focused.then(|| sidebar.cursor(dimension)),
            height,
            theme,
        );
        let panel = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(focused))
                .title(Span::styled(title, theme.panel_title)),
        );
        frame.render_widget(panel, list_area);
    }

    let keys = [
        ("Tab", "switch list"),
        ("↑/↓", "move"),
        ("Space", "toggle"),
        ("a / n", "all / none"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = keys
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{:<6}", key), theme.bold),
                Span::styled(*action, theme.dim),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border),
        ),
        help,
    );
}

/// Render the report panels into `area`.
pub fn render_report(
    frame: &mut Frame,
    area: Rect,
    report: &DashboardReport,
    options: &FilterOptions,
    theme: &Theme,
) {
    let [header, kpis, body] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let header_lines = Header::new(&report.filter, options, theme).to_lines();
    frame.render_widget(Paragraph::new(Text::from(header_lines)), header);
    KpiCards::new(&report.kpis, theme).render(frame, kpis);

    if report.is_empty() {
        table_view::render_no_data(frame, body, theme);
        return;
    }

    let [row_a, row_b, row_c, row_d] = Layout::vertical([
        Constraint::Percentage(28),
        Constraint::Percentage(24),
        Constraint::Percentage(24),
        Constraint::Percentage(24),
    ])
    .areas(body);
    let halves = |row: Rect| -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(row)
    };

    // Sales trend | channel share
    let [trend, share] = halves(row_a);
    HorizontalBarChart::new(
        "Sales Trend",
        report
            .sales_trend
            .iter()
            .map(|r| (r.month_label.clone(), r.total_revenue))
            .collect(),
        format_compact,
        theme,
    )
    .render(frame, trend);
    render_channel_share(frame, share, report, theme);

    // Top products | top spenders
    let [products, spenders] = halves(row_b);
    let products_title = format!("Top {} Best Seller Products", report.metadata.top_n);
    HorizontalBarChart::new(&products_title, ranking(&report.top_products), format_compact, theme)
        .render(frame, products);
    HorizontalBarChart::new("Highest Spenders", ranking(&report.top_spenders), format_compact, theme)
        .with_bar_style(theme.channel_apps)
        .render(frame, spenders);

    // Branch performance | customer segmentation
    let [branches, segments] = halves(row_c);
    HorizontalBarChart::new(
        "Branch Performance",
        report
            .branch_performance
            .iter()
            .map(|r| (r.branch.clone(), r.share))
            .collect(),
        format_share,
        theme,
    )
    .render(frame, branches);
    HorizontalBarChart::new(
        "Customer Segmentation",
        report
            .customer_segments
            .iter()
            .map(|r| (r.segment.clone(), r.total_customers as f64))
            .collect(),
        |v| format_count(v as usize),
        theme,
    )
    .with_bar_style(theme.channel_erp)
    .render(frame, segments);

    table_view::render_branch_summary(frame, row_d, &report.branch_summary, theme);
}

fn ranking(rows: &[dashboard_data::aggregator::RankingRow]) -> Vec<(String, f64)> {
    rows.iter().map(|r| (r.name.clone(), r.value)).collect()
}

fn render_channel_share(frame: &mut Frame, area: Rect, report: &DashboardReport, theme: &Theme) {
    let months = group_by_month(&report.channel_share);
    let label_width = months
        .iter()
        .map(|m| m.month_label.width())
        .max()
        .unwrap_or(0);
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = months
        .iter()
        .map(|m| ChannelShareBar::new(m, label_width, theme).to_line(inner_width))
        .collect();
    lines.push(Line::from(""));
    lines.push(legend_line(&months, theme));

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border)
                .title(Span::styled(
                    " Monthly Revenue Share by Sales Channel ",
                    theme.panel_title,
                )),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Branch summary table for the dashboard TUI.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one numbered row per
//! branch plus a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dashboard_core::formatting::{format_count, format_number};
use dashboard_data::aggregator::BranchSummaryRow;

use crate::themes::Theme;

/// Totals across every branch row.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchTotals {
    pub total_revenue: f64,
    pub total_transactions: usize,
    pub branches: usize,
}

impl BranchTotals {
    pub fn from_rows(rows: &[BranchSummaryRow]) -> Self {
        Self {
            total_revenue: rows.iter().map(|r| r.total_revenue).sum(),
            total_transactions: rows.iter().map(|r| r.total_transactions).sum(),
            branches: rows.len(),
        }
    }

    /// Revenue per transaction over all branches, `0.0` with no transactions.
    pub fn average_transaction_value(&self) -> f64 {
        if self.total_transactions == 0 {
            0.0
        } else {
            self.total_revenue / self.total_transactions as f64
        }
    }
}

/// Render the branch summary table into `area`.
pub fn render_branch_summary(
    frame: &mut Frame,
    area: Rect,
    rows: &[BranchSummaryRow],
    theme: &Theme,
) {
    let header_cells = [
        "No",
        "Branch",
        "Total Revenue",
        "Transactions",
        "Customers",
        "Avg Transaction",
    ]
    .iter()
    .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.no.to_string()),
                Cell::from(row.branch.clone()),
                Cell::from(format_number(row.total_revenue, 0)),
                Cell::from(format_count(row.total_transactions)),
                Cell::from(format_count(row.total_customers)),
                Cell::from(format_number(row.average_transaction_value, 0)),
            ])
            .style(style)
        })
        .collect();

    let totals = BranchTotals::from_rows(rows);
    let total_row = Row::new(vec![
        Cell::from(""),
        Cell::from(format!("TOTAL ({} branches)", totals.branches)),
        Cell::from(format_number(totals.total_revenue, 0)),
        Cell::from(format_count(totals.total_transactions)),
        Cell::from("-"),
        Cell::from(format_number(totals.average_transaction_value(), 0)),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(13),
        Constraint::Length(10),
        Constraint::Length(16),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border)
                .title(Span::styled(" Branch Summary ", theme.panel_title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a placeholder when the selection matches no sales.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No sales match the current selection", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Tick at least one branch and one month in the filter panel.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border)
                .title(" Sales Dashboard "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

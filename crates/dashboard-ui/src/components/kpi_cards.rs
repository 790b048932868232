use dashboard_core::formatting::{format_count, format_number};
use dashboard_data::aggregator::KpiSummary;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::themes::Theme;

/// Row of four headline figures: revenue, customers, products and volume.
pub struct KpiCards<'a> {
    pub kpis: &'a KpiSummary,
    pub theme: &'a Theme,
}

impl<'a> KpiCards<'a> {
    pub fn new(kpis: &'a KpiSummary, theme: &'a Theme) -> Self {
        Self { kpis, theme }
    }

    /// `(title, formatted value)` pairs in display order.
    ///
    /// Revenue and volume are whole numbers with thousands separators.
    pub fn cards(&self) -> [(&'static str, String); 4] {
        [
            ("Total Revenue", format_number(self.kpis.total_revenue, 0)),
            ("Total Customers", format_count(self.kpis.total_customers)),
            ("Unique Products", format_count(self.kpis.unique_products)),
            ("Sales Volume", format_number(self.kpis.sales_volume, 0)),
        ]
    }

    /// Draw the cards side by side, each in its own bordered box.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

        for ((title, value), column) in self.cards().into_iter().zip(columns.iter()) {
            let card = Paragraph::new(Line::from(Span::styled(value, self.theme.kpi_value)))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(self.theme.panel_border)
                        .title(Span::styled(format!(" {} ", title), self.theme.kpi_title)),
                );
            frame.render_widget(card, *column);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn kpis() -> KpiSummary {
        KpiSummary {
            total_revenue: 1_234_567.89,
            total_customers: 1520,
            unique_products: 87,
            sales_volume: 40_210.0,
        }
    }

    #[test]
    fn test_cards_format_values() {
        let theme = Theme::dark();
        let k = kpis();
        let cards = KpiCards::new(&k, &theme).cards();

        assert_eq!(cards[0], ("Total Revenue", "1,234,568".to_string()));
        assert_eq!(cards[1], ("Total Customers", "1,520".to_string()));
        assert_eq!(cards[2], ("Unique Products", "87".to_string()));
        assert_eq!(cards[3], ("Sales Volume", "40,210".to_string()));
    }

    #[test]
    fn test_cards_zero_kpis() {
        let theme = Theme::dark();
        let k = KpiSummary::default();
        let cards = KpiCards::new(&k, &theme).cards();
        assert!(cards.iter().all(|(_, v)| v == "0"));
    }

    #[test]
    fn test_render_does_not_panic() {
        let backend = TestBackend::new(100, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::classic();
        let k = kpis();

        terminal
            .draw(|frame| {
                let area = frame.area();
                KpiCards::new(&k, &theme).render(frame, area);
            })
            .unwrap();
    }
}

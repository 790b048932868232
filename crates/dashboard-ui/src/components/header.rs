use crate::themes::Theme;
use dashboard_core::filter::FilterSelection;
use dashboard_data::analysis::FilterOptions;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the dashboard title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Dashboard title shown in every view.
pub const TITLE: &str = "Customer and Sales Performance Analysis";

/// Describe how much of a slicer is ticked: `"All"`, `"None"` or `"2 of 5"`.
pub fn selection_summary(selected: usize, total: usize) -> String {
    if selected == 0 {
        "None".to_string()
    } else if selected >= total {
        "All".to_string()
    } else {
        format!("{} of {}", selected, total)
    }
}

/// Dashboard header rendering four lines:
///
/// 1. Title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. Filter summary in `[ Branches: All | Months: 2 of 12 ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    pub filter: &'a FilterSelection,
    pub options: &'a FilterOptions,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(filter: &'a FilterSelection, options: &'a FilterOptions, theme: &'a Theme) -> Self {
        Self {
            filter,
            options,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let branches = selection_summary(self.filter.branches.len(), self.options.branches.len());
        let months = selection_summary(self.filter.months.len(), self.options.months.len());

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(format!(" {} ", TITLE), self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ Branches: ", self.theme.label),
                Span::styled(branches, self.theme.value),
                Span::styled(" | Months: ", self.theme.label),
                Span::styled(months, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

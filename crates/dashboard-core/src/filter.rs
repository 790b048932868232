//! Branch and month filter selection.
//!
//! Mirrors the two multi-select slicers of the dashboard. Both sets are
//! explicit: an empty set selects nothing, it does not mean "everything".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Selected branches and month labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Branch names to keep.
    pub branches: BTreeSet<String>,
    /// Normalized month labels to keep (e.g. `"January"`, `"(blank)"`).
    pub months: BTreeSet<String>,
}

impl FilterSelection {
    /// Build a selection from any iterables of names.
    pub fn new<B, M>(branches: B, months: M) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            branches: branches.into_iter().map(Into::into).collect(),
            months: months.into_iter().map(Into::into).collect(),
        }
    }

    /// `true` when a record with this branch and normalized month label passes.
    pub fn matches(&self, branch: &str, month_label: &str) -> bool {
        self.branches.contains(branch) && self.months.contains(month_label)
    }

    /// Add `branch` when absent, remove it otherwise. Returns the new state.
    pub fn toggle_branch(&mut self, branch: &str) -> bool {
        toggle(&mut self.branches, branch)
    }

    /// Add `month` when absent, remove it otherwise. Returns the new state.
    pub fn toggle_month(&mut self, month: &str) -> bool {
        toggle(&mut self.months, month)
    }

    /// `true` when either dimension has nothing selected.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() || self.months.is_empty()
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_requires_both_dimensions() {
        let f = FilterSelection::new(["Jakarta"], ["January"]);
        assert!(f.matches("Jakarta", "January"));
        assert!(!f.matches("Bandung", "January"));
        assert!(!f.matches("Jakarta", "February"));
    }

    #[test]
    fn test_empty_selection_matches_nothing() {
        let f = FilterSelection::default();
        assert!(f.is_empty());
        assert!(!f.matches("Jakarta", "January"));
    }

    #[test]
    fn test_toggle_branch() {
        let mut f = FilterSelection::new(["Jakarta"], ["January"]);
        assert!(!f.toggle_branch("Jakarta"));
        assert!(f.branches.is_empty());
        assert!(f.toggle_branch("Jakarta"));
        assert!(f.branches.contains("Jakarta"));
    }

    #[test]
    fn test_toggle_month_blank_label() {
        let mut f = FilterSelection::default();
        assert!(f.toggle_month("(blank)"));
        assert!(f.months.contains("(blank)"));
    }
}

//! Tab host abstraction.
//!
//! The UI tab widget is an external collaborator. [`TabHost`] is the narrow
//! surface the session subsystem needs from it, and [`TabStrip`] is an
//! in-memory implementation used by the command line and by tests.

use crate::panel::Panel;

/// The part of a tab widget the session subsystem drives
pub trait TabHost {
    /// Number of open tabs
    fn tab_count(&self) -> usize;

    /// Copies of the open panels in left-to-right order
    fn snapshot(&self) -> Vec<Panel>;

    /// Index of the focused tab, if any
    fn current_index(&self) -> Option<usize>;

    /// Append a tab and return its index
    fn add_tab(&mut self, panel: Panel) -> usize;

    /// Focus the tab at `index`; out-of-range indices are ignored
    fn set_current_index(&mut self, index: usize);
}

/// Ordered list of open panels with a focused tab
#[derive(Debug, Clone, Default)]
pub struct TabStrip {
    tabs: Vec<Panel>,
    current: Option<usize>,
}

impl TabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.tabs
    }

    pub fn panel(&self, index: usize) -> Option<&Panel> {
        self.tabs.get(index)
    }

    pub fn panel_mut(&mut self, index: usize) -> Option<&mut Panel> {
        self.tabs.get_mut(index)
    }

    pub fn current_panel(&self) -> Option<&Panel> {
        self.current.and_then(|index| self.tabs.get(index))
    }

    pub fn current_panel_mut(&mut self) -> Option<&mut Panel> {
        self.current.and_then(|index| self.tabs.get_mut(index))
    }

    /// Title of the tab at `index`
    pub fn tab_text(&self, index: usize) -> Option<&str> {
        self.tabs.get(index).map(Panel::title)
    }

    /// Titles in tab order
    pub fn titles(&self) -> Vec<String> {
        self.tabs.iter().map(|panel| panel.title().to_string()).collect()
    }

    /// Close the tab at `index`, keeping focus on a neighbour
    pub fn remove_tab(&mut self, index: usize) -> Option<Panel> {
        if index >= self.tabs.len() {
            return None;
        }
        let removed = self.tabs.remove(index);

        self.current = match self.current {
            _ if self.tabs.is_empty() => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) if current >= self.tabs.len() => Some(self.tabs.len() - 1),
            other => other,
        };
        Some(removed)
    }

    /// Close every tab
    pub fn clear(&mut self) {
        self.tabs.clear();
        self.current = None;
    }
}

impl TabHost for TabStrip {
    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn snapshot(&self) -> Vec<Panel> {
        self.tabs.clone()
    }

    fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// New tabs take focus, as they do when a file is opened
    fn add_tab(&mut self, panel: Panel) -> usize {
        self.tabs.push(panel);
        let index = self.tabs.len() - 1;
        self.current = Some(index);
        index
    }

    fn set_current_index(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.current = Some(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::panel::GraphPanel;

    fn strip(titles: &[&str]) -> TabStrip {
        let mut strip = TabStrip::new();
        for title in titles {
            strip.add_tab(GraphPanel::new(*title, Graph::new()).into());
        }
        strip
    }

    #[test]
    fn test_add_tab_focuses_new_tab() {
        let strip = strip(&["A", "B"]);
        assert_eq!(strip.tab_count(), 2);
        assert_eq!(strip.current_index(), Some(1));
        assert_eq!(strip.titles(), vec!["A", "B"]);
    }

    #[test]
    fn test_remove_tab_adjusts_focus() {
        let mut strip = strip(&["A", "B", "C"]);
        strip.set_current_index(2);

        strip.remove_tab(0);
        assert_eq!(strip.current_index(), Some(1));
        assert_eq!(strip.tab_text(1), Some("C"));

        strip.remove_tab(1);
        assert_eq!(strip.current_index(), Some(0));

        strip.remove_tab(0);
        assert_eq!(strip.current_index(), None);
        assert!(strip.remove_tab(0).is_none());
    }

    #[test]
    fn test_set_current_ignores_out_of_range() {
        let mut strip = strip(&["A"]);
        strip.set_current_index(5);
        assert_eq!(strip.current_index(), Some(0));

        strip.clear();
        assert!(strip.is_empty());
        assert_eq!(strip.current_index(), None);
    }
}

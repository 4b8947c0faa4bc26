//! Optional server-side tools the user can enable per question.

use ratatui::layout::{Position, Rect};

/// A tool the answering service understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Name sent in the request's `tools` list.
    pub name: String,
    pub label: String,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }

    /// Known tool with a friendly label; unknown names are shown as-is.
    pub fn from_name(name: &str) -> Self {
        let label = match name {
            "search" => "Web Search",
            other => other,
        };
        Self::new(name, label)
    }
}

/// Enabled tool names in the order they were switched on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolSelection {
    enabled: Vec<String>,
}

impl ToolSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for name in names {
            selection.insert(name);
        }
        selection
    }

    /// Returns false when the tool was already enabled.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.enabled.push(name);
        true
    }

    /// Returns false when the tool was not enabled.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.enabled.len();
        self.enabled.retain(|tool| tool != name);
        self.enabled.len() != before
    }

    /// Flip membership; returns whether the tool is enabled afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.remove(name) {
            false
        } else {
            self.insert(name)
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.enabled.iter().any(|tool| tool == name)
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn names(&self) -> &[String] {
        &self.enabled
    }

    /// Names to attach to the next request.
    pub fn to_request(&self) -> Vec<String> {
        self.enabled.clone()
    }
}

/// Open/closed state of the tools dropdown and its highlighted row.
#[derive(Debug, Clone, Default)]
pub struct ToolsDropdown {
    open: bool,
    selected: usize,
    /// Screen area of the dropdown as last rendered.
    area: Option<Rect>,
}

impl ToolsDropdown {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        if !self.open {
            self.area = None;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.area = None;
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_previous(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = Some(area);
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    /// Close the dropdown when a click lands outside it.
    ///
    /// Returns true when the click was inside and should be handled by the
    /// dropdown itself.
    pub fn handle_click(&mut self, column: u16, row: u16) -> bool {
        if !self.open {
            return false;
        }
        match self.area {
            Some(area) if area.contains(Position::new(column, row)) => true,
            _ => {
                self.close();
                false
            }
        }
    }

    /// Row index under a click inside the dropdown, accounting for the border.
    pub fn row_at(&self, row: u16) -> Option<usize> {
        let area = self.area?;
        let first = area.y.checked_add(1)?;
        let last = area.y + area.height.saturating_sub(1);
        if row < first || row >= last {
            return None;
        }
        Some(usize::from(row - first))
    }
}

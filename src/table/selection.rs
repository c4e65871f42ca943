//! Row selection owned by a table, independent of which page is shown.

use std::collections::BTreeSet;

use serde::Serialize;

/// State of the "select all" checkbox for the visible page.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HeaderState {
    Unchecked,
    Indeterminate,
    Checked,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids
                .into_iter()
                .map(Into::into)
                .filter(|id: &String| !id.is_empty())
                .collect(),
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Header checkbox behaviour: when every row of the page is selected the
    /// page is deselected, otherwise the whole page becomes selected. Rows on
    /// other pages are left untouched.
    pub fn toggle_all(&mut self, page_ids: &[&str]) {
        if self.header_state(page_ids) == HeaderState::Checked {
            for id in page_ids {
                self.ids.remove(*id);
            }
        } else {
            self.ids.extend(page_ids.iter().map(|id| id.to_string()));
        }
    }

    pub fn header_state(&self, page_ids: &[&str]) -> HeaderState {
        let selected = page_ids.iter().filter(|id| self.is_selected(id)).count();
        if selected == 0 {
            HeaderState::Unchecked
        } else if selected == page_ids.len() {
            HeaderState::Checked
        } else {
            HeaderState::Indeterminate
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

//! Selection stage.
//!
//! Selection is keyed by row identity, never by position, so it survives
//! paging, re-sorting and filtering.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// How many rows may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Selection requests are ignored.
    None,
    /// At most one row (radio-button style).
    Single,
    /// Any number of rows (checkbox style).
    #[default]
    Multi,
}

/// Derived state of a "select all" checkbox over the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectAllState {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Tracks selected rows by their keys.
#[derive(Debug, Clone)]
pub struct Selection<K: Clone + Eq + Hash> {
    mode: SelectionMode,
    selected: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl<K: Clone + Eq + Hash> Selection<K> {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: HashSet::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Change the mode, trimming the current set to what the new mode allows.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        match mode {
            SelectionMode::None => self.selected.clear(),
            SelectionMode::Single if self.selected.len() > 1 => {
                let keep = self.selected.iter().next().cloned();
                self.selected.clear();
                self.selected.extend(keep);
            }
            _ => {}
        }
    }

    /// Flip membership of `key`. Returns true if selection changed.
    pub fn toggle(&mut self, key: K) -> bool {
        match self.mode {
            SelectionMode::None => false,
            SelectionMode::Single => {
                if self.selected.contains(&key) {
                    self.selected.clear();
                } else {
                    self.selected.clear();
                    self.selected.insert(key);
                }
                true
            }
            SelectionMode::Multi => {
                if !self.selected.remove(&key) {
                    self.selected.insert(key);
                }
                true
            }
        }
    }

    /// Add every key. Only meaningful in multi mode; returns how many were newly added.
    pub fn select_all(&mut self, keys: impl IntoIterator<Item = K>) -> usize {
        if self.mode != SelectionMode::Multi {
            return 0;
        }
        keys.into_iter().filter(|k| self.selected.insert(k.clone())).count()
    }

    /// Replace the whole set. Single mode keeps the first key only.
    pub fn replace(&mut self, keys: impl IntoIterator<Item = K>) {
        self.selected.clear();
        match self.mode {
            SelectionMode::None => {}
            SelectionMode::Single => self.selected.extend(keys.into_iter().take(1)),
            SelectionMode::Multi => self.selected.extend(keys),
        }
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.selected.iter()
    }

    /// Derive the select-all checkbox state for the given visible keys.
    ///
    /// An empty page reads as unchecked.
    pub fn state_for<'k>(&self, visible: impl IntoIterator<Item = &'k K>) -> SelectAllState
    where
        K: 'k,
    {
        let (mut total, mut hits) = (0usize, 0usize);
        for key in visible {
            total += 1;
            if self.selected.contains(key) {
                hits += 1;
            }
        }
        match hits {
            0 => SelectAllState::Unchecked,
            n if n == total => SelectAllState::Checked,
            _ => SelectAllState::Indeterminate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_mode_keeps_one() {
        let mut sel = Selection::new(SelectionMode::Single);
        sel.toggle(1);
        sel.toggle(2);
        assert_eq!(sel.len(), 1);
        assert!(sel.is_selected(&2));
        assert_eq!(sel.select_all([3, 4]), 0);
    }

    #[test]
    fn test_none_mode_ignores_requests() {
        let mut sel = Selection::new(SelectionMode::None);
        assert!(!sel.toggle("a"));
        sel.replace(["a", "b"]);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_state_for_visible_keys() {
        let mut sel = Selection::default();
        assert_eq!(sel.state_for(&[1, 2]), SelectAllState::Unchecked);
        sel.toggle(1);
        assert_eq!(sel.state_for(&[1, 2]), SelectAllState::Indeterminate);
        sel.toggle(2);
        assert_eq!(sel.state_for(&[1, 2]), SelectAllState::Checked);
        assert_eq!(sel.state_for(&[] as &[i32]), SelectAllState::Unchecked);
    }

    #[test]
    fn test_downgrade_to_single_trims() {
        let mut sel = Selection::default();
        sel.replace([1, 2, 3]);
        sel.set_mode(SelectionMode::Single);
        assert_eq!(sel.len(), 1);
    }
}

//! User-controlled view parameters for one table.

use std::collections::BTreeSet;

use crate::config::TableConfig;
use crate::model::RowKey;

use super::{FilterMode, Selection, SortDirection};

/// Filter, sort, page and selection state of a table.
///
/// Created once per table and mutated in place by [`Table`](crate::Table)'s
/// operations, which keep `current_page` clamped.
#[derive(Debug, Clone)]
pub struct ViewState<K: RowKey> {
    pub filter_text: String,
    /// Column keys the filter looks at. Empty means every column.
    pub filter_columns: BTreeSet<String>,
    pub filter_mode: FilterMode,
    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,
    /// 1-based.
    pub current_page: usize,
    pub page_size: usize,
    pub selection: Selection<K>,
}

impl<K: RowKey> ViewState<K> {
    /// Fresh state seeded from a config.
    pub fn new(config: &TableConfig) -> Self {
        Self {
            filter_text: String::new(),
            filter_columns: BTreeSet::new(),
            filter_mode: config.filter_mode,
            sort_column: None,
            sort_direction: SortDirection::None,
            current_page: 1,
            page_size: config.page_size.max(1),
            selection: Selection::new(config.selection_mode),
        }
    }

    /// The active sort column, if sorting is not neutral.
    pub fn active_sort(&self) -> Option<&str> {
        self.sort_column
            .as_deref()
            .filter(|_| self.sort_direction.is_active())
    }
}

impl<K: RowKey> Default for ViewState<K> {
    fn default() -> Self {
        Self::new(&TableConfig::default())
    }
}

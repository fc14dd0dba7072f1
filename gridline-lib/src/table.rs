//! Table orchestration: owns the dataset and view state and reruns the
//! pipeline after every change.

use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use serde::Serialize;

use crate::config::TableConfig;
use crate::error::ExportError;
use crate::export::{ExportFormat, Exporter};
use crate::model::{Column, KeyFn, Row, RowKey};
use crate::pipeline::{
    FilterMode, PageMeta, SelectAllState, SortDirection, ViewState, filter, paginate, sort,
};

// =============================================================================
// Render output
// =============================================================================

/// Why a render produced no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The dataset itself is empty.
    NoData,
    /// Rows exist but none pass the current filter.
    NoMatches,
}

/// Selection summary for the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionMeta {
    /// Select-all checkbox state over the visible rows.
    pub state: SelectAllState,
    /// Keys selected anywhere in the dataset (including filtered-out rows).
    pub selected_count: usize,
    /// Selected rows on the visible page.
    pub visible_selected: usize,
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct RenderOutput<K: RowKey> {
    /// Rows to draw, in display order.
    pub visible_rows: Vec<Row>,
    /// Keys of `visible_rows`, index-aligned.
    pub visible_keys: Vec<K>,
    pub page: PageMeta,
    pub selection: SelectionMeta,
    /// Set when there is nothing to draw.
    pub empty: Option<EmptyReason>,
}

impl<K: RowKey> RenderOutput<K> {
    pub fn is_empty(&self) -> bool {
        self.empty.is_some()
    }
}

/// Run filter → sort → paginate → selection summary.
///
/// Pure: the same inputs always give the same output, and `data` is only read.
pub fn render<K: RowKey>(
    data: &[Row],
    state: &ViewState<K>,
    columns: &[Column],
    key_fn: &KeyFn<K>,
) -> RenderOutput<K> {
    let filtered = filter(
        data,
        &state.filter_text,
        &state.filter_columns,
        columns,
        state.filter_mode,
    );
    let sorted = sort(
        &filtered,
        state.sort_column.as_deref(),
        state.sort_direction,
        columns,
    );
    let (page_rows, page) = paginate(&sorted, state.current_page, state.page_size);

    let visible_keys: Vec<K> = page_rows.iter().map(|&row| key_fn(row)).collect();
    let visible_selected = visible_keys
        .iter()
        .filter(|k| state.selection.is_selected(k))
        .count();
    let selection = SelectionMeta {
        state: state.selection.state_for(&visible_keys),
        selected_count: state.selection.len(),
        visible_selected,
    };

    let empty = match (data.is_empty(), sorted.is_empty()) {
        (true, _) => Some(EmptyReason::NoData),
        (false, true) => Some(EmptyReason::NoMatches),
        _ => None,
    };

    RenderOutput {
        visible_rows: page_rows.iter().map(|&row| row.clone()).collect(),
        visible_keys,
        page,
        selection,
        empty,
    }
}

// =============================================================================
// Listeners
// =============================================================================

/// Callback invoked with every new render output.
pub type RenderListener<K> = Arc<dyn Fn(&RenderOutput<K>) + Send + Sync>;

/// A render output together with the listeners still owed it.
pub(crate) type PendingRender<K> = (RenderOutput<K>, Vec<RenderListener<K>>);

/// Handle for removing a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// =============================================================================
// Table
// =============================================================================

/// A table's data pipeline.
///
/// Holds the dataset (read-only, shared through `Arc`), column definitions,
/// the row key extractor and the [`ViewState`]. Every operation updates the
/// view state, reruns the pipeline and notifies render listeners.
///
/// # Example
///
/// ```
/// use gridline_lib::Table;
/// use gridline_lib::model::{Column, Row, key_by_column};
///
/// let columns = vec![Column::new("id", "ID"), Column::new("name", "Name").sortable()];
/// let rows: Vec<Row> = (1..=12)
///     .map(|i| Row::new().set("id", i).set("name", format!("user {i}")))
///     .collect();
///
/// let mut table = Table::new(columns, key_by_column("id")).with_data(rows);
/// assert_eq!(table.total_pages(), 2);
///
/// table.next_page();
/// assert_eq!(table.output().visible_rows.len(), 2);
/// ```
pub struct Table<K: RowKey> {
    columns: Vec<Column>,
    data: Arc<[Row]>,
    key_fn: KeyFn<K>,
    state: ViewState<K>,
    config: TableConfig,
    output: RenderOutput<K>,
    listeners: Vec<(ListenerId, RenderListener<K>)>,
    /// `Some(rendered)` while listener calls are held back.
    deferred: Option<bool>,
    next_listener_id: u64,
}

impl<K: RowKey> Table<K> {
    /// Create an empty table with default config.
    pub fn new(columns: Vec<Column>, key_fn: KeyFn<K>) -> Self {
        Self::with_config(columns, key_fn, TableConfig::default())
    }

    /// Create an empty table seeded from `config`.
    pub fn with_config(columns: Vec<Column>, key_fn: KeyFn<K>, config: TableConfig) -> Self {
        let state = ViewState::new(&config);
        let data: Arc<[Row]> = Arc::from(Vec::new());
        let output = render(&data, &state, &columns, &key_fn);
        Self {
            columns,
            data,
            key_fn,
            state,
            config,
            output,
            listeners: Vec::new(),
            deferred: None,
            next_listener_id: 0,
        }
    }

    /// Builder form of [`set_data`](Self::set_data).
    pub fn with_data(mut self, rows: impl Into<Arc<[Row]>>) -> Self {
        self.set_data(rows);
        self
    }

    /// Rerun the pipeline, clamp the page and notify listeners.
    fn refresh(&mut self) {
        let output = render(&self.data, &self.state, &self.columns, &self.key_fn);
        self.state.current_page = output.page.current_page;
        log::debug!(
            "table render: {} rows, page {}/{}, {} selected",
            output.page.total_items,
            output.page.current_page,
            output.page.total_pages,
            output.selection.selected_count,
        );
        self.output = output;
        match &mut self.deferred {
            Some(rendered) => *rendered = true,
            None => {
                for (_, listener) in &self.listeners {
                    listener(&self.output);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Replace the dataset. Clears the selection.
    pub fn set_data(&mut self, rows: impl Into<Arc<[Row]>>) {
        self.data = rows.into();
        self.state.selection.clear();
        self.refresh();
    }

    /// Replace the column definitions.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.refresh();
    }

    pub fn data(&self) -> &Arc<[Row]> {
        &self.data
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn state(&self) -> &ViewState<K> {
        &self.state
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Latest render output.
    pub fn output(&self) -> &RenderOutput<K> {
        &self.output
    }

    /// Key of `row` under this table's key extractor.
    pub fn key_of(&self, row: &Row) -> K {
        (self.key_fn)(row)
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Set the filter text. A changed filter returns to page 1.
    ///
    /// Matching ignores surrounding whitespace, so text that only differs
    /// there is stored but neither resets the page nor re-renders.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        let text = text.into();
        let unchanged = text.trim() == self.state.filter_text.trim();
        self.state.filter_text = text;
        if unchanged {
            return;
        }
        self.state.current_page = 1;
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(String::new());
    }

    /// Restrict the filter to these column keys (empty means all columns).
    pub fn set_filter_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: BTreeSet<String> = columns.into_iter().map(Into::into).collect();
        if columns == self.state.filter_columns {
            return;
        }
        self.state.filter_columns = columns;
        self.state.current_page = 1;
        self.refresh();
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        if mode == self.state.filter_mode {
            return;
        }
        self.state.filter_mode = mode;
        self.state.current_page = 1;
        self.refresh();
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Set sort column and direction directly.
    ///
    /// A column that is not defined sorts as neutral order.
    pub fn set_sort(&mut self, column: impl Into<String>, direction: SortDirection) {
        if direction.is_active() {
            self.state.sort_column = Some(column.into());
        } else {
            self.state.sort_column = None;
        }
        self.state.sort_direction = direction;
        self.refresh();
    }

    pub fn clear_sort(&mut self) {
        self.state.sort_column = None;
        self.state.sort_direction = SortDirection::None;
        self.refresh();
    }

    /// Header activation: cycle the sort on `column`.
    ///
    /// Repeated activation of the same column goes none → ascending →
    /// descending → none. Activating another column starts it at ascending.
    /// Returns the new direction, or `None` if the column is missing or not
    /// sortable.
    pub fn sort(&mut self, column: &str) -> Option<SortDirection> {
        if !self.columns.iter().any(|c| c.key == column && c.sortable) {
            log::warn!("ignoring sort on non-sortable column {:?}", column);
            return None;
        }

        let direction = if self.state.sort_column.as_deref() == Some(column) {
            self.state.sort_direction.next()
        } else {
            SortDirection::Ascending
        };
        self.set_sort(column, direction);
        Some(direction)
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub fn current_page(&self) -> usize {
        self.output.page.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.output.page.total_pages
    }

    /// Jump to page `n`, clamped into range.
    pub fn set_page(&mut self, n: usize) {
        self.state.current_page = n;
        self.refresh();
    }

    /// Advance one page. Returns false at the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.output.page.has_next() {
            return false;
        }
        self.set_page(self.current_page() + 1);
        true
    }

    /// Go back one page. Returns false at the first page.
    pub fn prev_page(&mut self) -> bool {
        if !self.output.page.has_prev() {
            return false;
        }
        self.set_page(self.current_page() - 1);
        true
    }

    /// Change rows per page (minimum 1) and return to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.page_size = page_size.max(1);
        self.state.current_page = 1;
        self.refresh();
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Replace the selection with `keys`.
    pub fn set_selection(&mut self, keys: impl IntoIterator<Item = K>) {
        self.state.selection.replace(keys);
        self.refresh();
    }

    /// Flip the selection of `row`. Returns true if selection changed.
    pub fn toggle_select(&mut self, row: &Row) -> bool {
        let key = self.key_of(row);
        self.toggle_key(key)
    }

    /// Flip the selection of a key.
    pub fn toggle_key(&mut self, key: K) -> bool {
        let changed = self.state.selection.toggle(key);
        if changed {
            self.refresh();
        }
        changed
    }

    /// Add every row on the current page. Rows on other pages or hidden by the
    /// filter are untouched. Returns how many keys were newly selected.
    pub fn select_all_visible(&mut self) -> usize {
        let keys = self.output.visible_keys.clone();
        let added = self.state.selection.select_all(keys);
        if added > 0 {
            self.refresh();
        }
        added
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
        self.refresh();
    }

    /// Select-all checkbox state over the current page.
    pub fn select_all_state(&self) -> SelectAllState {
        self.output.selection.state
    }

    /// Selected keys, in no particular order.
    pub fn selected_keys(&self) -> Vec<K> {
        self.state.selection.keys().cloned().collect()
    }

    /// Selected rows, resolved against the dataset in dataset order.
    ///
    /// Keys with no matching row are skipped.
    pub fn selected_rows(&self) -> Vec<&Row> {
        if self.state.selection.is_empty() {
            return Vec::new();
        }
        self.data
            .iter()
            .filter(|&row| self.state.selection.is_selected(&(self.key_fn)(row)))
            .collect()
    }

    pub fn selection_count(&self) -> usize {
        self.state.selection.len()
    }

    pub fn is_selected(&self, row: &Row) -> bool {
        self.state.selection.is_selected(&self.key_of(row))
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Register a callback run after every render.
    ///
    /// On a table behind a [`SharedTable`](crate::SharedTable), listeners run
    /// after the write lock is released, so they may read the shared table.
    pub fn on_render<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&RenderOutput<K>) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Hold back listener calls until [`take_deferred`](Self::take_deferred).
    pub(crate) fn defer_notify(&mut self) {
        self.deferred = Some(false);
    }

    /// Stop holding back listener calls. Returns the latest output and the
    /// listeners to call with it, if anything rendered meanwhile.
    pub(crate) fn take_deferred(&mut self) -> Option<PendingRender<K>> {
        match self.deferred.take() {
            Some(true) => Some((
                self.output.clone(),
                self.listeners.iter().map(|(_, l)| Arc::clone(l)).collect(),
            )),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// All rows passing the filter, in sorted order, before pagination.
    pub fn filtered_rows(&self) -> Vec<&Row> {
        let filtered = filter(
            self.data.iter(),
            &self.state.filter_text,
            &self.state.filter_columns,
            &self.columns,
            self.state.filter_mode,
        );
        sort(
            &filtered,
            self.state.sort_column.as_deref(),
            self.state.sort_direction,
            &self.columns,
        )
    }

    /// Rows an export covers: the selection if non-empty (in current sort
    /// order), else every filtered row.
    pub fn export_rows(&self) -> Vec<&Row> {
        if self.state.selection.is_empty() {
            return self.filtered_rows();
        }
        sort(
            &self.selected_rows(),
            self.state.sort_column.as_deref(),
            self.state.sort_direction,
            &self.columns,
        )
    }

    /// Write the export scope in `format` to `writer`.
    pub fn export_to<W: Write>(&self, format: ExportFormat, writer: W) -> Result<(), ExportError> {
        let rows = self.export_rows();
        log::debug!("exporting {} rows as {:?}", rows.len(), format);
        Exporter::new(&self.columns)
            .rows_per_page(self.config.print_rows_per_page)
            .write(format, &rows, writer)
    }

    /// Export the export scope in `format` to a string.
    pub fn export(&self, format: ExportFormat) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        self.export_to(format, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

impl<K: RowKey> fmt::Debug for Table<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("rows", &self.data.len())
            .field("state", &self.state)
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

//! Tests for the table orchestrator: view-state transitions, selection
//! persistence and listener notification.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gridline_lib::config::TableConfig;
use gridline_lib::model::{Column, Row, Value, key_by_column};
use gridline_lib::pipeline::{SelectAllState, SelectionMode, SortDirection};
use gridline_lib::{EmptyReason, Table};

fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID").sortable(),
        Column::new("name", "Name").sortable(),
        Column::new("note", "Note"),
    ]
}

/// Twelve people; seven of the names contain an "a".
fn people() -> Vec<Row> {
    let names = [
        "Alice", "Bob", "Clara", "Dana", "Eve", "Frank", "Judy", "Hannah", "Ted", "Maria", "Lou",
        "Adam",
    ];
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Row::new()
                .set("id", (i + 1).to_string())
                .set("name", *name)
                .set("note", Value::Null)
        })
        .collect()
}

fn table() -> Table<String> {
    table_with(TableConfig::default().with_page_size(5))
}

fn table_with(config: TableConfig) -> Table<String> {
    Table::with_config(columns(), key_by_column("id"), config).with_data(people())
}

fn visible_ids(table: &Table<String>) -> Vec<String> {
    table.output().visible_keys.clone()
}

fn key(id: &str) -> String {
    id.to_string()
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_initial_render() {
    let table = table();
    assert_eq!(table.current_page(), 1);
    assert_eq!(table.total_pages(), 3);
    assert_eq!(visible_ids(&table), vec!["1", "2", "3", "4", "5"]);
    assert!(table.output().empty.is_none());
}

#[test]
fn test_filter_resets_page_and_recomputes_total() {
    let mut table = table();
    table.set_page(3);
    assert_eq!(table.current_page(), 3);

    table.set_filter("a");
    assert_eq!(table.output().page.total_items, 7);
    assert_eq!(table.total_pages(), 2);
    assert_eq!(table.current_page(), 1);

    assert!(table.next_page());
    assert_eq!(table.current_page(), 2);
    assert_eq!(table.output().visible_rows.len(), 2);
    assert!(!table.next_page());
    assert_eq!(table.current_page(), 2);
}

#[test]
fn test_unchanged_filter_keeps_page() {
    let mut table = table();
    table.set_filter("a");
    table.next_page();
    table.set_filter("a");
    assert_eq!(table.current_page(), 2);
}

#[test]
fn test_whitespace_only_filter_change_keeps_page() {
    let mut table = table();
    table.set_filter("a");
    table.next_page();

    let renders = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&renders);
    table.on_render(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    table.set_filter("a ");
    table.set_filter("  a");
    assert_eq!(table.current_page(), 2);
    assert_eq!(renders.load(Ordering::SeqCst), 0);
    assert_eq!(table.state().filter_text, "  a");

    table.set_filter("al");
    assert_eq!(table.current_page(), 1);
    assert_eq!(renders.load(Ordering::SeqCst), 1);
}

#[test]
fn test_set_page_clamps() {
    let mut table = table();
    table.set_page(99);
    assert_eq!(table.current_page(), 3);
    assert_eq!(visible_ids(&table), vec!["11", "12"]);

    table.set_page(0);
    assert_eq!(table.current_page(), 1);
    assert!(!table.prev_page());
}

#[test]
fn test_page_size_change_returns_to_first_page() {
    let mut table = table();
    table.set_page(2);
    table.set_page_size(4);
    assert_eq!(table.current_page(), 1);
    assert_eq!(table.total_pages(), 3);

    table.set_page_size(0);
    assert_eq!(table.state().page_size, 1);
    assert_eq!(table.total_pages(), 12);
}

#[test]
fn test_shrinking_data_pulls_page_back() {
    let mut table = table();
    table.set_page(3);
    table.set_data(people().into_iter().take(6).collect::<Vec<_>>());
    assert_eq!(table.total_pages(), 2);
    assert_eq!(table.current_page(), 2);
}

// ============================================================================
// Empty states
// ============================================================================

#[test]
fn test_empty_dataset() {
    let table = Table::new(columns(), key_by_column("id"));
    let output = table.output();
    assert_eq!(output.empty, Some(EmptyReason::NoData));
    assert_eq!(output.page.total_pages, 1);
    assert_eq!(output.page.current_page, 1);
    assert!(output.visible_rows.is_empty());
}

#[test]
fn test_no_matches() {
    let mut table = table();
    table.set_filter("zzz");
    assert_eq!(table.output().empty, Some(EmptyReason::NoMatches));
    assert_eq!(table.total_pages(), 1);
    assert_eq!(table.select_all_state(), SelectAllState::Unchecked);

    table.clear_filter();
    assert!(table.output().empty.is_none());
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_header_sort_cycles() {
    let mut table = table();
    assert_eq!(table.sort("name"), Some(SortDirection::Ascending));
    assert_eq!(visible_ids(&table)[0], "12"); // Adam

    assert_eq!(table.sort("name"), Some(SortDirection::Descending));
    assert_eq!(visible_ids(&table)[0], "9"); // Ted

    assert_eq!(table.sort("name"), Some(SortDirection::None));
    assert_eq!(table.state().sort_column, None);
    assert_eq!(visible_ids(&table)[0], "1");
}

#[test]
fn test_switching_sort_column_starts_ascending() {
    let mut table = table();
    table.sort("name");
    table.sort("name");
    assert_eq!(table.sort("id"), Some(SortDirection::Ascending));
    assert_eq!(table.state().sort_column.as_deref(), Some("id"));
}

#[test]
fn test_non_sortable_column_is_ignored() {
    let mut table = table();
    assert_eq!(table.sort("note"), None);
    assert_eq!(table.sort("missing"), None);
    assert_eq!(table.state().sort_direction, SortDirection::None);
}

#[test]
fn test_sort_does_not_mutate_dataset() {
    let mut table = table();
    table.set_sort("name", SortDirection::Descending);
    let ids: Vec<&str> = table.data().iter().filter_map(|r| r.get("id").as_str()).collect();
    assert_eq!(ids[..3], ["1", "2", "3"]);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_selection_survives_sort_and_filter() {
    let mut table = table();
    table.toggle_key(key("3")); // Clara
    assert_eq!(table.output().selection.visible_selected, 1);

    table.set_sort("name", SortDirection::Descending);
    assert_eq!(table.selection_count(), 1);

    table.set_filter("bob");
    assert!(!visible_ids(&table).contains(&key("3")));
    assert_eq!(table.selection_count(), 1);
    assert_eq!(table.output().selection.selected_count, 1);
    assert_eq!(table.output().selection.visible_selected, 0);

    table.clear_filter();
    table.clear_sort();
    assert!(visible_ids(&table).contains(&key("3")));
    assert_eq!(table.select_all_state(), SelectAllState::Indeterminate);
}

#[test]
fn test_select_all_covers_only_visible_page() {
    let mut table = table();
    table.set_filter("a");
    table.next_page();

    let visible = visible_ids(&table);
    assert_eq!(visible.len(), 2);
    assert_eq!(table.select_all_visible(), 2);
    assert_eq!(table.selection_count(), 2);
    assert_eq!(table.select_all_state(), SelectAllState::Checked);

    let mut selected = table.selected_keys();
    selected.sort();
    let mut expected = visible.clone();
    expected.sort();
    assert_eq!(selected, expected);

    table.prev_page();
    assert_eq!(table.select_all_state(), SelectAllState::Unchecked);
}

#[test]
fn test_select_all_twice_adds_nothing() {
    let mut table = table();
    assert_eq!(table.select_all_visible(), 5);
    assert_eq!(table.select_all_visible(), 0);
}

#[test]
fn test_set_data_clears_selection() {
    let mut table = table();
    table.toggle_key(key("1"));
    table.toggle_key(key("2"));
    assert_eq!(table.selection_count(), 2);

    table.set_data(people());
    assert_eq!(table.selection_count(), 0);
    assert!(table.selected_rows().is_empty());
}

#[test]
fn test_selected_rows_follow_dataset_order() {
    let mut table = table();
    table.set_selection(vec![key("7"), key("2"), key("99")]);
    let ids: Vec<&str> = table
        .selected_rows()
        .iter()
        .filter_map(|r| r.get("id").as_str())
        .collect();
    assert_eq!(ids, vec!["2", "7"]);
}

#[test]
fn test_toggle_select_by_row() {
    let mut table = table();
    let row = table.data()[4].clone();
    assert!(table.toggle_select(&row));
    assert!(table.is_selected(&row));
    assert!(table.toggle_select(&row));
    assert!(!table.is_selected(&row));
}

#[test]
fn test_single_selection_mode() {
    let config = TableConfig::default()
        .with_page_size(5)
        .with_selection_mode(SelectionMode::Single);
    let mut table = table_with(config);

    table.toggle_key(key("1"));
    table.toggle_key(key("2"));
    assert_eq!(table.selected_keys(), vec![key("2")]);

    // Select-all needs multi-select
    assert_eq!(table.select_all_visible(), 0);
    assert_eq!(table.selection_count(), 1);
}

#[test]
fn test_selection_disabled() {
    let config = TableConfig::default().with_selection_mode(SelectionMode::None);
    let mut table = table_with(config);
    assert!(!table.toggle_key(key("1")));
    assert_eq!(table.selection_count(), 0);
}

// ============================================================================
// Listeners
// ============================================================================

#[test]
fn test_listener_sees_each_render() {
    let mut table = table();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let id = table.on_render(move |output| {
        assert!(output.page.current_page >= 1);
        seen.fetch_add(1, Ordering::SeqCst);
    });

    table.set_filter("a");
    table.next_page();
    table.toggle_key(key("1"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // No-op changes do not render
    table.set_filter("a");
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    assert!(table.remove_listener(id));
    assert!(!table.remove_listener(id));
    table.clear_filter();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

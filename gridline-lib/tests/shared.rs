//! Tests for the lock-serialized table handle.

use std::sync::{Arc, Mutex};

use gridline_lib::model::{Column, Row, key_by_column};
use gridline_lib::{SharedTable, Table};

fn shared_table() -> SharedTable<String> {
    let rows: Vec<Row> = ["Alice", "Bob", "Carol"]
        .iter()
        .enumerate()
        .map(|(i, name)| Row::new().set("id", i as i64).set("name", *name))
        .collect();
    SharedTable::new(
        Table::new(vec![Column::new("id", "ID"), Column::new("name", "Name")], key_by_column("id"))
            .with_data(rows),
    )
}

#[test]
fn test_listener_can_read_shared_table() {
    let shared = shared_table();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let handle = shared.clone();
    let log = Arc::clone(&seen);
    shared.update(|t| {
        t.on_render(move |output| {
            // Reads back through the shared handle while the render is delivered
            let filter = handle.read(|t| t.state().filter_text.clone());
            log.lock().unwrap().push((filter, output.page.total_items));
        });
    });

    shared.update(|t| t.set_filter("bo"));
    shared.update(|t| {
        t.set_page(1);
        t.set_filter("o");
    });

    // One delivery per update, carrying the final output of that update
    assert_eq!(
        *seen.lock().unwrap(),
        vec![("bo".to_string(), 1), ("o".to_string(), 2)]
    );
}

#[test]
fn test_update_without_render_notifies_nobody() {
    let shared = shared_table();
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    shared.update(|t| {
        t.on_render(move |_| *counter.lock().unwrap() += 1);
    });

    let pages = shared.update(|t| t.total_pages());
    assert_eq!(pages, 1);
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn test_listener_can_update_shared_table() {
    let shared = shared_table();
    let handle = shared.clone();
    shared.update(|t| {
        t.on_render(move |output| {
            // Fall back to an unfiltered view when nothing matches
            if output.is_empty() {
                handle.update(|t| t.clear_filter());
            }
        });
    });

    shared.update(|t| t.set_filter("zzz"));
    assert_eq!(shared.read(|t| t.state().filter_text.clone()), "");
    assert_eq!(shared.read(|t| t.output().page.total_items), 3);
}

//! Tests for debounced filter input, run on a paused Tokio clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gridline_lib::config::TableConfig;
use gridline_lib::debounce::{Debouncer, FilterInput};
use gridline_lib::model::{Column, Row, key_by_column};
use gridline_lib::{SharedTable, Table};

const DELAY: Duration = Duration::from_millis(150);

fn shared_table() -> (SharedTable<String>, Arc<AtomicUsize>) {
    let rows: Vec<Row> = ["Alice", "Bob", "Carol"]
        .iter()
        .enumerate()
        .map(|(i, name)| Row::new().set("id", i as i64).set("name", *name))
        .collect();
    let mut table = Table::with_config(
        vec![Column::new("id", "ID"), Column::new("name", "Name")],
        key_by_column("id"),
        TableConfig::default().with_debounce(DELAY),
    )
    .with_data(rows);

    let renders = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&renders);
    table.on_render(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (SharedTable::new(table), renders)
}

fn filter_text(table: &SharedTable<String>) -> String {
    table.read(|t| t.state().filter_text.clone())
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn test_only_last_keystroke_applies() {
    let (table, renders) = shared_table();
    let mut input = FilterInput::new(table.clone());

    input.input("a");
    advance(50).await;
    input.input("al");
    advance(50).await;
    input.input("ali");
    assert_eq!(input.pending_text(), Some("ali"));

    // Quiet period not yet over
    advance(100).await;
    assert_eq!(filter_text(&table), "");
    assert_eq!(renders.load(Ordering::SeqCst), 0);

    advance(100).await;
    assert_eq!(filter_text(&table), "ali");
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert_eq!(input.pending_text(), None);
    assert_eq!(table.read(|t| t.output().page.total_items), 1);
}

#[tokio::test(start_paused = true)]
async fn test_flush_applies_immediately() {
    let (table, renders) = shared_table();
    let mut input = FilterInput::new(table.clone());

    input.input("bo");
    assert!(input.flush());
    assert_eq!(filter_text(&table), "bo");

    advance(500).await;
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert!(!input.flush());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_discards_pending_text() {
    let (table, renders) = shared_table();
    let mut input = FilterInput::new(table.clone());

    input.input("carol");
    assert!(input.cancel());
    assert_eq!(input.pending_text(), None);

    advance(500).await;
    assert_eq!(filter_text(&table), "");
    assert_eq!(renders.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_separate_bursts_each_apply() {
    let (table, renders) = shared_table();
    let mut input = FilterInput::with_delay(table.clone(), Duration::from_millis(20));

    input.input("a");
    advance(30).await;
    assert_eq!(filter_text(&table), "a");

    input.input("b");
    advance(30).await;
    assert_eq!(filter_text(&table), "b");
    assert_eq!(renders.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_debouncer_runs_latest_task_once() {
    let ran = Arc::new(Mutex::new(Vec::new()));
    let mut debouncer = Debouncer::new(Duration::from_millis(10));

    for i in 0..5 {
        let ran = Arc::clone(&ran);
        debouncer.schedule(move |_| ran.lock().unwrap().push(i));
        advance(2).await;
    }
    assert!(debouncer.is_pending());

    advance(50).await;
    assert_eq!(*ran.lock().unwrap(), vec![4]);
    assert!(!debouncer.is_pending());
    assert!(!debouncer.cancel());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_debouncer_cancels_task() {
    let ran = Arc::new(AtomicUsize::new(0));
    {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let ran = Arc::clone(&ran);
        debouncer.schedule(move |_| {
            ran.fetch_add(1, Ordering::SeqCst);
        });
    }
    advance(50).await;
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

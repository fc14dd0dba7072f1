//! Shared, lock-serialized table handle.

use std::sync::{Arc, RwLock};

use crate::Table;
use crate::model::RowKey;

/// A [`Table`] behind `Arc<RwLock<_>>`.
///
/// The pipeline stages are not safe to run against a view state that is
/// changing underneath them, so every mutation goes through the single write
/// lock. Cheap to clone; clones share the same table.
///
/// Render listeners registered on the table run once the lock is released,
/// so a listener may call back into the same `SharedTable`.
///
/// # Example
///
/// ```
/// use gridline_lib::{SharedTable, Table};
/// use gridline_lib::model::{Column, Row, key_by_column};
///
/// let table = Table::new(vec![Column::new("id", "ID")], key_by_column("id"))
///     .with_data(vec![Row::new().set("id", 1)]);
/// let shared = SharedTable::new(table);
///
/// let handle = shared.clone();
/// handle.update(|t| t.set_filter("1"));
/// assert_eq!(shared.read(|t| t.state().filter_text.clone()), "1");
/// ```
#[derive(Debug)]
pub struct SharedTable<K: RowKey> {
    inner: Arc<RwLock<Table<K>>>,
}

impl<K: RowKey> SharedTable<K> {
    pub fn new(table: Table<K>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    /// Run `f` with shared read access.
    pub fn read<R>(&self, f: impl FnOnce(&Table<K>) -> R) -> R {
        let guard = self
            .inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    /// Run `f` with exclusive write access, then notify render listeners.
    pub fn update<R>(&self, f: impl FnOnce(&mut Table<K>) -> R) -> R {
        let (result, pending) = {
            let mut guard = self
                .inner
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            guard.defer_notify();
            let result = f(&mut guard);
            (result, guard.take_deferred())
        };

        if let Some((output, listeners)) = pending {
            for listener in &listeners {
                listener(&output);
            }
        }
        result
    }
}

impl<K: RowKey> Clone for SharedTable<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

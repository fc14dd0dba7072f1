//! Cancellable deferred tasks for debounced filter input.
//!
//! Each keystroke replaces the pending task instead of stacking timers: only
//! the last value typed before a quiet period reaches the pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::SharedTable;
use crate::model::RowKey;

/// Proof that a fired task is still the latest one scheduled.
///
/// Check [`is_current`](Self::is_current) while holding whatever lock guards
/// the side effect; a task cancelled after it woke up then does nothing.
#[derive(Debug, Clone)]
pub struct DebounceTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl DebounceTicket {
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

/// Runs at most one deferred task at a time, after a fixed quiet period.
///
/// Scheduling cancels whatever was pending. Must be used from inside a Tokio
/// runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending task with `task`, to run after the quiet period.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: FnOnce(DebounceTicket) + Send + 'static,
    {
        self.cancel();

        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let ticket = DebounceTicket {
            generation,
            latest: Arc::clone(&self.latest),
        };
        let token = CancellationToken::new();
        let task_token = token.clone();
        let delay = self.delay;
        self.pending = Some(token);

        tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    log::trace!("debounced task {} cancelled", generation);
                }
                _ = tokio::time::sleep(delay) => {
                    if ticket.is_current() {
                        task(ticket);
                    }
                    task_token.cancel();
                }
            }
        });
    }

    /// Drop the pending task, if any. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        let Some(token) = self.pending.take() else {
            return false;
        };
        let was_pending = !token.is_cancelled();
        // Invalidate outstanding tickets before signalling the task.
        self.latest.fetch_add(1, Ordering::SeqCst);
        token.cancel();
        was_pending
    }

    /// True while a scheduled task has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|t| !t.is_cancelled())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// FilterInput
// =============================================================================

/// A filter text box bound to a shared table.
///
/// Keystrokes go to [`input`](Self::input); the table sees the text only once
/// typing pauses for the configured delay.
#[derive(Debug)]
pub struct FilterInput<K: RowKey> {
    table: SharedTable<K>,
    debouncer: Debouncer,
    pending_text: Option<String>,
}

impl<K: RowKey> FilterInput<K> {
    /// Bind to `table`, using the table's configured debounce delay.
    pub fn new(table: SharedTable<K>) -> Self {
        let delay = table.read(|t| t.config().debounce());
        Self::with_delay(table, delay)
    }

    pub fn with_delay(table: SharedTable<K>, delay: Duration) -> Self {
        Self {
            table,
            debouncer: Debouncer::new(delay),
            pending_text: None,
        }
    }

    /// Record a keystroke's full text and reschedule the filter update.
    pub fn input(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.pending_text = Some(text.clone());

        let table = self.table.clone();
        self.debouncer.schedule(move |ticket| {
            table.update(|t| {
                if ticket.is_current() {
                    t.set_filter(text);
                }
            });
        });
    }

    /// Text typed but not yet applied.
    pub fn pending_text(&self) -> Option<&str> {
        if self.debouncer.is_pending() {
            self.pending_text.as_deref()
        } else {
            None
        }
    }

    /// Apply pending text now instead of waiting. Returns true if anything was pending.
    pub fn flush(&mut self) -> bool {
        if !self.debouncer.cancel() {
            return false;
        }
        match self.pending_text.take() {
            Some(text) => {
                self.table.update(|t| t.set_filter(text));
                true
            }
            None => false,
        }
    }

    /// Discard pending text without applying it.
    pub fn cancel(&mut self) -> bool {
        self.pending_text = None;
        self.debouncer.cancel()
    }

    pub fn table(&self) -> &SharedTable<K> {
        &self.table
    }
}

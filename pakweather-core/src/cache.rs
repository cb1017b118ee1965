//! Single-entry, time-boxed memoization of the working table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{fmt::Debug, sync::Arc, time::Duration};
use tokio::sync::Mutex;

use crate::{clock::Clock, model::ObservationTable};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Whatever builds a fresh working table. The cache calls it at most once per
/// window.
#[async_trait]
pub trait TableSource: Send + Sync + Debug {
    async fn load(&self) -> ObservationTable;
}

#[derive(Debug)]
struct Entry {
    table: Arc<ObservationTable>,
    populated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ResultCache<S> {
    source: S,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    // Held across `load` so there is never more than one fetch in flight.
    slot: Mutex<Option<Entry>>,
}

impl<S: TableSource> ResultCache<S> {
    pub fn new(source: S, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(source, clock, DEFAULT_TTL)
    }

    pub fn with_ttl(source: S, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { source, clock, ttl, slot: Mutex::new(None) }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The stored table while its window is open, otherwise a freshly loaded
    /// one that starts a new window.
    pub async fn get_or_fetch(&self) -> Arc<ObservationTable> {
        let mut slot = self.slot.lock().await;
        let now = self.clock.now();

        if let Some(entry) = slot.as_ref() {
            if !self.expired(entry, now) {
                tracing::debug!(populated_at = %entry.populated_at, "serving cached table");
                return Arc::clone(&entry.table);
            }
            tracing::debug!(populated_at = %entry.populated_at, "cached table expired");
        }

        let table = Arc::new(self.source.load().await);
        // The window opens once the table is stored, not when the load began.
        let populated_at = self.clock.now();
        tracing::info!(rows = table.len(), %populated_at, "cache populated");
        *slot = Some(Entry { table: Arc::clone(&table), populated_at });
        table
    }

    /// Drop the stored table; the next `get_or_fetch` reloads.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }

    pub async fn populated_at(&self) -> Option<DateTime<Utc>> {
        self.slot.lock().await.as_ref().map(|entry| entry.populated_at)
    }

    fn expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        // A negative elapsed time (clock stepped back) keeps the window open.
        match (now - entry.populated_at).to_std() {
            Ok(elapsed) => elapsed >= self.ttl,
            Err(_) => false,
        }
    }
}

//! Daily momentum counter
//!
//! Counts agent prep actions (notes logged, briefings played) for the
//! current day. The date comes from an injected [`Clock`] and the record is
//! kept behind a [`MomentumStore`], so there is no ambient global state and
//! tests can pin the day.

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumRecord {
    pub date: NaiveDate,
    pub count: u32,
}

pub trait MomentumStore: Send + Sync {
    fn load(&self) -> Option<MomentumRecord>;
    fn save(&self, record: MomentumRecord);
}

#[derive(Debug, Default)]
pub struct InMemoryMomentumStore {
    record: Mutex<Option<MomentumRecord>>,
}

impl InMemoryMomentumStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MomentumStore for InMemoryMomentumStore {
    fn load(&self) -> Option<MomentumRecord> {
        *self.record.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn save(&self, record: MomentumRecord) {
        *self.record.lock().unwrap_or_else(|e| e.into_inner()) = Some(record);
    }
}

pub struct MomentumCounter {
    clock: Arc<dyn Clock>,
    store: Arc<dyn MomentumStore>,
    // serializes read-modify-write in increment()
    guard: Mutex<()>,
}

impl MomentumCounter {
    pub fn new(clock: Arc<dyn Clock>, store: Arc<dyn MomentumStore>) -> Self {
        Self {
            clock,
            store,
            guard: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(InMemoryMomentumStore::new()))
    }

    /// Today's record. A stored record from another day counts as zero.
    pub fn current(&self) -> MomentumRecord {
        let today = self.clock.today();
        match self.store.load() {
            Some(record) if record.date == today => record,
            _ => MomentumRecord {
                date: today,
                count: 0,
            },
        }
    }

    /// Record one action and return the updated record.
    pub fn increment(&self) -> MomentumRecord {
        let _lock = self.guard.lock().unwrap_or_else(|e| e.into_inner());
        let mut record = self.current();
        record.count = record.count.saturating_add(1);
        self.store.save(record);
        tracing::debug!(date = %record.date, count = record.count, "momentum incremented");
        record
    }
}

impl std::fmt::Debug for MomentumCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MomentumCounter")
            .field("current", &self.current())
            .finish()
    }
}

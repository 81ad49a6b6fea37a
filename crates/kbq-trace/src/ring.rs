use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use kbq_core::entities::Trace;

/// Filters accepted by [`TraceRing::list`]. All present fields are ANDed.
#[derive(Debug, Clone, Default)]
pub struct TraceFilter {
    pub since: Option<DateTime<Utc>>,
    pub status: Option<u16>,
    pub path_prefix: Option<String>,
    pub has_error: Option<bool>,
}

impl TraceFilter {
    fn matches(&self, trace: &Trace) -> bool {
        if let Some(since) = self.since {
            if trace.ts < since {
                return false;
            }
        }
        if let Some(status) = self.status {
            if trace.status != status {
                return false;
            }
        }
        if let Some(prefix) = &self.path_prefix {
            if !trace.path.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(has_error) = self.has_error {
            if trace.error.is_some() != has_error {
                return false;
            }
        }
        true
    }
}

/// Append-only, capped-retention store of request trace records.
///
/// Appends are serialized behind a single `Mutex`; lookups take the same
/// lock, so a `list`/`get` call may or may not observe an in-flight append
/// but never a partially-written one.
pub struct TraceRing {
    records: Mutex<VecDeque<Trace>>,
    max_records: usize,
    max_age: chrono::Duration,
}

impl TraceRing {
    #[must_use]
    pub fn new(max_records: usize, max_age_seconds: i64) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(max_records)),
            max_records,
            max_age: chrono::Duration::seconds(max_age_seconds),
        }
    }

    /// Appends a trace, evicting the oldest records first once `max_records`
    /// or `max_age` is exceeded.
    pub fn append(&self, trace: Trace) {
        let mut records = self.records.lock().expect("trace ring mutex poisoned");
        records.push_back(trace);
        self.evict(&mut records);
    }

    fn evict(&self, records: &mut VecDeque<Trace>) {
        while records.len() > self.max_records {
            records.pop_front();
        }
        let cutoff = Utc::now() - self.max_age;
        while records.front().is_some_and(|oldest| oldest.ts < cutoff) {
            records.pop_front();
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Trace> {
        let records = self.records.lock().expect("trace ring mutex poisoned");
        records.iter().find(|trace| trace.id == id).cloned()
    }

    /// Most recent matching traces first, capped at `limit`.
    #[must_use]
    pub fn list(&self, filter: &TraceFilter, limit: usize) -> Vec<Trace> {
        let records = self.records.lock().expect("trace ring mutex poisoned");
        records.iter().rev().filter(|trace| filter.matches(trace)).take(limit).cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().expect("trace ring mutex poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Per-operation attempt bookkeeping.
//!
//! One [`AttemptRegistry`] is owned by (or shared between) orchestrators; it
//! is the only mutable state the recovery engine keeps. Records live from
//! the first attempt of an operation id until the execution that created
//! them reaches a terminal outcome.
//!
//! Distinct ids are independent. Concurrent executions that reuse the same
//! id race on one record and see best-effort counts; mint a unique id per
//! logical unit of work (see [`OperationId::unique`](super::OperationId::unique)).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::time::{Clock, SystemClock};

/// Snapshot of one operation's attempt history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub operation_id: String,
    pub attempt_count: u32,
    pub last_attempt_at: Instant,
    pub last_attempt_utc: DateTime<Utc>,
}

/// Thread-safe map of operation id to [`AttemptRecord`].
pub struct AttemptRegistry {
    records: Mutex<HashMap<String, AttemptRecord>>,
    clock: Arc<dyn Clock>,
}

impl AttemptRegistry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Registry reading time from `clock`, for deterministic tests.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { records: Mutex::new(HashMap::new()), clock }
    }

    /// Count one more attempt for `operation_id` and return the new count.
    ///
    /// The first call for an id creates its record with a count of 1.
    pub fn record_attempt(&self, operation_id: &str) -> u32 {
        let now = self.clock.now();
        let now_utc = self.clock.utc_now();
        let mut records = self.records.lock();

        let record = records.entry(operation_id.to_owned()).or_insert_with(|| AttemptRecord {
            operation_id: operation_id.to_owned(),
            attempt_count: 0,
            last_attempt_at: now,
            last_attempt_utc: now_utc,
        });
        record.attempt_count = record.attempt_count.saturating_add(1);
        record.last_attempt_at = now;
        record.last_attempt_utc = now_utc;
        record.attempt_count
    }

    /// Attempts recorded for `operation_id`, 0 when none are in flight.
    pub fn attempt_count(&self, operation_id: &str) -> u32 {
        self.records.lock().get(operation_id).map_or(0, |record| record.attempt_count)
    }

    pub fn time_since_last_attempt(&self, operation_id: &str) -> Option<Duration> {
        let last = self.records.lock().get(operation_id).map(|record| record.last_attempt_at)?;
        Some(self.clock.now().saturating_duration_since(last))
    }

    /// Drop the record for `operation_id`. Clearing an absent id is a no-op.
    pub fn clear(&self, operation_id: &str) {
        self.records.lock().remove(operation_id);
    }

    /// Drop every record.
    pub fn clear_all(&self) {
        self.records.lock().clear();
    }

    /// Copy of the record for `operation_id`, if one is in flight.
    pub fn get(&self, operation_id: &str) -> Option<AttemptRecord> {
        self.records.lock().get(operation_id).cloned()
    }

    /// Copy of every in-flight record, ordered by operation id.
    pub fn snapshot(&self) -> Vec<AttemptRecord> {
        let mut records: Vec<_> = self.records.lock().values().cloned().collect();
        records.sort_by(|a, b| a.operation_id.cmp(&b.operation_id));
        records
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Default for AttemptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AttemptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptRegistry").field("in_flight", &self.len()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::time::MockClock;

    #[test]
    fn test_record_attempt_counts_up_from_one() {
        let registry = AttemptRegistry::new();
        assert_eq!(registry.record_attempt("save_recipe_42"), 1);
        assert_eq!(registry.record_attempt("save_recipe_42"), 2);
        assert_eq!(registry.record_attempt("save_recipe_42"), 3);
        assert_eq!(registry.attempt_count("save_recipe_42"), 3);
    }

    #[test]
    fn test_absent_id_reports_nothing() {
        let registry = AttemptRegistry::new();
        assert_eq!(registry.attempt_count("load_recipe_7"), 0);
        assert_eq!(registry.time_since_last_attempt("load_recipe_7"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let registry = AttemptRegistry::new();
        registry.record_attempt("delete_recipe_1");
        registry.clear("delete_recipe_1");
        registry.clear("delete_recipe_1");
        assert_eq!(registry.attempt_count("delete_recipe_1"), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_all_resets_registry() {
        let registry = AttemptRegistry::new();
        registry.record_attempt("a");
        registry.record_attempt("b");
        assert_eq!(registry.len(), 2);

        registry.clear_all();
        assert!(registry.is_empty());
        assert_eq!(registry.record_attempt("a"), 1);
    }

    #[test]
    fn test_time_since_last_attempt_follows_clock() {
        let clock = MockClock::new();
        let registry = AttemptRegistry::with_clock(Arc::new(clock.clone()));

        registry.record_attempt("upload_photo_3");
        clock.advance(Duration::from_secs(4));
        assert_eq!(
            registry.time_since_last_attempt("upload_photo_3"),
            Some(Duration::from_secs(4))
        );

        registry.record_attempt("upload_photo_3");
        clock.advance(Duration::from_millis(250));
        assert_eq!(
            registry.time_since_last_attempt("upload_photo_3"),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_snapshot_is_sorted_by_id() {
        let clock = MockClock::new();
        let registry = AttemptRegistry::with_clock(Arc::new(clock.clone()));
        registry.record_attempt("save_plan_2");
        registry.record_attempt("load_recipe_9");
        registry.record_attempt("load_recipe_9");

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].operation_id, "load_recipe_9");
        assert_eq!(snapshot[0].attempt_count, 2);
        assert_eq!(snapshot[1].operation_id, "save_plan_2");
        assert_eq!(snapshot[1].last_attempt_utc, clock.utc_now());
        assert_eq!(registry.get("load_recipe_9").as_ref(), Some(&snapshot[0]));
        assert_eq!(registry.get("missing"), None);
    }

    #[test]
    fn test_distinct_ids_are_independent_across_threads() {
        let registry = Arc::new(AttemptRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let id = format!("save_recipe_{worker}");
                    for _ in 0..50 {
                        registry.record_attempt(&id);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8);
        for worker in 0..8 {
            assert_eq!(registry.attempt_count(&format!("save_recipe_{worker}")), 50);
        }
    }
}

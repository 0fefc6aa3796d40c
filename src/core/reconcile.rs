//! Key-based reconciliation of generated records against ground truth
//!
//! The index is built once before scoring starts and is read-only afterwards.
//! A lookup miss is not an error here; the scoring pipeline turns it into an
//! explicit failure entry so no record is ever silently dropped.

use crate::core::records::{NarrativeRecord, RecordKey};
use std::collections::HashMap;
use tracing::debug;

/// Lookup from composite key to ground-truth record.
#[derive(Debug, Default)]
pub struct ReconcileIndex {
    map: HashMap<RecordKey, NarrativeRecord>,
}

impl ReconcileIndex {
    /// Build the index, extracting each record's key with `key_fn`. Duplicate
    /// keys are last-writer-wins.
    pub fn build<I, F>(records: I, key_fn: F) -> Self
    where
        I: IntoIterator<Item = NarrativeRecord>,
        F: Fn(&NarrativeRecord) -> RecordKey,
    {
        let mut map = HashMap::new();
        for record in records {
            let key = key_fn(&record);
            if map.insert(key.clone(), record).is_some() {
                debug!(%key, "duplicate ground-truth key, keeping the later record");
            }
        }
        Self { map }
    }

    pub fn lookup(&self, key: &RecordKey) -> Option<&NarrativeRecord> {
        self.map.get(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::Keyed;

    fn record(ev_id: &str, aircraft_key: Option<&str>, cause: &str) -> NarrativeRecord {
        NarrativeRecord {
            ev_id: ev_id.into(),
            aircraft_key: aircraft_key.map(Into::into),
            narr_accp: String::new(),
            narr_accf: String::new(),
            narr_cause: cause.into(),
        }
    }

    #[test]
    fn composite_lookup_hits_and_misses() {
        let truth = vec![
            record("A", Some("1"), "X"),
            record("B", Some("2"), "Y"),
        ];
        let index = ReconcileIndex::build(truth, |r| r.key());

        let hit = index.lookup(&RecordKey::composite("A", "1")).unwrap();
        assert_eq!(hit.narr_cause, "X");
        assert!(index.lookup(&RecordKey::composite("A", "2")).is_none());
    }

    #[test]
    fn event_only_keying_ignores_aircraft_key() {
        let truth = vec![record("A", Some("1"), "X")];
        let index = ReconcileIndex::build(truth, |r| RecordKey::event(r.ev_id.clone()));

        assert!(index.lookup(&RecordKey::event("A")).is_some());
        assert!(index.lookup(&RecordKey::composite("A", "1")).is_none());
    }

    #[test]
    fn duplicate_keys_are_last_writer_wins() {
        let truth = vec![record("A", Some("1"), "first"), record("A", Some("1"), "second")];
        let index = ReconcileIndex::build(truth, |r| r.key());

        assert_eq!(index.len(), 1);
        let hit = index.lookup(&RecordKey::composite("A", "1")).unwrap();
        assert_eq!(hit.narr_cause, "second");
    }
}

//! Application Guard
//!
//! One [`ProcessingContext`] per processing pass (a request, a bulk run). It
//! records which records already received a generated title so the pre-save
//! hook and a bulk action touching the same record do not generate twice.
//! Nothing here is persisted; a new pass starts with a new context.
//!
//! A record is remembered under its [`RecordKey`] and, when it has one, its
//! instance key. An unsaved record that receives its id later in the pass is
//! still recognized through the instance key.

use crate::record::{RecordKey, TitleRecord};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct ProcessingContext {
    applied: HashSet<RecordKey>,
    titled: usize,
}

impl ProcessingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_applied(&self, key: &RecordKey) -> bool {
        self.applied.contains(key)
    }

    /// Mark a key as applied. Returns `false` if it already was.
    pub fn mark_applied(&mut self, key: RecordKey) -> bool {
        let fresh = self.applied.insert(key);
        if fresh {
            self.titled += 1;
        }
        fresh
    }

    /// Whether the record was titled in this pass, under any of its keys.
    pub fn is_record_applied<R: TitleRecord + ?Sized>(&self, record: &R) -> bool {
        self.is_applied(&record.record_key())
            || record
                .instance_key()
                .is_some_and(|key| self.is_applied(&key))
    }

    /// Mark a record under its record key and instance key. Returns `false`
    /// if it was already applied under either.
    pub fn mark_record_applied<R: TitleRecord + ?Sized>(&mut self, record: &R) -> bool {
        if self.is_record_applied(record) {
            return false;
        }
        self.applied.insert(record.record_key());
        if let Some(key) = record.instance_key() {
            self.applied.insert(key);
        }
        self.titled += 1;
        true
    }

    /// Number of records titled in this pass.
    pub fn applied_count(&self) -> usize {
        self.titled
    }
}

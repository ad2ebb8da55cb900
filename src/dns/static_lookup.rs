//! In-memory DNS data for tests and offline runs.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use super::lookup::DnsLookup;
use crate::error_handling::DnsError;

/// A [`DnsLookup`] answering from a fixed table.
///
/// Names without records or a configured error answer `NxDomain`. Names are
/// compared case-insensitively and without a trailing dot.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    records: HashMap<String, Vec<String>>,
    errors: HashMap<String, DnsError>,
    one_shot_failures: Arc<Mutex<HashMap<String, VecDeque<DnsError>>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a TXT record at `name`.
    pub fn with_txt(mut self, name: &str, record: &str) -> Self {
        self.records
            .entry(normalize_name(name))
            .or_default()
            .push(record.to_string());
        self
    }

    /// Makes every query for `name` fail with `error`.
    pub fn with_error(mut self, name: &str, error: DnsError) -> Self {
        self.errors.insert(normalize_name(name), error);
        self
    }

    /// Makes the next query for `name` fail with `error`; later queries answer normally.
    ///
    /// Calling this repeatedly queues several failures.
    pub fn with_failure_once(self, name: &str, error: DnsError) -> Self {
        if let Ok(mut failures) = self.one_shot_failures.lock() {
            failures
                .entry(normalize_name(name))
                .or_default()
                .push_back(error);
        }
        self
    }

    /// Every name queried so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }

    fn answer(&self, name: &str) -> Result<Vec<String>, DnsError> {
        let key = normalize_name(name);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(key.clone());
        }

        let queued = self
            .one_shot_failures
            .lock()
            .ok()
            .and_then(|mut failures| failures.get_mut(&key).and_then(VecDeque::pop_front));
        if let Some(error) = queued {
            return Err(error);
        }
        if let Some(error) = self.errors.get(&key) {
            return Err(error.clone());
        }
        self.records.get(&key).cloned().ok_or(DnsError::NxDomain)
    }
}

impl DnsLookup for StaticLookup {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        self.answer(name)
    }
}

fn normalize_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

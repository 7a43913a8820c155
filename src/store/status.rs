//! Per-section update bookkeeping.

use std::sync::Arc;
use std::time::SystemTime;

use dashmap::DashMap;
use serde::Serialize;

/// Counters and last outcome for one section.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SectionStatus {
    /// Successful installs.
    pub updates: u64,
    /// Rejected bundles.
    pub failures: u64,
    /// Text of the most recent parse failure, cleared by the next success.
    pub last_error: Option<String>,
    pub last_updated: Option<SystemTime>,
}

/// Thread-safe status table keyed by section name.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    inner: Arc<DashMap<&'static str, SectionStatus>>,
}

impl StatusBoard {
    pub fn new(names: impl IntoIterator<Item = &'static str>) -> Self {
        let inner = DashMap::new();
        for name in names {
            inner.insert(name, SectionStatus::default());
        }
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn record_success(&self, name: &'static str) {
        let mut entry = self.inner.entry(name).or_default();
        entry.updates += 1;
        entry.last_error = None;
        entry.last_updated = Some(SystemTime::now());
    }

    pub fn record_failure(&self, name: &'static str, error: &dyn std::fmt::Display) {
        let mut entry = self.inner.entry(name).or_default();
        entry.failures += 1;
        entry.last_error = Some(error.to_string());
    }

    pub fn get(&self, name: &str) -> Option<SectionStatus> {
        self.inner.get(name).map(|r| r.value().clone())
    }

    /// All sections, sorted by name.
    pub fn all(&self) -> Vec<(&'static str, SectionStatus)> {
        let mut all: Vec<_> = self
            .inner
            .iter()
            .map(|r| (*r.key(), r.value().clone()))
            .collect();
        all.sort_by_key(|(name, _)| *name);
        all
    }
}

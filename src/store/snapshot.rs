//! The snapshot store.

use std::sync::Arc;

use crate::config::raw::RawUpdate;
use crate::config::watcher::Watcher;
use crate::error::StoreError;
use crate::observability::metrics::{self, UpdateResult};
use crate::store::Sections;
use crate::store::observer::{ObserverError, ObserverFailure, Observers, SectionUpdate};
use crate::store::registry::Registry;
use crate::store::status::{SectionStatus, StatusBoard};

/// Outcome of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub section: String,
    /// Observers that failed after the value was installed.
    pub observer_failures: Vec<ObserverFailure>,
}

/// Builds a [`SnapshotStore`].
pub struct StoreBuilder<C: Sections> {
    name: String,
    observers: Observers,
    _sections: std::marker::PhantomData<fn() -> C>,
}

impl<C: Sections> StoreBuilder<C> {
    /// Run `observer` after every successful update of any section.
    pub fn on_after_store<F>(mut self, observer: F) -> Self
    where
        F: Fn(&SectionUpdate<'_>) -> Result<(), ObserverError> + Send + Sync + 'static,
    {
        self.observers.add_global(observer);
        self
    }

    /// Run `observer` after every successful update of section `name`.
    pub fn on_section<F>(mut self, name: impl Into<String>, observer: F) -> Self
    where
        F: Fn(&SectionUpdate<'_>) -> Result<(), ObserverError> + Send + Sync + 'static,
    {
        self.observers.add_for_section(name, observer);
        self
    }

    /// Register the sections and produce the store.
    ///
    /// Fails on duplicate section names, and on observers bound to a name
    /// no section uses.
    pub fn build(self) -> Result<SnapshotStore<C>, StoreError> {
        let mut registry = Registry::new();
        C::register(&mut registry)?;

        if let Some(name) = self
            .observers
            .section_names()
            .find(|name| !registry.contains(name))
        {
            return Err(StoreError::UnknownSection(name.to_string()));
        }

        let status = StatusBoard::new(registry.names());
        tracing::debug!(store = %self.name, sections = ?registry, "Config store created");

        Ok(SnapshotStore {
            name: self.name,
            slots: C::default(),
            registry,
            observers: self.observers,
            status,
        })
    }
}

/// Holds the latest good value of every registered section.
pub struct SnapshotStore<C: Sections> {
    name: String,
    slots: C,
    registry: Registry<C>,
    observers: Observers,
    status: StatusBoard,
}

impl<C: Sections> SnapshotStore<C> {
    /// Start building a store. `name` only labels logs and metrics.
    pub fn builder(name: impl Into<String>) -> StoreBuilder<C> {
        StoreBuilder {
            name: name.into(),
            observers: Observers::new(),
            _sections: std::marker::PhantomData,
        }
    }

    /// A store with every section of `C` and no observers.
    pub fn new(name: impl Into<String>) -> Result<Self, StoreError> {
        Self::builder(name).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse `update` and install the result in its section.
    ///
    /// On any error nothing is installed and every section keeps its value.
    pub fn apply_update(&self, update: &RawUpdate) -> Result<UpdateReport, StoreError> {
        let Some(entry) = self.registry.lookup(&update.name) else {
            metrics::record_update(&self.name, &update.name, UpdateResult::UnknownSection);
            return Err(StoreError::UnknownSection(update.name.clone()));
        };

        let value = match entry.apply(&self.slots, &update.data) {
            Ok(value) => value,
            Err(source) => {
                self.status.record_failure(entry.name(), &source);
                metrics::record_update(&self.name, entry.name(), UpdateResult::ParseError);
                return Err(StoreError::ParseError {
                    section: update.name.clone(),
                    source,
                });
            }
        };

        self.status.record_success(entry.name());
        metrics::record_update(&self.name, entry.name(), UpdateResult::Applied);
        metrics::record_sections_ready(&self.name, self.ready_count());

        let observer_failures = self
            .observers
            .notify(&SectionUpdate::new(entry.name(), &*value));
        for failure in &observer_failures {
            metrics::record_observer_failure(&self.name, entry.name());
            tracing::debug!(
                store = %self.name,
                section = entry.name(),
                position = failure.position,
                error = %failure.message,
                "Post-store observer failed"
            );
        }

        Ok(UpdateReport {
            section: entry.name().to_string(),
            observer_failures,
        })
    }

    /// Watcher-facing entry point: apply and log the outcome.
    pub fn on_config_changed(&self, update: &RawUpdate) -> Result<UpdateReport, StoreError> {
        match self.apply_update(update) {
            Ok(report) => {
                tracing::info!(store = %self.name, section = %report.section, "Config section updated");
                for failure in &report.observer_failures {
                    tracing::warn!(
                        store = %self.name,
                        section = %report.section,
                        error = %failure.message,
                        "Observer failed after config update"
                    );
                }
                Ok(report)
            }
            Err(e) => {
                tracing::error!(store = %self.name, error = %e, "Failed to update config. Keeping current value.");
                Err(e)
            }
        }
    }

    /// Deep copy of every section's current value.
    pub fn snapshot(&self) -> C::Snapshot {
        self.slots.snapshot()
    }

    /// Subscribe this store to every registered section on `watcher`.
    pub fn watch_configs<W: Watcher + ?Sized>(self: &Arc<Self>, watcher: &mut W) {
        for name in self.registry.names() {
            let store = Arc::clone(self);
            watcher.watch(
                name,
                Arc::new(move |update: &RawUpdate| {
                    let _ = store.on_config_changed(update);
                }),
            );
        }
    }

    /// Registered section names, in registration order.
    pub fn section_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.names()
    }

    /// True once every section has received a value.
    pub fn is_ready(&self) -> bool {
        self.registry.entries().all(|e| e.is_set(&self.slots))
    }

    /// Names of sections that have not received a value yet.
    pub fn missing_sections(&self) -> Vec<&'static str> {
        self.registry
            .entries()
            .filter(|e| !e.is_set(&self.slots))
            .map(|e| e.name())
            .collect()
    }

    pub fn status(&self, name: &str) -> Option<SectionStatus> {
        self.status.get(name)
    }

    pub fn statuses(&self) -> Vec<(&'static str, SectionStatus)> {
        self.status.all()
    }

    fn ready_count(&self) -> usize {
        self.registry.entries().filter(|e| e.is_set(&self.slots)).count()
    }
}

impl<C: Sections> std::fmt::Debug for SnapshotStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("name", &self.name)
            .field("sections", &self.registry)
            .field("observers", &self.observers)
            .finish()
    }
}

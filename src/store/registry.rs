//! Typed section registry.
//!
//! Maps a section name to the closure that parses a raw bundle into that
//! section's typed slot. Filled once while the store is being built and
//! read-only afterwards.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::raw::RawData;
use crate::error::{SectionError, StoreError};
use crate::store::section::{Section, Slot};

/// Type-erased view of an installed value, handed to observers.
pub trait SectionValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> SectionValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

type Installer<C> =
    Box<dyn Fn(&C, &RawData) -> Result<Arc<dyn SectionValue>, SectionError> + Send + Sync>;
type Probe<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// One registered section.
pub struct Entry<C> {
    name: &'static str,
    install: Installer<C>,
    is_set: Probe<C>,
}

impl<C> Entry<C> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parse `data` and, only if parsing succeeds, install the result.
    pub(crate) fn apply(&self, slots: &C, data: &RawData) -> Result<Arc<dyn SectionValue>, SectionError> {
        (self.install)(slots, data)
    }

    pub(crate) fn is_set(&self, slots: &C) -> bool {
        (self.is_set)(slots)
    }
}

/// Section name to parser table for the slot container `C`.
pub struct Registry<C> {
    entries: Vec<Entry<C>>,
    index: HashMap<&'static str, usize>,
}

impl<C: 'static> Registry<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register section `S`, stored in the slot `slot` selects.
    ///
    /// Registering the same name twice is a construction error.
    pub fn register<S: Section>(&mut self, slot: fn(&C) -> &Slot<S>) -> Result<(), StoreError> {
        if self.index.contains_key(S::NAME) {
            return Err(StoreError::DuplicateSection(S::NAME.to_string()));
        }

        let install: Installer<C> = Box::new(move |slots: &C, data: &RawData| {
            let value = Arc::new(S::from_raw(data)?);
            slot(slots).install(Arc::clone(&value));
            Ok(value as Arc<dyn SectionValue>)
        });

        self.index.insert(S::NAME, self.entries.len());
        self.entries.push(Entry {
            name: S::NAME,
            install,
            is_set: Box::new(move |slots: &C| slot(slots).is_set()),
        });
        Ok(())
    }
}

impl<C> Registry<C> {
    pub fn lookup(&self, name: &str) -> Option<&Entry<C>> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Section names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry<C>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: 'static> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

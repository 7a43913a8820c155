//! Typed sections and their atomic slots.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::config::raw::RawData;
use crate::error::SectionError;

/// A named, independently updatable unit of configuration.
///
/// Values must be self-contained: `Clone` is the deep copy handed to every
/// reader, so a section must not hold handles to external resources.
pub trait Section: Clone + fmt::Debug + Send + Sync + 'static {
    /// Name the watcher delivers updates under.
    const NAME: &'static str;

    /// Parse a complete raw bundle into the typed value.
    fn from_raw(data: &RawData) -> Result<Self, SectionError>;
}

/// Holds the latest installed value of one section.
///
/// Reads and replacements are single atomic pointer operations, so a reader
/// observes either the old or the new value, never a mixture.
pub struct Slot<T> {
    current: ArcSwapOption<T>,
}

impl<T> Slot<T> {
    /// An unset slot.
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::const_empty(),
        }
    }

    /// Atomically replace the stored value.
    pub fn install(&self, value: Arc<T>) {
        self.current.store(Some(value));
    }

    /// Shared reference to the current value.
    pub fn load(&self) -> Option<Arc<T>> {
        self.current.load_full()
    }

    pub fn is_set(&self) -> bool {
        self.current.load().is_some()
    }
}

impl<T: Clone> Slot<T> {
    /// Deep copy of the current value, independent of the slot.
    pub fn snapshot(&self) -> Option<T> {
        self.current.load().as_deref().cloned()
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.current.load().as_deref()).finish()
    }
}

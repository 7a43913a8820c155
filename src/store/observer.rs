//! Post-store observers.
//!
//! Observers run after a section's new value is installed, outside any lock,
//! in registration order: first those registered for that section, then the
//! global ones. A failing or panicking observer is recorded and skipped; it
//! never undoes the install.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::store::registry::SectionValue;
use crate::store::section::Section;

pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Callback invoked with every successfully installed value.
pub type Observer = Arc<dyn Fn(&SectionUpdate<'_>) -> Result<(), ObserverError> + Send + Sync>;

/// The section name and freshly installed value passed to observers.
pub struct SectionUpdate<'a> {
    name: &'a str,
    value: &'a dyn SectionValue,
}

impl<'a> SectionUpdate<'a> {
    pub(crate) fn new(name: &'a str, value: &'a dyn SectionValue) -> Self {
        Self { name, value }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// The installed value, if it is a `S`.
    pub fn value<S: Section>(&self) -> Option<&S> {
        self.value.as_any().downcast_ref()
    }

    pub fn as_any(&self) -> &dyn Any {
        self.value.as_any()
    }
}

impl fmt::Debug for SectionUpdate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionUpdate")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

/// An observer that returned an error or panicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFailure {
    /// Position in the order observers ran for this update.
    pub position: usize,
    pub message: String,
}

/// Ordered observer lists, global and per section.
#[derive(Default, Clone)]
pub struct Observers {
    global: Vec<Observer>,
    by_section: HashMap<String, Vec<Observer>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_global<F>(&mut self, observer: F)
    where
        F: Fn(&SectionUpdate<'_>) -> Result<(), ObserverError> + Send + Sync + 'static,
    {
        self.global.push(Arc::new(observer));
    }

    pub fn add_for_section<F>(&mut self, name: impl Into<String>, observer: F)
    where
        F: Fn(&SectionUpdate<'_>) -> Result<(), ObserverError> + Send + Sync + 'static,
    {
        self.by_section
            .entry(name.into())
            .or_default()
            .push(Arc::new(observer));
    }

    /// Names that have section-specific observers.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.by_section.keys().map(String::as_str)
    }

    /// Run every observer for `update`, returning the ones that failed.
    pub fn notify(&self, update: &SectionUpdate<'_>) -> Vec<ObserverFailure> {
        let scoped = self
            .by_section
            .get(update.name())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut failures = Vec::new();
        for (position, observer) in scoped.iter().chain(self.global.iter()).enumerate() {
            let message = match catch_unwind(AssertUnwindSafe(|| (**observer)(update))) {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(panic) => panic_message(panic.as_ref()),
            };
            failures.push(ObserverFailure { position, message });
        }
        failures
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("global", &self.global.len())
            .field("by_section", &self.by_section.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("observer panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("observer panicked: {}", s)
    } else {
        "observer panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_section_observers_run_before_global() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut observers = Observers::new();

        let c = calls.clone();
        observers.add_global(move |u: &SectionUpdate<'_>| {
            c.lock().unwrap().push(format!("global:{}", u.name()));
            Ok(())
        });
        let c = calls.clone();
        observers.add_for_section("a", move |u: &SectionUpdate<'_>| {
            c.lock().unwrap().push(format!("scoped:{}", u.name()));
            Ok(())
        });

        let value = 7u32;
        observers.notify(&SectionUpdate::new("a", &value));
        observers.notify(&SectionUpdate::new("b", &value));

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["scoped:a", "global:a", "global:b"]
        );
    }

    #[test]
    fn test_failures_are_collected_and_later_observers_still_run() {
        let ran = Arc::new(Mutex::new(false));
        let mut observers = Observers::new();
        observers.add_global(|_: &SectionUpdate<'_>| Err("boom".into()));
        observers.add_global(|_: &SectionUpdate<'_>| panic!("kaput"));
        let r = ran.clone();
        observers.add_global(move |_: &SectionUpdate<'_>| {
            *r.lock().unwrap() = true;
            Ok(())
        });

        let value = String::from("v");
        let failures = observers.notify(&SectionUpdate::new("a", &value));

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0], ObserverFailure { position: 0, message: "boom".into() });
        assert_eq!(failures[1].position, 1);
        assert!(failures[1].message.contains("kaput"));
        assert!(*ran.lock().unwrap());
    }
}

//! Configuration sources that deliver raw updates.
//!
//! # Responsibilities
//! - Let a store subscribe to named sections ([`Watcher::watch`])
//! - Deliver complete bundles, in order, per section
//!
//! # Implementations
//! - [`ManualWatcher`]: updates pushed in-process by the embedding code
//! - [`FileWatcher`]: one TOML file per section in a watched directory

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher as _};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::loader::{SECTION_FILE_EXTENSION, load_raw, section_name};
use crate::config::raw::RawUpdate;
use crate::error::{LoadError, WatchError};

/// Callback receiving raw updates for one section.
pub type RawObserver = Arc<dyn Fn(&RawUpdate) + Send + Sync>;

/// A source of raw updates, keyed by section name.
pub trait Watcher {
    /// Deliver every future update for `name` to `observer`.
    fn watch(&mut self, name: &str, observer: RawObserver);
}

type ObserverMap = HashMap<String, Vec<RawObserver>>;

fn deliver(observers: &ObserverMap, update: &RawUpdate) -> usize {
    let Some(list) = observers.get(&update.name) else {
        return 0;
    };
    for observer in list {
        observer(update);
    }
    list.len()
}

/// In-process watcher: updates are delivered synchronously by [`ManualWatcher::push`].
#[derive(Default)]
pub struct ManualWatcher {
    observers: ObserverMap,
}

impl ManualWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `update` to the observers of its section.
    /// Returns how many observers received it.
    pub fn push(&self, update: &RawUpdate) -> usize {
        let delivered = deliver(&self.observers, update);
        if delivered == 0 {
            tracing::debug!(section = %update.name, "No observers for pushed update");
        }
        delivered
    }
}

impl Watcher for ManualWatcher {
    fn watch(&mut self, name: &str, observer: RawObserver) {
        self.observers.entry(name.to_string()).or_default().push(observer);
    }
}

/// Watches a directory holding one `<section>.toml` file per section.
///
/// Files should be replaced atomically (write elsewhere, then rename), as
/// mounted config volumes do; a file read mid-write is delivered as is.
pub struct FileWatcher {
    dir: PathBuf,
    observers: ObserverMap,
    poll_interval: Duration,
}

impl FileWatcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            observers: HashMap::new(),
            poll_interval: Duration::from_secs(2),
        }
    }

    /// Poll interval used when the platform has no native notifications.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Deliver the current content of every watched section, then keep
    /// delivering changes from a background task.
    ///
    /// Must be called from within a tokio runtime. Dropping the returned
    /// handle stops the watch.
    pub fn start(self) -> Result<WatchHandle, WatchError> {
        let observers = Arc::new(self.observers);

        let (tx, mut rx) = mpsc::unbounded_channel::<PathBuf>();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        for path in event.paths {
                            let _ = tx.send(path);
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(self.poll_interval),
        )?;
        // Watch before the initial sync: a file replaced while it runs
        // still queues an event, and the task re-reads it afterwards.
        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;
        sync_existing(&self.dir, &observers);

        let task_observers = Arc::clone(&observers);
        let task = tokio::spawn(async move {
            while let Some(path) = rx.recv().await {
                let Some(name) = section_name(&path) else {
                    continue;
                };
                if !task_observers.contains_key(name) {
                    continue;
                }
                tracing::info!(section = %name, path = ?path, "Config file change detected, reloading...");
                let read_path = path.clone();
                match tokio::task::spawn_blocking(move || load_raw(&read_path)).await {
                    Ok(loaded) => deliver_loaded(&task_observers, &path, loaded),
                    Err(e) => tracing::error!(path = ?path, "Config file read did not complete: {}", e),
                }
            }
        });

        tracing::info!(dir = ?self.dir, sections = observers.len(), "Config watcher started");
        Ok(WatchHandle { watcher, task })
    }
}

impl Watcher for FileWatcher {
    fn watch(&mut self, name: &str, observer: RawObserver) {
        self.observers.entry(name.to_string()).or_default().push(observer);
    }
}

fn sync_existing(dir: &Path, observers: &ObserverMap) {
    for name in observers.keys() {
        let path = dir.join(format!("{}.{}", name, SECTION_FILE_EXTENSION));
        if path.is_file() {
            deliver_loaded(observers, &path, load_raw(&path));
        } else {
            tracing::warn!(section = %name, path = ?path, "Config file missing; section stays unset");
        }
    }
}

fn deliver_loaded(observers: &ObserverMap, path: &Path, loaded: Result<RawUpdate, LoadError>) {
    match loaded {
        Ok(update) => {
            deliver(observers, &update);
        }
        Err(e) => {
            tracing::error!(path = ?path, "Failed to load config file: {}. Keeping current configuration.", e);
        }
    }
}

/// Keeps a [`FileWatcher`] running.
pub struct WatchHandle {
    watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Stop watching. A delivery already in progress completes first.
    pub async fn stop(self) {
        drop(self.watcher);
        // Deliveries are synchronous, so abort only lands between them.
        self.task.abort();
        let _ = self.task.await;
    }
}

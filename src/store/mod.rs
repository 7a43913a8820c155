//! Snapshot store subsystem.
//!
//! # Data Flow
//! ```text
//! watcher delivers RawUpdate { name, data }
//!     → registry.rs (look up the section's parser)
//!     → section parser (RawData → typed value)
//!     → section.rs Slot (atomic pointer swap)
//!     → observer.rs (post-store callbacks, outside any lock)
//!
//! snapshot():
//!     → every Slot cloned into the aggregate snapshot type
//! ```
//!
//! # Design Decisions
//! - One lock-free slot per section; unrelated sections never contend
//! - A failed parse installs nothing; the previous value stays
//! - Snapshots are owned deep copies; callers can mutate them freely

pub mod observer;
pub mod registry;
pub mod section;
pub mod snapshot;
pub mod status;

pub use observer::{Observer, ObserverError, ObserverFailure, SectionUpdate};
pub use registry::Registry;
pub use section::{Section, Slot};
pub use snapshot::{SnapshotStore, StoreBuilder, UpdateReport};
pub use status::SectionStatus;

use crate::error::StoreError;

/// A statically typed set of section slots and the snapshot assembled from it.
///
/// Implementors own one [`Slot`] per section and list them in
/// [`Sections::register`]; that list is the store's static section table.
pub trait Sections: Default + Send + Sync + 'static {
    /// The aggregate handed to readers.
    type Snapshot: Clone + Send + Sync + 'static;

    /// Register every section slot.
    fn register(registry: &mut Registry<Self>) -> Result<(), StoreError>;

    /// Deep-copy every slot into a new aggregate.
    fn snapshot(&self) -> Self::Snapshot;
}

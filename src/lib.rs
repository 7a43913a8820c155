//! Multi-source dynamic configuration store.
//!
//! Independently updated, loosely typed configuration sections are parsed
//! into typed values and served as one immutable snapshot that any number
//! of threads can read without locking.

pub mod config;
pub mod context;
pub mod error;
pub mod observability;
pub mod revision;
pub mod store;

pub use context::Carrier;
pub use error::{StoreError, SectionError};
pub use revision::{Config, Store};
pub use store::{Section, SnapshotStore};

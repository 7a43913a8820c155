//! Configuration sources and section definitions.
//!
//! # Data Flow
//! ```text
//! section file (TOML) or in-process push
//!     → watcher.rs (detect change, deliver per section)
//!     → loader.rs (file → flat RawUpdate)
//!     → store (schema.rs parser → typed section)
//! ```
//!
//! # Design Decisions
//! - Bundles are flat string maps; typing happens in the section parser
//! - Each delivery is a complete bundle for one section, never a patch
//! - Load errors are logged and the current value kept

pub mod loader;
pub mod raw;
pub mod schema;
pub mod watcher;

pub use raw::{RawData, RawUpdate};
pub use schema::{
    AutoscalerConfig, DeploymentConfig, LoggingConfig, NetworkConfig, ObservabilityConfig,
    TracingConfig,
};
pub use watcher::{FileWatcher, ManualWatcher, Watcher};

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store updates / watcher events
//!     → logging.rs (structured log events, runtime filter reload)
//!     → metrics.rs (update counters, readiness gauge)
//! ```

pub mod logging;
pub mod metrics;

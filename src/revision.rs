//! The revision configuration store.
//!
//! Aggregates the six sections revision reconciliation reads into one
//! statically typed [`Config`] snapshot.

use serde::Serialize;

use crate::config::schema::{
    AutoscalerConfig, DeploymentConfig, LoggingConfig, NetworkConfig, ObservabilityConfig,
    TracingConfig,
};
use crate::error::StoreError;
use crate::store::{Registry, Sections, SnapshotStore, Slot};

/// Name used in logs and metrics for the revision store.
pub const STORE_NAME: &str = "revision";

/// One slot per revision section.
#[derive(Debug, Default)]
pub struct RevisionSections {
    deployment: Slot<DeploymentConfig>,
    network: Slot<NetworkConfig>,
    observability: Slot<ObservabilityConfig>,
    logging: Slot<LoggingConfig>,
    tracing: Slot<TracingConfig>,
    autoscaler: Slot<AutoscalerConfig>,
}

/// Snapshot of every revision section.
///
/// Each field is an owned copy; `None` means the section never received a
/// valid update.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Config {
    pub deployment: Option<DeploymentConfig>,
    pub network: Option<NetworkConfig>,
    pub observability: Option<ObservabilityConfig>,
    pub logging: Option<LoggingConfig>,
    pub tracing: Option<TracingConfig>,
    pub autoscaler: Option<AutoscalerConfig>,
}

impl Config {
    /// True when every section is present.
    pub fn is_complete(&self) -> bool {
        self.deployment.is_some()
            && self.network.is_some()
            && self.observability.is_some()
            && self.logging.is_some()
            && self.tracing.is_some()
            && self.autoscaler.is_some()
    }
}

impl Sections for RevisionSections {
    type Snapshot = Config;

    fn register(registry: &mut Registry<Self>) -> Result<(), StoreError> {
        registry.register::<DeploymentConfig>(|s| &s.deployment)?;
        registry.register::<NetworkConfig>(|s| &s.network)?;
        registry.register::<ObservabilityConfig>(|s| &s.observability)?;
        registry.register::<LoggingConfig>(|s| &s.logging)?;
        registry.register::<TracingConfig>(|s| &s.tracing)?;
        registry.register::<AutoscalerConfig>(|s| &s.autoscaler)?;
        Ok(())
    }

    fn snapshot(&self) -> Config {
        Config {
            deployment: self.deployment.snapshot(),
            network: self.network.snapshot(),
            observability: self.observability.snapshot(),
            logging: self.logging.snapshot(),
            tracing: self.tracing.snapshot(),
            autoscaler: self.autoscaler.snapshot(),
        }
    }
}

/// Store of revision configuration.
pub type Store = SnapshotStore<RevisionSections>;

/// A revision store with no observers.
pub fn new_store() -> Result<Store, StoreError> {
    Store::new(STORE_NAME)
}

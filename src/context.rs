//! Snapshot propagation to downstream code.
//!
//! Two ways to hand a snapshot down a call chain without threading it
//! through every signature:
//! - [`Carrier`]: an explicit call-scoped value (request id plus snapshot)
//! - [`scope`] / [`current`]: a tokio task-local holding the revision
//!   [`Config`] for the duration of a future
//!
//! Both carry immutable data only. Nothing written through them is visible
//! to the store or to other carriers.

use std::future::Future;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::StoreError;
use crate::revision::Config;
use crate::store::{Sections, SnapshotStore};

/// Call-scoped value a snapshot can be attached to.
#[derive(Debug)]
pub struct Carrier<S> {
    request_id: Uuid,
    snapshot: Option<Arc<S>>,
}

impl<S> Carrier<S> {
    /// An empty carrier with a fresh request id.
    pub fn new() -> Self {
        Self::with_request_id(Uuid::new_v4())
    }

    pub fn with_request_id(request_id: Uuid) -> Self {
        Self {
            request_id,
            snapshot: None,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Return a carrier holding `snapshot`, replacing any earlier one.
    pub fn with_snapshot(self, snapshot: S) -> Self {
        Self {
            request_id: self.request_id,
            snapshot: Some(Arc::new(snapshot)),
        }
    }

    /// The attached snapshot.
    pub fn snapshot(&self) -> Result<&S, StoreError> {
        self.snapshot.as_deref().ok_or(StoreError::SnapshotRetrieval)
    }

    /// Shared handle to the attached snapshot, for moving into other tasks.
    pub fn shared_snapshot(&self) -> Result<Arc<S>, StoreError> {
        self.snapshot.clone().ok_or(StoreError::SnapshotRetrieval)
    }

    /// The attached snapshot; panics when none was attached.
    ///
    /// Reading a carrier that never received a snapshot is a bug in the
    /// calling code, so this fails loudly instead of inventing defaults.
    pub fn expect_snapshot(&self) -> &S {
        match self.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => panic!("{} (request {})", e, self.request_id),
        }
    }
}

impl<S> Clone for Carrier<S> {
    fn clone(&self) -> Self {
        Self {
            request_id: self.request_id,
            snapshot: self.snapshot.clone(),
        }
    }
}

impl<S> Default for Carrier<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Attach `snapshot` to `carrier`.
pub fn propagate<S>(carrier: Carrier<S>, snapshot: S) -> Carrier<S> {
    carrier.with_snapshot(snapshot)
}

impl<C: Sections> SnapshotStore<C> {
    /// Attach a fresh snapshot of this store to `carrier`.
    pub fn to_carrier(&self, carrier: Carrier<C::Snapshot>) -> Carrier<C::Snapshot> {
        propagate(carrier, self.snapshot())
    }
}

tokio::task_local! {
    static CURRENT_CONFIG: Arc<Config>;
}

/// Run `fut` with `config` available through [`current`].
pub async fn scope<F: Future>(config: Arc<Config>, fut: F) -> F::Output {
    CURRENT_CONFIG.scope(config, fut).await
}

/// Run `f` with `config` available through [`current`].
pub fn sync_scope<R>(config: Arc<Config>, f: impl FnOnce() -> R) -> R {
    CURRENT_CONFIG.sync_scope(config, f)
}

/// The config of the enclosing [`scope`].
pub fn current() -> Result<Arc<Config>, StoreError> {
    CURRENT_CONFIG
        .try_with(Arc::clone)
        .map_err(|_| StoreError::SnapshotRetrieval)
}

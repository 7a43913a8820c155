//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::time::{Duration, Instant};

use config_store::config::RawUpdate;

pub fn network(ranges: &str) -> RawUpdate {
    RawUpdate::from_pairs("config-network", [("outboundIPRanges", ranges)])
}

pub fn logging(level: &str) -> RawUpdate {
    RawUpdate::from_pairs("config-logging", [("level", level)])
}

pub fn deployment(image: &str) -> RawUpdate {
    RawUpdate::from_pairs("config-deployment", [("queueSidecarImage", image)])
}

/// Poll `check` until it holds or `timeout` passes.
pub async fn eventually<F: Fn() -> bool>(timeout: Duration, check: F) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    check()
}

/// Replace `path` in one step, the way config volume mounts update files,
/// so a watcher never reads a half-written file.
pub fn write_atomically(path: &Path, content: &str) {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content).unwrap();
    std::fs::rename(&tmp, path).unwrap();
}

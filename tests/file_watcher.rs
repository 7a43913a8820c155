//! File watcher driving a store end to end.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use config_store::config::watcher::RawObserver;
use config_store::config::{FileWatcher, RawUpdate, Watcher};
use config_store::revision;

mod common;

const WAIT: Duration = Duration::from_secs(10);

fn network_ranges(store: &revision::Store) -> Option<String> {
    store.snapshot().network.map(|n| n.outbound_ip_ranges)
}

#[tokio::test]
async fn test_initial_sync_loads_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config-network.toml"), "outboundIPRanges = \"10.0.0.0/8\"\n").unwrap();
    fs::write(dir.path().join("config-logging.toml"), "level = \"debug\"\n").unwrap();

    let store = Arc::new(revision::new_store().unwrap());
    let mut watcher = FileWatcher::new(dir.path()).with_poll_interval(Duration::from_millis(100));
    store.watch_configs(&mut watcher);
    let handle = watcher.start().unwrap();

    // Initial sync happens before start returns.
    assert_eq!(network_ranges(&store).as_deref(), Some("10.0.0.0/8"));
    assert!(store.snapshot().logging.is_some());
    assert!(store.missing_sections().contains(&"config-deployment"));

    handle.stop().await;
}

#[tokio::test]
async fn test_file_changes_are_applied_and_bad_ones_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config-network.toml");
    fs::write(&path, "outboundIPRanges = \"10.0.0.0/8\"\n").unwrap();

    let store = Arc::new(revision::new_store().unwrap());
    let mut watcher = FileWatcher::new(dir.path()).with_poll_interval(Duration::from_millis(100));
    store.watch_configs(&mut watcher);
    let handle = watcher.start().unwrap();

    common::write_atomically(&path, "outboundIPRanges = \"172.16.0.0/12\"\n");
    assert!(
        common::eventually(WAIT, || network_ranges(&store).as_deref() == Some("172.16.0.0/12")).await,
        "modification was not applied"
    );

    // Valid TOML, invalid section value: rejected by the parser.
    common::write_atomically(&path, "outboundIPRanges = \"everything\"\n");
    assert!(
        common::eventually(WAIT, || {
            store.status("config-network").map(|s| s.failures).unwrap_or(0) >= 1
        })
        .await,
        "bad value was never delivered"
    );
    assert_eq!(network_ranges(&store).as_deref(), Some("172.16.0.0/12"));

    // A file that is not TOML never reaches the store.
    common::write_atomically(&path, "outboundIPRanges = = =");
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(network_ranges(&store).as_deref(), Some("172.16.0.0/12"));

    handle.stop().await;
}

#[tokio::test]
async fn test_new_section_file_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();

    let store = Arc::new(revision::new_store().unwrap());
    let mut watcher = FileWatcher::new(dir.path()).with_poll_interval(Duration::from_millis(100));
    store.watch_configs(&mut watcher);
    let handle = watcher.start().unwrap();
    assert!(store.snapshot().deployment.is_none());

    common::write_atomically(
        &dir.path().join("config-deployment.toml"),
        "queueSidecarImage = \"gcr.io/queue:v2\"\n",
    );

    assert!(
        common::eventually(WAIT, || {
            store
                .snapshot()
                .deployment
                .map(|d| d.queue_sidecar_image == "gcr.io/queue:v2")
                .unwrap_or(false)
        })
        .await
    );

    handle.stop().await;
}

#[tokio::test]
async fn test_file_replaced_during_initial_sync_is_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config-network.toml");
    fs::write(&path, "outboundIPRanges = \"10.0.0.0/8\"\n").unwrap();

    let store = Arc::new(revision::new_store().unwrap());
    let mut watcher = FileWatcher::new(dir.path()).with_poll_interval(Duration::from_millis(100));
    store.watch_configs(&mut watcher);

    // Replace the file from inside the initial sync, after its first read.
    let replaced = Arc::new(AtomicBool::new(false));
    let writer_path = path.clone();
    let writer_flag = replaced.clone();
    let writer: RawObserver = Arc::new(move |_: &RawUpdate| {
        if !writer_flag.swap(true, Ordering::SeqCst) {
            common::write_atomically(&writer_path, "outboundIPRanges = \"192.168.0.0/16\"\n");
        }
    });
    watcher.watch("config-network", writer);

    let handle = watcher.start().unwrap();
    assert!(replaced.load(Ordering::SeqCst));

    assert!(
        common::eventually(WAIT, || network_ranges(&store).as_deref() == Some("192.168.0.0/16")).await,
        "replacement during initial sync was lost"
    );

    handle.stop().await;
}

//! Snapshots under concurrent updates.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use proptest::prelude::*;

use config_store::config::RawUpdate;
use config_store::revision;

const ROUNDS: usize = 2_000;

fn deployment_round(i: usize) -> RawUpdate {
    RawUpdate::from_pairs(
        "config-deployment",
        [
            ("queueSidecarImage", format!("queue:{}", i)),
            ("progressDeadline", format!("{}s", i + 1)),
        ],
    )
}

fn network_round(i: usize) -> RawUpdate {
    RawUpdate::from_pairs(
        "config-network",
        [
            ("outboundIPRanges", format!("10.{}.0.0/16", i % 256)),
            ("ingress.class", format!("class-{}", i)),
        ],
    )
}

#[test]
fn test_readers_never_see_torn_sections() {
    let store = Arc::new(revision::new_store().unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = [deployment_round as fn(usize) -> RawUpdate, network_round]
        .into_iter()
        .map(|round| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..ROUNDS {
                    store.apply_update(&round(i)).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            let done = done.clone();
            thread::spawn(move || {
                let mut last_deployment = 0;
                let mut last_network = 0;
                while !done.load(Ordering::Acquire) {
                    let snapshot = store.snapshot();

                    if let Some(d) = snapshot.deployment {
                        let i: usize = d.queue_sidecar_image["queue:".len()..].parse().unwrap();
                        // Both fields come from the same bundle.
                        assert_eq!(d.progress_deadline.as_secs() as usize, i + 1);
                        assert!(i >= last_deployment, "deployment went backwards");
                        last_deployment = i;
                    }

                    if let Some(n) = snapshot.network {
                        let i: usize = n.ingress_class["class-".len()..].parse().unwrap();
                        assert_eq!(n.outbound_ip_ranges, format!("10.{}.0.0/16", i % 256));
                        assert!(i >= last_network, "network went backwards");
                        last_network = i;
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Release);
    for reader in readers {
        reader.join().unwrap();
    }

    let last = store.snapshot();
    assert_eq!(last.deployment.unwrap().queue_sidecar_image, format!("queue:{}", ROUNDS - 1));
    assert_eq!(last.network.unwrap().ingress_class, format!("class-{}", ROUNDS - 1));
}

#[test]
fn test_failed_updates_race_with_readers() {
    let store = Arc::new(revision::new_store().unwrap());
    store.apply_update(&network_round(7)).unwrap();

    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for _ in 0..ROUNDS {
                let bad = RawUpdate::from_pairs("config-network", [("outboundIPRanges", "not-a-cidr")]);
                assert!(store.apply_update(&bad).is_err());
            }
        })
    };

    for _ in 0..ROUNDS {
        assert_eq!(store.snapshot().network.unwrap().ingress_class, "class-7");
    }
    writer.join().unwrap();
    assert_eq!(store.status("config-network").unwrap().failures, ROUNDS as u64);
}

#[derive(Debug, Clone)]
enum Op {
    Network { octet: u8, valid: bool },
    Logging { level: usize, valid: bool },
    Unknown,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), any::<bool>()).prop_map(|(octet, valid)| Op::Network { octet, valid }),
        (0..5usize, any::<bool>()).prop_map(|(level, valid)| Op::Logging { level, valid }),
        Just(Op::Unknown),
    ]
}

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

proptest! {
    /// Every snapshot field equals the last successful update to that section.
    #[test]
    fn snapshot_matches_last_good_update(ops in prop::collection::vec(op(), 1..40)) {
        let store = revision::new_store().unwrap();
        let mut network: Option<String> = None;
        let mut logging: Option<String> = None;

        for op in ops {
            match op {
                Op::Network { octet, valid } => {
                    let ranges = if valid { format!("10.{}.0.0/16", octet) } else { format!("bogus-{}", octet) };
                    let result = store.apply_update(&RawUpdate::from_pairs("config-network", [("outboundIPRanges", ranges.clone())]));
                    prop_assert_eq!(result.is_ok(), valid);
                    if valid {
                        network = Some(ranges);
                    }
                }
                Op::Logging { level, valid } => {
                    let value = if valid { LEVELS[level] } else { "loud" };
                    let result = store.apply_update(&RawUpdate::from_pairs("config-logging", [("level", value)]));
                    prop_assert_eq!(result.is_ok(), valid);
                    if valid {
                        logging = Some(value.to_string());
                    }
                }
                Op::Unknown => {
                    prop_assert!(store.apply_update(&RawUpdate::from_pairs("config-unknown", [("k", "v")])).is_err());
                }
            }

            let snapshot = store.snapshot();
            prop_assert_eq!(snapshot.network.map(|n| n.outbound_ip_ranges), network.clone());
            prop_assert_eq!(snapshot.logging.map(|l| l.level.to_string()), logging.clone());
        }
    }

    /// Applying the same bundle again leaves the stored value unchanged.
    #[test]
    fn reapplying_a_bundle_is_idempotent(octet in any::<u8>(), prefix in 8u8..=32) {
        let store = revision::new_store().unwrap();
        let update = RawUpdate::from_pairs("config-network", [("outboundIPRanges", format!("10.{}.0.0/{}", octet, prefix))]);

        store.apply_update(&update).unwrap();
        let first = store.snapshot();
        store.apply_update(&update).unwrap();
        prop_assert_eq!(first, store.snapshot());
    }
}

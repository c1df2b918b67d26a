#![allow(dead_code)]

use std::collections::BTreeSet;

use boxcull::session::KeyCommand;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Short lowercase basenames.
pub fn arb_basename() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

/// Two possibly overlapping basename sets: (images, labels).
pub fn arb_pairing(max: usize) -> impl Strategy<Value = (BTreeSet<String>, BTreeSet<String>)> {
    (
        prop::collection::btree_set(arb_basename(), 0..max),
        prop::collection::btree_set(arb_basename(), 0..max),
        prop::collection::btree_set(arb_basename(), 0..max),
    )
        .prop_map(|(shared, only_images, only_labels)| {
            let images = shared.iter().chain(only_images.iter()).cloned().collect();
            let labels = shared.iter().chain(only_labels.iter()).cloned().collect();
            (images, labels)
        })
}

pub fn arb_key() -> impl Strategy<Value = KeyCommand> {
    prop_oneof![
        4 => Just(KeyCommand::Next),
        4 => Just(KeyCommand::Previous),
        2 => Just(KeyCommand::Reject),
        1 => Just(KeyCommand::Other),
    ]
}

/// Normalized coordinate inside `[0, 1]`.
pub fn arb_unit() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

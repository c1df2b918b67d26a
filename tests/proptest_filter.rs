//! Property tests for the consistency filter over random pairings.

use std::collections::BTreeSet;

use boxcull::filter::{filter_dataset, pair_basenames, FilterOptions, FilterReport};
use proptest::prelude::*;

mod common;
mod proptest_helpers;

use common::{basenames, file_names, TestDataset};
use proptest_helpers::{arb_pairing, proptest_config};

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn filter_leaves_matching_basename_sets((images, labels) in arb_pairing(6)) {
        let ds = TestDataset::new();
        for name in &images {
            ds.image(name);
        }
        for name in &labels {
            ds.label(name, "0 0.5 0.5 0.2 0.2\n");
        }
        let config = ds.config();

        let report = filter_dataset(&config, &FilterOptions::default()).expect("filter dataset");

        let shared: BTreeSet<String> =
            images.intersection(&labels).cloned().collect();
        prop_assert_eq!(report.paired, shared.len());
        prop_assert_eq!(report.moves.len(), images.len() + labels.len() - 2 * shared.len());
        prop_assert_eq!(&basenames(&ds.images_dir(), "bmp"), &shared);
        prop_assert_eq!(&basenames(&ds.labels_dir(), "txt"), &shared);
        prop_assert_eq!(file_names(&ds.quarantine_dir()).len(), report.moves.len());

        let paired: BTreeSet<String> = pair_basenames(&config)
            .expect("pair basenames")
            .into_iter()
            .map(|s| s.basename)
            .collect();
        prop_assert_eq!(&paired, &shared);

        let again = filter_dataset(&config, &FilterOptions::default()).expect("second pass");
        prop_assert!(again.is_clean());
    }

    #[test]
    fn dry_run_plans_the_same_moves((images, labels) in arb_pairing(6)) {
        let ds = TestDataset::new();
        for name in &images {
            ds.image(name);
        }
        for name in &labels {
            ds.label(name, "0 0.5 0.5 0.2 0.2\n");
        }
        let config = ds.config();

        let planned = filter_dataset(&config, &FilterOptions { dry_run: true }).expect("dry run");
        prop_assert!(file_names(&ds.quarantine_dir()).is_empty());

        let done = filter_dataset(&config, &FilterOptions::default()).expect("filter dataset");
        let destinations = |report: &FilterReport| {
            let mut moves: Vec<_> = report
                .moves
                .iter()
                .map(|m| (m.basename.clone(), m.from.clone(), m.to.clone()))
                .collect();
            moves.sort();
            moves
        };
        prop_assert_eq!(destinations(&planned), destinations(&done));
    }
}

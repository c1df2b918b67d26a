//! Integration tests for the consistency filter.

use std::fs;

use boxcull::config::CollisionPolicy;
use boxcull::filter::{filter_dataset, pair_basenames, FileKind, FilterOptions};
use boxcull::CullError;

mod common;
use common::{basenames, file_names, name_set, TestDataset};

fn sample_dataset() -> TestDataset {
    let ds = TestDataset::new();
    ds.sample("paired_a").sample("paired_b");
    ds.image("no_label_1").image("no_label_2");
    ds.label("no_image", "0 0.5 0.5 0.1 0.1\n");
    ds
}

#[test]
fn filter_quarantines_orphans_on_both_sides() {
    let ds = sample_dataset();
    let config = ds.config();

    let report = filter_dataset(&config, &FilterOptions::default()).expect("filter dataset");

    assert_eq!(report.images_scanned, 4);
    assert_eq!(report.labels_scanned, 3);
    assert_eq!(report.paired, 2);
    assert_eq!(report.orphan_image_count(), 2);
    assert_eq!(report.orphan_label_count(), 1);

    assert_eq!(
        file_names(&ds.quarantine_dir()),
        name_set(&["no_image.txt", "no_label_1.bmp", "no_label_2.bmp"])
    );
    assert_eq!(
        basenames(&ds.images_dir(), "bmp"),
        basenames(&ds.labels_dir(), "txt")
    );
}

#[test]
fn image_moves_come_before_label_moves() {
    let ds = sample_dataset();
    let report = filter_dataset(&ds.config(), &FilterOptions::default()).expect("filter dataset");

    let kinds: Vec<FileKind> = report.moves.iter().map(|m| m.kind).collect();
    assert_eq!(kinds, vec![FileKind::Image, FileKind::Image, FileKind::Label]);
}

#[test]
fn second_run_moves_nothing() {
    let ds = sample_dataset();
    let config = ds.config();

    filter_dataset(&config, &FilterOptions::default()).expect("first pass");
    let second = filter_dataset(&config, &FilterOptions::default()).expect("second pass");

    assert!(second.is_clean());
    assert_eq!(second.paired, 2);
    assert_eq!(file_names(&ds.quarantine_dir()).len(), 3);
}

#[test]
fn working_set_is_the_paired_basenames() {
    let ds = sample_dataset();
    let config = ds.config();
    filter_dataset(&config, &FilterOptions::default()).expect("filter dataset");

    let mut names: Vec<String> = pair_basenames(&config)
        .expect("pair basenames")
        .into_iter()
        .map(|s| s.basename)
        .collect();
    names.sort();
    assert_eq!(names, vec!["paired_a", "paired_b"]);
}

#[test]
fn other_image_extensions_are_ignored() {
    let ds = TestDataset::new();
    ds.sample("a");
    fs::write(ds.images_dir().join("a.png"), b"not considered").expect("write png");
    fs::write(ds.images_dir().join("b.png"), b"not considered").expect("write png");

    let report = filter_dataset(&ds.config(), &FilterOptions::default()).expect("filter dataset");

    assert!(report.is_clean());
    assert!(ds.images_dir().join("b.png").exists());
}

#[test]
fn images_and_labels_may_share_a_directory() {
    let ds = TestDataset::new();
    let dir = ds.images_dir();
    common::write_bmp(&dir.join("x.bmp"), 4, 4);
    common::write_bmp(&dir.join("y.bmp"), 4, 4);
    fs::write(dir.join("x.txt"), "0 0.5 0.5 1 1\n").expect("write label");
    fs::write(dir.join("z.txt"), "0 0.5 0.5 1 1\n").expect("write label");

    let mut config = ds.config();
    config.labels_dir = dir.clone();
    filter_dataset(&config, &FilterOptions::default()).expect("filter dataset");

    assert_eq!(file_names(&dir), name_set(&["x.bmp", "x.txt"]));
    assert_eq!(file_names(&ds.quarantine_dir()), name_set(&["y.bmp", "z.txt"]));
}

#[test]
fn collision_fails_by_default() {
    let ds = TestDataset::new();
    ds.image("dup");
    let config = ds.config();
    fs::write(ds.quarantine_dir().join("dup.bmp"), b"earlier").expect("seed quarantine");

    let err = filter_dataset(&config, &FilterOptions::default()).unwrap_err();

    assert!(matches!(err, CullError::QuarantineCollision { .. }));
    assert!(ds.images_dir().join("dup.bmp").exists());
}

#[test]
fn collision_rename_keeps_both_files() {
    let ds = TestDataset::new();
    ds.image("dup");
    let config = ds.config_with(CollisionPolicy::Rename);
    fs::write(ds.quarantine_dir().join("dup.bmp"), b"earlier").expect("seed quarantine");

    let report = filter_dataset(&config, &FilterOptions::default()).expect("filter dataset");

    assert_eq!(report.moves[0].to, ds.quarantine_dir().join("dup_1.bmp"));
    assert_eq!(
        fs::read(ds.quarantine_dir().join("dup.bmp")).expect("read earlier"),
        b"earlier"
    );
}

#[test]
fn case_variants_of_an_orphan_move_in_one_pass() {
    let ds = TestDataset::new();
    ds.sample("kept");
    common::write_bmp(&ds.images_dir().join("a.bmp"), 4, 4);
    common::write_bmp(&ds.images_dir().join("a.BMP"), 4, 4);
    let config = ds.config();

    let first = filter_dataset(&config, &FilterOptions::default()).expect("first pass");
    let second = filter_dataset(&config, &FilterOptions::default()).expect("second pass");

    assert_eq!(first.orphan_image_count(), 2);
    assert!(second.is_clean());
    assert_eq!(file_names(&ds.quarantine_dir()), name_set(&["a.BMP", "a.bmp"]));
    assert_eq!(file_names(&ds.images_dir()), name_set(&["kept.bmp"]));
}

#[test]
fn case_variants_of_a_paired_basename_stay_put() {
    let ds = TestDataset::new();
    ds.sample("a");
    common::write_bmp(&ds.images_dir().join("a.BMP"), 4, 4);
    let config = ds.config();

    let report = filter_dataset(&config, &FilterOptions::default()).expect("filter dataset");

    assert!(report.is_clean());
    assert_eq!(report.paired, 1);
    let samples = pair_basenames(&config).expect("pair basenames");
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].files().len(), 3);
}

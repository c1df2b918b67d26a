//! Image/label pairing checks.
//!
//! The filter takes one snapshot of the images and labels directories, works
//! out which basenames exist on only one side, and moves those files into
//! quarantine. Every decision is made from the snapshot: files are never
//! re-listed between moves, which is what makes a second run a no-op.
//!
//! Listing order is whatever the filesystem returns. It is not sorted, so the
//! order of moves (and of the review working set) can differ between hosts or
//! runs.

mod report;

pub use report::{FileKind, FilterReport, OrphanMove};

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::config::{Config, LABEL_EXTENSION};
use crate::error::CullError;

/// One basename in a listing.
///
/// Extensions match case-insensitively, so `a.png` and `a.PNG` are the same
/// basename. The first file listed is `path`; the rest are `duplicates` and
/// always move together with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetFile {
    pub basename: String,
    pub path: PathBuf,
    pub duplicates: Vec<PathBuf>,
}

impl DatasetFile {
    /// Every file carrying this basename, in listing order.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.path).chain(self.duplicates.iter())
    }
}

/// A basename that has both an image and a label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    pub basename: String,
    /// The image shown during review.
    pub image_path: PathBuf,
    /// The label drawn during review.
    pub label_path: PathBuf,
    /// Further images or labels with the same basename.
    pub duplicates: Vec<PathBuf>,
}

impl Sample {
    /// Every file that leaves the dataset when this sample is rejected.
    pub fn files(&self) -> Vec<&Path> {
        [&self.image_path, &self.label_path]
            .into_iter()
            .chain(self.duplicates.iter())
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Options for a filter pass.
#[derive(Clone, Debug, Default)]
pub struct FilterOptions {
    /// Report what would move without touching the filesystem.
    pub dry_run: bool,
}

/// Basename listings of the images and labels directories taken at one
/// point in time.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub images: Vec<DatasetFile>,
    pub labels: Vec<DatasetFile>,
}

impl Snapshot {
    /// List both directories of `config`.
    pub fn scan(config: &Config) -> Result<Self, CullError> {
        Ok(Self {
            images: list_basenames(&config.images_dir, config.image_extension.as_str())?,
            labels: list_basenames(&config.labels_dir, LABEL_EXTENSION)?,
        })
    }

    /// Images with no label of the same basename, in listing order.
    pub fn orphan_images(&self) -> Vec<&DatasetFile> {
        let labels = basename_set(&self.labels);
        self.images
            .iter()
            .filter(|f| !labels.contains(f.basename.as_str()))
            .collect()
    }

    /// Labels with no image of the same basename, in listing order.
    pub fn orphan_labels(&self) -> Vec<&DatasetFile> {
        let images = basename_set(&self.images);
        self.labels
            .iter()
            .filter(|f| !images.contains(f.basename.as_str()))
            .collect()
    }

    /// Paired samples in image listing order.
    pub fn paired(&self) -> Vec<Sample> {
        let labels: HashMap<&str, &DatasetFile> = self
            .labels
            .iter()
            .map(|f| (f.basename.as_str(), f))
            .collect();

        self.images
            .iter()
            .filter_map(|image| {
                labels
                    .get(image.basename.as_str())
                    .map(|label| Sample {
                        basename: image.basename.clone(),
                        image_path: image.path.clone(),
                        label_path: label.path.clone(),
                        duplicates: image
                            .duplicates
                            .iter()
                            .chain(label.duplicates.iter())
                            .cloned()
                            .collect(),
                    })
            })
            .collect()
    }
}

/// Quarantine every image without a label and every label without an image.
///
/// All image moves happen before any label move. Every file of an orphaned
/// basename moves, duplicates included.
pub fn filter_dataset(config: &Config, opts: &FilterOptions) -> Result<FilterReport, CullError> {
    let snapshot = Snapshot::scan(config)?;
    let quarantine = config.quarantine();

    let mut report = FilterReport {
        images_scanned: snapshot.images.len(),
        labels_scanned: snapshot.labels.len(),
        paired: snapshot.images.len() - snapshot.orphan_images().len(),
        dry_run: opts.dry_run,
        moves: Vec::new(),
    };

    let planned = snapshot
        .orphan_images()
        .into_iter()
        .map(|f| (FileKind::Image, f))
        .chain(
            snapshot
                .orphan_labels()
                .into_iter()
                .map(|f| (FileKind::Label, f)),
        );

    for (kind, file) in planned {
        for path in file.paths() {
            let to = if opts.dry_run {
                quarantine.destination_for(path)?
            } else {
                let to = quarantine.move_into(path)?;
                info!("quarantined unpaired {:?} {}", kind, path.display());
                to
            };

            report.add(OrphanMove {
                kind,
                basename: file.basename.clone(),
                from: path.clone(),
                to,
            });
        }
    }

    Ok(report)
}

/// Build the review working set from a fresh snapshot.
pub fn pair_basenames(config: &Config) -> Result<Vec<Sample>, CullError> {
    Ok(Snapshot::scan(config)?.paired())
}

/// List the files directly inside `dir` whose extension matches `extension`
/// (case-insensitive), grouped by basename in listing order.
pub fn list_basenames(dir: &Path, extension: &str) -> Result<Vec<DatasetFile>, CullError> {
    let mut files: Vec<DatasetFile> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| CullError::DirectoryListing {
            path: dir.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(basename) = strip_extension(entry.path(), extension) else {
            continue;
        };

        match index.get(&basename) {
            Some(&at) => {
                debug!("duplicate basename {}", entry.path().display());
                files[at].duplicates.push(entry.path().to_path_buf());
            }
            None => {
                index.insert(basename.clone(), files.len());
                files.push(DatasetFile {
                    basename,
                    path: entry.path().to_path_buf(),
                    duplicates: Vec::new(),
                });
            }
        }
    }

    Ok(files)
}

/// Returns the file stem if `path` carries `extension`.
fn strip_extension(path: &Path, extension: &str) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !ext.eq_ignore_ascii_case(extension) {
        return None;
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

fn basename_set(files: &[DatasetFile]) -> HashSet<&str> {
    files.iter().map(|f| f.basename.as_str()).collect()
}

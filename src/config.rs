//! Run configuration.
//!
//! A [`Config`] is built once from the command line, checked with
//! [`Config::prepare`], and then passed by reference to the consistency filter
//! and the review session. Nothing in the crate reads process-wide state.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CullError;
use crate::quarantine::Quarantine;

/// Image extensions the reviewer can decode.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "webp"];

/// Extension of label files. Not configurable.
pub const LABEL_EXTENSION: &str = "txt";

pub const DEFAULT_IMAGES_DIR: &str = "./";
pub const DEFAULT_LABELS_DIR: &str = "./";
pub const DEFAULT_QUARANTINE_DIR: &str = "./IncorrectData/";
pub const DEFAULT_IMAGE_EXTENSION: &str = ".png";

/// The image extension selected for a run, stored lowercase without the dot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageExtension(String);

impl ImageExtension {
    /// Parse a user-supplied extension such as `.png`, `png` or `.JPG`.
    pub fn parse(raw: &str) -> Result<Self, CullError> {
        let normalized = raw.trim().trim_start_matches('.').to_ascii_lowercase();
        if SUPPORTED_IMAGE_EXTENSIONS.contains(&normalized.as_str()) {
            Ok(Self(normalized))
        } else {
            Err(CullError::UnsupportedExtension(format!(
                "'{}' (supported: {})",
                raw,
                SUPPORTED_IMAGE_EXTENSIONS.join(", ")
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ImageExtension {
    fn default() -> Self {
        Self("png".to_string())
    }
}

/// What to do when a quarantine destination already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Refuse the move and report an error.
    #[default]
    Fail,
    /// Replace the existing file.
    Overwrite,
    /// Append `_1`, `_2`, ... to the file stem until the name is free.
    Rename,
}

impl CollisionPolicy {
    pub fn parse(raw: &str) -> Result<Self, CullError> {
        match raw {
            "fail" => Ok(Self::Fail),
            "overwrite" => Ok(Self::Overwrite),
            "rename" => Ok(Self::Rename),
            other => Err(CullError::InvalidOption(format!(
                "unknown collision policy '{}' (supported: fail, overwrite, rename)",
                other
            ))),
        }
    }
}

/// Immutable configuration for one run.
#[derive(Clone, Debug)]
pub struct Config {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
    pub quarantine_dir: PathBuf,
    pub image_extension: ImageExtension,
    pub on_collision: CollisionPolicy,
    /// Seed for box colors; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            labels_dir: PathBuf::from(DEFAULT_LABELS_DIR),
            quarantine_dir: PathBuf::from(DEFAULT_QUARANTINE_DIR),
            image_extension: ImageExtension::default(),
            on_collision: CollisionPolicy::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Check the images and labels directories exist and create the
    /// quarantine directory if it is missing.
    pub fn prepare(&self) -> Result<(), CullError> {
        require_dir(&self.images_dir, "images path")?;
        require_dir(&self.labels_dir, "labels path")?;

        if self.quarantine_dir.exists() && !self.quarantine_dir.is_dir() {
            return Err(CullError::InvalidPath {
                path: self.quarantine_dir.clone(),
                message: "quarantine path exists but is not a directory".to_string(),
            });
        }

        fs::create_dir_all(&self.quarantine_dir).map_err(|source| CullError::InvalidPath {
            path: self.quarantine_dir.clone(),
            message: format!("cannot create quarantine directory: {source}"),
        })?;

        // Quarantining into a dataset directory would re-list moved files.
        let quarantine = fs::canonicalize(&self.quarantine_dir)?;
        for (dir, what) in [(&self.images_dir, "images path"), (&self.labels_dir, "labels path")] {
            if fs::canonicalize(dir)? == quarantine {
                return Err(CullError::InvalidPath {
                    path: self.quarantine_dir.clone(),
                    message: format!("quarantine path must differ from the {what}"),
                });
            }
        }
        Ok(())
    }

    pub fn quarantine(&self) -> Quarantine {
        Quarantine::new(self.quarantine_dir.clone(), self.on_collision)
    }
}

fn require_dir(path: &Path, what: &str) -> Result<(), CullError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CullError::InvalidPath {
            path: path.to_path_buf(),
            message: format!("{what} is not an existing directory"),
        })
    }
}

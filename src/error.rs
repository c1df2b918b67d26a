use std::path::PathBuf;
use thiserror::Error;

/// The main error type for boxcull operations.
#[derive(Debug, Error)]
pub enum CullError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path {path}: {message}")]
    InvalidPath { path: PathBuf, message: String },

    #[error("Unsupported image extension: {0}")]
    UnsupportedExtension(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Malformed label line in {path} at line {line}: {message}")]
    MalformedLabelLine {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to list directory {path}: {source}")]
    DirectoryListing {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Quarantine destination already exists: {path}")]
    QuarantineCollision { path: PathBuf },

    #[error("Failed to move {from} to {to}: {source}")]
    QuarantineMove {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source}; could not move {stranded:?} back out of quarantine")]
    PartialQuarantine {
        #[source]
        source: Box<CullError>,
        stranded: Vec<PathBuf>,
    },

    #[error("Failed to serialize report: {0}")]
    ReportJson(#[from] serde_json::Error),

    #[error("Display error: {0}")]
    Display(String),
}

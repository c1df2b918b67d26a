#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use boxcull::config::{CollisionPolicy, Config, ImageExtension};

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// A dataset laid out as `images/`, `labels/` and `quarantine/` under a
/// temporary root.
pub struct TestDataset {
    pub root: tempfile::TempDir,
}

impl TestDataset {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(root.path().join("images")).expect("create images dir");
        fs::create_dir_all(root.path().join("labels")).expect("create labels dir");
        Self { root }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.path().join("images")
    }

    pub fn labels_dir(&self) -> PathBuf {
        self.root.path().join("labels")
    }

    pub fn quarantine_dir(&self) -> PathBuf {
        self.root.path().join("quarantine")
    }

    /// Write a 16x16 BMP image.
    pub fn image(&self, basename: &str) -> &Self {
        write_bmp(&self.images_dir().join(format!("{basename}.bmp")), 16, 16);
        self
    }

    pub fn label(&self, basename: &str, content: &str) -> &Self {
        fs::write(self.labels_dir().join(format!("{basename}.txt")), content)
            .expect("write label file");
        self
    }

    /// Image plus a one-box label.
    pub fn sample(&self, basename: &str) -> &Self {
        self.image(basename).label(basename, "0 0.5 0.5 0.5 0.5\n")
    }

    pub fn config(&self) -> Config {
        self.config_with(CollisionPolicy::Fail)
    }

    pub fn config_with(&self, on_collision: CollisionPolicy) -> Config {
        let config = Config {
            images_dir: self.images_dir(),
            labels_dir: self.labels_dir(),
            quarantine_dir: self.quarantine_dir(),
            image_extension: ImageExtension::parse(".bmp").expect("bmp is supported"),
            on_collision,
            seed: Some(1),
        };
        config.prepare().expect("prepare config");
        config
    }
}

/// File names directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> BTreeSet<String> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.expect("read dir entry"))
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => BTreeSet::new(),
    }
}

/// Basenames of files in `dir` with extension `ext`, sorted.
pub fn basenames(dir: &Path, ext: &str) -> BTreeSet<String> {
    file_names(dir)
        .into_iter()
        .filter_map(|name| {
            let path = Path::new(&name);
            if path.extension()?.to_str()? != ext {
                return None;
            }
            path.file_stem()?.to_str().map(str::to_string)
        })
        .collect()
}

pub fn name_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

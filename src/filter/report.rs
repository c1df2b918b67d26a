//! Report of what the consistency filter found and moved.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Which side of a pair a file belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Image,
    Label,
}

/// One file relocated (or, in a dry run, to be relocated) into quarantine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrphanMove {
    pub kind: FileKind,
    pub basename: String,
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Summary of one consistency filter pass.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FilterReport {
    /// Distinct image basenames found.
    pub images_scanned: usize,
    /// Distinct label basenames found.
    pub labels_scanned: usize,
    /// Basenames with both an image and a label.
    pub paired: usize,
    /// True if no files were actually moved.
    pub dry_run: bool,
    /// Image moves first, then label moves, each in listing order.
    pub moves: Vec<OrphanMove>,
}

impl FilterReport {
    pub fn add(&mut self, mv: OrphanMove) {
        self.moves.push(mv);
    }

    pub fn orphan_image_count(&self) -> usize {
        self.moves.iter().filter(|m| m.kind == FileKind::Image).count()
    }

    pub fn orphan_label_count(&self) -> usize {
        self.moves.iter().filter(|m| m.kind == FileKind::Label).count()
    }

    /// Returns true if the dataset was already consistent.
    pub fn is_clean(&self) -> bool {
        self.moves.is_empty()
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Scanned {} image(s) and {} label(s): {} paired",
            self.images_scanned, self.labels_scanned, self.paired
        )?;

        if self.is_clean() {
            return writeln!(f, "Dataset is consistent: nothing to quarantine");
        }

        let verb = if self.dry_run {
            "Would quarantine"
        } else {
            "Quarantined"
        };

        for (kind, count, what) in [
            (FileKind::Image, self.orphan_image_count(), "image(s) without labels"),
            (FileKind::Label, self.orphan_label_count(), "label(s) without images"),
        ] {
            if count == 0 {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "{} {} {}:", verb, count, what)?;
            for mv in self.moves.iter().filter(|m| m.kind == kind) {
                writeln!(f, "  - {} -> {}", mv.from.display(), mv.to.display())?;
            }
        }

        Ok(())
    }
}

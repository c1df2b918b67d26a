//! Moving files into the quarantine directory.
//!
//! Both the consistency filter and the review session go through
//! [`Quarantine`], so the collision policy applies the same way to orphaned
//! files and to rejected samples.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::CollisionPolicy;
use crate::error::CullError;

/// The quarantine directory plus the policy for name collisions inside it.
#[derive(Clone, Debug)]
pub struct Quarantine {
    dir: PathBuf,
    policy: CollisionPolicy,
}

impl Quarantine {
    pub fn new(dir: impl Into<PathBuf>, policy: CollisionPolicy) -> Self {
        Self {
            dir: dir.into(),
            policy,
        }
    }

    /// Where `source` would land, after applying the collision policy.
    ///
    /// Fails with [`CullError::QuarantineCollision`] under the `fail` policy.
    pub fn destination_for(&self, source: &Path) -> Result<PathBuf, CullError> {
        let file_name = source.file_name().ok_or_else(|| CullError::InvalidPath {
            path: source.to_path_buf(),
            message: "path has no file name".to_string(),
        })?;
        let dest = self.dir.join(file_name);

        if !dest.exists() {
            return Ok(dest);
        }

        match self.policy {
            CollisionPolicy::Fail => Err(CullError::QuarantineCollision { path: dest }),
            CollisionPolicy::Overwrite => {
                warn!("overwriting existing quarantined file {}", dest.display());
                Ok(dest)
            }
            CollisionPolicy::Rename => Ok(free_name(&dest)),
        }
    }

    /// Move one file into quarantine, keeping its file name when possible.
    pub fn move_into(&self, source: &Path) -> Result<PathBuf, CullError> {
        let dest = self.destination_for(source)?;
        move_file(source, &dest)?;
        debug!("quarantined {} -> {}", source.display(), dest.display());
        Ok(dest)
    }

    /// Move the files of one sample together.
    ///
    /// Either every file ends up in quarantine or none does: collisions are
    /// checked before anything moves, and if a later move fails the earlier
    /// ones are moved back.
    pub fn move_together(&self, sources: &[&Path]) -> Result<Vec<PathBuf>, CullError> {
        let mut plan: Vec<(&Path, PathBuf)> = Vec::with_capacity(sources.len());
        for &source in sources {
            let dest = self.destination_for(source)?;
            if plan.iter().any(|(_, taken)| *taken == dest) {
                return Err(CullError::QuarantineCollision { path: dest });
            }
            plan.push((source, dest));
        }

        transfer_all(&plan, move_file)?;

        for (from, to) in &plan {
            debug!("quarantined {} -> {}", from.display(), to.display());
        }
        Ok(plan.into_iter().map(|(_, dest)| dest).collect())
    }
}

/// Run every move in `plan`. On failure, undo the moves already made in
/// reverse order; files that cannot be moved back are reported in the error.
fn transfer_all<F>(plan: &[(&Path, PathBuf)], mut mover: F) -> Result<(), CullError>
where
    F: FnMut(&Path, &Path) -> Result<(), CullError>,
{
    for (done, (from, to)) in plan.iter().enumerate() {
        let Err(err) = mover(from, to.as_path()) else {
            continue;
        };

        let mut stranded = Vec::new();
        for (original, moved) in plan[..done].iter().rev() {
            if let Err(restore_err) = mover(moved.as_path(), original) {
                warn!(
                    "could not restore {} to {}: {}",
                    moved.display(),
                    original.display(),
                    restore_err
                );
                stranded.push(moved.clone());
            }
        }

        if stranded.is_empty() {
            return Err(err);
        }
        return Err(CullError::PartialQuarantine {
            source: Box::new(err),
            stranded,
        });
    }
    Ok(())
}

/// Rename `from` to `to`, copying and deleting when a plain rename is refused
/// (for example across filesystems).
fn move_file(from: &Path, to: &Path) -> Result<(), CullError> {
    let rename_err = match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };

    if rename_err.kind() == io::ErrorKind::NotFound || !from.is_file() {
        return Err(move_error(from, to, rename_err));
    }

    fs::copy(from, to)
        .and_then(|_| fs::remove_file(from))
        .map_err(|_| move_error(from, to, rename_err))
}

fn move_error(from: &Path, to: &Path, source: io::Error) -> CullError {
    CullError::QuarantineMove {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}

fn free_name(taken: &Path) -> PathBuf {
    let parent = taken.parent().unwrap_or_else(|| Path::new(""));
    let stem = taken
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = taken
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1u64..)
        .map(|n| parent.join(format!("{stem}_{n}{ext}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| taken.to_path_buf())
}

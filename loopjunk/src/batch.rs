//! Best-effort directory-to-directory obfuscation.
//!
//! One entry's failure never stops the rest of a batch: non-files,
//! unreadable files and failed writes are logged, recorded in the summary
//! and skipped. Only the directory-level setup can fail the whole run.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rand::Rng;
use thiserror::Error;

use crate::obfuscate::{ObfuscationConfig, obfuscate_reads, obfuscate_writes};

/// Which transformation a batch run applies to every file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    /// Couple junk-variable updates to real state.
    Reads,

    /// Embed identities around statements that touch real state.
    Writes,
}

/// A directory-level failure. Per-file failures never surface here; they
/// are recorded in the [`BatchSummary`].
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read source directory {}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create destination directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files transformed and written.
    pub succeeded: usize,

    /// Entries that could not be processed: non-files, unreadable files,
    /// failed writes.
    pub failed: Vec<PathBuf>,
}

/// Applies `transform` to every file in `src`, writing the result under
/// the same filename in `dest`. `dest` is created if missing.
///
/// The summary carries the tally and the paths of the failed entries; it
/// is also logged once the batch finishes.
pub fn run_batch<Rand: Rng>(
    src: &Path,
    dest: &Path,
    transform: Transform,
    cfg: &ObfuscationConfig,
    rng: &mut Rand,
) -> Result<BatchSummary, BatchError> {
    let entries = fs::read_dir(src).map_err(|source| BatchError::ReadDir {
        path: src.to_path_buf(),
        source,
    })?;
    fs::create_dir_all(dest).map_err(|source| BatchError::CreateDir {
        path: dest.to_path_buf(),
        source,
    })?;

    let mut summary = BatchSummary::default();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            },
        };

        let path = entry.path();
        let out = dest.join(entry.file_name());
        match process_file(&path, &out, transform, cfg, rng) {
            Ok(()) => {
                tracing::debug!(file = %path.display(), "transformed");
                summary.succeeded += 1;
            },
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    error = %e,
                    "failed to process"
                );
                summary.failed.push(path);
            },
        }
    }

    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed.len(),
        dest = %dest.display(),
        "batch finished"
    );
    Ok(summary)
}

/// Read, transform, write. Any error bubbles up to the per-file handler
/// in [`run_batch`].
fn process_file<Rand: Rng>(
    src: &Path,
    dest: &Path,
    transform: Transform,
    cfg: &ObfuscationConfig,
    rng: &mut Rand,
) -> io::Result<()> {
    if !src.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }

    let content = fs::read_to_string(src)?;
    let content = match transform {
        Transform::Reads => obfuscate_reads(&content, cfg, rng),
        Transform::Writes => obfuscate_writes(&content, cfg, rng),
    };

    fs::write(dest, content)
}

//! Incremental rebuild gate.
//!
//! Decides whether a source image's outputs are stale using filesystem
//! modification times only: an image is re-encoded when any expected output
//! is missing, or when the source is strictly newer than any existing
//! output. `--force` short-circuits everything to stale.
//!
//! This is deliberately not content-addressed. Touching a file without
//! changing its bytes triggers a full re-encode, and restoring an old backup
//! with a stale mtime can wrongly skip a needed re-encode. Both are accepted
//! tradeoffs of keeping the gate to a handful of `stat` calls per image;
//! swapping in content hashing would change the performance profile of every
//! no-op rebuild.

use crate::settings::{OUTPUT_EXTENSION, SizeClass};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Gate verdict for one source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Outputs exist and are at least as new as the source.
    Fresh,
    /// At least one output is missing or older than the source.
    Stale,
}

/// The output variant paths a source image is expected to have: one file
/// per size class, named by the image id.
pub fn expected_outputs(output_dir: &Path, image_id: &str, classes: &[SizeClass]) -> Vec<PathBuf> {
    classes
        .iter()
        .map(|class| {
            output_dir
                .join(&class.name)
                .join(format!("{image_id}.{OUTPUT_EXTENSION}"))
        })
        .collect()
}

/// Compare a source against its expected outputs.
///
/// Errors only on an unreadable source; a missing output is simply stale.
pub fn check(source: &Path, outputs: &[PathBuf], force: bool) -> io::Result<Freshness> {
    if force {
        return Ok(Freshness::Stale);
    }

    let source_mtime = mtime(source)?;

    for output in outputs {
        let output_mtime = match std::fs::metadata(output) {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Freshness::Stale),
            Err(e) => return Err(e),
        };
        if source_mtime > output_mtime {
            return Ok(Freshness::Stale);
        }
    }

    Ok(Freshness::Fresh)
}

fn mtime(path: &Path) -> io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}

//! Orphan reconciliation: deleting outputs whose sources are gone.
//!
//! Two levels, both idempotent:
//!
//! - **Within a gallery** — every size-class directory is swept for encoded
//!   files whose stem is no longer a current source id. One removed image
//!   counts once, no matter how many size classes it had outputs in.
//! - **Across the run** — gallery output directories whose name is no longer
//!   a discovered gallery are removed wholesale.
//!
//! Removal failures (permissions, races with external tooling) are collected
//! as warnings and never abort the sweep: a leftover orphan costs disk
//! space, not correctness, and the next run retries it.

use crate::settings::{OUTPUT_EXTENSION, SizeClass};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

/// Result of sweeping one gallery's size-class directories.
#[derive(Debug, Default)]
pub struct OrphanSweep {
    /// Distinct image ids whose variants were removed.
    pub removed_ids: BTreeSet<String>,
    pub warnings: Vec<String>,
}

impl OrphanSweep {
    /// Count of orphaned images (not files) removed.
    pub fn removed_count(&self) -> usize {
        self.removed_ids.len()
    }
}

/// Result of sweeping the output root for vanished galleries.
#[derive(Debug, Default)]
pub struct GallerySweep {
    /// Gallery ids whose output directories were removed.
    pub removed: Vec<String>,
    pub warnings: Vec<String>,
}

/// Delete output variants in `output_dir` whose stem is not in `valid_ids`.
pub fn clean_orphans(
    output_dir: &Path,
    classes: &[SizeClass],
    valid_ids: &HashSet<String>,
) -> OrphanSweep {
    let mut sweep = OrphanSweep::default();

    for class in classes {
        let class_dir = output_dir.join(&class.name);
        let entries = match fs::read_dir(&class_dir) {
            Ok(entries) => entries,
            // A class directory that doesn't exist yet has nothing to sweep.
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_variant = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(OUTPUT_EXTENSION));
            if !is_variant {
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if valid_ids.contains(&stem) {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    sweep.removed_ids.insert(stem);
                }
                Err(e) => sweep
                    .warnings
                    .push(format!("failed to remove {}: {}", path.display(), e)),
            }
        }
    }

    sweep
}

/// Delete gallery output directories whose name is not in `valid_galleries`.
/// Hidden entries and plain files at the output root are left alone.
pub fn clean_orphan_galleries(output_root: &Path, valid_galleries: &HashSet<String>) -> GallerySweep {
    let mut sweep = GallerySweep::default();

    let entries = match fs::read_dir(output_root) {
        Ok(entries) => entries,
        // No output root yet means a first run with nothing to reconcile.
        Err(_) => return sweep,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || valid_galleries.contains(&name) {
            continue;
        }

        match fs::remove_dir_all(&path) {
            Ok(()) => sweep.removed.push(name),
            Err(e) => sweep
                .warnings
                .push(format!("failed to remove {}: {}", path.display(), e)),
        }
    }

    sweep.removed.sort();
    sweep
}

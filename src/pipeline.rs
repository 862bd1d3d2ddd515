//! Build orchestration.
//!
//! Sequences the whole run: discover galleries → sync the site config →
//! process each gallery (enumerate → gate → pool → reconcile → manifest) →
//! remove vanished gallery outputs → return the run summary.
//!
//! Galleries are processed one after another; only the per-gallery worker
//! pool is parallel (encoding inside one gallery already saturates the
//! machine). Each gallery's pool fully drains before its manifest is
//! written, so a manifest never describes a half-finished batch.
//!
//! Failure handling follows a strict split: setup problems (missing source
//! root, unreadable gallery, broken site config) abort the run before
//! touching outputs; a single image failing to decode or encode is tallied,
//! reported as an event, and never stops the batch. Reconciliation failures
//! only warn. The summary is folded from job outcomes on the orchestrator
//! thread — there is no shared mutable counter anywhere.
//!
//! Progress is streamed as [`BuildEvent`]s over an mpsc channel; the caller
//! decides how to render them (see [`output`](crate::output)).

use crate::discover::{self, DiscoverError};
use crate::imaging::{ImageBackend, Quality};
use crate::manifest::GalleryManifest;
use crate::pool::{self, BatchContext, EncodeJob, JobOutcome};
use crate::reconcile;
use crate::settings::{BuildSettings, OUTPUT_EXTENSION};
use crate::siteconfig::{self, SyncError};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Source directory not found: {0}")]
    SourceRootMissing(PathBuf),
    #[error("No gallery directories found in {0}")]
    NoGalleries(PathBuf),
    #[error(transparent)]
    Discover(#[from] DiscoverError),
    #[error("Site config sync failed: {0}")]
    Config(#[from] SyncError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a build run needs, resolved by the CLI.
#[derive(Debug, Clone, Copy)]
pub struct BuildConfig<'a> {
    pub source_root: &'a Path,
    pub output_root: &'a Path,
    /// Site configuration document; `None` or a missing file skips the sync.
    pub site_config: Option<&'a Path>,
    pub settings: &'a BuildSettings,
    /// Re-encode everything, ignoring output freshness.
    pub force: bool,
    /// Worker-pool size; 0 = host parallelism, 1 = sequential.
    pub jobs: usize,
}

/// Progress notifications, streamed in the order things happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    GalleriesDiscovered {
        ids: Vec<String>,
    },
    ConfigSynced {
        path: PathBuf,
        added: Vec<String>,
        removed: Vec<String>,
        total: usize,
    },
    ConfigMissing {
        path: PathBuf,
    },
    GalleryStarted {
        id: String,
        image_count: usize,
    },
    ImageProcessed {
        gallery: String,
        id: String,
        classes: Vec<String>,
    },
    ImageSkipped {
        gallery: String,
        id: String,
    },
    ImageFailed {
        gallery: String,
        id: String,
        message: String,
    },
    OrphansRemoved {
        gallery: String,
        count: usize,
    },
    GalleriesRemoved {
        ids: Vec<String>,
    },
    ReconcileWarning {
        message: String,
    },
}

/// Aggregate result of a run, folded from per-image outcomes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Total bytes of all source images.
    pub source_bytes: u64,
    /// Total bytes of all encoded variants after reconciliation.
    pub output_bytes: u64,
    pub removed_galleries: Vec<String>,
}

impl BuildSummary {
    /// True when every image processed or skipped cleanly.
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

fn emit(events: Option<&Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}

/// Run the full pipeline. See the [module docs](self) for sequencing.
pub fn build<B: ImageBackend>(
    backend: &B,
    config: &BuildConfig<'_>,
    events: Option<&Sender<BuildEvent>>,
) -> Result<BuildSummary, BuildError> {
    if !config.source_root.is_dir() {
        return Err(BuildError::SourceRootMissing(
            config.source_root.to_path_buf(),
        ));
    }

    let gallery_ids = discover::discover_galleries(config.source_root)?;
    if gallery_ids.is_empty() {
        return Err(BuildError::NoGalleries(config.source_root.to_path_buf()));
    }
    emit(
        events,
        BuildEvent::GalleriesDiscovered {
            ids: gallery_ids.clone(),
        },
    );

    // Enumerate every gallery before touching any output, so enumeration
    // failures (unreadable directory, duplicate image ids) abort the run
    // with nothing half-built.
    let galleries = gallery_ids
        .iter()
        .map(|id| discover::discover_gallery(id, config.source_root, config.output_root))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(site_config) = config.site_config {
        if site_config.exists() {
            let report = siteconfig::sync(site_config, &gallery_ids)?;
            emit(
                events,
                BuildEvent::ConfigSynced {
                    path: site_config.to_path_buf(),
                    added: report.added,
                    removed: report.removed,
                    total: report.total,
                },
            );
        } else {
            emit(
                events,
                BuildEvent::ConfigMissing {
                    path: site_config.to_path_buf(),
                },
            );
        }
    }

    let mut summary = BuildSummary::default();
    let class_names: Vec<String> = config
        .settings
        .sizes
        .iter()
        .map(|c| c.name.clone())
        .collect();

    for gallery in &galleries {
        emit(
            events,
            BuildEvent::GalleryStarted {
                id: gallery.id.clone(),
                image_count: gallery.sources.len(),
            },
        );

        for class in &config.settings.sizes {
            fs::create_dir_all(gallery.output_dir.join(&class.name))?;
        }

        let previous = GalleryManifest::load(&gallery.output_dir);
        let valid_ids: HashSet<String> = gallery.sources.iter().map(|s| s.id.clone()).collect();

        let jobs: Vec<EncodeJob> = gallery
            .sources
            .iter()
            .map(|source| EncodeJob {
                source: source.clone(),
                retained: previous
                    .as_ref()
                    .and_then(|m| m.record_for(&source.id))
                    .cloned(),
            })
            .collect();

        let ctx = BatchContext {
            output_dir: &gallery.output_dir,
            classes: &config.settings.sizes,
            quality: Quality::new(config.settings.quality),
            force: config.force,
        };
        let results = pool::process_batch(backend, &ctx, jobs, config.jobs, |result| {
            let event = match &result.outcome {
                JobOutcome::Processed(_) => BuildEvent::ImageProcessed {
                    gallery: gallery.id.clone(),
                    id: result.source.id.clone(),
                    classes: class_names.clone(),
                },
                JobOutcome::Skipped(_) => BuildEvent::ImageSkipped {
                    gallery: gallery.id.clone(),
                    id: result.source.id.clone(),
                },
                JobOutcome::Failed(message) => BuildEvent::ImageFailed {
                    gallery: gallery.id.clone(),
                    id: result.source.id.clone(),
                    message: message.clone(),
                },
            };
            emit(events, event);
        });

        let mut records = Vec::with_capacity(results.len());
        for result in results {
            match result.outcome {
                JobOutcome::Processed(record) => {
                    summary.processed += 1;
                    records.push(record);
                }
                JobOutcome::Skipped(record) => {
                    summary.skipped += 1;
                    records.push(record);
                }
                JobOutcome::Failed(_) => summary.errors += 1,
            }
        }

        let sweep = reconcile::clean_orphans(&gallery.output_dir, &config.settings.sizes, &valid_ids);
        for warning in &sweep.warnings {
            emit(
                events,
                BuildEvent::ReconcileWarning {
                    message: warning.clone(),
                },
            );
        }
        if sweep.removed_count() > 0 {
            emit(
                events,
                BuildEvent::OrphansRemoved {
                    gallery: gallery.id.clone(),
                    count: sweep.removed_count(),
                },
            );
        }

        GalleryManifest::new(records, &config.settings.sizes).write(&gallery.output_dir)?;

        summary.source_bytes += total_file_bytes(gallery.sources.iter().map(|s| s.path.as_path()));
        summary.output_bytes += output_tree_bytes(&gallery.output_dir);
    }

    let valid_galleries: HashSet<String> = gallery_ids.iter().cloned().collect();
    let sweep = reconcile::clean_orphan_galleries(config.output_root, &valid_galleries);
    for warning in &sweep.warnings {
        emit(
            events,
            BuildEvent::ReconcileWarning {
                message: warning.clone(),
            },
        );
    }
    if !sweep.removed.is_empty() {
        emit(
            events,
            BuildEvent::GalleriesRemoved {
                ids: sweep.removed.clone(),
            },
        );
    }
    summary.removed_galleries = sweep.removed;

    Ok(summary)
}

/// Sum the sizes of the given files, skipping any that can't be statted.
fn total_file_bytes<'a>(paths: impl Iterator<Item = &'a Path>) -> u64 {
    paths
        .filter_map(|p| fs::metadata(p).ok())
        .map(|m| m.len())
        .sum()
}

/// Sum the sizes of all encoded variants under a gallery output directory.
fn output_tree_bytes(output_dir: &Path) -> u64 {
    WalkDir::new(output_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(OUTPUT_EXTENSION))
        })
        .filter_map(|entry| entry.metadata().ok())
        .map(|m| m.len())
        .sum()
}

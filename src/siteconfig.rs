//! Site configuration synchronization.
//!
//! The site configuration document (`site.json`) is shared ground: the
//! operator edits theming, panel text, and per-gallery display names by
//! hand; the build pipeline owns exactly one thing — which galleries exist
//! and in what order. Synchronization is therefore a read-merge-write that
//! touches only the `galleries` section and round-trips everything else
//! structurally intact (including key order, hence `serde_json`'s
//! `preserve_order` feature).
//!
//! Within `galleries.items`, the merge rules are:
//! - an id still present on disk keeps its `displayName` and any extra
//!   fields (layout overrides, ordering hints for the viewer), but its
//!   `order` is rewritten to the current discovery position;
//! - a newly discovered id gets a generated display name and the next order;
//! - an id whose source directory vanished is dropped.
//!
//! The `default` gallery is kept while it still exists, otherwise reset to
//! the first discovered gallery; `defaultLayout` is preserved verbatim.
//!
//! Typed structs cover only the fields this core owns; everything else
//! travels through `#[serde(flatten)]` bags, so the viewer can grow config
//! sections without this crate learning their schema.

use crate::fsutil;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The `galleries` section owned by this pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleriesSection {
    /// Gallery shown when the viewer loads without a selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// One entry per gallery id, in discovery order.
    #[serde(default)]
    pub items: Map<String, Value>,
    /// Viewer-owned layout fallback, preserved verbatim.
    #[serde(
        default,
        rename = "defaultLayout",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_layout: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The fields of one gallery entry this pipeline owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GalleryEntry {
    #[serde(rename = "displayName")]
    display_name: String,
    order: u64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// What a sync changed, for reporting.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub total: usize,
}

/// Generate a display name from a gallery directory name: underscores and
/// hyphens become spaces, then title-case.
pub fn generate_display_name(gallery_id: &str) -> String {
    let spaced = gallery_id.replace(['_', '-'], " ");
    let mut result = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }
    result
}

/// Merge the discovered gallery list into the section in place.
pub fn merge_galleries(section: &mut GalleriesSection, discovered: &[String]) -> SyncReport {
    let mut report = SyncReport::default();
    let old_items = std::mem::take(&mut section.items);

    let mut new_items = Map::new();
    for (position, id) in discovered.iter().enumerate() {
        let entry = match old_items.get(id) {
            Some(old) => {
                let mut entry: GalleryEntry = serde_json::from_value(old.clone())
                    .unwrap_or_else(|_| GalleryEntry {
                        display_name: generate_display_name(id),
                        order: 0,
                        extra: Map::new(),
                    });
                entry.order = position as u64 + 1;
                entry
            }
            None => {
                report.added.push(id.clone());
                GalleryEntry {
                    display_name: generate_display_name(id),
                    order: position as u64 + 1,
                    extra: Map::new(),
                }
            }
        };
        // GalleryEntry always serializes to an object
        new_items.insert(id.clone(), serde_json::to_value(entry).unwrap_or_default());
    }

    for id in old_items.keys() {
        if !discovered.contains(id) {
            report.removed.push(id.clone());
        }
    }

    section.items = new_items;
    section.default = match section.default.take() {
        Some(current) if discovered.contains(&current) => Some(current),
        _ => discovered.first().cloned(),
    };

    report.total = discovered.len();
    report
}

/// Read, merge, and atomically rewrite the site document at `path`.
///
/// The document itself stays an untyped ordered map, so sections this core
/// does not own — and the position of the `galleries` section among them —
/// survive the rewrite untouched.
///
/// The document must exist; the caller decides what a missing document
/// means (the orchestrator skips the sync).
pub fn sync(path: &Path, discovered: &[String]) -> Result<SyncReport, SyncError> {
    let content = fs::read_to_string(path)?;
    let mut doc: Map<String, Value> = serde_json::from_str(&content)?;

    let mut section: GalleriesSection = match doc.get("galleries") {
        Some(value) => serde_json::from_value(value.clone())?,
        None => GalleriesSection::default(),
    };
    let report = merge_galleries(&mut section, discovered);
    doc.insert("galleries".to_string(), serde_json::to_value(&section)?);

    let json = serde_json::to_string_pretty(&Value::Object(doc))?;
    fsutil::write_atomic(path, json.as_bytes())?;
    Ok(report)
}

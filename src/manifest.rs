//! Per-gallery manifest: the contract with the browser viewer.
//!
//! Each gallery's output directory carries a `manifest.json` describing the
//! processed images, when the build ran, and which size tiers exist:
//!
//! ```json
//! {
//!   "images": [
//!     { "id": "pier", "orientation": "landscape", "width": 4000, "height": 2667 }
//!   ],
//!   "generated": "2026-08-07T14:03:12.331Z",
//!   "sizes": { "thumb": 400, "medium": 800, "full": 1600 }
//! }
//! ```
//!
//! The image list is sorted by id — a stable order independent of encode
//! completion order; any shuffling is the viewer's business. The manifest is
//! fully rewritten on every run that touches its gallery, so `generated` and
//! the size table always reflect the latest build even when every image was
//! skipped.
//!
//! Loading is tolerant: a missing or corrupt manifest just means no records
//! to carry forward, which costs a re-encode, not a failed build.

use crate::fsutil;
use crate::settings::SizeClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io;
use std::path::Path;

/// Name of the manifest file within a gallery's output directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Orientation of a photograph, derived from its pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    /// Wider than tall is landscape, taller than wide is portrait,
    /// equal edges is square.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            Self::Landscape
        } else if height > width {
            Self::Portrait
        } else {
            Self::Square
        }
    }
}

/// Manifest entry for one processed image. Skipped images carry their
/// record forward from the previous manifest unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub orientation: Orientation,
    /// Original (source) dimensions, not any variant's.
    pub width: u32,
    pub height: u32,
}

impl ImageRecord {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            orientation: Orientation::from_dimensions(width, height),
            width,
            height,
        }
    }
}

/// Per-gallery manifest document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryManifest {
    pub images: Vec<ImageRecord>,
    pub generated: DateTime<Utc>,
    /// Size-class table in declaration order: name → target longest edge.
    pub sizes: Map<String, Value>,
}

impl GalleryManifest {
    /// Build a manifest from final records, sorting by id and stamping the
    /// current time.
    pub fn new(mut images: Vec<ImageRecord>, classes: &[SizeClass]) -> Self {
        images.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            images,
            generated: Utc::now(),
            sizes: size_table(classes),
        }
    }

    /// Load the previous manifest from a gallery output directory. Returns
    /// `None` when the file is missing or unparseable.
    pub fn load(output_dir: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(output_dir.join(MANIFEST_FILENAME)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Atomically (over)write the manifest in a gallery output directory.
    pub fn write(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fsutil::write_atomic(&output_dir.join(MANIFEST_FILENAME), json.as_bytes())
    }

    /// Look up the record of one image id.
    pub fn record_for(&self, id: &str) -> Option<&ImageRecord> {
        self.images.iter().find(|r| r.id == id)
    }
}

/// Build the `sizes` object, preserving class declaration order.
fn size_table(classes: &[SizeClass]) -> Map<String, Value> {
    classes
        .iter()
        .map(|class| (class.name.clone(), Value::from(class.target)))
        .collect()
}

//! Build settings: size-class table and encoding quality.
//!
//! Settings are constants with an escape hatch. The stock values match what
//! the published viewer expects (three WebP tiers, quality 85); a sparse
//! `stillframe.toml` can override them for a site that wants different
//! breakpoints:
//!
//! ```toml
//! # All keys are optional - defaults shown below
//! quality = 85
//!
//! [[sizes]]
//! name = "thumb"
//! target = 400
//!
//! [[sizes]]
//! name = "medium"
//! target = 800
//!
//! [[sizes]]
//! name = "full"
//! target = 1600
//! ```
//!
//! Unknown keys are rejected to catch typos early. The size table is
//! ordered: manifest `sizes` entries and per-image progress lines follow
//! the order classes are declared here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Settings validation error: {0}")]
    Validation(String),
}

/// File extension of every encoded output variant.
pub const OUTPUT_EXTENSION: &str = "webp";

/// Source file extensions the decoder accepts (lowercase; matching is
/// case-insensitive).
pub const SOURCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tif", "tiff", "bmp"];

/// One output resolution tier: a name (doubles as the output subdirectory)
/// and a target length for the image's longest edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeClass {
    pub name: String,
    pub target: u32,
}

/// Build settings loaded from `stillframe.toml`, or stock defaults.
///
/// Sparse: a settings file needs only the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    /// Ordered size-class table. Every processed image gets exactly one
    /// output per class.
    pub sizes: Vec<SizeClass>,
    /// Lossy WebP quality (1-100), applied identically to all classes.
    pub quality: u32,
}

impl Default for BuildSettings {
    fn default() -> Self {
        let class = |name: &str, target: u32| SizeClass {
            name: name.to_string(),
            target,
        };
        Self {
            sizes: vec![
                class("thumb", 400),   // mobile gallery
                class("medium", 800),  // tablet/desktop gallery
                class("full", 1600),   // lightbox view
            ],
            quality: 85,
        }
    }
}

impl BuildSettings {
    /// Load settings from a TOML file, falling back to defaults when the
    /// file doesn't exist. Parse and validation failures are errors — a
    /// present-but-broken settings file should never silently build with
    /// stock values.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.sizes.is_empty() {
            return Err(SettingsError::Validation("sizes must not be empty".into()));
        }
        if self.quality == 0 || self.quality > 100 {
            return Err(SettingsError::Validation("quality must be 1-100".into()));
        }
        for class in &self.sizes {
            if class.name.is_empty() {
                return Err(SettingsError::Validation(
                    "size class names must not be empty".into(),
                ));
            }
            if class.target == 0 {
                return Err(SettingsError::Validation(format!(
                    "size class '{}' must have a non-zero target",
                    class.name
                )));
            }
        }
        let mut names: Vec<&str> = self.sizes.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.sizes.len() {
            return Err(SettingsError::Validation(
                "size class names must be unique".into(),
            ));
        }
        Ok(())
    }

    /// Names of all size classes, in declaration order.
    pub fn class_names(&self) -> Vec<&str> {
        self.sizes.iter().map(|c| c.name.as_str()).collect()
    }
}

/// True if `path` has one of the accepted source-image extensions.
pub fn is_source_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

//! Pure Rust WebP backend — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header read, no pixel decode) |
//! | Decode (JPEG, PNG, WebP, TIFF, BMP) | `image` crate (pure Rust decoders) |
//! | Color normalize | `DynamicImage::to_rgb8` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → WebP | `webp::Encoder` (lossy) |
//!
//! ## Color handling
//!
//! Every decoded image is flattened to opaque RGB8 before resizing: palette
//! indices are expanded, alpha is discarded (not composited against a
//! background color), grayscale is widened to three channels. The published
//! gallery shows photographs; transparency has no meaning there and the
//! lossy encoder only takes three-channel input.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::RenderParams;
use crate::fsutil;
use image::RgbImage;
use image::imageops::{self, FilterType};
use std::path::Path;

/// Production backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct WebpBackend;

impl WebpBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WebpBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a source image and flatten it to opaque RGB8.
fn load_rgb(path: &Path) -> Result<RgbImage, BackendError> {
    let img = image::ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })?;
    Ok(img.to_rgb8())
}

/// Encode RGB8 pixels as lossy WebP and publish atomically.
fn save_webp(img: &RgbImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let encoded =
        webp::Encoder::from_rgb(img.as_raw(), img.width(), img.height()).encode(quality as f32);
    fsutil::write_atomic(path, &encoded).map_err(BackendError::Io)
}

impl ImageBackend for WebpBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn render(&self, params: &RenderParams) -> Result<(), BackendError> {
        let source = load_rgb(&params.source)?;
        let quality = params.quality.value();

        for target in &params.targets {
            if (target.width, target.height) == source.dimensions() {
                // Native-size class: no resample pass, just re-encode.
                save_webp(&source, &target.output, quality)?;
            } else {
                let resized =
                    imageops::resize(&source, target.width, target.height, FilterType::Lanczos3);
                save_webp(&resized, &target.output, quality)?;
            }
        }

        Ok(())
    }
}

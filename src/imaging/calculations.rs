//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{Quality, RenderParams, RenderTarget};
use crate::settings::SizeClass;
use std::path::Path;

/// Scale dimensions so the longest edge equals `target`, preserving aspect
/// ratio. Images already at or below the target keep their native size —
/// photographs are never upscaled.
///
/// # Examples
/// ```
/// # use stillframe::imaging::calculations::scale_to_longest_edge;
/// // 2000x1500 landscape at target 800 → 800x600
/// assert_eq!(scale_to_longest_edge((2000, 1500), 800), (800, 600));
///
/// // 300x200 already below target 400 → untouched
/// assert_eq!(scale_to_longest_edge((300, 200), 400), (300, 200));
/// ```
pub fn scale_to_longest_edge(original: (u32, u32), target: u32) -> (u32, u32) {
    let (width, height) = original;
    let longest = width.max(height);

    if longest <= target {
        return (width, height);
    }

    if width >= height {
        let ratio = target as f64 / width as f64;
        (target, (height as f64 * ratio).round().max(1.0) as u32)
    } else {
        let ratio = target as f64 / height as f64;
        ((width as f64 * ratio).round().max(1.0) as u32, target)
    }
}

/// Build the full render specification for one image: one target per size
/// class, named `<class>/<id>.webp` under the gallery output directory.
pub fn plan_render(
    source: &Path,
    output_dir: &Path,
    image_id: &str,
    original: (u32, u32),
    classes: &[SizeClass],
    quality: Quality,
) -> RenderParams {
    let targets = classes
        .iter()
        .map(|class| {
            let (width, height) = scale_to_longest_edge(original, class.target);
            RenderTarget {
                output: output_dir
                    .join(&class.name)
                    .join(format!("{image_id}.{}", crate::settings::OUTPUT_EXTENSION)),
                width,
                height,
            }
        })
        .collect();

    RenderParams {
        source: source.to_path_buf(),
        targets,
        quality,
    }
}

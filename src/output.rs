//! CLI output formatting.
//!
//! Each formatter is a pure function returning display lines (testable, no
//! I/O) with a `print_*` wrapper that writes to stdout. Build progress
//! arrives as [`BuildEvent`]s — the printer thread in `main` feeds them
//! through [`format_build_event`] as they stream in, so progress appears
//! per image even while the worker pool is saturated.
//!
//! ```text
//! Found 2 galleries: bw, color
//! Synced site.json: 2 galleries (1 added)
//! bw (3 photos)
//!     ✓ dunes → thumb, medium, full
//!     ✗ corrupt - Error: Failed to decode …
//!     · pier (unchanged)
//!     Removed 1 orphaned image(s)
//! ==================================================
//! Done: 1 processed, 1 skipped, 1 errors
//!
//! Total size: 48.3MB (source) → 3.9MB (optimized)
//! Savings: 92% reduction
//! ```

use crate::pipeline::{BuildEvent, BuildSummary};

const RULE_WIDTH: usize = 50;

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Format one build event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::GalleriesDiscovered { ids } => {
            vec![format!(
                "Found {} galleries: {}",
                ids.len(),
                ids.join(", ")
            )]
        }
        BuildEvent::ConfigSynced {
            path,
            added,
            removed,
            total,
        } => {
            let mut changes = Vec::new();
            if !added.is_empty() {
                changes.push(format!("{} added", added.len()));
            }
            if !removed.is_empty() {
                changes.push(format!("{} removed", removed.len()));
            }
            let suffix = if changes.is_empty() {
                String::new()
            } else {
                format!(" ({})", changes.join(", "))
            };
            vec![format!(
                "Synced {}: {} galleries{}",
                path.display(),
                total,
                suffix
            )]
        }
        BuildEvent::ConfigMissing { path } => {
            vec![format!(
                "Site config not found, skipping sync: {}",
                path.display()
            )]
        }
        BuildEvent::GalleryStarted { id, image_count } => {
            vec![format!("{} ({} photos)", id, image_count)]
        }
        BuildEvent::ImageProcessed { id, classes, .. } => {
            vec![format!("    \u{2713} {} \u{2192} {}", id, classes.join(", "))]
        }
        BuildEvent::ImageSkipped { id, .. } => {
            vec![format!("    \u{b7} {} (unchanged)", id)]
        }
        BuildEvent::ImageFailed { id, message, .. } => {
            vec![format!("    \u{2717} {} - Error: {}", id, message)]
        }
        BuildEvent::OrphansRemoved { count, .. } => {
            vec![format!("    Removed {} orphaned image(s)", count)]
        }
        BuildEvent::GalleriesRemoved { ids } => {
            vec![format!("Removed orphaned galleries: {}", ids.join(", "))]
        }
        BuildEvent::ReconcileWarning { message } => {
            vec![format!("    Warning: {}", message)]
        }
    }
}

/// Format the run summary: counts, byte totals, and the savings line.
///
/// Always printed in full, even for runs with errors — partial success is
/// the steady state of an incremental build.
pub fn format_summary(summary: &BuildSummary) -> Vec<String> {
    let mut lines = vec![
        "=".repeat(RULE_WIDTH),
        format!(
            "Done: {} processed, {} skipped, {} errors",
            summary.processed, summary.skipped, summary.errors
        ),
    ];

    let source_mb = megabytes(summary.source_bytes);
    let output_mb = megabytes(summary.output_bytes);
    lines.push(String::new());
    lines.push(format!(
        "Total size: {:.1}MB (source) \u{2192} {:.1}MB (optimized)",
        source_mb, output_mb
    ));
    if summary.source_bytes > 0 {
        let savings = (1.0 - output_mb / source_mb) * 100.0;
        lines.push(format!("Savings: {:.0}% reduction", savings));
    }

    lines
}

/// Format the `check` command's inventory: one line per gallery.
pub fn format_check_output(galleries: &[(String, usize)]) -> Vec<String> {
    let mut lines = Vec::with_capacity(galleries.len() + 1);
    for (id, count) in galleries {
        lines.push(format!("{} ({} photos)", id, count));
    }
    let total: usize = galleries.iter().map(|(_, n)| n).sum();
    lines.push(format!(
        "{} galleries, {} photos",
        galleries.len(),
        total
    ));
    lines
}

/// Print one build event to stdout.
pub fn print_build_event(event: &BuildEvent) {
    for line in format_build_event(event) {
        println!("{}", line);
    }
}

/// Print the run summary to stdout.
pub fn print_summary(summary: &BuildSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

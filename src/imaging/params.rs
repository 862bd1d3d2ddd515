//! Parameter types for render operations.
//!
//! These structs describe *what* to encode, not *how*. They are the
//! interface between the planning code (which decides target dimensions per
//! size class) and the [`backend`](super::backend) (which does the actual
//! pixel work), so backends can be swapped — e.g. for a recording mock in
//! tests — without touching planning logic.

use std::path::PathBuf;

/// Quality setting for lossy WebP encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// One output file of a render: destination path plus exact pixel
/// dimensions, precomputed by the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Full specification of one render: decode `source` once, emit every
/// target at the shared quality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderParams {
    pub source: PathBuf,
    pub targets: Vec<RenderTarget>,
    pub quality: Quality,
}

//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the pipeline
//! needs: `identify` (read dimensions without decoding pixels) and `render`
//! (decode once, emit every planned output variant).
//!
//! The production implementation is
//! [`WebpBackend`](super::webp_backend::WebpBackend) — pure Rust, statically
//! linked. Tests swap in a recording mock.

use super::params::RenderParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` because worker-pool threads share one backend by reference.
pub trait ImageBackend: Sync {
    /// Get image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode the source once and write every target variant.
    fn render(&self, params: &RenderParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock backend that records operations instead of decoding pixels.
    ///
    /// `render` still creates empty files at the target paths so the
    /// incremental gate and the orphan reconciler observe the same
    /// filesystem effects as the real backend. Uses Mutex (not RefCell) so
    /// it is Sync and works across worker-pool threads.
    #[derive(Default)]
    pub struct MockBackend {
        /// Dimensions per source file stem; `default_dims` covers the rest.
        pub dims: Mutex<HashMap<String, Dimensions>>,
        pub default_dims: Option<Dimensions>,
        /// Source stems whose operations fail.
        pub fail_stems: Vec<String>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Render {
            source: String,
            outputs: Vec<String>,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every identify returns the same dimensions.
        pub fn with_default_dimensions(width: u32, height: u32) -> Self {
            Self {
                default_dims: Some(Dimensions { width, height }),
                ..Self::default()
            }
        }

        /// Override dimensions for one source stem.
        pub fn set_dimensions(&self, stem: &str, width: u32, height: u32) {
            self.dims
                .lock()
                .unwrap()
                .insert(stem.to_string(), Dimensions { width, height });
        }

        /// Make every operation on the given source stem fail.
        pub fn fail_on(mut self, stem: &str) -> Self {
            self.fail_stems.push(stem.to_string());
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn stem_of(path: &Path) -> String {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        }

        fn should_fail(&self, path: &Path) -> bool {
            let stem = Self::stem_of(path);
            self.fail_stems.iter().any(|s| *s == stem)
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().into_owned()));

            if self.should_fail(path) {
                return Err(BackendError::ProcessingFailed(format!(
                    "mock decode failure: {}",
                    path.display()
                )));
            }

            let stem = Self::stem_of(path);
            self.dims
                .lock()
                .unwrap()
                .get(&stem)
                .copied()
                .or(self.default_dims)
                .ok_or_else(|| BackendError::ProcessingFailed("no mock dimensions".to_string()))
        }

        fn render(&self, params: &RenderParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Render {
                source: params.source.to_string_lossy().into_owned(),
                outputs: params
                    .targets
                    .iter()
                    .map(|t| t.output.to_string_lossy().into_owned())
                    .collect(),
                quality: params.quality.value(),
            });

            if self.should_fail(&params.source) {
                return Err(BackendError::ProcessingFailed(format!(
                    "mock encode failure: {}",
                    params.source.display()
                )));
            }

            for target in &params.targets {
                std::fs::write(&target.output, b"")?;
            }
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_default_dimensions(800, 600);

        let dims = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(dims, Dimensions { width: 800, height: 600 });

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_per_stem_dimensions_win_over_default() {
        let backend = MockBackend::with_default_dimensions(800, 600);
        backend.set_dimensions("tall", 100, 400);

        let dims = backend.identify(Path::new("/g/tall.jpg")).unwrap();
        assert_eq!(dims, Dimensions { width: 100, height: 400 });
    }

    #[test]
    fn mock_fails_on_marked_stem() {
        let backend = MockBackend::with_default_dimensions(800, 600).fail_on("corrupt");

        assert!(backend.identify(Path::new("/g/corrupt.jpg")).is_err());
        assert!(backend.identify(Path::new("/g/fine.jpg")).is_ok());
    }

    #[test]
    fn mock_render_creates_output_files() {
        use crate::imaging::params::{Quality, RenderTarget};
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("pier.webp");

        let backend = MockBackend::new();
        backend
            .render(&RenderParams {
                source: "/g/pier.jpg".into(),
                targets: vec![RenderTarget {
                    output: out.clone(),
                    width: 400,
                    height: 300,
                }],
                quality: Quality::new(85),
            })
            .unwrap();

        assert!(out.exists());
        let ops = backend.get_operations();
        assert!(matches!(&ops[0], RecordedOp::Render { quality: 85, .. }));
    }
}

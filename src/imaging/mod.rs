//! Image processing — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Decode** (JPEG, PNG, WebP, TIFF, BMP) | `image` crate |
//! | **Resize** | `image::imageops` with `Lanczos3` filter |
//! | **Encode → WebP** | `webp::Encoder` (lossy, fixed quality) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing render operations
//! - **Backend**: [`ImageBackend`] trait + [`WebpBackend`]

pub mod backend;
pub mod calculations;
mod params;
pub mod webp_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::plan_render;
pub use params::{Quality, RenderParams, RenderTarget};
pub use webp_backend::WebpBackend;

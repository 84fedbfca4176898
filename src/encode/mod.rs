//! Image decoding and encoding — pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Crop** | `image::DynamicImage::crop_imm` |
//! | **Resize** | `image::imageops::resize` with `Lanczos3` |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder` (quality-aware) |
//! | **Encode → PNG** | `image::codecs::png::PngEncoder` (lossless) |
//! | **Encode → WebP** | `image::codecs::webp::WebPEncoder` (lossless) |
//!
//! The module is split into:
//! - **Backend**: [`EncodeBackend`] trait + operation parameter structs
//! - **RustBackend**: the `image`-crate implementation
//! - **SizeEstimator**: decode-once probe used by the target-size searches

pub mod backend;
pub mod rust_backend;

pub use backend::{CompressParams, CropParams, Dimensions, EncodeBackend, EncodeError, ResizeParams};
pub use rust_backend::{RustBackend, SizeEstimator};

//! Encode backend trait and shared operation types.
//!
//! The [`EncodeBackend`] trait defines the four operations every backend must
//! support: identify, crop, resize, and compress. Each takes a parameter
//! struct describing the whole operation, so callers stay backend-agnostic
//! and tests can record operations without touching pixels.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use crate::geometry::CropBox;
use crate::params::{OutputFormat, Quality};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A crop region in whole source pixels.
///
/// Selection boxes live in f64 image space while being dragged; rounding to
/// pixels happens once, here, when an operation is about to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<&CropBox> for PixelRegion {
    fn from(b: &CropBox) -> Self {
        let (width, height) = b.pixel_size();
        Self {
            x: b.x.round().max(0.0) as u32,
            y: b.y.round().max(0.0) as u32,
            width: width.max(1),
            height: height.max(1),
        }
    }
}

/// Parameters for a crop operation.
#[derive(Debug, Clone)]
pub struct CropParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub region: PixelRegion,
    pub format: OutputFormat,
    pub quality: Quality,
}

/// Parameters for a resize operation.
#[derive(Debug, Clone)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub quality: Quality,
}

/// Parameters for a re-encode at reduced quality, dimensions unchanged.
#[derive(Debug, Clone)]
pub struct CompressParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub quality: Quality,
}

/// Trait for image encode backends.
///
/// Every backend must implement all four operations so the editor and CLI
/// layers never name a codec directly.
pub trait EncodeBackend: Sync {
    /// Get image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, EncodeError>;

    /// Cut a pixel region out of the source and encode it.
    fn crop(&self, params: &CropParams) -> Result<u64, EncodeError>;

    /// Resample the source to exact dimensions and encode it.
    fn resize(&self, params: &ResizeParams) -> Result<u64, EncodeError>;

    /// Re-encode the source at the given quality, dimensions unchanged.
    fn compress(&self, params: &CompressParams) -> Result<u64, EncodeError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    #[derive(Default)]
    pub struct MockBackend {
        pub identify_results: Mutex<Vec<Dimensions>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Crop {
            source: String,
            output: String,
            region: PixelRegion,
            quality: u32,
        },
        Resize {
            source: String,
            output: String,
            width: u32,
            height: u32,
            quality: u32,
        },
        Compress {
            source: String,
            output: String,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl EncodeBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, EncodeError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            self.identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| EncodeError::Decode("No mock dimensions".to_string()))
        }

        fn crop(&self, params: &CropParams) -> Result<u64, EncodeError> {
            self.operations.lock().unwrap().push(RecordedOp::Crop {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                region: params.region,
                quality: params.quality.value(),
            });
            Ok(0)
        }

        fn resize(&self, params: &ResizeParams) -> Result<u64, EncodeError> {
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            Ok(0)
        }

        fn compress(&self, params: &CompressParams) -> Result<u64, EncodeError> {
            self.operations.lock().unwrap().push(RecordedOp::Compress {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                quality: params.quality.value(),
            });
            Ok(0)
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 600,
        }]);

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_records_crop() {
        let backend = MockBackend::new();

        backend
            .crop(&CropParams {
                source: "/source.jpg".into(),
                output: "/cropped.jpg".into(),
                region: PixelRegion {
                    x: 10,
                    y: 20,
                    width: 300,
                    height: 200,
                },
                format: OutputFormat::Jpeg,
                quality: Quality::new(90),
            })
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Crop {
                region: PixelRegion {
                    x: 10,
                    y: 20,
                    width: 300,
                    height: 200
                },
                quality: 90,
                ..
            }
        ));
    }

    #[test]
    fn pixel_region_rounds_box() {
        let b = CropBox::new(10.4, 19.6, 300.2, 199.9);
        let r = PixelRegion::from(&b);
        assert_eq!(
            r,
            PixelRegion {
                x: 10,
                y: 20,
                width: 300,
                height: 200
            }
        );
    }

    #[test]
    fn pixel_region_floors_to_one() {
        let b = CropBox::new(5.0, 5.0, 0.2, 0.2);
        let r = PixelRegion::from(&b);
        assert_eq!(r.width, 1);
        assert_eq!(r.height, 1);
    }
}

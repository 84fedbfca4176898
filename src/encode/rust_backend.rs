//! The `image`-crate backend and the decode-once size estimator.
//!
//! All three output codecs are pure Rust. JPEG is the only quality-aware
//! encoder; PNG and WebP are lossless here, so their quality parameter is
//! accepted and ignored. Operations encode to memory first and return the
//! byte count alongside writing the file, so callers can report savings
//! without a stat round-trip.

use super::backend::{
    CompressParams, CropParams, Dimensions, EncodeBackend, EncodeError, ResizeParams,
};
use crate::params::{OutputFormat, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, EncodeError> {
    ImageReader::open(path)
        .map_err(EncodeError::Io)?
        .decode()
        .map_err(|e| EncodeError::Decode(format!("Failed to decode {}: {}", path.display(), e)))
}

/// Encode to an in-memory buffer in the requested format.
pub(crate) fn encode_bytes(
    img: &DynamicImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => {
            // JPEG cannot carry an alpha channel
            let rgb = img.to_rgb8();
            let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality.value() as u8);
            DynamicImage::ImageRgb8(rgb).write_with_encoder(encoder)
        }
        OutputFormat::Png => img.write_with_encoder(PngEncoder::new(Cursor::new(&mut buf))),
        OutputFormat::Webp => {
            img.write_with_encoder(WebPEncoder::new_lossless(Cursor::new(&mut buf)))
        }
    };
    result.map_err(|e| EncodeError::Encode(format!("{} encode failed: {}", format, e)))?;
    Ok(buf)
}

/// Encode and write to disk, returning the encoded size in bytes.
fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: OutputFormat,
    quality: Quality,
) -> Result<u64, EncodeError> {
    let bytes = encode_bytes(img, format, quality)?;
    std::fs::write(path, &bytes).map_err(EncodeError::Io)?;
    Ok(bytes.len() as u64)
}

impl EncodeBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, EncodeError> {
        let (width, height) = image::image_dimensions(path)
            .map_err(|e| EncodeError::Decode(format!("Failed to read dimensions: {}", e)))?;
        Ok(Dimensions { width, height })
    }

    fn crop(&self, params: &CropParams) -> Result<u64, EncodeError> {
        let img = load_image(&params.source)?;
        let r = params.region;
        let cropped = img.crop_imm(r.x, r.y, r.width, r.height);
        save_image(&cropped, &params.output, params.format, params.quality)
    }

    fn resize(&self, params: &ResizeParams) -> Result<u64, EncodeError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.format, params.quality)
    }

    fn compress(&self, params: &CompressParams) -> Result<u64, EncodeError> {
        let img = load_image(&params.source)?;
        save_image(&img, &params.output, params.format, params.quality)
    }
}

/// Decode-once probe for the target-size searches.
///
/// The searches call their estimator repeatedly; decoding the source on
/// every probe would dominate the runtime, so this holds the decoded image
/// and re-encodes it in memory per probe.
pub struct SizeEstimator {
    image: DynamicImage,
    format: OutputFormat,
}

impl SizeEstimator {
    pub fn open(path: &Path, format: OutputFormat) -> Result<Self, EncodeError> {
        Ok(Self {
            image: load_image(path)?,
            format,
        })
    }

    pub fn from_image(image: DynamicImage, format: OutputFormat) -> Self {
        Self { image, format }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.image.width(),
            height: self.image.height(),
        }
    }

    /// Encoded size at the given quality, dimensions unchanged.
    pub fn at_quality(&self, quality: u32) -> Result<u64, EncodeError> {
        let bytes = encode_bytes(&self.image, self.format, Quality::new(quality))?;
        Ok(bytes.len() as u64)
    }

    /// Encoded size after upscaling by `scale`, at full quality.
    pub fn at_scale(&self, scale: f64) -> Result<u64, EncodeError> {
        let w = ((self.image.width() as f64) * scale).round() as u32;
        let h = ((self.image.height() as f64) * scale).round() as u32;
        let scaled = self.image.resize_exact(w.max(1), h.max(1), FilterType::Lanczos3);
        let bytes = encode_bytes(&scaled, self.format, Quality::new(100))?;
        Ok(bytes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::super::backend::PixelRegion;
    use super::*;
    use image::RgbImage;

    /// Create a small valid JPEG file with the given dimensions.
    fn create_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        DynamicImage::ImageRgb8(img)
            .save_with_format(path, image::ImageFormat::Jpeg)
            .unwrap();
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let backend = RustBackend::new();
        let result = backend.identify(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn crop_produces_region_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let output = tmp.path().join("cropped.jpg");
        let backend = RustBackend::new();
        let bytes = backend
            .crop(&CropParams {
                source,
                output: output.clone(),
                region: PixelRegion {
                    x: 50,
                    y: 40,
                    width: 120,
                    height: 90,
                },
                format: OutputFormat::Jpeg,
                quality: Quality::new(85),
            })
            .unwrap();

        assert!(bytes > 0);
        let (w, h) = image::image_dimensions(&output).unwrap();
        assert_eq!((w, h), (120, 90));
    }

    #[test]
    fn resize_produces_exact_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let output = tmp.path().join("resized.png");
        let backend = RustBackend::new();
        backend
            .resize(&ResizeParams {
                source,
                output: output.clone(),
                width: 123,
                height: 77,
                format: OutputFormat::Png,
                quality: Quality::new(85),
            })
            .unwrap();

        let (w, h) = image::image_dimensions(&output).unwrap();
        assert_eq!((w, h), (123, 77));
    }

    #[test]
    fn compress_keeps_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 200, 150);

        let output = tmp.path().join("compressed.jpg");
        let backend = RustBackend::new();
        backend
            .compress(&CompressParams {
                source,
                output: output.clone(),
                format: OutputFormat::Jpeg,
                quality: Quality::new(30),
            })
            .unwrap();

        let (w, h) = image::image_dimensions(&output).unwrap();
        assert_eq!((w, h), (200, 150));
    }

    #[test]
    fn returned_bytes_match_file_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 200, 150);

        let output = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        let bytes = backend
            .compress(&CompressParams {
                source,
                output: output.clone(),
                format: OutputFormat::Jpeg,
                quality: Quality::new(80),
            })
            .unwrap();

        assert_eq!(bytes, std::fs::metadata(&output).unwrap().len());
    }

    #[test]
    fn webp_output_is_decodable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 64, 48);

        let output = tmp.path().join("out.webp");
        let backend = RustBackend::new();
        backend
            .compress(&CompressParams {
                source,
                output: output.clone(),
                format: OutputFormat::Webp,
                quality: Quality::new(80),
            })
            .unwrap();

        let (w, h) = image::image_dimensions(&output).unwrap();
        assert_eq!((w, h), (64, 48));
    }

    // =========================================================================
    // SizeEstimator tests
    // =========================================================================

    #[test]
    fn estimator_quality_grows_size() {
        let est = SizeEstimator::from_image(gradient(200, 150), OutputFormat::Jpeg);
        let low = est.at_quality(5).unwrap();
        let high = est.at_quality(95).unwrap();
        assert!(low < high, "q5 {low} should be smaller than q95 {high}");
    }

    #[test]
    fn estimator_scale_grows_size() {
        let est = SizeEstimator::from_image(gradient(100, 80), OutputFormat::Jpeg);
        let small = est.at_scale(1.1).unwrap();
        let big = est.at_scale(3.0).unwrap();
        assert!(small < big, "1.1x {small} should be smaller than 3x {big}");
    }

    #[test]
    fn estimator_reports_dimensions() {
        let est = SizeEstimator::from_image(gradient(123, 45), OutputFormat::Png);
        let dims = est.dimensions();
        assert_eq!((dims.width, dims.height), (123, 45));
    }
}

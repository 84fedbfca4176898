//! CLI output formatting for all commands.
//!
//! # Output Format
//!
//! ## Info
//!
//! ```text
//! photo.jpg
//!     Dimensions: 4000x3000
//!     File size: 1.52 MB
//! ```
//!
//! ## Crop / Resize / Compress
//!
//! ```text
//! photo.jpg -> cropped_800x600.jpg
//!     Region: 800x600 at (120, 90)
//!     Output: 214.7 KB (86% smaller)
//! ```
//!
//! ## Analyze
//!
//! ```text
//! photo.jpg
//!     Dimensions: 4000x3000
//!     File size: 1.52 MB
//!     Target: 200.0 KB
//!     Action: reduce quality to 62% (~195.3 KB)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::encode::{Dimensions, backend::PixelRegion};
use crate::target::{Direction, QualityResolution, ScaleResolution};
use serde::Serialize;

/// Human-readable byte count: whole bytes under 1 KB, one decimal of KB
/// under 1 MB, two decimals of MB above.
pub fn fmt_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    }
}

/// Percentage saved by an operation, floored at zero so a grown file reads
/// as "0% smaller" rather than a negative saving.
pub fn percent_saved(original: u64, output: u64) -> u32 {
    if original == 0 {
        return 0;
    }
    let saved = (1.0 - output as f64 / original as f64) * 100.0;
    saved.round().max(0.0) as u32
}

// ============================================================================
// Info
// ============================================================================

pub fn format_info(source: &str, dims: Dimensions, file_size: u64) -> Vec<String> {
    vec![
        source.to_string(),
        format!("    Dimensions: {}x{}", dims.width, dims.height),
        format!("    File size: {}", fmt_bytes(file_size)),
    ]
}

pub fn print_info(source: &str, dims: Dimensions, file_size: u64) {
    for line in format_info(source, dims, file_size) {
        println!("{}", line);
    }
}

// ============================================================================
// Operation reports (crop / resize / compress)
// ============================================================================

/// Format a crop result: source, output, region, encoded size vs original.
pub fn format_crop_report(
    source: &str,
    output: &str,
    region: PixelRegion,
    original_bytes: u64,
    output_bytes: u64,
) -> Vec<String> {
    vec![
        format!("{} \u{2192} {}", source, output),
        format!(
            "    Region: {}x{} at ({}, {})",
            region.width, region.height, region.x, region.y
        ),
        size_line(original_bytes, output_bytes),
    ]
}

/// Format a resize result with the final output dimensions.
pub fn format_resize_report(
    source: &str,
    output: &str,
    width: u32,
    height: u32,
    original_bytes: u64,
    output_bytes: u64,
) -> Vec<String> {
    vec![
        format!("{} \u{2192} {}", source, output),
        format!("    Dimensions: {}x{}", width, height),
        size_line(original_bytes, output_bytes),
    ]
}

/// Format a compress result with the quality used.
pub fn format_compress_report(
    source: &str,
    output: &str,
    quality: u32,
    original_bytes: u64,
    output_bytes: u64,
) -> Vec<String> {
    vec![
        format!("{} \u{2192} {}", source, output),
        format!("    Quality: {}%", quality),
        size_line(original_bytes, output_bytes),
    ]
}

fn size_line(original: u64, output: u64) -> String {
    format!(
        "    Output: {} ({}% smaller)",
        fmt_bytes(output),
        percent_saved(original, output)
    )
}

pub fn print_report(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Analyze
// ============================================================================

/// What a target-size analysis decided to do.
///
/// Serialized for `analyze --json`; the field names are part of that
/// output's contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum ResolvedAction {
    /// The file already meets the target at full quality.
    Keep { estimated_bytes: u64 },
    /// Shrink by lowering the encoding quality.
    ReduceQuality {
        quality: u32,
        estimated_bytes: u64,
        met_target: bool,
    },
    /// Grow by upscaling the pixel dimensions.
    Upscale {
        scale: f64,
        width: u32,
        height: u32,
        estimated_bytes: u64,
        met_target: bool,
    },
}

impl ResolvedAction {
    pub fn from_quality(r: &QualityResolution) -> Self {
        match r.direction {
            Direction::AlreadyFits => ResolvedAction::Keep {
                estimated_bytes: r.estimated_bytes,
            },
            _ => ResolvedAction::ReduceQuality {
                quality: r.quality.value(),
                estimated_bytes: r.estimated_bytes,
                met_target: r.met_target,
            },
        }
    }

    pub fn from_scale(r: &ScaleResolution) -> Self {
        ResolvedAction::Upscale {
            scale: r.scale,
            width: r.width,
            height: r.height,
            estimated_bytes: r.estimated_bytes,
            met_target: r.met_target,
        }
    }
}

/// Full analysis of a file against a byte target.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
    pub target_bytes: u64,
    pub resolution: ResolvedAction,
}

pub fn format_analysis(report: &AnalysisReport) -> Vec<String> {
    let mut lines = vec![
        report.source.clone(),
        format!("    Dimensions: {}x{}", report.width, report.height),
        format!("    File size: {}", fmt_bytes(report.file_size)),
        format!("    Target: {}", fmt_bytes(report.target_bytes)),
    ];
    let action = match &report.resolution {
        ResolvedAction::Keep { estimated_bytes } => {
            format!(
                "    Action: keep as is ({} at full quality)",
                fmt_bytes(*estimated_bytes)
            )
        }
        ResolvedAction::ReduceQuality {
            quality,
            estimated_bytes,
            met_target,
        } => {
            if *met_target {
                format!(
                    "    Action: reduce quality to {}% (~{})",
                    quality,
                    fmt_bytes(*estimated_bytes)
                )
            } else {
                format!(
                    "    Action: target unreachable; quality {}% still yields {}",
                    quality,
                    fmt_bytes(*estimated_bytes)
                )
            }
        }
        ResolvedAction::Upscale {
            scale,
            width,
            height,
            estimated_bytes,
            met_target,
        } => {
            if *met_target {
                format!(
                    "    Action: upscale {:.1}x to {}x{} (~{})",
                    scale,
                    width,
                    height,
                    fmt_bytes(*estimated_bytes)
                )
            } else {
                format!(
                    "    Action: target unreachable; {:.1}x upscale to {}x{} yields only {}",
                    scale,
                    width,
                    height,
                    fmt_bytes(*estimated_bytes)
                )
            }
        }
    };
    lines.push(action);
    lines
}

pub fn print_analysis(report: &AnalysisReport) {
    for line in format_analysis(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Quality;

    // =========================================================================
    // fmt_bytes / percent_saved tests
    // =========================================================================

    #[test]
    fn bytes_below_one_kb() {
        assert_eq!(fmt_bytes(0), "0 B");
        assert_eq!(fmt_bytes(1023), "1023 B");
    }

    #[test]
    fn bytes_in_kb_range() {
        assert_eq!(fmt_bytes(1024), "1.0 KB");
        assert_eq!(fmt_bytes(204_800), "200.0 KB");
    }

    #[test]
    fn bytes_in_mb_range() {
        assert_eq!(fmt_bytes(1_048_576), "1.00 MB");
        assert_eq!(fmt_bytes(1_572_864), "1.50 MB");
    }

    #[test]
    fn percent_saved_rounds() {
        assert_eq!(percent_saved(1000, 500), 50);
        assert_eq!(percent_saved(1000, 334), 67);
    }

    #[test]
    fn percent_saved_floors_at_zero() {
        // Output grew; report 0%, not a negative number
        assert_eq!(percent_saved(1000, 1500), 0);
        assert_eq!(percent_saved(0, 500), 0);
    }

    // =========================================================================
    // Report formatting tests
    // =========================================================================

    #[test]
    fn crop_report_shape() {
        let lines = format_crop_report(
            "photo.jpg",
            "cropped_800x600.jpg",
            PixelRegion {
                x: 120,
                y: 90,
                width: 800,
                height: 600,
            },
            1_572_864,
            219_853,
        );
        assert_eq!(lines[0], "photo.jpg \u{2192} cropped_800x600.jpg");
        assert_eq!(lines[1], "    Region: 800x600 at (120, 90)");
        assert_eq!(lines[2], "    Output: 214.7 KB (86% smaller)");
    }

    #[test]
    fn compress_report_includes_quality() {
        let lines = format_compress_report("a.jpg", "compressed_a.jpg", 62, 1_000_000, 200_000);
        assert_eq!(lines[1], "    Quality: 62%");
    }

    #[test]
    fn info_shape() {
        let lines = format_info(
            "photo.jpg",
            Dimensions {
                width: 4000,
                height: 3000,
            },
            1_593_835,
        );
        assert_eq!(lines[0], "photo.jpg");
        assert_eq!(lines[1], "    Dimensions: 4000x3000");
        assert_eq!(lines[2], "    File size: 1.52 MB");
    }

    // =========================================================================
    // Analysis formatting tests
    // =========================================================================

    fn report(resolution: ResolvedAction) -> AnalysisReport {
        AnalysisReport {
            source: "photo.jpg".to_string(),
            width: 4000,
            height: 3000,
            file_size: 1_593_835,
            target_bytes: 204_800,
            resolution,
        }
    }

    #[test]
    fn analysis_reduce_quality() {
        let lines = format_analysis(&report(ResolvedAction::ReduceQuality {
            quality: 62,
            estimated_bytes: 199_987,
            met_target: true,
        }));
        assert_eq!(lines[3], "    Target: 200.0 KB");
        assert_eq!(lines[4], "    Action: reduce quality to 62% (~195.3 KB)");
    }

    #[test]
    fn analysis_unreachable_target() {
        let lines = format_analysis(&report(ResolvedAction::ReduceQuality {
            quality: 1,
            estimated_bytes: 250_000,
            met_target: false,
        }));
        assert!(lines[4].contains("target unreachable"));
    }

    #[test]
    fn analysis_keep() {
        let lines = format_analysis(&report(ResolvedAction::Keep {
            estimated_bytes: 150_000,
        }));
        assert!(lines[4].contains("keep as is"));
    }

    #[test]
    fn analysis_upscale() {
        let lines = format_analysis(&report(ResolvedAction::Upscale {
            scale: 1.5,
            width: 6000,
            height: 4500,
            estimated_bytes: 210_000,
            met_target: true,
        }));
        assert_eq!(lines[4], "    Action: upscale 1.5x to 6000x4500 (~205.1 KB)");
    }

    #[test]
    fn analysis_json_is_tagged() {
        let r = report(ResolvedAction::Keep {
            estimated_bytes: 150_000,
        });
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["resolution"]["action"], "keep");
        assert_eq!(json["target_bytes"], 204_800);
    }

    #[test]
    fn resolved_action_from_quality_resolution() {
        let r = QualityResolution {
            quality: Quality::new(100),
            direction: Direction::AlreadyFits,
            estimated_bytes: 1000,
            met_target: true,
        };
        assert!(matches!(
            ResolvedAction::from_quality(&r),
            ResolvedAction::Keep { .. }
        ));
    }
}

//! Target-size resolution: find encoding parameters that make the output
//! meet a requested byte budget.
//!
//! Two independent monotonic searches, both assuming encoded size is
//! non-decreasing in the search parameter. That holds for quality and for
//! pixel count with the codecs this crate ships; validate it before reusing
//! these searches with another encoder.
//!
//! - **Quality** has a small bounded integer domain, so an exact binary
//!   search over `[1, 100]` is used to find the *largest* quality still at
//!   or under target.
//! - **Scale** is effectively continuous and noisier after resampling, so a
//!   coarse forward scan with a hard ceiling is used instead — a few extra
//!   estimator calls buy robustness against non-monotonic noise at fine
//!   granularity.
//!
//! Both resolutions carry an explicit `met_target` flag; a boundary result
//! (quality 1, ceiling scale) with `met_target == false` means the target
//! was unreachable.

use crate::config::SearchConfig;
use crate::params::Quality;

/// How the resolved parameters relate to the requested budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Full quality already fits under the target.
    AlreadyFits,
    /// Quality was reduced to fit the target.
    ReducedToFit,
    /// Dimensions were scaled up to reach the target.
    UpscaledToReach,
}

/// Outcome of a quality search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityResolution {
    pub quality: Quality,
    pub direction: Direction,
    /// Estimator output at the resolved quality.
    pub estimated_bytes: u64,
    /// False when even quality 1 exceeds the target.
    pub met_target: bool,
}

/// Outcome of a scale search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleResolution {
    pub scale: f64,
    /// Final output dimensions, `round(base * scale)` per axis.
    pub width: u32,
    pub height: u32,
    /// Estimator output at the resolved scale.
    pub estimated_bytes: u64,
    /// False when even the ceiling scale undershoots the target.
    pub met_target: bool,
}

/// Parse a free-form target-size string into bytes.
///
/// Case-insensitive; accepts `kb`/`k` and `mb` suffixes; a bare number is
/// interpreted as KB. Unparseable or non-positive input yields `None`,
/// meaning "no target specified" — the caller skips the search and keeps
/// prior manual settings.
///
/// Like the editor field this replaces, a numeric prefix followed by the
/// suffix is enough: `"1.5mb"`, `"200 kb"`, `"500"`.
pub fn parse_target_size(input: &str) -> Option<u64> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return None;
    }

    let digits: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+')
        .collect();
    let num: f64 = digits.parse().ok()?;
    if !num.is_finite() || num <= 0.0 {
        return None;
    }

    let bytes = if s.contains("mb") {
        num * 1_048_576.0
    } else {
        // "kb", "k", or bare number → KB
        num * 1024.0
    };
    Some(bytes.round() as u64)
}

/// Binary-search the largest quality whose estimated size fits the target.
///
/// `estimate(quality)` is supplied by the caller and wraps the actual
/// encoder; quality 100 is probed first so an image that already fits skips
/// the search entirely. Errors from the estimator propagate unchanged —
/// re-encoding the same bytes is expected to fail identically, so there is
/// no retry.
pub fn find_quality<E>(
    target_bytes: u64,
    mut estimate: impl FnMut(u32) -> Result<u64, E>,
) -> Result<QualityResolution, E> {
    let full = estimate(100)?;
    if full <= target_bytes {
        return Ok(QualityResolution {
            quality: Quality::new(100),
            direction: Direction::AlreadyFits,
            estimated_bytes: full,
            met_target: true,
        });
    }

    let mut lo = 1u32;
    let mut hi = 100u32;
    let mut best: Option<(u32, u64)> = None;
    let mut floor_bytes = full;
    while lo <= hi {
        let mid = (lo + hi) / 2;
        let bytes = estimate(mid)?;
        log::debug!("quality probe q={mid} -> {bytes} bytes (target {target_bytes})");
        if mid == 1 {
            floor_bytes = bytes;
        }
        if bytes <= target_bytes {
            best = Some((mid, bytes));
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }

    Ok(match best {
        Some((q, bytes)) => QualityResolution {
            quality: Quality::new(q),
            direction: Direction::ReducedToFit,
            estimated_bytes: bytes,
            met_target: true,
        },
        // Even quality 1 overshoots: boundary value, flagged unreachable.
        None => QualityResolution {
            quality: Quality::new(1),
            direction: Direction::ReducedToFit,
            estimated_bytes: floor_bytes,
            met_target: false,
        },
    })
}

/// Scan upscale factors until the estimated size reaches the target.
///
/// Steps from just above 1.0 in `search.scale_step` increments up to
/// `search.scale_ceiling`, stopping at the first scale whose estimate meets
/// or exceeds the target. Quality stays pinned at 100 — the lever here is
/// pixel count, not compression. Reaching the ceiling without satisfying
/// the target resolves to the ceiling as a best effort, flagged via
/// `met_target`.
pub fn find_scale<E>(
    target_bytes: u64,
    base_w: u32,
    base_h: u32,
    search: &SearchConfig,
    mut estimate: impl FnMut(f64) -> Result<u64, E>,
) -> Result<ScaleResolution, E> {
    let step = search.scale_step;
    let ceiling = search.scale_ceiling;

    let dims = |scale: f64| {
        (
            (base_w as f64 * scale).round() as u32,
            (base_h as f64 * scale).round() as u32,
        )
    };

    let mut scale = 1.0 + step;
    let mut last_bytes = 0u64;
    while scale <= ceiling + 1e-9 {
        let bytes = estimate(scale)?;
        log::debug!("scale probe s={scale:.2} -> {bytes} bytes (target {target_bytes})");
        if bytes >= target_bytes {
            let (width, height) = dims(scale);
            return Ok(ScaleResolution {
                scale,
                width,
                height,
                estimated_bytes: bytes,
                met_target: true,
            });
        }
        last_bytes = bytes;
        scale += step;
    }

    let (width, height) = dims(ceiling);
    Ok(ScaleResolution {
        scale: ceiling,
        width,
        height,
        estimated_bytes: last_bytes,
        met_target: false,
    })
}

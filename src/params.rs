//! Parameter types shared across the editor, searches, and encode backend.
//!
//! These types describe *what* to do, not *how* to do it. They are the
//! interface between the high-level editor/CLI layers (which decide what to
//! produce) and the [`encode`](crate::encode) backend (which does the actual
//! pixel work).
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 80). Clamped on construction.
//! - [`OutputFormat`] — Requested encoding (`jpeg|png|webp`), with its file extension.
//! - [`Dimension`] — A length entered in `px`, `cm`, or `in`, resolved to pixels.
//! - [`ResizePreset`] — Named output sizes (HD, Full HD, Instagram Post, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pixels per centimeter / inch at CSS resolution (96 dpi).
const PX_PER_CM: f64 = 37.7953;
const PX_PER_IN: f64 = 96.0;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
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
        Self(80)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Requested output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    /// File extension for download names (`jpeg` shortens to `jpg`).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::Webp),
            other => Err(format!("unsupported format: {other}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-entered length with an optional unit suffix (`px`, `cm`, `in`).
///
/// Bare numbers are pixels. Non-numeric input resolves to 0 px — geometry
/// clamping downstream turns that into a valid value, matching the
/// coerce-never-reject policy for manual entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension(pub f64);

impl Dimension {
    pub fn pixels(self) -> u32 {
        self.0.round().max(0.0) as u32
    }

    /// Convert pixels back to a unit for display, rounded like the editor
    /// fields (two decimals for physical units, whole pixels otherwise).
    pub fn display_in(px: f64, unit: &str) -> String {
        match unit {
            "cm" => format!("{:.2}", px / PX_PER_CM),
            "in" => format!("{:.2}", px / PX_PER_IN),
            _ => format!("{}", px.round() as i64),
        }
    }
}

impl FromStr for Dimension {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        let (num_part, factor) = if let Some(n) = t.strip_suffix("cm") {
            (n.trim_end(), PX_PER_CM)
        } else if let Some(n) = t.strip_suffix("in") {
            (n.trim_end(), PX_PER_IN)
        } else if let Some(n) = t.strip_suffix("px") {
            (n.trim_end(), 1.0)
        } else {
            (t.as_str(), 1.0)
        };
        let n: f64 = num_part.parse().unwrap_or(0.0);
        Ok(Dimension((n * factor).round()))
    }
}

/// Named output-size presets offered by the resize tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ResizePreset {
    Original,
    Hd,
    FullHd,
    Square,
    InstagramPost,
    TwitterBanner,
    FacebookCover,
    A4,
}

impl ResizePreset {
    /// Output size for a source of the given dimensions. Only `Original`
    /// depends on the source.
    pub fn dimensions(self, source: (u32, u32)) -> (u32, u32) {
        match self {
            ResizePreset::Original => source,
            ResizePreset::Hd => (1280, 720),
            ResizePreset::FullHd => (1920, 1080),
            ResizePreset::Square => (1080, 1080),
            ResizePreset::InstagramPost => (1080, 1350),
            ResizePreset::TwitterBanner => (1500, 500),
            ResizePreset::FacebookCover => (820, 312),
            ResizePreset::A4 => (2480, 3508),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResizePreset::Original => "Original size",
            ResizePreset::Hd => "HD 1280\u{d7}720",
            ResizePreset::FullHd => "Full HD 1920\u{d7}1080",
            ResizePreset::Square => "Square 1:1",
            ResizePreset::InstagramPost => "Instagram Post",
            ResizePreset::TwitterBanner => "Twitter Banner",
            ResizePreset::FacebookCover => "Facebook Cover",
            ResizePreset::A4 => "A4 300dpi",
        }
    }
}

/// Recompute the other edge of a ratio-locked dimension pair.
///
/// Editing width with a locked original ratio yields
/// `height = width * orig_h / orig_w`; editing height is symmetric.
pub fn locked_counterpart(edited_px: u32, orig_edited: u32, orig_other: u32) -> u32 {
    if orig_edited == 0 {
        return 0;
    }
    (edited_px as f64 * orig_other as f64 / orig_edited as f64).round() as u32
}

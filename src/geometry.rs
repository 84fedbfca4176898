//! Pure geometry for the crop selection box.
//!
//! All functions here are pure and testable without a canvas or image data.
//! Coordinates are in source-image pixel units as `f64` — fractional values
//! accumulate during a drag and are only rounded at export time.

/// Axis-aligned crop rectangle in source-image pixel coordinates.
///
/// Invariants (enforced by [`CropBox::clamped`], which every mutation path
/// goes through):
///
/// - `0 ≤ x` and `0 ≤ y`
/// - `x + width ≤ image_w` and `y + height ≤ image_h`
/// - `width ≥ 1` and `height ≥ 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Quick-crop presets offered alongside freehand selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Top-left anchored square of side `min(w, h)`.
    Square,
    /// Full width, height from the 16:9 ratio (clamped to the image).
    Widescreen,
    /// Full width, height from the 4:3 ratio (clamped to the image).
    Standard,
    /// The entire image.
    Full,
}

pub(crate) fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

impl CropBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Full-image box, the state right after an image loads or on reset.
    pub fn full(image_w: f64, image_h: f64) -> Self {
        Self::new(0.0, 0.0, image_w, image_h)
    }

    /// Coerce any candidate rectangle into the invariant-respecting range.
    ///
    /// Origin is clamped first, then width/height against the remaining
    /// space, with a floor of 1 px. Inputs are never rejected.
    pub fn clamped(self, image_w: f64, image_h: f64) -> Self {
        let x = clamp(self.x, 0.0, (image_w - 1.0).max(0.0));
        let y = clamp(self.y, 0.0, (image_h - 1.0).max(0.0));
        Self {
            x,
            y,
            width: clamp(self.width, 1.0, image_w - x),
            height: clamp(self.height, 1.0, image_h - y),
        }
    }

    /// Build a preset selection for an image of the given size.
    pub fn from_preset(preset: Preset, image_w: f64, image_h: f64) -> Self {
        let b = match preset {
            Preset::Square => {
                let side = image_w.min(image_h);
                Self::new(0.0, 0.0, side, side)
            }
            Preset::Widescreen => {
                Self::new(0.0, 0.0, image_w, (image_w * 9.0 / 16.0).round())
            }
            Preset::Standard => Self::new(0.0, 0.0, image_w, (image_w * 3.0 / 4.0).round()),
            Preset::Full => Self::full(image_w, image_h),
        };
        b.clamped(image_w, image_h)
    }

    /// Whether an image-space point falls inside the box (edges inclusive).
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Output pixel dimensions after rounding.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

/// The eight resize anchors: four corners plus four edge midpoints.
///
/// Each handle governs at most one horizontal edge and one vertical edge of
/// the box; the opposite edges never move while it is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

/// Which horizontal edge a handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HEdge {
    Left,
    None,
    Right,
}

/// Which vertical edge a handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VEdge {
    Top,
    None,
    Bottom,
}

impl Handle {
    /// Hit-test order. Corners come first so that on a degenerate box the
    /// corner wins over the overlapping edge midpoint.
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
        Handle::Top,
        Handle::Bottom,
        Handle::Left,
        Handle::Right,
    ];

    pub fn h_edge(self) -> HEdge {
        match self {
            Handle::TopLeft | Handle::Left | Handle::BottomLeft => HEdge::Left,
            Handle::TopRight | Handle::Right | Handle::BottomRight => HEdge::Right,
            Handle::Top | Handle::Bottom => HEdge::None,
        }
    }

    pub fn v_edge(self) -> VEdge {
        match self {
            Handle::TopLeft | Handle::Top | Handle::TopRight => VEdge::Top,
            Handle::BottomLeft | Handle::Bottom | Handle::BottomRight => VEdge::Bottom,
            Handle::Left | Handle::Right => VEdge::None,
        }
    }

    /// Anchor position in image space for the current box.
    pub fn anchor(self, b: &CropBox) -> (f64, f64) {
        let (x, y, w, h) = (b.x, b.y, b.width, b.height);
        match self {
            Handle::TopLeft => (x, y),
            Handle::Top => (x + w / 2.0, y),
            Handle::TopRight => (x + w, y),
            Handle::Right => (x + w, y + h / 2.0),
            Handle::BottomRight => (x + w, y + h),
            Handle::Bottom => (x + w / 2.0, y + h),
            Handle::BottomLeft => (x, y + h),
            Handle::Left => (x, y + h / 2.0),
        }
    }

    /// CSS-style directional cursor name for this handle.
    pub fn cursor(self) -> &'static str {
        match self {
            Handle::TopLeft => "nw-resize",
            Handle::Top => "n-resize",
            Handle::TopRight => "ne-resize",
            Handle::Right => "e-resize",
            Handle::BottomRight => "se-resize",
            Handle::Bottom => "s-resize",
            Handle::BottomLeft => "sw-resize",
            Handle::Left => "w-resize",
        }
    }
}

/// Box produced while drawing a fresh selection from `start` to `current`.
///
/// Corners are the min/max of the two points, clamped to the image.
pub fn drawn_box(
    start: (f64, f64),
    current: (f64, f64),
    image_w: f64,
    image_h: f64,
) -> CropBox {
    let x = start.0.min(current.0);
    let y = start.1.min(current.1);
    let w = (current.0 - start.0).abs();
    let h = (current.1 - start.1).abs();
    CropBox::new(x, y, w, h).clamped(image_w, image_h)
}

/// Box produced by moving `origin` by the pointer delta.
///
/// The box keeps its size and is clamped so it never leaves the image.
pub fn moved_box(origin: &CropBox, dx: f64, dy: f64, image_w: f64, image_h: f64) -> CropBox {
    CropBox {
        x: clamp(origin.x + dx, 0.0, image_w - origin.width),
        y: clamp(origin.y + dy, 0.0, image_h - origin.height),
        width: origin.width,
        height: origin.height,
    }
}

/// Box produced by dragging `handle` on the pre-drag `origin` box.
///
/// Moving the right edge adjusts only `width`; moving the left edge adjusts
/// `x` and `width` together so the right edge stays fixed. Top/bottom are
/// symmetric. Corner handles combine one rule of each axis.
pub fn resized_box(
    origin: &CropBox,
    handle: Handle,
    dx: f64,
    dy: f64,
    image_w: f64,
    image_h: f64,
) -> CropBox {
    let CropBox {
        mut x,
        mut y,
        mut width,
        mut height,
    } = *origin;

    match handle.h_edge() {
        HEdge::Right => width = clamp(width + dx, 1.0, image_w - x),
        HEdge::Left => {
            let new_w = clamp(width - dx, 1.0, x + width);
            x = x + width - new_w;
            width = new_w;
        }
        HEdge::None => {}
    }
    match handle.v_edge() {
        VEdge::Bottom => height = clamp(height + dy, 1.0, image_h - y),
        VEdge::Top => {
            let new_h = clamp(height - dy, 1.0, y + height);
            y = y + height - new_h;
            height = new_h;
        }
        VEdge::None => {}
    }

    CropBox {
        x,
        y,
        width,
        height,
    }
}

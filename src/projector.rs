//! Projection between image space and the on-screen canvas.
//!
//! The projector owns no state: it computes a scale from the image,
//! viewport, and zoom, and builds a [`RenderPlan`] — a pure description of
//! what an external raster surface should draw. Actually painting it is the
//! embedder's problem, which keeps every function here unit-testable.
//!
//! The scale must be recomputed whenever the image, viewport, or zoom
//! changes; pointer conversions always use the value current at event time
//! or drags drift after a live resize or zoom.

use crate::geometry::{CropBox, Handle};

/// Default zoom bounds. The base scale never upscales past 100% on its own;
/// zoom multiplies on top within this range.
pub const ZOOM_MIN: f64 = 0.2;
pub const ZOOM_MAX: f64 = 4.0;

/// Dimension label metrics, matching the 11px font the embedder draws with.
const LABEL_MARGIN: f64 = 4.0;
const LABEL_WIDTH: f64 = 80.0;
const LABEL_ASCENT: f64 = 14.0;

pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}

/// Image→canvas scale: fit the viewport without upscaling, then apply zoom.
///
/// `zoom` is applied as given; callers clamp it first ([`clamp_zoom`] for
/// the default bounds, or the configured editor bounds).
pub fn fit_scale(image_w: f64, image_h: f64, viewport_w: f64, viewport_h: f64, zoom: f64) -> f64 {
    let base = (viewport_w / image_w).min(viewport_h / image_h).min(1.0);
    base * zoom
}

/// Canvas-space point converted to image space.
pub fn to_image(scale: f64, cx: f64, cy: f64) -> (f64, f64) {
    (cx / scale, cy / scale)
}

/// Image-space point converted to canvas space.
pub fn to_canvas(scale: f64, ix: f64, iy: f64) -> (f64, f64) {
    (ix * scale, iy * scale)
}

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A guide line segment in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// The selection dimension label and its clamped canvas position.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// What to draw for the current selection: the bright inner rect (the area
/// outside it gets the darkened overlay), rule-of-thirds guides, the eight
/// handle markers, and the pixel-dimension label.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPlan {
    pub rect: CanvasRect,
    pub guides: Vec<Line>,
    pub handles: Vec<(f64, f64)>,
    pub label: Label,
}

/// Full frame description: canvas size for the scaled image plus the
/// selection overlay, if the box has any area.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub canvas_w: u32,
    pub canvas_h: u32,
    pub scale: f64,
    pub selection: Option<SelectionPlan>,
}

/// Build the frame plan for the given box at the given scale.
pub fn render_plan(image_w: f64, image_h: f64, b: &CropBox, scale: f64) -> RenderPlan {
    let canvas_w = (image_w * scale).round() as u32;
    let canvas_h = (image_h * scale).round() as u32;
    let selection = (b.width > 0.0 && b.height > 0.0)
        .then(|| selection_plan(b, scale, canvas_w as f64, canvas_h as f64));
    RenderPlan {
        canvas_w,
        canvas_h,
        scale,
        selection,
    }
}

fn selection_plan(b: &CropBox, scale: f64, canvas_w: f64, canvas_h: f64) -> SelectionPlan {
    let (bx, by) = to_canvas(scale, b.x, b.y);
    let (bw, bh) = (b.width * scale, b.height * scale);

    let mut guides = Vec::with_capacity(4);
    for i in 1..3 {
        let fx = bx + bw * i as f64 / 3.0;
        let fy = by + bh * i as f64 / 3.0;
        guides.push(Line {
            x1: fx,
            y1: by,
            x2: fx,
            y2: by + bh,
        });
        guides.push(Line {
            x1: bx,
            y1: fy,
            x2: bx + bw,
            y2: fy,
        });
    }

    let handles = Handle::ALL
        .into_iter()
        .map(|h| {
            let (ax, ay) = h.anchor(b);
            to_canvas(scale, ax, ay)
        })
        .collect();

    let (pw, ph) = b.pixel_size();
    let label = Label {
        text: format!("{pw}\u{d7}{ph}px"),
        x: (bx + LABEL_MARGIN).clamp(LABEL_MARGIN, (canvas_w - LABEL_WIDTH).max(LABEL_MARGIN)),
        y: (by - 2.0 * LABEL_MARGIN).clamp(LABEL_ASCENT, (canvas_h - LABEL_MARGIN).max(LABEL_ASCENT)),
    };

    SelectionPlan {
        rect: CanvasRect {
            x: bx,
            y: by,
            width: bw,
            height: bh,
        },
        guides,
        handles,
        label,
    }
}

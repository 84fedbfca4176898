//! The interactive editing session.
//!
//! [`EditorSession`] ties the pure layers together: it owns the image
//! dimensions, the current selection box, the drag state, and the
//! viewport/zoom, and recomputes the image→canvas scale whenever any of
//! them changes. Pointer events arrive in canvas coordinates and are
//! converted here; everything below this layer works in image space.
//!
//! The session never touches pixels. Applying the crop hands a rounded
//! pixel region to an [`EncodeBackend`]; a failed operation leaves the
//! session untouched so the user can retry or adjust.

use crate::config::EditorConfig;
use crate::encode::{CropParams, EncodeBackend, EncodeError};
use crate::geometry::{CropBox, Preset, clamp};
use crate::interaction::{self, DragState};
use crate::params::{OutputFormat, Quality};
use crate::projector::{self, RenderPlan};
use std::path::Path;

pub struct EditorSession {
    image_w: f64,
    image_h: f64,
    crop: CropBox,
    drag: DragState,
    viewport: (f64, f64),
    zoom: f64,
    scale: f64,
    config: EditorConfig,
}

impl EditorSession {
    /// Start a session for an image of the given pixel size. The initial
    /// selection is the full image.
    pub fn new(image_w: u32, image_h: u32, viewport: (f64, f64), config: EditorConfig) -> Self {
        let (iw, ih) = (image_w as f64, image_h as f64);
        let mut session = Self {
            image_w: iw,
            image_h: ih,
            crop: CropBox::full(iw, ih),
            drag: DragState::Idle,
            viewport,
            zoom: 1.0,
            scale: 1.0,
            config,
        };
        session.rescale();
        session
    }

    fn rescale(&mut self) {
        self.scale = projector::fit_scale(
            self.image_w,
            self.image_h,
            self.viewport.0,
            self.viewport.1,
            self.zoom,
        );
    }

    /// Canvas-space pointer position converted to image space, clamped to
    /// the image bounds so drags past the canvas edge stay valid.
    fn image_point(&self, cx: f64, cy: f64) -> (f64, f64) {
        let (ix, iy) = projector::to_image(self.scale, cx, cy);
        (
            clamp(ix, 0.0, self.image_w),
            clamp(iy, 0.0, self.image_h),
        )
    }

    pub fn crop_box(&self) -> CropBox {
        self.crop
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Resize the viewport. The scale changes; the selection, being in
    /// image space, does not.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
        self.rescale();
    }

    /// Set the zoom factor, clamped to the configured bounds.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp(zoom, self.config.zoom_min, self.config.zoom_max);
        self.rescale();
    }

    /// Cursor hint for an idle pointer at a canvas position.
    pub fn cursor_hint(&self, cx: f64, cy: f64) -> &'static str {
        interaction::cursor_hint(&self.crop, self.scale, cx, cy, self.config.handle_hit_radius)
    }

    /// Begin a drag at a canvas position. Handle hits take priority over
    /// moving; a press outside the box starts drawing a new one.
    pub fn pointer_down(&mut self, cx: f64, cy: f64) {
        let hit = interaction::hit_handle(
            &self.crop,
            self.scale,
            cx,
            cy,
            self.config.handle_hit_radius,
        );
        let (ix, iy) = self.image_point(cx, cy);
        let (drag, crop) = interaction::pointer_down(&self.crop, ix, iy, hit);
        self.drag = drag;
        self.crop = crop;
    }

    /// Continue an in-progress drag. A no-op while idle.
    pub fn pointer_move(&mut self, cx: f64, cy: f64) {
        let (ix, iy) = self.image_point(cx, cy);
        if let Some(crop) = interaction::pointer_move(&self.drag, ix, iy, self.image_w, self.image_h)
        {
            self.crop = crop;
        }
    }

    /// End the drag and commit the selection.
    pub fn pointer_up(&mut self) {
        let (drag, crop) = interaction::pointer_up(&self.drag, &self.crop);
        self.drag = drag;
        self.crop = crop;
    }

    /// Manual entry of box values. Coerced into range, never rejected.
    pub fn set_box(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.crop = CropBox::new(x, y, width, height).clamped(self.image_w, self.image_h);
    }

    /// Replace the selection with a quick-crop preset.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.crop = CropBox::from_preset(preset, self.image_w, self.image_h);
        self.drag = DragState::Idle;
    }

    /// Restore the initial full-image selection.
    pub fn reset(&mut self) {
        self.crop = CropBox::full(self.image_w, self.image_h);
        self.drag = DragState::Idle;
    }

    /// Frame description for the current state.
    pub fn render_plan(&self) -> RenderPlan {
        projector::render_plan(self.image_w, self.image_h, &self.crop, self.scale)
    }

    /// Run the crop through the backend. Returns the encoded size in bytes.
    /// The session is left as-is either way.
    pub fn apply_crop(
        &self,
        backend: &dyn EncodeBackend,
        source: &Path,
        output: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<u64, EncodeError> {
        let params = CropParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            region: (&self.crop).into(),
            format,
            quality,
        };
        log::info!(
            "crop {}x{} at ({}, {}) -> {}",
            params.region.width,
            params.region.height,
            params.region.x,
            params.region.y,
            output.display()
        );
        backend.crop(&params)
    }
}

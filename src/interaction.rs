//! Pointer interaction state machine for the crop editor.
//!
//! The drag mode is an explicit tagged union owned by one
//! [`EditorSession`](crate::editor::EditorSession) — there is no ambient
//! global state. Transition functions here are pure: they take the current
//! state, the current box, and an image-space pointer position, and return
//! the next state and box. Rendering is someone else's job.
//!
//! Hit-testing runs in canvas space because the grab radius is a fixed
//! on-screen distance, independent of zoom.

use crate::geometry::{CropBox, Handle, drawn_box, moved_box, resized_box};

/// On-screen distance within which a pointer grabs a handle, in canvas px.
pub const HANDLE_HIT_RADIUS: f64 = 11.0;

/// Current drag mode. One value per editing session, replaced on every
/// pointer-down and reset to `Idle` on pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// Drawing a fresh box from `start` (image space).
    Drawing { start: (f64, f64) },
    /// Moving the whole box; `origin` is the pre-drag box.
    Moving {
        origin: CropBox,
        start: (f64, f64),
    },
    /// Dragging one handle; `origin` is the pre-drag box.
    Resizing {
        handle: Handle,
        origin: CropBox,
        start: (f64, f64),
    },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }
}

/// Find the handle under a canvas-space point, if any.
///
/// Handles win over the move/draw interpretation, so this runs first on
/// pointer-down. `scale` is the current image→canvas factor.
pub fn hit_handle(b: &CropBox, scale: f64, cx: f64, cy: f64, radius: f64) -> Option<Handle> {
    Handle::ALL.into_iter().find(|h| {
        let (ax, ay) = h.anchor(b);
        let (hx, hy) = (ax * scale, ay * scale);
        (cx - hx).hypot(cy - hy) <= radius
    })
}

/// Cursor hint for an idle pointer: directional cursor over a handle,
/// `move` inside the box, `crosshair` elsewhere. Pure, no state change.
pub fn cursor_hint(b: &CropBox, scale: f64, cx: f64, cy: f64, radius: f64) -> &'static str {
    if let Some(h) = hit_handle(b, scale, cx, cy, radius) {
        return h.cursor();
    }
    if b.contains(cx / scale, cy / scale) {
        "move"
    } else {
        "crosshair"
    }
}

/// Interpret a pointer-down at image-space `(ix, iy)`.
///
/// `hit` is the handle under the pointer (already tested in canvas space).
/// Starting a new drag overwrites any in-progress drag state. Returns the
/// next state and the box to display, which changes only in the drawing
/// case (a zero-size box at the click point, grown by subsequent moves).
pub fn pointer_down(
    current: &CropBox,
    ix: f64,
    iy: f64,
    hit: Option<Handle>,
) -> (DragState, CropBox) {
    if let Some(handle) = hit {
        return (
            DragState::Resizing {
                handle,
                origin: *current,
                start: (ix, iy),
            },
            *current,
        );
    }
    if current.contains(ix, iy) {
        (
            DragState::Moving {
                origin: *current,
                start: (ix, iy),
            },
            *current,
        )
    } else {
        (
            DragState::Drawing { start: (ix, iy) },
            CropBox::new(ix, iy, 0.0, 0.0),
        )
    }
}

/// Recompute the box for a pointer-move. Returns `None` when idle (the
/// caller should only update a cursor hint). State itself never changes on
/// a move.
pub fn pointer_move(
    state: &DragState,
    ix: f64,
    iy: f64,
    image_w: f64,
    image_h: f64,
) -> Option<CropBox> {
    match state {
        DragState::Idle => None,
        DragState::Drawing { start } => Some(drawn_box(*start, (ix, iy), image_w, image_h)),
        DragState::Moving { origin, start } => Some(moved_box(
            origin,
            ix - start.0,
            iy - start.1,
            image_w,
            image_h,
        )),
        DragState::Resizing {
            handle,
            origin,
            start,
        } => Some(resized_box(
            origin,
            *handle,
            ix - start.0,
            iy - start.1,
            image_w,
            image_h,
        )),
    }
}

/// Finalize a drag: floor width/height to 1 px and return to `Idle`.
///
/// A pointer-up always commits whatever box the most recent move produced,
/// including drags released outside the canvas.
pub fn pointer_up(state: &DragState, current: &CropBox) -> (DragState, CropBox) {
    if state.is_idle() {
        return (DragState::Idle, *current);
    }
    let mut b = *current;
    if b.width < 1.0 {
        b.width = 1.0;
    }
    if b.height < 1.0 {
        b.height = 1.0;
    }
    (DragState::Idle, b)
}

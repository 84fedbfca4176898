//! # imgfit
//!
//! An interactive crop and target-size engine for raster images, with a CLI
//! front end. The core answers two questions: *which rectangle of this image
//! does the user want*, and *what encoding parameters make the output meet a
//! byte budget*.
//!
//! # Architecture: Pure Core, Thin Shell
//!
//! The crate is layered so that everything interesting is testable without a
//! display or an image file:
//!
//! ```text
//! 1. Geometry     box math in image space          (pure functions)
//! 2. Interaction  pointer drags → box transitions  (pure state machine)
//! 3. Projector    image space ↔ canvas space       (pure, emits RenderPlan)
//! 4. Session      owns box + drag + zoom           (no pixels)
//! 5. Encode       decode/crop/resize/encode        (the only impure layer)
//! ```
//!
//! Pointer handling never draws and rendering never mutates: the projector
//! produces a [`projector::RenderPlan`] describing what to paint, and an
//! embedder (or a test) consumes it. The encode layer is behind the
//! [`encode::EncodeBackend`] trait so every other module can be exercised
//! against a recording mock.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | Crop box invariants, presets, and the drag/move/resize box math |
//! | [`interaction`] | Drag state machine: hit-testing, pointer down/move/up transitions |
//! | [`projector`] | Fit-to-viewport scaling, coordinate conversion, render plans |
//! | [`editor`] | [`editor::EditorSession`] — ties box, drag state, and zoom together |
//! | [`target`] | Target-size searches: quality binary search and upscale scan |
//! | [`params`] | Shared parameter types: `Quality`, `OutputFormat`, unit-aware dimensions |
//! | [`encode`] | `EncodeBackend` trait, the `image`-crate backend, size estimator |
//! | [`config`] | `imgfit.toml` loading and validation |
//! | [`output`] | CLI output formatting and the `analyze` JSON report |
//!
//! # Design Decisions
//!
//! ## Fractional Image Space
//!
//! Selection coordinates are `f64` in source-image pixel units. Drags at
//! fractional zoom accumulate sub-pixel deltas; rounding only happens once,
//! when a box is handed to the encoder. Every mutation path funnels through
//! [`geometry::CropBox::clamped`], so the invariants (inside the image,
//! at least 1x1) hold at all times and bad input is coerced, never rejected.
//!
//! ## Searches Over Estimators
//!
//! The target-size searches in [`target`] take the estimator as a closure
//! rather than calling the encoder directly. Search logic is tested against
//! synthetic monotonic estimators in microseconds; the production closure
//! wraps [`encode::SizeEstimator`], which decodes the source once and
//! re-encodes in memory per probe.
//!
//! ## Pure-Rust Imaging
//!
//! The [`encode`] module uses the `image` crate end to end (Lanczos3
//! resampling, pure-Rust JPEG/PNG/WebP codecs). No system dependencies: the
//! binary is fully self-contained.

pub mod config;
pub mod editor;
pub mod encode;
pub mod geometry;
pub mod interaction;
pub mod output;
pub mod params;
pub mod projector;
pub mod target;

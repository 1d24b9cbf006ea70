//! Rendering module
//!
//! Scene composition over a small [`Surface`] abstraction. The simulation
//! never draws; this module reads a post-tick state and emits raster ops.
//! The only platform-specific piece is the wasm canvas backend.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use scene::{DrawOpts, Drawable, draw_frame};
pub use surface::{Surface, TextAlign};

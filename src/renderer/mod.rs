//! Rendering module
//!
//! `build_frame` turns a read-only state snapshot into a draw list; the Canvas
//! 2D backend (browser only) executes it.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{DrawCommand, build_frame};

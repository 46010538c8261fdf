//! Rendering module
//!
//! `shapes` describes a frame in world units; `canvas` draws it with the
//! browser's 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{TrackScene, VehicleTransform, frame_transforms};

//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and build them lazily
//! against the surface format found in `RenderCtx`.

mod ctx;
mod triangle;

pub use ctx::{RenderCtx, RenderTarget};
pub use triangle::TriangleRenderer;

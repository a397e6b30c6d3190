//! Shader programs.
//!
//! Each [`ShaderVariant`] is a WGSL program with a `vs_main` vertex entry point
//! and an `fs_main` fragment entry point. `stages` mirrors their arithmetic on
//! the CPU; `interface` checks the WGSL input/output records against the
//! host-side buffer layouts.

pub mod interface;
pub mod stages;
mod variant;
mod vertex;

pub use variant::{ParseVariantError, ShaderVariant};
pub use vertex::{ColorVertex, TRIANGLE_VERTICES};

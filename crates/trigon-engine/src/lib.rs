//! Trigon engine crate.
//!
//! Owns the platform + GPU runtime pieces and the two triangle shader programs
//! (solid fill and per-vertex color) along with their CPU reference stages.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod paint;
pub mod render;
pub mod shader;

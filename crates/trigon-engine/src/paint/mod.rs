//! Color types shared by the runtime and renderers.

mod color;

pub use color::Color;

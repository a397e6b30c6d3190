use std::fmt;
use std::str::FromStr;

use super::vertex::ColorVertex;

/// One of the triangle shader programs.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ShaderVariant {
    /// Corners derived from `@builtin(vertex_index)`, fixed fill color.
    SolidTriangle,
    /// Position + color read from a vertex buffer, color interpolated.
    #[default]
    VertexColor,
}

impl ShaderVariant {
    /// All variants in cycling order.
    pub const ALL: [ShaderVariant; 2] = [ShaderVariant::SolidTriangle, ShaderVariant::VertexColor];

    pub const VERTEX_ENTRY: &'static str = "vs_main";
    pub const FRAGMENT_ENTRY: &'static str = "fs_main";

    /// Stable, human-readable name. Also accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            ShaderVariant::SolidTriangle => "solid-triangle",
            ShaderVariant::VertexColor => "vertex-color",
        }
    }

    /// Label used for wgpu objects created for this variant.
    pub fn label(self) -> &'static str {
        match self {
            ShaderVariant::SolidTriangle => "trigon solid triangle",
            ShaderVariant::VertexColor => "trigon vertex color",
        }
    }

    /// WGSL source of the program.
    pub fn source(self) -> &'static str {
        match self {
            ShaderVariant::SolidTriangle => include_str!("../render/shaders/solid_triangle.wgsl"),
            ShaderVariant::VertexColor => include_str!("../render/shaders/vertex_color.wgsl"),
        }
    }

    /// Vertex buffer layouts the vertex stage consumes, in slot order.
    ///
    /// The solid triangle reads no buffer at all.
    pub fn vertex_buffers(self) -> &'static [wgpu::VertexBufferLayout<'static>] {
        static COLOR_LAYOUTS: [wgpu::VertexBufferLayout<'static>; 1] = [ColorVertex::LAYOUT];
        match self {
            ShaderVariant::SolidTriangle => &[],
            ShaderVariant::VertexColor => &COLOR_LAYOUTS,
        }
    }

    pub fn uses_vertex_buffer(self) -> bool {
        !self.vertex_buffers().is_empty()
    }

    /// Next variant in [`ShaderVariant::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ShaderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known shader variant.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseVariantError {
    pub input: String,
}

impl fmt::Display for ParseVariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown shader variant `{}` (expected `solid-triangle` or `vertex-color`)",
            self.input
        )
    }
}

impl std::error::Error for ParseVariantError {}

impl FromStr for ShaderVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" | "solid-triangle" | "solid_triangle" => Ok(ShaderVariant::SolidTriangle),
            "color" | "vertex-color" | "vertex_color" => Ok(ShaderVariant::VertexColor),
            _ => Err(ParseVariantError { input: s.to_string() }),
        }
    }
}

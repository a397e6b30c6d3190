//! CPU reference of the shader stages.
//!
//! Each function performs the same arithmetic as the matching WGSL entry point,
//! so the stage contracts can be checked without a GPU.

use super::vertex::ColorVertex;

/// Fill color written by the solid triangle's fragment stage.
pub const SOLID_FILL: [f32; 4] = [1.0, 0.2, 0.1, 1.0];

/// Output record of the solid triangle's vertex stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClipVertex {
    pub clip_position: [f32; 4],
}

/// Output record of the vertex-color program's vertex stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexColorOutput {
    pub clip_position: [f32; 4],
    pub color: [f32; 3],
}

/// Solid triangle vertex stage: maps `vertex_index` to a hardcoded corner.
///
/// Only indices `0..3` are drawn; other indices still follow the closed form.
pub fn solid_vertex(vertex_index: u32) -> ClipVertex {
    // Mirrors the i32 casts in WGSL so wrapping behaves the same.
    let i = vertex_index as i32;
    let x = 1i32.wrapping_sub(i) as f32 * 0.5;
    let y = (1 - (vertex_index & 1) as i32 * 2) as f32 * 0.5;
    ClipVertex {
        clip_position: [x, y, 0.0, 1.0],
    }
}

pub fn solid_fragment() -> [f32; 4] {
    SOLID_FILL
}

/// Vertex-color vertex stage: color passes through, position is lifted to `w = 1`.
pub fn vertex_color_vertex(input: &ColorVertex) -> VertexColorOutput {
    let [x, y, z] = input.position;
    VertexColorOutput {
        clip_position: [x, y, z, 1.0],
        color: input.color,
    }
}

/// Vertex-color fragment stage: interpolated color at full opacity.
pub fn vertex_color_fragment(color: [f32; 3]) -> [f32; 4] {
    let [r, g, b] = color;
    [r, g, b, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::TRIANGLE_VERTICES;

    #[test]
    fn solid_corners_are_fixed() {
        assert_eq!(solid_vertex(0).clip_position, [0.5, 0.5, 0.0, 1.0]);
        assert_eq!(solid_vertex(1).clip_position, [0.0, -0.5, 0.0, 1.0]);
        assert_eq!(solid_vertex(2).clip_position, [-0.5, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn solid_corners_form_a_triangle() {
        let [a, b, c] = [0, 1, 2].map(|i| solid_vertex(i).clip_position);
        let area2 = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
        assert!(area2.abs() > 0.0);
    }

    #[test]
    fn solid_fragment_is_constant() {
        assert_eq!(solid_fragment(), [1.0, 0.2, 0.1, 1.0]);
    }

    #[test]
    fn vertex_color_passes_color_through() {
        for v in TRIANGLE_VERTICES {
            let out = vertex_color_vertex(&v);
            assert_eq!(out.color, v.color);
            assert_eq!(&out.clip_position[..3], &v.position[..]);
            assert_eq!(out.clip_position[3], 1.0);
        }
    }

    #[test]
    fn vertex_color_keeps_arbitrary_inputs() {
        let v = ColorVertex::new([-3.0, 7.5, 0.25], [0.1, 0.9, 0.4]);
        let out = vertex_color_vertex(&v);
        assert_eq!(out.clip_position, [-3.0, 7.5, 0.25, 1.0]);
        assert_eq!(out.color, [0.1, 0.9, 0.4]);
    }

    #[test]
    fn vertex_color_fragment_is_opaque() {
        assert_eq!(vertex_color_fragment([0.2, 0.4, 0.6]), [0.2, 0.4, 0.6, 1.0]);
    }
}

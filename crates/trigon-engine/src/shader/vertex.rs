use bytemuck::{Pod, Zeroable};

/// Input record of the vertex-color program.
///
/// Matches `@location(0) position: vec3<f32>` and `@location(1) color: vec3<f32>`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColorVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRS,
    };

    #[inline]
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        Self::LAYOUT
    }
}

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];

/// Counter-clockwise triangle drawn by the vertex-color program.
pub const TRIANGLE_VERTICES: [ColorVertex; 3] = [
    ColorVertex::new([0.0, 0.5, 0.0], RED),
    ColorVertex::new([-0.5, -0.5, 0.0], GREEN),
    ColorVertex::new([0.5, -0.5, 0.0], BLUE),
];

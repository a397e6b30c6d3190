use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};
use crate::shader::{ShaderVariant, TRIANGLE_VERTICES};

/// Draws the triangle of a [`ShaderVariant`].
///
/// Pipelines are built on first use and rebuilt when the surface format changes.
/// Both programs emit a single opaque color target, so blending replaces.
#[derive(Default)]
pub struct TriangleRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: HashMap<ShaderVariant, wgpu::RenderPipeline>,
    vertex_buffer: Option<wgpu::Buffer>,
}

impl TriangleRenderer {
    /// Vertices drawn per call; the solid program derives them from the index.
    pub const VERTEX_COUNT: u32 = 3;

    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pass that draws `variant`'s triangle over the target's contents.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        variant: ShaderVariant,
    ) {
        self.ensure_pipeline(ctx, variant);
        if variant.uses_vertex_buffer() {
            self.ensure_vertex_buffer(ctx);
        }

        let Some(pipeline) = self.pipelines.get(&variant) else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("trigon triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        if variant.uses_vertex_buffer() {
            let Some(vbo) = self.vertex_buffer.as_ref() else { return };
            rpass.set_vertex_buffer(0, vbo.slice(..));
        }
        rpass.draw(0..Self::VERTEX_COUNT, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, variant: ShaderVariant) {
        if self.pipeline_format != Some(ctx.surface_format) {
            if !self.pipelines.is_empty() {
                log::debug!(
                    "surface format changed to {:?}; dropping pipelines",
                    ctx.surface_format
                );
            }
            self.pipelines.clear();
            self.pipeline_format = Some(ctx.surface_format);
        }
        if self.pipelines.contains_key(&variant) {
            return;
        }

        let pipeline = create_pipeline(ctx.device, ctx.surface_format, variant);
        log::debug!("built `{variant}` pipeline for {:?}", ctx.surface_format);
        self.pipelines.insert(variant, pipeline);
    }

    fn ensure_vertex_buffer(&mut self, ctx: &RenderCtx<'_>) {
        if self.vertex_buffer.is_some() {
            return;
        }

        self.vertex_buffer = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trigon triangle vbo"),
            contents: bytemuck::cast_slice(&TRIANGLE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    variant: ShaderVariant,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(variant.label()),
        source: wgpu::ShaderSource::Wgsl(variant.source().into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(variant.label()),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(variant.label()),
        layout: Some(&layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some(ShaderVariant::VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers: variant.vertex_buffers(),
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some(ShaderVariant::FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // The solid triangle winds clockwise; draw both faces.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::paint::Color;

    const SIZE: u32 = 64;
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
    // 64 texels * 4 bytes is already a multiple of COPY_BYTES_PER_ROW_ALIGNMENT.
    const BYTES_PER_ROW: u32 = SIZE * 4;

    /// `Color::SLATE` and the solid fill as 8-bit unorm texels.
    const CLEAR_TEXEL: [u8; 4] = [26, 51, 77, 255];
    const FILL_TEXEL: [u8; 4] = [255, 51, 26, 255];

    /// Any adapter will do, including software ones. `None` when the machine has none.
    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::LowPower,
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("trigon test device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    experimental_features: wgpu::ExperimentalFeatures::disabled(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    trace: wgpu::Trace::Off,
                })
                .await
                .ok()
        })
    }

    /// Clears an offscreen target to `Color::SLATE`, draws `variant` and reads the texels back.
    fn render_offscreen(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        variant: ShaderVariant,
    ) -> Vec<u8> {
        let extent = wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("trigon test target"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trigon test readback"),
            size: (BYTES_PER_ROW * SIZE) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("trigon test encoder"),
        });
        {
            let ctx = RenderCtx::new(device, queue, FORMAT);
            let mut target = RenderTarget::new(&mut encoder, &view);
            target.clear(Color::SLATE);
            TriangleRenderer::new().render(&ctx, &mut target, variant);
        }
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(BYTES_PER_ROW),
                    rows_per_image: Some(SIZE),
                },
            },
            extent,
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device.poll(wgpu::PollType::wait_indefinitely()).unwrap();
        rx.recv().unwrap().unwrap();

        let texels = slice.get_mapped_range().to_vec();
        readback.unmap();
        texels
    }

    /// Texel under the clip-space point `(x, y)`.
    fn texel_at(texels: &[u8], x: f32, y: f32) -> [u8; 4] {
        let px = ((x + 1.0) * 0.5 * SIZE as f32) as usize;
        let py = ((1.0 - y) * 0.5 * SIZE as f32) as usize;
        let i = py * BYTES_PER_ROW as usize + px * 4;
        [texels[i], texels[i + 1], texels[i + 2], texels[i + 3]]
    }

    fn assert_near(actual: [u8; 4], expected: [u8; 4]) {
        let close = actual
            .iter()
            .zip(expected)
            .all(|(a, e)| (*a as i32 - e as i32).abs() <= 2);
        assert!(close, "texel {actual:?}, expected about {expected:?}");
    }

    #[test]
    fn solid_triangle_covers_corner_zero_with_the_fill_color() {
        let Some((device, queue)) = headless_device() else {
            eprintln!("no wgpu adapter available; skipping");
            return;
        };
        let texels = render_offscreen(&device, &queue, ShaderVariant::SolidTriangle);

        // Corner 0 sits at (+0.5, +0.5); this point is just inside it.
        assert_near(texel_at(&texels, 0.3, 0.4), FILL_TEXEL);
        // The opposite quadrant stays cleared.
        assert_near(texel_at(&texels, -0.6, -0.6), CLEAR_TEXEL);
        // Apex of the triangle points down at corner 1 = (0, -0.5).
        assert_near(texel_at(&texels, 0.0, -0.35), FILL_TEXEL);
        assert_near(texel_at(&texels, 0.0, 0.7), CLEAR_TEXEL);
    }

    #[test]
    fn vertex_color_triangle_interpolates_corner_colors() {
        let Some((device, queue)) = headless_device() else {
            eprintln!("no wgpu adapter available; skipping");
            return;
        };
        let texels = render_offscreen(&device, &queue, ShaderVariant::VertexColor);

        let top = texel_at(&texels, 0.0, 0.35);
        assert!(top[0] > 180 && top[1] < 60 && top[2] < 60, "top {top:?}");
        assert_eq!(top[3], 255);

        let left = texel_at(&texels, -0.35, -0.4);
        assert!(left[1] > 150 && left[0] < 60 && left[2] < 60, "bottom-left {left:?}");

        let right = texel_at(&texels, 0.35, -0.4);
        assert!(right[2] > 150 && right[0] < 60 && right[1] < 60, "bottom-right {right:?}");

        assert_near(texel_at(&texels, -0.8, 0.8), CLEAR_TEXEL);
    }
}

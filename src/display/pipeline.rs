use wgpu::util::DeviceExt;

/// Darkening applied to odd framebuffer rows when retro scanlines are on.
pub const SCANLINE_STRENGTH: f32 = 0.18;

/// `[frame_height, scanline_strength, 0, 0]`, std140-sized.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlitUniforms {
    pub params: [f32; 4],
}

impl BlitUniforms {
    pub fn new(frame_height: u32, scanlines: bool) -> Self {
        let strength = if scanlines { SCANLINE_STRENGTH } else { 0.0 };
        Self { params: [frame_height as f32, strength, 0.0, 0.0] }
    }
}

pub struct BlitPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub frame_bgl: wgpu::BindGroupLayout,    // group 0: frame texture + sampler
    pub uniforms_bgl: wgpu::BindGroupLayout, // group 1: BlitUniforms
}

pub fn create_blit_pipeline(device: &wgpu::Device, output_format: wgpu::TextureFormat) -> BlitPipeline {
    let shader = device.create_shader_module(wgpu::include_wgsl!("shaders/blit.wgsl"));

    let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("blit_frame_bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    let uniforms_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("blit_uniforms_bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("blit_pipeline_layout"),
        bind_group_layouts: &[&frame_bgl, &uniforms_bgl],
        ..Default::default()
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("blit_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[], // corners generated from vertex_index
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: output_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    BlitPipeline { pipeline, frame_bgl, uniforms_bgl }
}

/// Framebuffer-sized texture the CPU frame is uploaded into each frame.
pub struct FrameTexture {
    pub texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

pub fn create_frame_texture(
    device: &wgpu::Device,
    pipeline: &BlitPipeline,
    width: u32,
    height: u32,
) -> FrameTexture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("frame_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    // Nearest keeps the chunky look when upscaling.
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("frame_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("frame_bg"),
        layout: &pipeline.frame_bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    });

    FrameTexture { texture, bind_group, width, height }
}

pub fn create_uniforms(
    device: &wgpu::Device,
    pipeline: &BlitPipeline,
    uniforms: BlitUniforms,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("blit_uniforms"),
        contents: bytemuck::cast_slice(&[uniforms]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("blit_uniforms_bg"),
        layout: &pipeline.uniforms_bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (buffer, bind_group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniforms_are_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<BlitUniforms>(), 16);
        let u = BlitUniforms::new(200, true);
        assert_eq!(bytemuck::cast_slice::<BlitUniforms, f32>(&[u])[..2], [200.0, SCANLINE_STRENGTH]);
        assert_eq!(BlitUniforms::new(200, false).params[1], 0.0);
    }
}

// =============================================================================
// DISPLAY — Presents the software framebuffer through wgpu
//
// Each frame the CPU framebuffer is uploaded into a texture and drawn as one
// full-screen quad inside the letterbox viewport.
// =============================================================================

pub mod pipeline;
pub mod viewport;

pub use viewport::{letterbox_viewport, Viewport};

use std::sync::Arc;

use log::info;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::{EngineError, Result};
use crate::raycaster::Framebuffer;
use crate::window::WindowConfig;
use pipeline::{create_blit_pipeline, create_frame_texture, create_uniforms, BlitPipeline, BlitUniforms, FrameTexture};

pub struct Display {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: BlitPipeline,
    frame: FrameTexture,
    uniforms_buffer: wgpu::Buffer,
    uniforms_bind_group: wgpu::BindGroup,
    window_config: WindowConfig,
    viewport: Viewport,
    scanlines: bool,
}

fn display_err(e: impl std::fmt::Display) -> EngineError {
    EngineError::Display(e.to_string())
}

impl Display {
    /// # Errors
    /// [`EngineError::Display`] when no surface, adapter or device can be
    /// obtained.
    pub async fn new(window: Arc<Window>, window_config: WindowConfig, scanlines: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window)).map_err(display_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(display_err)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(display_err)?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| EngineError::Display("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        info!("display: {}×{} surface, {format:?}", config.width, config.height);

        let pipeline = create_blit_pipeline(&device, format);
        let frame = create_frame_texture(
            &device,
            &pipeline,
            window_config.logical_width,
            window_config.logical_height,
        );
        let (uniforms_buffer, uniforms_bind_group) = create_uniforms(
            &device,
            &pipeline,
            BlitUniforms::new(window_config.logical_height, scanlines),
        );

        let window_config = window_config.with_physical(config.width, config.height);
        let viewport = letterbox_viewport(&window_config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            frame,
            uniforms_buffer,
            uniforms_bind_group,
            window_config,
            viewport,
            scanlines,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        self.window_config = self.window_config.clone().with_physical(new_size.width, new_size.height);
        self.viewport = letterbox_viewport(&self.window_config);
    }

    pub fn set_scanlines(&mut self, enabled: bool) {
        self.scanlines = enabled;
        let uniforms = BlitUniforms::new(self.frame.height, enabled);
        self.queue
            .write_buffer(&self.uniforms_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    pub fn scanlines(&self) -> bool {
        self.scanlines
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Upload `fb` and draw it letterboxed.
    pub fn present(&mut self, fb: &Framebuffer) -> std::result::Result<(), wgpu::SurfaceError> {
        if fb.width() != self.frame.width || fb.height() != self.frame.height {
            self.frame = create_frame_texture(&self.device, &self.pipeline, fb.width(), fb.height());
            self.set_scanlines(self.scanlines);
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.frame.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            fb.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * fb.width()),
                rows_per_image: Some(fb.height()),
            },
            wgpu::Extent3d {
                width: fb.width(),
                height: fb.height(),
                depth_or_array_layers: 1,
            },
        );

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("present") });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blit"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let v = self.viewport;
            if !v.is_empty() {
                pass.set_viewport(v.x, v.y, v.width, v.height, 0.0, 1.0);
                pass.set_pipeline(&self.pipeline.pipeline);
                pass.set_bind_group(0, &self.frame.bind_group, &[]);
                pass.set_bind_group(1, &self.uniforms_bind_group, &[]);
                pass.draw(0..6, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

use std::{
    borrow::Cow,
    collections::HashMap,
    sync::Arc
};

use bytemuck::{
    Pod,
    Zeroable
};

use image::RgbaImage;
use wgpu::{
    util::DeviceExt, Device, RenderPipeline
};

use winit::window::Window;

use crate::{
    config::AppConfig,
    error::{AppError, RenderError},
    game::math::Rect2I
};

use super::{
    caption::CaptionOverlay,
    screen_rect_to_ndc,
    ClearColor,
    RenderBatch,
    SpriteDraw,
    TextureCanvas,
    TextureId
};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    _pos: [f32; 2],
    _uv: [f32; 2],
}

impl Vertex {
    fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Vertex {
            _pos: [x, y],
            _uv: [u, v],
        }
    }
}

fn create_ndc_sprite_quad_vertices(x: f32, y: f32, w: f32, h: f32) -> (Vec<Vertex>, Vec<u16>) {
    // Texture rows start at the top, NDC y grows upwards
    let vertex_data = vec![
        Vertex::new(x, y, 0.0, 1.0),           // Bottom-left
        Vertex::new(x + w, y, 1.0, 1.0),       // Bottom-right
        Vertex::new(x + w, y + h, 1.0, 0.0),   // Top-right
        Vertex::new(x, y + h, 0.0, 0.0),       // Top-left
    ];

    let indices_data = vec![
        0, 1, 2,
        2, 3, 0,
    ];

    (vertex_data, indices_data)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SurfaceRecovery {
    Reconfigure,
    SkipFrame,
    Fatal,
}

/// Timeouts are transient (covered or minimised window on some drivers).
fn surface_recovery(error: &wgpu::SurfaceError) -> SurfaceRecovery {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
        wgpu::SurfaceError::Timeout => SurfaceRecovery::SkipFrame,
        _ => SurfaceRecovery::Fatal,
    }
}

struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// wgpu backed [`TextureCanvas`] drawing into the window surface.
pub struct Renderer {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: winit::dpi::PhysicalSize<u32>,
    surface: wgpu::Surface<'static>,
    surface_format: wgpu::TextureFormat,
    present_mode: wgpu::PresentMode,
    render_pipeline: RenderPipeline,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: HashMap<TextureId, GpuTexture>,
    next_texture_id: u32,
    /// Logical drawing area, sprites are positioned against it whatever the
    /// physical surface size is.
    screen_width: u32,
    screen_height: u32,
    render_batch: RenderBatch,
    caption: Option<CaptionOverlay>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, config: &AppConfig) -> Result<Renderer, AppError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance.create_surface(window.clone())
            .map_err(|e| AppError::Initialization(format!("Surface could not be created: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .ok_or_else(|| AppError::Initialization(String::from("No suitable graphics adapter")))?;

        log::info!("Using graphics adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor::default(),
                None
            )
            .await
            .map_err(|e| AppError::Initialization(format!("Renderer could not be created: {e}")))?;

        let size = window.inner_size();

        let cap = surface.get_capabilities(&adapter);
        let surface_format = *cap.formats.first()
            .ok_or_else(|| AppError::Initialization(String::from("Surface has no supported formats")))?;

        let present_mode = if config.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Sprite Bind Group Layout"),
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

        let render_pipeline = Self::prepare_pipeline(
            &device,
            surface_format.add_srgb_suffix(),
            &texture_bind_group_layout
        );

        // Pixel art, no smoothing
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Sprite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let caption = config.caption.as_deref().map(|text| {
            CaptionOverlay::new(&device, &queue, surface_format.add_srgb_suffix(), text, size.width, size.height)
        });

        let mut render_batch = RenderBatch::new();
        render_batch.clear_color = ClearColor::from_rgb(config.clear_color);

        let state = Renderer {
            window,
            device,
            queue,
            size,
            surface,
            surface_format,
            present_mode,
            render_pipeline,
            texture_bind_group_layout,
            sampler,
            textures: HashMap::new(),
            next_texture_id: 0,
            screen_width: config.screen_width,
            screen_height: config.screen_height,
            render_batch,
            caption,
        };

        // Configure surface for the first time
        state.configure_surface();

        Ok(state)
    }

    fn prepare_pipeline(
        device: &Device,
        target_format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shader.wgsl"))),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                // Color keyed pixels carry zero alpha
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    pub fn get_window(&self) -> &Window {
        &self.window
    }

    fn configure_surface(&self) {
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.surface_format,
            // Request compatibility with the sRGB-format texture view we're going to create later.
            view_formats: vec![self.surface_format.add_srgb_suffix()],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width: self.size.width,
            height: self.size.height,
            desired_maximum_frame_latency: 2,
            present_mode: self.present_mode,
        };
        self.surface.configure(&self.device, &surface_config);
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            log::debug!("Ignoring resize to {new_size:?}");
            return;
        }
        self.size = new_size;
        self.configure_surface();
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Draws the collected batch and presents it. Blocks on vsync when enabled.
    pub fn render(&mut self) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(e) => {
                self.render_batch.clear();
                return match surface_recovery(&e) {
                    SurfaceRecovery::Reconfigure => {
                        log::warn!("Surface lost or outdated, reconfiguring");
                        self.configure_surface();
                        Ok(())
                    }
                    SurfaceRecovery::SkipFrame => {
                        log::debug!("Surface acquire timed out, skipping frame");
                        Ok(())
                    }
                    SurfaceRecovery::Fatal => Err(e.into()),
                };
            }
        };

        let texture_view = surface_texture.texture
            .create_view(&wgpu::TextureViewDescriptor {
                // Without add_srgb_suffix() the image we will be working with
                // might not be "gamma correct".
                format: Some(self.surface_format.add_srgb_suffix()),
                ..Default::default()
            });

        if let Some(caption) = self.caption.as_mut() {
            caption.prepare(&self.device, &self.queue, self.size.width, self.size.height)?;
        }

        let mut encoder = self.device.create_command_encoder(&Default::default());

        {
            let clear_color = self.render_batch.clear_color;
            let mut renderpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear_color.r,
                            g: clear_color.g,
                            b: clear_color.b,
                            a: 1.0
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            renderpass.set_pipeline(&self.render_pipeline);
            self.render_sprites(&mut renderpass);

            if let Some(caption) = self.caption.as_ref() {
                caption.render(&mut renderpass)?;
            }
        }

        // Submit the command in the queue to execute
        self.queue.submit([encoder.finish()]);
        self.window.pre_present_notify();
        surface_texture.present();

        if let Some(caption) = self.caption.as_mut() {
            caption.trim();
        }
        self.render_batch.clear();
        Ok(())
    }

    fn render_sprites(&self, renderpass: &mut wgpu::RenderPass<'_>) {
        self.render_batch.sprites.iter().for_each(|sprite| {
            // Checked when the sprite was queued, the texture may only vanish
            // if it was destroyed later in the same frame.
            let Some(gpu_texture) = self.textures.get(&sprite.texture) else {
                log::warn!("Skipping sprite of destroyed texture {:?}", sprite.texture);
                return;
            };

            let (x, y, w, h) = screen_rect_to_ndc(sprite.dest, self.screen_width, self.screen_height);
            let (vertices, indices) = create_ndc_sprite_quad_vertices(x, y, w, h);

            let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

            let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            renderpass.set_bind_group(0, &gpu_texture.bind_group, &[]);
            renderpass.set_vertex_buffer(0, vertex_buffer.slice(..));
            renderpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            renderpass.draw_indexed(0..indices.len() as u32, 0, 0..1);
        });
    }
}

impl TextureCanvas for Renderer {
    fn create_texture(&mut self, image: &RgbaImage, label: &str) -> Result<TextureId, RenderError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage);
        }

        let limit = self.device.limits().max_texture_dimension_2d;
        if width > limit || height > limit {
            return Err(RenderError::TextureTooLarge { width, height, limit });
        }

        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let id = TextureId(self.next_texture_id);
        self.next_texture_id += 1;
        self.textures.insert(id, GpuTexture { texture, bind_group });
        log::debug!("Created texture {id:?} '{label}' {width}x{height}");
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        match self.textures.remove(&id) {
            Some(gpu_texture) => gpu_texture.texture.destroy(),
            None => log::warn!("Destroying unknown texture {id:?}"),
        }
    }

    fn draw_texture(&mut self, id: TextureId, dest: Rect2I) -> Result<(), RenderError> {
        if !self.textures.contains_key(&id) {
            return Err(RenderError::UnknownTexture(id));
        }
        self.render_batch.push(SpriteDraw { texture: id, dest });
        Ok(())
    }

    fn set_clear_color(&mut self, color: ClearColor) {
        self.render_batch.clear_color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_timeout_skips_frame() {
        assert_eq!(surface_recovery(&wgpu::SurfaceError::Timeout), SurfaceRecovery::SkipFrame);
    }

    #[test]
    fn test_lost_surface_is_reconfigured() {
        assert_eq!(surface_recovery(&wgpu::SurfaceError::Lost), SurfaceRecovery::Reconfigure);
        assert_eq!(surface_recovery(&wgpu::SurfaceError::Outdated), SurfaceRecovery::Reconfigure);
    }

    #[test]
    fn test_out_of_memory_is_fatal() {
        assert_eq!(surface_recovery(&wgpu::SurfaceError::OutOfMemory), SurfaceRecovery::Fatal);
    }

    #[test]
    fn test_sprite_quad_uv_top_row_at_top() {
        let (vertices, indices) = create_ndc_sprite_quad_vertices(-1.0, -1.0, 2.0, 2.0);
        assert_eq!(indices, vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(vertices[3]._pos, [-1.0, 1.0]);
        assert_eq!(vertices[3]._uv, [0.0, 0.0]);
        assert_eq!(vertices[0]._uv, [0.0, 1.0]);
    }
}

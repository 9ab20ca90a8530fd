use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use winit::window::Window;

use crate::core::{
    Command, DisplayTarget, Error as FrameError, FrameDimensions, PlaybackRate, PlaybackState, Progress, RateControl,
};

/// What the control panel shows about the session
#[derive(Debug, Clone, Copy)]
pub struct PanelStatus<'a> {
    pub state: PlaybackState,
    pub progress: Option<Progress>,
    pub rate: PlaybackRate,
    /// Last failed command or redraw, shown until the next success
    pub error: Option<&'a str>,
}

/// Window surface that shows presented frames and the egui control panel
///
/// Frames arrive through [`DisplayTarget::present`] already scaled to the
/// window size; they are uploaded to a texture of the same size and drawn
/// with a nearest sampler, so every texel maps to exactly one pixel.
pub struct SurfaceRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    frame_texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
    show_panel: bool,
}

impl SurfaceRenderer {
    pub async fn new(window: Arc<Window>, show_panel: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size);
        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &surface_config);
        }

        let (render_pipeline, bind_group_layout) = Self::create_render_pipeline(&device, surface_config.format);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let frame_texture = Self::create_frame_texture(&device, size.width.max(1), size.height.max(1));
        let bind_group = Self::create_bind_group(&device, &bind_group_layout, &frame_texture, &sampler);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&device, surface_config.format, egui_wgpu::RendererOptions::default());

        info!(
            "surface renderer initialized: {}x{} {:?}",
            size.width, size.height, surface_config.format
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            size,
            render_pipeline,
            bind_group_layout,
            sampler,
            frame_texture,
            bind_group,
            egui_renderer,
            egui_state,
            egui_ctx,
            show_panel,
        })
    }

    async fn request_adapter(instance: &wgpu::Instance, surface: &wgpu::Surface<'_>) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find appropriate adapter")
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("Failed to create device")
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::SurfaceConfiguration {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    // sRGB view so the surface writes the uploaded bytes back unchanged
    fn create_frame_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: &wgpu::Texture,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some("frame_bind_group"),
        })
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroupLayout) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Display Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("display.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("frame_bind_group_layout"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Display Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Display Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group_layout)
    }

    /// Reconfigure the swapchain for a new window size
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);
        }
    }

    /// Reconfigure at the current size, after the surface was lost
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    /// Draw the last presented frame and the control panel
    ///
    /// Returns the commands the user issued through the panel this frame.
    pub fn render(
        &mut self,
        window: &Window,
        status: PanelStatus<'_>,
        rate: &mut RateControl,
    ) -> std::result::Result<Vec<Command>, wgpu::SurfaceError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Ok(Vec::new());
        }

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Display Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        let raw_input = self.egui_state.take_egui_input(window);
        let show_panel = self.show_panel;
        let mut commands = Vec::new();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            commands.clear();
            if show_panel {
                control_panel(ctx, &status, rate, &mut commands);
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.size.width, self.size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(commands)
    }

    /// Let egui see the event first; true if it consumed it
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }
}

impl DisplayTarget for SurfaceRenderer {
    fn size(&self) -> FrameDimensions {
        FrameDimensions::display(self.size.width, self.size.height)
    }

    fn present(&mut self, pixels: &[u8], size: FrameDimensions) -> crate::core::Result<()> {
        if pixels.len() != size.buffer_size() {
            return Err(FrameError::Present(format!(
                "expected {} bytes for {}, got {}",
                size.buffer_size(),
                size,
                pixels.len()
            )));
        }

        let texture_size = self.frame_texture.size();
        if texture_size.width != size.width || texture_size.height != size.height {
            debug!("frame texture resized to {}", size);
            self.frame_texture = Self::create_frame_texture(&self.device, size.width, size.height);
            self.bind_group =
                Self::create_bind_group(&self.device, &self.bind_group_layout, &self.frame_texture, &self.sampler);
        }

        self.queue.write_texture(
            self.frame_texture.as_image_copy(),
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.row_stride() as u32),
                rows_per_image: Some(size.height),
            },
            wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }
}

fn control_panel(ctx: &egui::Context, status: &PanelStatus<'_>, rate: &mut RateControl, commands: &mut Vec<Command>) {
    egui::Window::new("Playback")
        .title_bar(true)
        .resizable(false)
        .default_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let buttons = [
                    ("Reset", Command::Reset),
                    ("Step back", Command::StepBackward),
                    ("Reverse", Command::PlayReverse),
                    ("Pause", Command::Pause),
                    ("Play", Command::PlayForward),
                    ("Step", Command::StepForward),
                    ("End", Command::SeekEnd),
                ];
                for (label, command) in buttons {
                    if ui.button(label).clicked() {
                        commands.push(command);
                    }
                }
            });

            ui.separator();

            let range = rate.range();
            let slider = ui.add(egui::Slider::new(rate.value_mut(), range).text("ms per step"));
            if slider.changed() {
                commands.push(rate.command());
            }

            ui.separator();

            ui.label(
                egui::RichText::new(status.state.to_string())
                    .size(16.0)
                    .color(egui::Color32::from_rgb(74, 158, 255)),
            );
            if let Some(progress) = status.progress {
                ui.label(format!("Frame {} / {}", progress.index, progress.last));
            }
            ui.label(
                egui::RichText::new(format!("{} ms interval", status.rate.millis()))
                    .color(egui::Color32::GRAY),
            );
            if let Some(error) = status.error {
                ui.label(egui::RichText::new(error).color(egui::Color32::from_rgb(255, 100, 100)));
            }
        });
}

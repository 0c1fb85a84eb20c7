//! WGPU-based forward render engine
//!
//! Owns the surface, device, queue and the single scene pipeline. The
//! pipeline bakes the MSAA sample count, which is why an antialiasing change
//! rebuilds the whole engine rather than reconfiguring it.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::error::GalleyError;
use crate::gfx::{
    camera::camera_utils::CameraUniform,
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightRig},
        material::MaterialBindings,
        texture_resource::TextureResource,
    },
    scene::{object::DrawObject, object::InstanceData, scene::Scene, vertex::Vertex3D},
};

const MSAA_SAMPLES: u32 = 4;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    sample_count: u32,

    depth_texture: TextureResource,
    msaa_target: Option<TextureResource>,

    pipeline: wgpu::RenderPipeline,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
}

impl RenderEngine {
    /// Creates a render engine for the given window
    ///
    /// Fails with a reportable error when no adapter, device or surface can
    /// be obtained; the caller treats that as fatal for this build attempt
    /// and does not retry.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        antialias: bool,
    ) -> Result<RenderEngine, GalleyError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GalleyError::AdapterUnavailable)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            // The render loop is paced by the display: one step per vsync
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = if antialias { MSAA_SAMPLES } else { 1 };

        let depth_texture = TextureResource::create_depth_texture(
            &device,
            config.width,
            config.height,
            sample_count,
            "depth_texture",
        );
        let msaa_target = (sample_count > 1).then(|| {
            TextureResource::create_msaa_target(
                &device,
                config.width,
                config.height,
                format,
                sample_count,
            )
        });

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let pipeline = create_scene_pipeline(&device, format, sample_count, &global_bindings);

        Ok(RenderEngine {
            surface,
            device: device.into(),
            queue: queue.into(),
            config,
            format,
            sample_count,
            depth_texture,
            msaa_target,
            pipeline,
            global_ubo,
            global_bindings,
        })
    }

    /// Renders one frame: the scene pass, then the UI overlay pass
    ///
    /// Returns the number of scene draw calls issued, for the stats overlay.
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: F) -> u32
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure and pick the frame up on the next vsync
                self.surface.configure(&self.device, &self.config);
                return 0;
            }
            Err(error) => {
                log::error!("failed to acquire surface texture: {error}");
                return 0;
            }
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let draw_calls = match &self.msaa_target {
            Some(msaa) => self.draw_scene_pass(
                &mut encoder,
                &msaa.view,
                Some(&surface_view),
                &self.depth_texture.view,
                scene,
            ),
            None => self.draw_scene_pass(
                &mut encoder,
                &surface_view,
                None,
                &self.depth_texture.view,
                scene,
            ),
        };

        ui_callback(&self.device, &self.queue, &mut encoder, &surface_view);

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        draw_calls
    }

    /// Records the scene render pass into `encoder`
    ///
    /// Shared by the swapchain path and the screenshot path; the latter
    /// passes its own offscreen color/depth attachments and never draws UI.
    pub fn draw_scene_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        resolve_target: Option<&wgpu::TextureView>,
        depth_view: &wgpu::TextureView,
        scene: &Scene,
    ) -> u32 {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.08,
                        g: 0.09,
                        b: 0.11,
                        a: 1.0,
                    }),
                    store: if resolve_target.is_some() {
                        wgpu::StoreOp::Discard
                    } else {
                        wgpu::StoreOp::Store
                    },
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

        let mut draw_calls = 0;
        for object in scene.objects.iter() {
            let Some(material) = scene.material_for(object) else {
                log::debug!("object {} has no material slot, skipping", object.name);
                continue;
            };
            let (Some(material_bind_group), Some(transform_bind_group)) =
                (material.bind_group(), object.transform_bind_group())
            else {
                continue; // GPU resources not uploaded yet
            };

            render_pass.set_bind_group(1, transform_bind_group, &[]);
            render_pass.set_bind_group(2, material_bind_group, &[]);
            render_pass.draw_object(object);
            draw_calls += 1;
        }

        draw_calls
    }

    /// Updates camera and light uniforms; call once per frame before drawing
    pub fn update(&mut self, camera_uniform: CameraUniform, lights: &LightRig) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform, lights);
    }

    /// Resizes the surface and recreates the size-dependent attachments
    ///
    /// A resize is never a rebuild: pipelines and scene resources survive.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = TextureResource::create_depth_texture(
            &self.device,
            width,
            height,
            self.sample_count,
            "depth_texture",
        );
        if self.msaa_target.is_some() {
            self.msaa_target = Some(TextureResource::create_msaa_target(
                &self.device,
                width,
                height,
                self.format,
                self.sample_count,
            ));
        }
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}

/// Builds the single scene pipeline
///
/// Bind groups: 0 = globals (camera + lights), 1 = object transform,
/// 2 = material. Vertex buffers: 0 = mesh vertices, 1 = per-instance
/// transforms.
fn create_scene_pipeline(
    device: &wgpu::Device,
    format: TextureFormat,
    sample_count: u32,
    global_bindings: &GlobalBindings,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("room"),
        source: wgpu::ShaderSource::Wgsl(include_str!("room.wgsl").into()),
    });

    let transform_bind_group_layout =
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

    // Borrow the layout shape from the material system so the pipeline and
    // the per-material bind groups always agree
    let material_bindings = MaterialBindings::new(device);

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts: &[
            global_bindings.bind_group_layout(),
            &transform_bind_group_layout,
            material_bindings.bind_group_layout(),
        ],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Scene Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex3D::desc(), InstanceData::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: TextureResource::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

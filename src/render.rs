use crate::constants::{
    FIELD_COLOR, FIELD_DEPTH_FADE_BASE, FIELD_DEPTH_FADE_SLOPE, FIELD_NOISE_TINT,
    FIELD_POINT_SIZE,
};
use crate::core::{Camera, FieldSimulator, IntroPoint, TimelineUniforms, FIELD_WGSL, INTRO_WGSL};
use glam::Mat4;
use web_sys as web;

mod helpers;
mod points;
use points::PointsLayer;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FieldInstance {
    position: [f32; 3],
    scale: f32,
    noise: f32,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FieldUniforms {
    model_view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    color: [f32; 4],
    noise_tint: [f32; 4],
    impact: [f32; 4],
    fade: [f32; 4],
    resolution: [f32; 2],
    impact_radius: f32,
    _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct IntroUniforms {
    model_view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    color: [f32; 4],
    resolution: [f32; 2],
    time: f32,
    scatter: f32,
    tilt: f32,
    yaw: f32,
    escape_threshold: f32,
    _pad: f32,
}

impl IntroUniforms {
    fn new(u: &TimelineUniforms, projection: Mat4, resolution: [f32; 2]) -> Self {
        Self {
            model_view: u.model_view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            color: u.color.extend(u.point_size).to_array(),
            resolution,
            time: u.time,
            scatter: u.scatter,
            tilt: u.tilt,
            yaw: u.yaw,
            escape_threshold: u.escape_threshold,
            _pad: 0.0,
        }
    }
}

const FIELD_INSTANCE_ATTRS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32];

const INTRO_INSTANCE_ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x3,
    3 => Float32,
    4 => Float32,
    5 => Float32
];

/// Which point cloud a surface draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    Field,
    Intro,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    points: PointsLayer,
    field_scratch: Vec<FieldInstance>,
    width: u32,
    height: u32,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement, scene: Scene) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        // Transparent canvas over page content
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::CompositeAlphaMode::PreMultiplied)
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let points = match scene {
            Scene::Field => PointsLayer::new(
                &device,
                "field_points",
                FIELD_WGSL,
                std::mem::size_of::<FieldUniforms>() as u64,
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<FieldInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &FIELD_INSTANCE_ATTRS,
                },
                format,
            ),
            Scene::Intro => PointsLayer::new(
                &device,
                "intro_points",
                INTRO_WGSL,
                std::mem::size_of::<IntroUniforms>() as u64,
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<IntroPoint>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INTRO_INSTANCE_ATTRS,
                },
                format,
            ),
        };
        log::info!("[gpu] {:?} surface {}x{} {:?}", scene, width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            points,
            field_scratch: Vec::new(),
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn resolution(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    /// Intro attributes never change after init; upload them once.
    pub fn set_intro_points(&mut self, points: &[IntroPoint]) {
        self.points.write_instances(&self.device, &self.queue, points);
    }

    pub fn render_field(
        &mut self,
        sim: &FieldSimulator,
        camera: &Camera,
        model: Mat4,
    ) -> Result<(), wgpu::SurfaceError> {
        let buffer = sim.buffer();
        self.field_scratch.clear();
        self.field_scratch.extend(
            buffer
                .positions()
                .iter()
                .zip(buffer.scales())
                .zip(sim.noise_samples())
                .map(|((p, scale), noise)| FieldInstance {
                    position: p.to_array(),
                    scale: *scale,
                    noise: *noise,
                }),
        );
        let (impact, impact_radius) = match sim.impact() {
            Some(i) => (i.position.extend(i.strength).to_array(), i.radius),
            None => ([0.0; 4], 1.0),
        };
        let uniforms = FieldUniforms {
            model_view: (camera.view_matrix() * model).to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
            color: [FIELD_COLOR[0], FIELD_COLOR[1], FIELD_COLOR[2], FIELD_POINT_SIZE],
            noise_tint: [FIELD_NOISE_TINT[0], FIELD_NOISE_TINT[1], FIELD_NOISE_TINT[2], 0.0],
            impact,
            fade: [FIELD_DEPTH_FADE_BASE, FIELD_DEPTH_FADE_SLOPE, 0.0, 0.0],
            resolution: self.resolution(),
            impact_radius,
            _pad: 0.0,
        };
        self.points
            .write_instances(&self.device, &self.queue, &self.field_scratch);
        self.points.write_uniforms(&self.queue, &uniforms);
        self.present()
    }

    pub fn render_intro(
        &mut self,
        uniforms: &TimelineUniforms,
        camera: &Camera,
    ) -> Result<(), wgpu::SurfaceError> {
        let u = IntroUniforms::new(uniforms, camera.projection_matrix(), self.resolution());
        self.points.write_uniforms(&self.queue, &u);
        self.present()
    }

    fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("points_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.points.draw(&mut rpass);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Reconfigure after a lost or outdated surface.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

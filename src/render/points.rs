use super::helpers;

/// One instanced point layer: pipeline, uniform block and instance buffer.
pub(crate) struct PointsLayer {
    label: &'static str,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u64,
    instance_count: u32,
}

impl PointsLayer {
    pub(crate) fn new(
        device: &wgpu::Device,
        label: &'static str,
        shader_source: &str,
        uniform_size: u64,
        instance_layout: wgpu::VertexBufferLayout<'_>,
        color_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });
        let bgl = helpers::uniform_bind_group_layout(device, label);
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_points_pipeline(
            device,
            label,
            &pl,
            &shader,
            instance_layout,
            color_format,
        );
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        Self {
            label,
            pipeline,
            uniform_buffer,
            bind_group,
            instance_buffer: helpers::create_instance_buffer(device, label, 0),
            instance_capacity: 0,
            instance_count: 0,
        }
    }

    pub(crate) fn write_uniforms<U: bytemuck::Pod>(&self, queue: &wgpu::Queue, uniforms: &U) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Upload instance data, growing the buffer when the count outgrows it.
    pub(crate) fn write_instances<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[T],
    ) {
        let bytes: &[u8] = bytemuck::cast_slice(instances);
        let size = bytes.len() as u64;
        if size > self.instance_capacity {
            self.instance_buffer = helpers::create_instance_buffer(device, self.label, size);
            self.instance_capacity = size;
            log::info!("[gpu] {} instance buffer {} bytes", self.label, size);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytes);
        }
        self.instance_count = instances.len() as u32;
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        rpass.draw(0..6, 0..self.instance_count);
    }
}

use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use seascape_render::RenderView;
use seascape_scene::{Material, Scene, SceneObject};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-draw uniform block. Layout matches `struct Material` in the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct MaterialUniforms {
    view_proj: [[f32; 4]; 4],
    big_frequency: [f32; 2],
    time: f32,
    shift: f32,
    big_elevation: f32,
    big_speed: f32,
    small_elevation: f32,
    small_frequency: f32,
    small_speed: f32,
    small_iterations: u32,
    color_offset: f32,
    color_multiplier: f32,
    depth_color: [f32; 4],
    surface_color: [f32; 4],
}

impl MaterialUniforms {
    /// Colours are authored in sRGB and uploaded linear; the sRGB surface
    /// encodes them back on write.
    fn new(view_proj: Mat4, m: &Material) -> Self {
        let w = &m.waves;
        let c = &m.colors;
        let rgba = |rgb: [f32; 3]| [rgb[0], rgb[1], rgb[2], 1.0];
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            big_frequency: w.big_frequency.to_array(),
            time: m.time,
            shift: w.shift,
            big_elevation: w.big_elevation,
            big_speed: w.big_speed,
            small_elevation: w.small_elevation,
            small_frequency: w.small_frequency,
            small_speed: w.small_speed,
            small_iterations: w.small_iterations,
            color_offset: c.color_offset,
            color_multiplier: c.color_multiplier,
            depth_color: rgba(c.depth_color.to_linear().to_array()),
            surface_color: rgba(c.surface_color.to_linear().to_array()),
        }
    }
}

/// GPU resources for one scene object.
struct GpuObject {
    name: String,
    vertex_count: usize,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GpuObject {
    fn matches(&self, object: &SceneObject) -> bool {
        self.name == object.name && self.vertex_count == object.mesh.vertex_count()
    }
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    objects: Vec<GpuObject>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("water_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::WATER_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("water_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // The plane is seen from both sides once the camera orbits below it.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            pipeline,
            bind_group_layout,
            objects: Vec::new(),
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Upload meshes for any object that is new or has changed shape.
    fn sync_meshes(&mut self, device: &wgpu::Device, scene: &Scene) {
        let drawable = || scene.objects().iter().filter(|o| !o.mesh.is_empty());
        let in_sync = self.objects.len() == drawable().count()
            && drawable().zip(&self.objects).all(|(o, g)| g.matches(o));
        if in_sync {
            return;
        }

        self.objects = drawable().map(|o| self.upload(device, o)).collect();
        tracing::debug!(objects = self.objects.len(), "uploaded scene meshes");
    }

    fn upload(&self, device: &wgpu::Device, object: &SceneObject) -> GpuObject {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("{}_vertex_buffer", object.name).as_str()),
            contents: bytemuck::cast_slice(&object.mesh.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("{}_index_buffer", object.name).as_str()),
            contents: bytemuck::cast_slice(&object.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniforms = MaterialUniforms::new(Mat4::IDENTITY, &object.material);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("{}_uniform_buffer", object.name).as_str()),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(format!("{}_bind_group", object.name).as_str()),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        GpuObject {
            name: object.name.clone(),
            vertex_count: object.mesh.vertex_count(),
            vertex_buffer,
            index_buffer,
            index_count: object.mesh.indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    /// Render one frame: every scene object with its current material.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        view: &RenderView,
        scene: &Scene,
    ) {
        self.sync_meshes(device, scene);

        for gpu in &self.objects {
            if let Some(object) = scene.object(&gpu.name) {
                let uniforms = MaterialUniforms::new(view.view_proj, &object.material);
                queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
            }
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            for gpu in &self.objects {
                pass.set_bind_group(0, &gpu.bind_group, &[]);
                pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn uniform_layout_matches_wgsl() {
        assert_eq!(size_of::<MaterialUniforms>(), 144);
        assert_eq!(offset_of!(MaterialUniforms, big_frequency), 64);
        assert_eq!(offset_of!(MaterialUniforms, time), 72);
        assert_eq!(offset_of!(MaterialUniforms, small_iterations), 100);
        assert_eq!(offset_of!(MaterialUniforms, color_multiplier), 108);
        assert_eq!(offset_of!(MaterialUniforms, depth_color), 112);
        assert_eq!(offset_of!(MaterialUniforms, surface_color), 128);
    }

    #[test]
    fn uniforms_carry_material_state() {
        let mut m = Material::text();
        m.time = 3.5;
        m.waves.small_iterations = 4;
        let u = MaterialUniforms::new(Mat4::IDENTITY, &m);
        assert_eq!(u.time, 3.5);
        assert_eq!(u.small_iterations, 4);
        assert_eq!(u.big_elevation, 0.2);
        assert_eq!(u.big_frequency, [4.0, 1.5]);
        assert_eq!(u.view_proj, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn colors_are_uploaded_linear() {
        let m = Material::text();
        let u = MaterialUniforms::new(Mat4::IDENTITY, &m);
        // #ff0000 stays pure red; #9cd4ea darkens in linear space.
        assert_eq!(u.surface_color, [1.0, 0.0, 0.0, 1.0]);
        let srgb = m.colors.depth_color;
        assert!(u.depth_color[0] < srgb.r);
        assert!(u.depth_color[2] < srgb.b);
        assert_eq!(u.depth_color[3], 1.0);
    }
}

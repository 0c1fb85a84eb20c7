//! Scene object model
//!
//! A [`Mesh`] owns CPU vertex data and its lazily-created GPU buffers; an
//! [`Object`] pairs one mesh with a material slot, a world transform and a
//! set of instance transforms. Every object carries at least one instance
//! (the identity), so the render pass treats plain and instanced objects
//! uniformly: one pipeline, one draw path.

use cgmath::{Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;
use wgpu::Device;

use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::material::SlotId;

use super::vertex::Vertex3D;

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_vertices();
        let index_count = indices.len() as u32;

        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    fn init_gpu_resources(&mut self, device: &Device) {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }
}

/// Per-instance data: one transform applied on top of the object transform
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub transform: [[f32; 4]; 4],
}

impl InstanceData {
    pub fn identity() -> Self {
        Self {
            transform: Matrix4::identity().into(),
        }
    }

    pub fn from_transform(transform: Matrix4<f32>) -> Self {
        Self {
            transform: transform.into(),
        }
    }

    /// Instance buffer layout: the matrix as four vec4 attributes after
    /// position(0) and normal(1)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// GPU-side state for one object
pub struct ObjectGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
    pub instance_buffer: wgpu::Buffer,
}

pub struct Object {
    pub name: String,
    pub slot: SlotId,
    pub mesh: Mesh,
    pub transform: Matrix4<f32>,
    instances: Vec<InstanceData>,
    pub gpu_resources: Option<ObjectGpuResources>,
}

impl Object {
    pub fn new(name: impl Into<String>, slot: SlotId, geometry: &GeometryData) -> Self {
        Self {
            name: name.into(),
            slot,
            mesh: Mesh::from_geometry(geometry),
            transform: Matrix4::identity(),
            instances: vec![InstanceData::identity()],
            gpu_resources: None,
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.transform = transform;
        self
    }

    /// Turns the object into one GPU-instanced draw: one geometry, one
    /// material, one transform per copy
    pub fn with_instances(mut self, transforms: Vec<Matrix4<f32>>) -> Self {
        assert!(!transforms.is_empty(), "instanced object needs at least one transform");
        self.instances = transforms
            .into_iter()
            .map(InstanceData::from_transform)
            .collect();
        self
    }

    /// Applies a parent transform on top of the current one; used when a
    /// locally-composed group is placed into world space
    pub fn reparent(&mut self, parent: Matrix4<f32>) {
        self.transform = parent * self.transform;
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        self.mesh.triangle_count() * self.instance_count()
    }

    pub fn vertex_count(&self) -> u32 {
        self.mesh.vertex_count()
    }

    /// Uploads mesh, instance and transform data; must run before drawing
    pub fn init_gpu_resources(&mut self, device: &Device) {
        self.mesh.init_gpu_resources(device);

        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&self.instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // cgmath matrices are column-major, which is what the GPU expects
        let transform_data: &[f32; 16] = self.transform.as_ref();
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transform Uniform Buffer"),
            contents: bytemuck::cast_slice(transform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
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

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout: &transform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(ObjectGpuResources {
            transform_buffer,
            transform_bind_group,
            instance_buffer,
        });
    }

    pub fn transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }
}

pub trait DrawObject<'a> {
    fn draw_object(&mut self, object: &'a Object);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_object(&mut self, object: &'b Object) {
        let Some(gpu) = &object.gpu_resources else {
            return; // Skip drawing if not uploaded
        };
        let (Some(vertex_buffer), Some(index_buffer)) =
            (&object.mesh.vertex_buffer, &object.mesh.index_buffer)
        else {
            return;
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_vertex_buffer(1, gpu.instance_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..object.mesh.index_count, 0, 0..object.instance_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use crate::gfx::resources::material::slot;
    use cgmath::Vector3;

    #[test]
    fn test_object_defaults_to_single_identity_instance() {
        let object = Object::new("cube", slot::TABLE, &generate_box(1.0, 1.0, 1.0, 1));
        assert_eq!(object.instance_count(), 1);
        assert_eq!(object.triangle_count(), 12);
    }

    #[test]
    fn test_instanced_object_scales_triangle_count() {
        let transforms = (0..4)
            .map(|i| Matrix4::from_translation(Vector3::new(i as f32, 0.0, 0.0)))
            .collect();
        let object = Object::new("cubes", slot::CHAIR, &generate_box(1.0, 1.0, 1.0, 1))
            .with_instances(transforms);

        assert_eq!(object.instance_count(), 4);
        assert_eq!(object.triangle_count(), 48);
    }

    #[test]
    fn test_reparent_prepends_parent_transform() {
        let mut object = Object::new("part", slot::SINK_BASIN, &generate_box(1.0, 1.0, 1.0, 1))
            .with_transform(Matrix4::from_translation(Vector3::new(0.0, 1.0, 0.0)));
        object.reparent(Matrix4::from_translation(Vector3::new(2.0, 0.0, 0.0)));

        assert_eq!(object.transform.w.x, 2.0);
        assert_eq!(object.transform.w.y, 1.0);
    }
}

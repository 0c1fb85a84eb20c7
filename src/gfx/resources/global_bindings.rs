//! Global uniform bindings for camera and lighting
//!
//! One uniform buffer, bound at group 0 in the scene pipeline, carries all
//! per-frame global state: the camera matrices and the room's light rig
//! (four point lights plus ambient and hemisphere terms).

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

pub const MAX_POINT_LIGHTS: usize = 4;

/// One point light as the shader sees it (16-byte aligned pairs)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub range: f32,
}

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in `room.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    ambient: [f32; 4],
    hemisphere_sky: [f32; 4],
    hemisphere_ground: [f32; 4],
}

/// The room's fixed lighting: four ceiling point lights, an ambient term and
/// a sky/ground hemisphere term
#[derive(Copy, Clone, Debug)]
pub struct LightRig {
    pub points: [PointLightUniform; MAX_POINT_LIGHTS],
    pub ambient: [f32; 3],
    pub hemisphere_sky: [f32; 3],
    pub hemisphere_ground: [f32; 3],
}

impl LightRig {
    /// Light placement derived from the room dimensions: one warm point
    /// light per ceiling quadrant, just below the ceiling plane
    pub fn for_room(width: f32, height: f32, depth: f32) -> Self {
        let y = height - 0.8;
        let x = width / 4.0;
        let z = depth / 4.0;
        let warm = [1.0, 0.96, 0.88];

        let point = |px: f32, pz: f32| PointLightUniform {
            position: [px, y, pz],
            intensity: 6.0,
            color: warm,
            range: 15.0,
        };

        Self {
            points: [
                point(-x, -z),
                point(x, -z),
                point(-x, z),
                point(x, z),
            ],
            ambient: [0.25, 0.25, 0.27],
            hemisphere_sky: [0.32, 0.34, 0.38],
            hemisphere_ground: [0.20, 0.18, 0.16],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
///
/// Called once per frame; the underlying buffer skips the upload when
/// nothing changed.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &LightRig,
) {
    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        point_lights: lights.points,
        ambient: [lights.ambient[0], lights.ambient[1], lights.ambient[2], 0.0],
        hemisphere_sky: [
            lights.hemisphere_sky[0],
            lights.hemisphere_sky[1],
            lights.hemisphere_sky[2],
            0.0,
        ],
        hemisphere_ground: [
            lights.hemisphere_ground[0],
            lights.hemisphere_ground[1],
            lights.hemisphere_ground[2],
            0.0,
        ],
    };

    ubo.update_content(queue, content);
}

/// Manages the bind group layout and bind group for global uniforms
///
/// Bound to slot 0 in the scene render pipeline.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Globals Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// # Panics
    /// Panics if `create_bind_group()` hasn't been called yet
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ubo_content_size_matches_shader_layout() {
        // vec4 + mat4 + 4 lights * 32B + 3 vec4s
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 16 + 64 + 128 + 48);
    }

    #[test]
    fn test_light_rig_positions_follow_room_dimensions() {
        let rig = LightRig::for_room(10.0, 5.0, 10.0);
        for light in &rig.points {
            assert!((light.position[1] - 4.2).abs() < 1e-6);
            assert_eq!(light.position[0].abs(), 2.5);
            assert_eq!(light.position[2].abs(), 2.5);
        }
        // One light per quadrant
        let quadrants: std::collections::HashSet<(bool, bool)> = rig
            .points
            .iter()
            .map(|l| (l.position[0] > 0.0, l.position[2] > 0.0))
            .collect();
        assert_eq!(quadrants.len(), 4);
    }
}

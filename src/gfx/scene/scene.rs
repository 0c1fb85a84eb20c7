use wgpu::Device;

use crate::config::{CategoryColors, MaterialCategory, Rgb};
use crate::gfx::{
    camera::camera_utils::CameraManager,
    resources::{
        global_bindings::LightRig,
        material::{Material, MaterialRegistry},
    },
};

use super::builder::{self, ROOM_DEPTH, ROOM_HEIGHT, ROOM_WIDTH};
use super::object::Object;

/// The kitchen scene: objects, lights, materials and the viewing camera
///
/// Owned exclusively by the current render session; built as a pure CPU
/// structure and uploaded to the GPU afterwards, so construction is
/// deterministic and testable without a device.
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub lights: LightRig,
    pub materials: MaterialRegistry,
}

impl Scene {
    /// Builds the full scene for one quality setting, seeding materials
    /// from the authoritative color map
    pub fn build(quality: u32, colors: &CategoryColors, camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: builder::build_objects(quality),
            lights: LightRig::for_room(ROOM_WIDTH, ROOM_HEIGHT, ROOM_DEPTH),
            materials: MaterialRegistry::build(colors),
        }
    }

    /// Advances camera damping and refreshes the view matrices; returns
    /// true when the camera pose changed this frame
    pub fn update(&mut self) -> bool {
        self.camera_manager.update()
    }

    /// Uploads all object and material GPU resources
    ///
    /// Must be called after the GPU context is available and before
    /// rendering.
    pub fn init_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device);
        }
        self.materials.update_gpu_resources(device, queue);
    }

    /// Re-uploads materials whose color changed since the last frame
    pub fn sync_materials(&mut self, device: &Device, queue: &wgpu::Queue) {
        self.materials.update_gpu_resources(device, queue);
    }

    /// Live recolor of one category; materials mutate in place and the next
    /// frame draws the new color
    pub fn recolor(&mut self, category: MaterialCategory, color: Rgb) {
        self.materials.recolor(category, color);
    }

    /// Material for an object's slot
    pub fn material_for(&self, object: &Object) -> Option<&Material> {
        self.materials.get(object.slot)
    }

    pub fn statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            material_count: self.materials.len(),
            draw_calls: self.objects.len() as u32,
            total_triangles: self.objects.iter().map(|o| o.triangle_count()).sum(),
            total_vertices: self.objects.iter().map(|o| o.vertex_count()).sum(),
        }
    }
}

/// Scene statistics for the stats overlay and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub material_count: usize,
    pub draw_calls: u32,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{camera_utils::CameraManager, orbit_camera::CameraPose};
    use crate::gfx::resources::material::slot;

    fn scene(quality: u32) -> Scene {
        let manager = CameraManager::restore(CameraPose::default(), 1.5);
        Scene::build(quality, &CategoryColors::default(), manager)
    }

    #[test]
    fn test_rebuild_round_trip_preserves_scene_shape_and_pose() {
        let mut first = scene(40);
        // Simulate some interaction before the rebuild
        first.camera_manager.camera.add_yaw(0.9);
        first.camera_manager.camera.add_distance(1.2);
        let stats = first.statistics();
        let pose = first.camera_manager.pose();

        // Teardown is dropping the generation; rebuild restores the pose
        drop(first);
        let second = Scene::build(
            40,
            &CategoryColors::default(),
            CameraManager::restore(pose, 1.5),
        );

        assert_eq!(second.statistics(), stats);
        assert_eq!(second.camera_manager.pose(), pose);
    }

    #[test]
    fn test_recolor_routes_through_materials() {
        let mut scene = scene(25);
        let new = Rgb::from_hex("#112233").unwrap();

        scene.recolor(MaterialCategory::Furniture, new);

        assert_eq!(scene.materials.get(slot::TABLE).unwrap().color(), new);
        assert_eq!(
            scene.materials.get(slot::SINK_BASIN).unwrap().color(),
            CategoryColors::default().get(MaterialCategory::Sink)
        );
    }

    #[test]
    fn test_every_object_resolves_a_material() {
        let scene = scene(25);
        for object in &scene.objects {
            assert!(
                scene.material_for(object).is_some(),
                "object {} has no material",
                object.name
            );
        }
    }

    #[test]
    fn test_quality_changes_scene_density_only() {
        let low = scene(5);
        let high = scene(95);

        assert_eq!(low.statistics().object_count, high.statistics().object_count);
        assert!(high.statistics().total_triangles > low.statistics().total_triangles);
    }
}

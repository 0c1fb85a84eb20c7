use cgmath::{Matrix4, SquareMatrix};
use winit::event::{DeviceEvent, KeyEvent};

use super::{
    camera_controller::CameraController,
    orbit_camera::{CameraPose, OrbitCamera},
};

/// Owns the orbit camera and its input controller
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Builds a manager restoring a previously saved pose
    pub fn restore(pose: CameraPose, aspect: f32) -> Self {
        let camera = OrbitCamera::new(pose, aspect);
        let controller = CameraController::new(0.005, 0.1);
        Self::new(camera, controller)
    }

    pub fn process_event(&mut self, event: &DeviceEvent) {
        self.controller.process_events(event);
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        self.controller.process_keyed_events(event);
    }

    /// Advances controller damping one step and refreshes the camera
    /// uniform; returns true when the pose changed
    pub fn update(&mut self) -> bool {
        let changed = self.controller.update(&mut self.camera);
        self.camera.update_view_proj();
        changed
    }

    /// Current persistable pose
    pub fn pose(&self) -> CameraPose {
        self.camera.pose()
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment
    /// requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}

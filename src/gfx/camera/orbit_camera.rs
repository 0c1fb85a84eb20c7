use super::camera_utils::{convert_matrix4_to_array, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

pub const FOVY: Rad<f32> = Rad(75.0 * std::f32::consts::PI / 180.0);
pub const ZNEAR: f32 = 0.1;
pub const ZFAR: f32 = 1000.0;

/// Orbit constraints: the camera stays inside the room, above the table and
/// below the ceiling. Pitch is measured up from the horizon; [0, pi/4] keeps
/// the view between eye level and a 45-degree look-down.
pub const MIN_DISTANCE: f32 = 1.5;
pub const MAX_DISTANCE: f32 = 9.0;
pub const MIN_PITCH: f32 = 0.0;
pub const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_4;
pub const MAX_EYE_HEIGHT: f32 = 4.5;
pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 1.0;

/// The persistable part of the camera state
///
/// Saved on every pose change and restored verbatim after a scene rebuild,
/// so reconfiguring quality or antialiasing never moves the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub zoom: f32,
    pub target: [f32; 3],
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.35,
            distance: 5.0,
            zoom: 1.0,
            target: [0.0, 1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub zoom: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl OrbitCamera {
    pub fn new(pose: CameraPose, aspect: f32) -> Self {
        let mut camera = Self {
            distance: pose.distance,
            pitch: pose.pitch,
            yaw: pose.yaw,
            zoom: pose.zoom,
            eye: Vector3::zero(), // Recalculated in `update()`
            target: Vector3::from(pose.target),
            up: Vector3::unit_y(),
            aspect,
            fovy: FOVY,
            znear: ZNEAR,
            zfar: ZFAR,
            uniform: CameraUniform::default(),
        };
        camera.clamp_pose();
        camera.update();
        camera
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        // Zoom scales the projection the way a zoom lens does: narrower
        // frustum at higher zoom, same eye position.
        let half = (self.fovy.0 * 0.5).tan() / self.zoom;
        let fovy = Rad(2.0 * half.atan());
        let proj = OPENGL_TO_WGPU_MATRIX * perspective(fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    /// Snapshot of the persistable state
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            yaw: self.yaw,
            pitch: self.pitch,
            distance: self.distance,
            zoom: self.zoom,
            target: self.target.into(),
        }
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        // Scale by the current distance so dolly speed feels constant
        let corrected = (1.0 + self.distance.log10().max(0.0)) * delta;
        self.set_distance(self.distance + corrected);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(MIN_PITCH, MAX_PITCH);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn add_zoom(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }

    fn clamp_pose(&mut self) {
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.pitch = self.pitch.clamp(MIN_PITCH, MAX_PITCH);
        self.zoom = self.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Recomputes the eye position after a `distance`, `pitch` or `yaw`
    /// change, keeping the eye below the height ceiling
    fn update(&mut self) {
        let headroom = (MAX_EYE_HEIGHT - self.target.y) / self.distance;
        let height_limited_pitch = headroom.clamp(-1.0, 1.0).asin();
        self.pitch = self
            .pitch
            .clamp(MIN_PITCH, MAX_PITCH.min(height_limited_pitch));

        self.eye = calculate_cartesian_eye_position(
            self.pitch,
            self.yaw,
            self.distance,
            self.target,
        );
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(CameraPose::default(), 1.5)
    }

    #[test]
    fn test_pitch_stays_in_polar_window() {
        let mut camera = camera();
        for _ in 0..100 {
            camera.add_pitch(0.5);
        }
        assert!(camera.pitch <= MAX_PITCH + 1e-6);

        for _ in 0..100 {
            camera.add_pitch(-0.5);
        }
        assert!(camera.pitch >= MIN_PITCH - 1e-6);
    }

    #[test]
    fn test_eye_height_never_exceeds_ceiling() {
        let mut camera = camera();
        for _ in 0..50 {
            camera.add_pitch(0.3);
            camera.add_distance(1.0);
            assert!(
                camera.eye.y <= MAX_EYE_HEIGHT + 1e-4,
                "eye height {} exceeded limit",
                camera.eye.y
            );
        }
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut camera = camera();
        for _ in 0..100 {
            camera.add_distance(5.0);
        }
        assert!(camera.distance <= MAX_DISTANCE);

        for _ in 0..100 {
            camera.add_distance(-5.0);
        }
        assert!(camera.distance >= MIN_DISTANCE);
    }

    #[test]
    fn test_zoom_is_clamped_to_one() {
        let mut camera = camera();
        for _ in 0..20 {
            camera.add_zoom(0.3);
        }
        assert!(camera.zoom <= MAX_ZOOM);

        for _ in 0..20 {
            camera.add_zoom(-0.3);
        }
        assert!(camera.zoom >= MIN_ZOOM);
    }

    #[test]
    fn test_pose_round_trip_restores_view() {
        let mut camera = camera();
        camera.add_yaw(1.3);
        camera.add_pitch(0.2);
        camera.add_distance(1.5);
        camera.add_zoom(-0.25);
        camera.update_view_proj();

        let pose = camera.pose();
        let mut restored = OrbitCamera::new(pose, camera.aspect);
        restored.update_view_proj();

        assert_eq!(restored.pose(), pose);
        assert_eq!(restored.uniform.view_proj, camera.uniform.view_proj);
        assert_eq!(restored.uniform.view_position, camera.uniform.view_position);
    }

    #[test]
    fn test_out_of_range_pose_is_clamped_on_restore() {
        let pose = CameraPose {
            yaw: 0.0,
            pitch: 2.0,
            distance: 50.0,
            zoom: 3.0,
            target: [0.0, 1.0, 0.0],
        };
        let camera = OrbitCamera::new(pose, 1.0);
        assert!(camera.pitch <= MAX_PITCH);
        assert!(camera.distance <= MAX_DISTANCE);
        assert!(camera.zoom <= MAX_ZOOM);
        assert!(camera.eye.y <= MAX_EYE_HEIGHT + 1e-4);
    }
}

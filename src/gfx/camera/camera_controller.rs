use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Fraction of each velocity carried into the next frame; the remainder is
/// what makes drags settle instead of snapping.
const DAMPING: f32 = 0.82;
const VELOCITY_EPSILON: f32 = 1e-5;

/// Damped orbit input controller
///
/// Pointer input accumulates into velocities; [`CameraController::update`]
/// applies and decays them once per rendered frame, so a single gesture
/// spreads its effect over several frames and the camera eases to rest.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    dolly_velocity: f32,
    zoom_velocity: f32,
    is_mouse_pressed: bool,
    is_ctrl_held: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            dolly_velocity: 0.0,
            zoom_velocity: 0.0,
            is_mouse_pressed: false,
            is_ctrl_held: false,
        }
    }

    /// Feeds a raw device event into the velocity accumulators
    pub fn process_events(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                if self.is_ctrl_held {
                    // CTRL + SCROLL = lens zoom
                    self.zoom_velocity -= scroll_amount * self.zoom_speed * 0.5;
                } else {
                    // SCROLL = dolly in/out
                    self.dolly_velocity += scroll_amount * self.zoom_speed;
                }
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    // DRAG = orbit around the target
                    self.yaw_velocity += -delta.0 as f32 * self.rotate_speed;
                    self.pitch_velocity += delta.1 as f32 * self.rotate_speed;
                }
            }
            _ => (),
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::ControlLeft | KeyCode::ControlRight),
            state,
            ..
        } = event
        {
            self.is_ctrl_held = *state == ElementState::Pressed;
        }
    }

    /// Advances the damping one step; call exactly once per rendered frame
    ///
    /// Returns true when the camera pose changed this step.
    pub fn update(&mut self, camera: &mut OrbitCamera) -> bool {
        let moving = self.yaw_velocity.abs() > VELOCITY_EPSILON
            || self.pitch_velocity.abs() > VELOCITY_EPSILON
            || self.dolly_velocity.abs() > VELOCITY_EPSILON
            || self.zoom_velocity.abs() > VELOCITY_EPSILON;

        if !moving {
            return false;
        }

        camera.add_yaw(self.yaw_velocity);
        camera.add_pitch(self.pitch_velocity);
        camera.add_distance(self.dolly_velocity);
        camera.add_zoom(self.zoom_velocity);

        self.yaw_velocity *= DAMPING;
        self.pitch_velocity *= DAMPING;
        self.dolly_velocity *= DAMPING;
        self.zoom_velocity *= DAMPING;

        for velocity in [
            &mut self.yaw_velocity,
            &mut self.pitch_velocity,
            &mut self.dolly_velocity,
            &mut self.zoom_velocity,
        ] {
            if velocity.abs() <= VELOCITY_EPSILON {
                *velocity = 0.0;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::orbit_camera::{CameraPose, MAX_EYE_HEIGHT, MAX_PITCH, MAX_ZOOM};

    fn press() -> DeviceEvent {
        DeviceEvent::Button {
            button: 0,
            state: ElementState::Pressed,
        }
    }

    #[test]
    fn test_drag_spreads_over_multiple_frames() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut camera = OrbitCamera::new(CameraPose::default(), 1.0);
        let start_yaw = camera.yaw;

        controller.process_events(&press());
        controller.process_events(&DeviceEvent::MouseMotion { delta: (40.0, 0.0) });

        assert!(controller.update(&mut camera));
        let after_one_frame = camera.yaw;
        assert!(controller.update(&mut camera));
        let after_two_frames = camera.yaw;

        // Motion continues past the frame that received the input, with a
        // smaller step each time
        assert!((after_one_frame - start_yaw).abs() > 0.0);
        assert!((after_two_frames - after_one_frame).abs() > 0.0);
        assert!(
            (after_two_frames - after_one_frame).abs() < (after_one_frame - start_yaw).abs()
        );
    }

    #[test]
    fn test_damping_settles_to_rest() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut camera = OrbitCamera::new(CameraPose::default(), 1.0);

        controller.process_events(&press());
        controller.process_events(&DeviceEvent::MouseMotion { delta: (15.0, 8.0) });

        let mut steps = 0;
        while controller.update(&mut camera) {
            steps += 1;
            assert!(steps < 1000, "controller never settled");
        }
        assert!(steps > 1);
        assert!(!controller.update(&mut camera));
    }

    #[test]
    fn test_clamps_hold_under_arbitrary_input() {
        let mut controller = CameraController::new(0.01, 0.5);
        let mut camera = OrbitCamera::new(CameraPose::default(), 1.0);

        controller.process_events(&press());
        let gestures: [(f64, f64, f32); 4] = [
            (500.0, -900.0, -30.0),
            (-300.0, 700.0, 25.0),
            (900.0, 900.0, -40.0),
            (-50.0, -999.0, 99.0),
        ];
        for (dx, dy, scroll) in gestures {
            controller.process_events(&DeviceEvent::MouseMotion { delta: (dx, dy) });
            controller.process_events(&DeviceEvent::MouseWheel {
                delta: MouseScrollDelta::LineDelta(0.0, scroll),
            });
            for _ in 0..60 {
                controller.update(&mut camera);
                assert!(camera.eye.y <= MAX_EYE_HEIGHT + 1e-4);
                assert!(camera.zoom <= MAX_ZOOM);
                assert!(camera.pitch <= MAX_PITCH + 1e-6);
            }
        }
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut camera = OrbitCamera::new(CameraPose::default(), 1.0);

        controller.process_events(&DeviceEvent::MouseMotion { delta: (40.0, 40.0) });
        assert!(!controller.update(&mut camera));
    }
}

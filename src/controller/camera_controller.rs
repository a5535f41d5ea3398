use glam::Vec3;

use super::input::InputState;
use crate::model::Camera;

/// Handles camera movement and orientation
pub struct CameraController {
    /// world units per frame
    pub move_speed: f32,
    /// degrees per pixel of mouse motion
    pub mouse_sensitivity: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            move_speed: 0.5,
            mouse_sensitivity: 0.2,
        }
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply mouse look delta to camera
    pub fn apply_look(&self, camera: &mut Camera, dx: f32, dy: f32) {
        camera.yaw += dx * self.mouse_sensitivity;
        camera.set_pitch(camera.pitch + dy * self.mouse_sensitivity);
    }

    /// Move the camera along world axes for one frame of held keys
    pub fn update_movement(&self, camera: &mut Camera, input: &InputState) {
        let mut step = Vec3::ZERO;

        if input.is_key_pressed("w") {
            step.z += 1.0;
        }
        if input.is_key_pressed("s") {
            step.z -= 1.0;
        }
        if input.is_key_pressed("a") {
            step.x -= 1.0;
        }
        if input.is_key_pressed("d") {
            step.x += 1.0;
        }
        if input.is_key_pressed(" ") {
            step.y += 1.0;
        }
        if input.is_key_pressed("Shift") {
            step.y -= 1.0;
        }

        camera.position += step * self.move_speed;
    }
}

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective constant: a point this far in front of the eye keeps scale 1/2.
pub const FOV_SCALE: f32 = 256.0;

/// Pitch limit in degrees
pub const PITCH_LIMIT: f32 = 90.0;

/// How camera orientation takes part in projection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// Position only, yaw and pitch are ignored
    #[default]
    Translate,
    /// Rotate into view space by yaw, then pitch, before the divide
    Rotated,
}

/// Screen position of a projected point and its perspective factor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub x: i32,
    pub y: i32,
    pub factor: f32,
}

impl Projection {
    /// In front of the camera
    pub fn is_visible(&self) -> bool {
        self.factor > 0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// degrees
    pub yaw: f32,
    /// degrees, clamped to +-PITCH_LIMIT
    pub pitch: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self { position, yaw: 0.0, pitch: 0.0 }
    }

    /// Hovering over the middle of a freshly generated world
    pub fn spawn_for(world_size: i32) -> Self {
        let half = (world_size / 2) as f32;
        Self::new(Vec3::new(half, 20.0, half))
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// World-to-view rotation for the current yaw and pitch
    pub fn view_rotation(&self) -> Mat3 {
        Mat3::from_rotation_x(-self.pitch.to_radians()) * Mat3::from_rotation_y(-self.yaw.to_radians())
    }

    /// Project a world point onto a `width` x `height` screen.
    ///
    /// Returns `None` when the point lies exactly on the plane where the
    /// perspective divide is undefined. Points behind the camera come back
    /// with a non-positive factor.
    pub fn project(&self, point: Vec3, width: u32, height: u32, mode: ProjectionMode) -> Option<Projection> {
        let mut rel = point - self.position;
        if mode == ProjectionMode::Rotated {
            rel = self.view_rotation() * rel;
        }

        let denom = rel.z + FOV_SCALE;
        if denom == 0.0 {
            return None;
        }
        let factor = FOV_SCALE / denom;
        if !factor.is_finite() {
            return None;
        }

        Some(Projection {
            x: (rel.x * factor + width as f32 / 2.0) as i32,
            y: (-rel.y * factor + height as f32 / 2.0) as i32,
            factor,
        })
    }
}

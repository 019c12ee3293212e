use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Viewpoint of a 3D scene as reported by the renderer.
///
/// `eye` and `center` are in the renderer's normalised scene coordinates;
/// `up` is the world-up direction (+Z for data plots).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneCamera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            eye: Vec3::splat(1.25),
            center: Vec3::ZERO,
            up: Vec3::Z,
        }
    }
}

/// Minimum elevation (just above looking straight up from below).
const ELEVATION_MIN: f32 = -PI / 2.0 + 0.01;
/// Maximum elevation (just below looking straight down from above).
const ELEVATION_MAX: f32 = PI / 2.0 - 0.01;

const DISTANCE_MIN: f32 = 0.1;
const DISTANCE_MAX: f32 = 50.0;

impl SceneCamera {
    /// Camera looking at the origin from spherical coordinates.
    ///
    /// Azimuth is measured in the XY plane from +X toward +Y, elevation from
    /// the XY plane toward +Z. Elevation and distance are clamped.
    pub fn from_orbit(azimuth: f32, elevation: f32, distance: f32) -> Self {
        let mut camera = Self::default();
        camera.set_orbit(azimuth, elevation, distance);
        camera
    }

    /// Spherical coordinates `(azimuth, elevation, distance)` of the eye
    /// relative to `center`.
    pub fn orbit(&self) -> (f32, f32, f32) {
        let offset = self.eye - self.center;
        let distance = offset.length();
        if distance == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        let azimuth = offset.y.atan2(offset.x);
        let elevation = (offset.z / distance).clamp(-1.0, 1.0).asin();
        (azimuth, elevation, distance)
    }

    fn set_orbit(&mut self, azimuth: f32, elevation: f32, distance: f32) {
        let elevation = elevation.clamp(ELEVATION_MIN, ELEVATION_MAX);
        let distance = distance.clamp(DISTANCE_MIN, DISTANCE_MAX);
        let (sin_el, cos_el) = elevation.sin_cos();
        let (sin_az, cos_az) = azimuth.sin_cos();
        self.eye = self.center + Vec3::new(cos_el * cos_az, cos_el * sin_az, sin_el) * distance;
    }
}

//! Finalized scatter point record.
use glam::{Quat, Vec2, Vec3};

/// One placed instance. Built by [`crate::finalize::PointFinalizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterPoint {
    /// World-space position (snapped to terrain when the probe hit).
    pub position: Vec3,
    /// Final heading around the up axis in degrees.
    pub rotation: f32,
    /// Full orientation: surface tilt (when aligned) followed by the heading.
    pub orientation: Quat,
    /// Uniform scale.
    pub scale: f32,
    /// Density weight sampled from the settings' falloff curve.
    pub density: f32,
    /// Surface slope in degrees.
    pub slope: f32,
    /// Unit surface normal.
    pub normal: Vec3,
}

impl ScatterPoint {
    /// Horizontal position as `Vec2(x, z)`.
    #[inline]
    pub fn xz(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Horizontal distance to another point.
    #[inline]
    pub fn horizontal_distance(&self, other: &ScatterPoint) -> f32 {
        self.xz().distance(other.xz())
    }
}

//! Terrain query collaborator.
//!
//! The engine never raycasts itself. Hosts implement [`TerrainQuery`] over
//! whatever surface representation they have; the trait speaks `mint` types so
//! it does not tie implementors to this crate's `glam` version.
use glam::Vec3;
use mint::Vector3;

/// World Y the downward probe starts from.
pub const PROBE_HEIGHT: f32 = 1000.0;

/// Result of a successful terrain query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainHit {
    /// Hit position in world space.
    pub point: Vector3<f32>,
    /// Unit surface normal at the hit.
    pub normal: Vector3<f32>,
    /// Surface slope in degrees (0 = flat).
    pub slope: f32,
}

impl TerrainHit {
    /// Builds a hit whose slope is derived from the normal.
    pub fn from_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.try_normalize().unwrap_or(Vec3::Y);
        Self {
            point: point.into(),
            normal: normal.into(),
            slope: slope_from_normal(normal),
        }
    }
}

/// Angle between `normal` and +Y in degrees.
pub fn slope_from_normal(normal: Vec3) -> f32 {
    let n = normal.try_normalize().unwrap_or(Vec3::Y);
    n.y.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Ray-style surface query: `None` means the ray hit nothing.
pub trait TerrainQuery: Send + Sync {
    fn query(&self, origin: Vector3<f32>, direction: Vector3<f32>) -> Option<TerrainHit>;
}

/// Terrain that never reports a hit; points keep the zone's reference surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTerrain;

impl TerrainQuery for NoTerrain {
    fn query(&self, _origin: Vector3<f32>, _direction: Vector3<f32>) -> Option<TerrainHit> {
        None
    }
}

/// Infinite horizontal plane at a fixed height.
#[derive(Debug, Clone, Copy)]
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl TerrainQuery for FlatTerrain {
    fn query(&self, origin: Vector3<f32>, direction: Vector3<f32>) -> Option<TerrainHit> {
        let origin = Vec3::from(origin);
        let direction = Vec3::from(direction);
        if direction.y.abs() <= f32::EPSILON {
            return None;
        }
        let t = (self.height - origin.y) / direction.y;
        if t < 0.0 {
            return None;
        }
        Some(TerrainHit::from_normal(origin + direction * t, Vec3::Y))
    }
}

/// Height-field terrain backed by a closure `f(x, z) -> y`.
///
/// Only vertical probes are answered; the normal comes from central differences.
pub struct HeightFieldTerrain<F> {
    height: F,
    /// Finite-difference step in world units.
    pub sample_step: f32,
}

impl<F> HeightFieldTerrain<F>
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    pub fn new(height: F) -> Self {
        Self {
            height,
            sample_step: 0.1,
        }
    }

    pub fn with_sample_step(mut self, step: f32) -> Self {
        self.sample_step = step;
        self
    }

    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        (self.height)(x, z)
    }

    pub fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        let e = self.sample_step.max(1e-4);
        let dx = self.height_at(x + e, z) - self.height_at(x - e, z);
        let dz = self.height_at(x, z + e) - self.height_at(x, z - e);
        Vec3::new(-dx, 2.0 * e, -dz).try_normalize().unwrap_or(Vec3::Y)
    }
}

impl<F> TerrainQuery for HeightFieldTerrain<F>
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    fn query(&self, origin: Vector3<f32>, direction: Vector3<f32>) -> Option<TerrainHit> {
        let origin = Vec3::from(origin);
        let direction = Vec3::from(direction);
        if direction.y >= 0.0 || direction.x.abs() > 1e-6 || direction.z.abs() > 1e-6 {
            return None;
        }
        let y = self.height_at(origin.x, origin.z);
        if !y.is_finite() || y > origin.y {
            return None;
        }
        let point = Vec3::new(origin.x, y, origin.z);
        Some(TerrainHit::from_normal(point, self.normal_at(origin.x, origin.z)))
    }
}

//! Turns raw horizontal positions into finalized [`ScatterPoint`]s.
//!
//! Every sampler funnels its candidates through [`PointFinalizer`]: probe the
//! terrain straight down, check the zone constraints against the measured
//! surface, then draw rotation, scale and density.
use glam::{Quat, Vec2, Vec3};
use rand::RngCore;

use crate::point::ScatterPoint;
use crate::sampling::rand01;
use crate::settings::ScatterSettings;
use crate::terrain::{TerrainQuery, PROBE_HEIGHT};
use crate::zone::ScatterZone;

/// Surface measured under a candidate position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Position after snapping (unchanged when the probe missed).
    pub position: Vec3,
    /// Unit surface normal (zone reference on a miss).
    pub normal: Vec3,
    /// Slope in degrees (zone reference on a miss).
    pub slope: f32,
    /// Whether the terrain reported a hit.
    pub hit: bool,
}

/// Borrowed view of the zone, settings and terrain for one generation call.
#[derive(Clone, Copy)]
pub struct PointFinalizer<'a> {
    zone: &'a ScatterZone,
    settings: &'a ScatterSettings,
    terrain: &'a dyn TerrainQuery,
}

impl<'a> PointFinalizer<'a> {
    pub fn new(
        zone: &'a ScatterZone,
        settings: &'a ScatterSettings,
        terrain: &'a dyn TerrainQuery,
    ) -> Self {
        Self {
            zone,
            settings,
            terrain,
        }
    }

    #[inline]
    pub fn zone(&self) -> &'a ScatterZone {
        self.zone
    }

    #[inline]
    pub fn settings(&self) -> &'a ScatterSettings {
        self.settings
    }

    #[inline]
    pub fn terrain(&self) -> &'a dyn TerrainQuery {
        self.terrain
    }

    /// Same settings and terrain against a different zone (cluster sub-zones).
    pub fn with_zone<'b>(&self, zone: &'b ScatterZone) -> PointFinalizer<'b>
    where
        'a: 'b,
    {
        PointFinalizer {
            zone,
            settings: self.settings,
            terrain: self.terrain,
        }
    }

    /// Probes the terrain under `xz`, starting from the zone's reference height.
    pub fn probe(&self, xz: Vec2) -> SurfaceSample {
        self.probe_at(Vec3::new(xz.x, self.zone.reference_height(), xz.y))
    }

    /// Probes the terrain under `position`; a miss keeps `position` as is.
    pub fn probe_at(&self, position: Vec3) -> SurfaceSample {
        let origin = Vec3::new(position.x, PROBE_HEIGHT, position.z);
        match self.terrain.query(origin.into(), Vec3::NEG_Y.into()) {
            Some(hit) => SurfaceSample {
                position: Vec3::from(hit.point),
                normal: Vec3::from(hit.normal).try_normalize().unwrap_or(Vec3::Y),
                slope: hit.slope,
                hit: true,
            },
            None => SurfaceSample {
                position,
                normal: self.zone.normal.try_normalize().unwrap_or(Vec3::Y),
                slope: self.zone.slope,
                hit: false,
            },
        }
    }

    /// Zone constraints: horizontal bounds, height range and slope response.
    pub fn accepts(&self, surface: &SurfaceSample) -> bool {
        let xz = Vec2::new(surface.position.x, surface.position.z);
        self.zone.contains_xz(xz)
            && self.zone.height_in_range(surface.position.y)
            && self.zone.accepts_slope(surface.slope)
    }

    /// Draws heading, scale and density for a measured surface.
    ///
    /// Consumes exactly three uniform draws: heading, scale, density.
    pub fn finalize(&self, surface: &SurfaceSample, rng: &mut dyn RngCore) -> ScatterPoint {
        let s = self.settings;
        let random_heading = lerp(s.min_rotation, s.max_rotation, rand01(rng));
        let scale = lerp(s.min_scale, s.max_scale, rand01(rng));
        let density = s.density_falloff.evaluate(rand01(rng)).clamp(0.0, 1.0);

        let (rotation, orientation) = if s.align_to_normal {
            let weight = s.random_rotation_weight.clamp(0.0, 1.0);
            let heading = lerp_heading(normal_heading(surface.normal), random_heading, weight);
            let tilt = Quat::from_rotation_arc(Vec3::Y, surface.normal);
            (heading, tilt * Quat::from_rotation_y(heading.to_radians()))
        } else {
            (
                random_heading,
                Quat::from_rotation_y(random_heading.to_radians()),
            )
        };

        ScatterPoint {
            position: surface.position,
            rotation,
            orientation,
            scale,
            density,
            slope: surface.slope,
            normal: surface.normal,
        }
    }

    /// Probe and finalize without constraint checks.
    pub fn finalize_at(&self, position: Vec3, rng: &mut dyn RngCore) -> ScatterPoint {
        let surface = self.probe_at(position);
        self.finalize(&surface, rng)
    }

    /// Probe at the reference height, check constraints, finalize on success.
    pub fn try_place(&self, xz: Vec2, rng: &mut dyn RngCore) -> Option<ScatterPoint> {
        let surface = self.probe(xz);
        self.accepts(&surface)
            .then(|| self.finalize(&surface, rng))
    }

    /// Like [`Self::try_place`] but keeps `position.y` when the probe misses.
    pub fn try_place_at(&self, position: Vec3, rng: &mut dyn RngCore) -> Option<ScatterPoint> {
        let surface = self.probe_at(position);
        self.accepts(&surface)
            .then(|| self.finalize(&surface, rng))
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Blends two headings in degrees along the shorter arc. `t = 1` returns `b` unchanged.
fn lerp_heading(a: f32, b: f32, t: f32) -> f32 {
    if t >= 1.0 {
        return b;
    }
    a + wrap_degrees(b - a) * t
}

/// Maps an angle difference into `[-180, 180)`.
#[inline]
fn wrap_degrees(delta: f32) -> f32 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}

/// Heading in degrees of the normal's horizontal lean; 0 for vertical normals.
fn normal_heading(normal: Vec3) -> f32 {
    let horizontal = Vec2::new(normal.x, normal.z);
    if horizontal.length_squared() < 1e-8 {
        0.0
    } else {
        normal.x.atan2(normal.z).to_degrees()
    }
}

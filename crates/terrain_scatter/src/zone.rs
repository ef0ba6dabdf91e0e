//! Placement domain descriptor.
//!
//! Horizontal positions throughout the crate are `Vec2(x, z)`: the second
//! component is world Z, not Y.
use glam::{Vec2, Vec3};
use rand::RngCore;

use crate::curve::ResponseCurve;
use crate::error::{Error, Result};
use crate::sampling::rand01;

/// Slope-response weights at or below this value reject a candidate.
pub const SLOPE_ACCEPTANCE_FLOOR: f32 = 0.01;

/// Bounded region that points are scattered over.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterZone {
    /// World-space center of the zone.
    pub center: Vec3,
    /// Extents on X and Z. `size.y` is the reference height above `center.y`.
    pub size: Vec3,
    /// Reference surface normal used when the terrain reports no hit.
    pub normal: Vec3,
    /// Reference slope in degrees used when the terrain reports no hit.
    pub slope: f32,
    /// Maps normalized slope (`slope / 90`) to an acceptance weight.
    pub slope_curve: ResponseCurve,
    /// Lowest accepted world Y.
    pub min_height: f32,
    /// Highest accepted world Y.
    pub max_height: f32,
}

impl Default for ScatterZone {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            size: Vec3::new(10.0, 0.0, 10.0),
            normal: Vec3::Y,
            slope: 0.0,
            slope_curve: ResponseCurve::linear(1.0, 0.0),
            min_height: f32::NEG_INFINITY,
            max_height: f32::INFINITY,
        }
    }
}

impl ScatterZone {
    /// Creates a zone with the given center and X/Z extents.
    pub fn new(center: Vec3, size_x: f32, size_z: f32) -> Self {
        Self {
            center,
            size: Vec3::new(size_x, 0.0, size_z),
            ..Default::default()
        }
    }

    /// Sets the full size vector (X/Z extents and reference height).
    pub fn with_size(mut self, size: Vec3) -> Self {
        self.size = size;
        self
    }

    /// Sets the reference normal. The value is normalized; zero falls back to +Y.
    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal.try_normalize().unwrap_or(Vec3::Y);
        self
    }

    /// Sets the reference slope in degrees.
    pub fn with_slope(mut self, slope: f32) -> Self {
        self.slope = slope;
        self
    }

    /// Sets the slope-response curve.
    pub fn with_slope_curve(mut self, curve: ResponseCurve) -> Self {
        self.slope_curve = curve;
        self
    }

    /// Sets the accepted world-Y range.
    pub fn with_height_range(mut self, min_height: f32, max_height: f32) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self
    }

    /// Validates the zone, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.center.is_finite() {
            return Err(Error::InvalidConfig("zone center must be finite".into()));
        }
        if !self.size.is_finite() || self.size.x < 0.0 || self.size.z < 0.0 {
            return Err(Error::InvalidConfig(
                "zone size must be finite and >= 0 on X and Z".into(),
            ));
        }
        if self.min_height.is_nan() || self.max_height.is_nan() {
            return Err(Error::InvalidConfig("zone height bounds are NaN".into()));
        }
        if self.min_height > self.max_height {
            return Err(Error::InvalidConfig(
                "zone min_height must be <= max_height".into(),
            ));
        }
        self.slope_curve.validate()
    }

    /// Horizontal `(min, max)` corners as `Vec2(x, z)`.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let center = self.center_xz();
        let half = Vec2::new(self.size.x, self.size.z) * 0.5;
        (center - half, center + half)
    }

    #[inline]
    pub fn center_xz(&self) -> Vec2 {
        Vec2::new(self.center.x, self.center.z)
    }

    /// Horizontal extents as `Vec2(x, z)`.
    #[inline]
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.size.x, self.size.z)
    }

    /// Horizontal area of the zone.
    #[inline]
    pub fn area(&self) -> f32 {
        self.size.x * self.size.z
    }

    /// True when the zone covers no area and no point can be placed.
    pub fn is_degenerate(&self) -> bool {
        !(self.size.x.is_finite() && self.size.z.is_finite())
            || self.size.x <= 0.0
            || self.size.z <= 0.0
    }

    /// World Y that raw candidates start at before terrain snapping.
    #[inline]
    pub fn reference_height(&self) -> f32 {
        self.center.y + self.size.y
    }

    /// Inclusive horizontal containment test.
    pub fn contains_xz(&self, position: Vec2) -> bool {
        let (min, max) = self.bounds();
        position.x >= min.x && position.x <= max.x && position.y >= min.y && position.y <= max.y
    }

    #[inline]
    pub fn height_in_range(&self, y: f32) -> bool {
        y >= self.min_height && y <= self.max_height
    }

    /// Acceptance weight for a slope given in degrees.
    pub fn slope_weight(&self, slope_degrees: f32) -> f32 {
        self.slope_curve.evaluate(slope_degrees / 90.0)
    }

    /// True when the slope-response curve clears the acceptance floor.
    pub fn accepts_slope(&self, slope_degrees: f32) -> bool {
        self.slope_weight(slope_degrees) > SLOPE_ACCEPTANCE_FLOOR
    }

    /// Uniform random horizontal position inside the zone.
    pub fn random_point(&self, rng: &mut dyn RngCore) -> Vec2 {
        let (min, max) = self.bounds();
        Vec2::new(
            min.x + rand01(rng) * (max.x - min.x),
            min.y + rand01(rng) * (max.y - min.y),
        )
    }

    /// Square sub-zone of half-extent `radius` around `center`, inheriting the
    /// reference normal, slope, slope curve and height bounds.
    pub fn sub_zone(&self, center: Vec3, radius: f32) -> ScatterZone {
        let side = (radius * 2.0).max(0.0);
        ScatterZone {
            center,
            size: Vec3::new(side, self.size.y, side),
            normal: self.normal,
            slope: self.slope,
            slope_curve: self.slope_curve.clone(),
            min_height: self.min_height,
            max_height: self.max_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn default_zone_is_ten_by_ten() {
        let zone = ScatterZone::default();
        let (min, max) = zone.bounds();
        assert_eq!(min, Vec2::new(-5.0, -5.0));
        assert_eq!(max, Vec2::new(5.0, 5.0));
        assert_eq!(zone.area(), 100.0);
        assert!(zone.validate().is_ok());
    }

    #[test]
    fn validate_rejects_inverted_height_range() {
        let zone = ScatterZone::default().with_height_range(5.0, 1.0);
        assert!(matches!(zone.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_negative_extent() {
        let zone = ScatterZone::new(Vec3::ZERO, -1.0, 4.0);
        assert!(zone.validate().is_err());
    }

    #[test]
    fn zero_area_zone_is_degenerate() {
        assert!(ScatterZone::new(Vec3::ZERO, 0.0, 10.0).is_degenerate());
        assert!(!ScatterZone::default().is_degenerate());
    }

    #[test]
    fn random_points_stay_inside() {
        let zone = ScatterZone::new(Vec3::new(20.0, 0.0, -3.0), 4.0, 2.0);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            assert!(zone.contains_xz(zone.random_point(&mut rng)));
        }
    }

    #[test]
    fn steep_slopes_fall_below_floor() {
        let zone = ScatterZone::default();
        assert!(zone.accepts_slope(10.0));
        assert!(!zone.accepts_slope(90.0));
    }

    #[test]
    fn sub_zone_inherits_constraints() {
        let zone = ScatterZone::default()
            .with_height_range(-2.0, 2.0)
            .with_slope(12.0);
        let sub = zone.sub_zone(Vec3::new(1.0, 0.0, 1.0), 2.0);
        assert_eq!(sub.extent(), Vec2::new(4.0, 4.0));
        assert_eq!(sub.min_height, -2.0);
        assert_eq!(sub.slope, 12.0);
    }
}

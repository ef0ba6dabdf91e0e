//! Per-call generation settings.
use crate::curve::ResponseCurve;
use crate::error::{Error, Result};

/// Configuration shared by every sampler: scale, rotation, density and jitter.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterSettings {
    /// Smallest sampled scale.
    pub min_scale: f32,
    /// Largest sampled scale.
    pub max_scale: f32,
    /// Lower bound of the random heading in degrees.
    pub min_rotation: f32,
    /// Upper bound of the random heading in degrees.
    pub max_rotation: f32,
    /// Conform rotation to the terrain normal instead of rotating freely.
    pub align_to_normal: bool,
    /// Blend weight in `[0, 1]` of the random heading against the normal-derived one.
    pub random_rotation_weight: f32,
    /// Maps a uniform draw to a density weight.
    pub density_falloff: ResponseCurve,
    /// Positional jitter strength (world units).
    pub jitter: f32,
}

impl Default for ScatterSettings {
    fn default() -> Self {
        Self {
            min_scale: 0.8,
            max_scale: 1.2,
            min_rotation: 0.0,
            max_rotation: 360.0,
            align_to_normal: true,
            random_rotation_weight: 0.5,
            density_falloff: ResponseCurve::linear(1.0, 0.0),
            jitter: 0.5,
        }
    }
}

impl ScatterSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale_range(mut self, min_scale: f32, max_scale: f32) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }

    pub fn with_rotation_range(mut self, min_rotation: f32, max_rotation: f32) -> Self {
        self.min_rotation = min_rotation;
        self.max_rotation = max_rotation;
        self
    }

    pub fn with_align_to_normal(mut self, align: bool) -> Self {
        self.align_to_normal = align;
        self
    }

    pub fn with_random_rotation_weight(mut self, weight: f32) -> Self {
        self.random_rotation_weight = weight;
        self
    }

    pub fn with_density_falloff(mut self, curve: ResponseCurve) -> Self {
        self.density_falloff = curve;
        self
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }

    /// Validates the settings, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.min_scale.is_finite() || !self.max_scale.is_finite() {
            return Err(Error::InvalidConfig("scale range must be finite".into()));
        }
        if self.min_scale > self.max_scale {
            return Err(Error::InvalidConfig(
                "min_scale must be <= max_scale".into(),
            ));
        }
        if !self.min_rotation.is_finite() || !self.max_rotation.is_finite() {
            return Err(Error::InvalidConfig("rotation range must be finite".into()));
        }
        if self.min_rotation > self.max_rotation {
            return Err(Error::InvalidConfig(
                "min_rotation must be <= max_rotation".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.random_rotation_weight) {
            return Err(Error::InvalidConfig(
                "random_rotation_weight must be in [0, 1]".into(),
            ));
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(Error::InvalidConfig("jitter must be >= 0".into()));
        }
        self.density_falloff.validate()
    }
}

//! Piecewise-linear response curves over the unit interval.
//!
//! Zones use a curve to turn a normalized slope into an acceptance weight, and
//! settings use one to turn a uniform draw into a density weight.
use crate::error::{Error, Result};

/// A single curve key: `(t, value)` with `t` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveKey {
    pub t: f32,
    pub value: f32,
}

impl CurveKey {
    pub fn new(t: f32, value: f32) -> Self {
        Self { t, value }
    }
}

/// Piecewise-linear curve with keys sorted by `t`.
///
/// Evaluation clamps the input to `[0, 1]` and holds the first/last key value
/// outside the keyed range. An empty curve evaluates to `0.0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponseCurve {
    keys: Vec<CurveKey>,
}

impl ResponseCurve {
    /// Curve returning `value` everywhere.
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, value), CurveKey::new(1.0, value)],
        }
    }

    /// Straight line from `start` at `t = 0` to `end` at `t = 1`.
    pub fn linear(start: f32, end: f32) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, start), CurveKey::new(1.0, end)],
        }
    }

    /// Build a curve from arbitrary keys. Keys are sorted by `t`.
    ///
    /// Fails if any key lies outside `[0, 1]` or is not finite.
    pub fn from_keys(keys: impl IntoIterator<Item = (f32, f32)>) -> Result<Self> {
        let mut keys: Vec<CurveKey> = keys
            .into_iter()
            .map(|(t, value)| CurveKey::new(t, value))
            .collect();
        for key in &keys {
            if !key.t.is_finite() || !key.value.is_finite() {
                return Err(Error::InvalidConfig(
                    "curve keys must be finite".into(),
                ));
            }
            if !(0.0..=1.0).contains(&key.t) {
                return Err(Error::InvalidConfig(format!(
                    "curve key t={} outside [0, 1]",
                    key.t
                )));
            }
        }
        keys.sort_by(|a, b| a.t.total_cmp(&b.t));
        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Checks the curve domain. Used by zone/settings validation.
    pub fn validate(&self) -> Result<()> {
        for pair in self.keys.windows(2) {
            if pair[1].t < pair[0].t {
                return Err(Error::InvalidConfig("curve keys are not sorted".into()));
            }
        }
        if self
            .keys
            .iter()
            .any(|k| !(0.0..=1.0).contains(&k.t) || !k.value.is_finite())
        {
            return Err(Error::InvalidConfig(
                "curve keys must lie in [0, 1] with finite values".into(),
            ));
        }
        Ok(())
    }

    /// Evaluate the curve at `t`, clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if t <= first.t {
            return first.value;
        }
        if t >= last.t {
            return last.value;
        }

        let upper = self.keys.partition_point(|k| k.t <= t);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];
        let span = b.t - a.t;
        if span <= f32::EPSILON {
            return b.value;
        }
        let u = (t - a.t) / span;
        a.value + (b.value - a.value) * u
    }
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self::linear(1.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_curve_is_flat() {
        let c = ResponseCurve::constant(0.4);
        assert_eq!(c.evaluate(0.0), 0.4);
        assert_eq!(c.evaluate(0.7), 0.4);
        assert_eq!(c.evaluate(1.0), 0.4);
    }

    #[test]
    fn linear_curve_interpolates_and_clamps() {
        let c = ResponseCurve::linear(1.0, 0.0);
        assert!((c.evaluate(0.25) - 0.75).abs() < 1e-6);
        assert_eq!(c.evaluate(-3.0), 1.0);
        assert_eq!(c.evaluate(5.0), 0.0);
        assert_eq!(c.evaluate(f32::NAN), 1.0);
    }

    #[test]
    fn from_keys_sorts_and_holds_ends() {
        let c = ResponseCurve::from_keys([(0.8, 0.0), (0.2, 1.0), (0.5, 0.5)]).unwrap();
        assert_eq!(c.keys()[0].t, 0.2);
        assert_eq!(c.evaluate(0.1), 1.0);
        assert!((c.evaluate(0.35) - 0.75).abs() < 1e-6);
        assert_eq!(c.evaluate(0.9), 0.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn from_keys_rejects_out_of_domain() {
        assert!(ResponseCurve::from_keys([(1.5, 0.0)]).is_err());
        assert!(ResponseCurve::from_keys([(0.5, f32::INFINITY)]).is_err());
    }

    #[test]
    fn empty_curve_evaluates_to_zero() {
        let c = ResponseCurve::from_keys(Vec::new()).unwrap();
        assert_eq!(c.evaluate(0.5), 0.0);
    }
}

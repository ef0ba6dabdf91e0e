//! Distribution analysis: multi-scale Ripley's K clustering index.
//!
//! The index averages `K(r) / (π r²)` over five radii (10–50% of the largest
//! pairwise distance). Complete spatial randomness scores about 1, clustered
//! sets score above 1, and inhibited sets such as Poisson-disk output score
//! below 1. Distances are horizontal.
use std::f32::consts::PI;

use glam::Vec2;

use crate::point::ScatterPoint;

/// Radii as fractions of the maximum pairwise distance.
pub const RADIUS_FRACTIONS: [f32; 5] = [0.1, 0.2, 0.3, 0.4, 0.5];

/// Per-radius statistics and the combined index.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistributionReport {
    /// Mean of `k_values[i] / (π radii[i]²)`; 0 for degenerate input.
    pub index: f32,
    pub radii: [f32; 5],
    /// Raw Ripley's K at each radius.
    pub k_values: [f32; 5],
}

/// Clustering index of a finished point set.
pub fn clustering_index(points: &[ScatterPoint]) -> f32 {
    analyze(points).index
}

/// Full report for a finished point set.
pub fn analyze(points: &[ScatterPoint]) -> DistributionReport {
    let positions: Vec<Vec2> = points.iter().map(ScatterPoint::xz).collect();
    analyze_positions(&positions)
}

/// Full report for raw horizontal positions.
pub fn analyze_positions(positions: &[Vec2]) -> DistributionReport {
    if positions.len() < 2 || bounding_area(positions) <= 0.0 {
        return DistributionReport::default();
    }

    let max_distance = max_pairwise_distance(positions);
    let mut report = DistributionReport::default();
    let mut sum = 0.0;
    for (i, fraction) in RADIUS_FRACTIONS.iter().enumerate() {
        let r = max_distance * fraction;
        let k = ripley_k(positions, r);
        report.radii[i] = r;
        report.k_values[i] = k;
        if r > 0.0 {
            sum += k / (PI * r * r);
        }
    }
    report.index = sum / RADIUS_FRACTIONS.len() as f32;
    report
}

/// Ripley's K at `radius` with translation edge correction.
///
/// The window is the bounding box `W × H` of the positions. Each pair within
/// `radius` is weighted by `W·H / ((W - |dx|)(H - |dz|))`, compensating for
/// neighbourhoods cut off by the window edge, and the sum is scaled by
/// `area / (n (n - 1))`. Pairs spanning the whole window carry no weight.
pub fn ripley_k(positions: &[Vec2], radius: f32) -> f32 {
    let n = positions.len();
    let Some((min, max)) = bounds(positions) else {
        return 0.0;
    };
    let size = max - min;
    let area = size.x * size.y;
    if n < 2 || area <= 0.0 {
        return 0.0;
    }

    let r2 = radius * radius;
    let min_overlap = area * 1e-6;
    let mut weighted = 0.0f64;
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            if a.distance_squared(*b) > r2 {
                continue;
            }
            let d = (*a - *b).abs();
            let overlap = (size.x - d.x) * (size.y - d.y);
            if overlap > min_overlap {
                weighted += 2.0 * f64::from(area / overlap);
            }
        }
    }

    (f64::from(area) * weighted / (n as f64 * (n - 1) as f64)) as f32
}

fn bounds(positions: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = positions.first()?;
    Some(
        positions
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p))),
    )
}

fn bounding_area(positions: &[Vec2]) -> f32 {
    bounds(positions).map_or(0.0, |(min, max)| {
        let size = max - min;
        size.x * size.y
    })
}

fn max_pairwise_distance(positions: &[Vec2]) -> f32 {
    let mut best = 0.0f32;
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            best = best.max(a.distance_squared(*b));
        }
    }
    best.sqrt()
}

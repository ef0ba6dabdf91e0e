//! Diffusion-limited aggregation sampler.
//!
//! A seed anchors a sparse occupancy set of grid cells. Random walkers spawn
//! inside the zone and take unit random-angle steps until one of the 3×3
//! cells around them is occupied; then they stick and become points. The
//! result is a connected, dendritic cluster.
use std::collections::HashSet;

use glam::{IVec2, Vec2};
use rand::RngCore;
use tracing::{debug, warn};

use crate::finalize::PointFinalizer;
use crate::point::ScatterPoint;
use crate::sampling::{random_angle, ScatterSampling};

/// Walker attempts allowed per requested particle.
pub const ATTEMPTS_PER_PARTICLE: usize = 100;

/// Diffusion-limited aggregation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DlaSampling {
    /// Number of points to produce, seed included.
    pub particle_count: usize,
    /// Occupancy cell size in world units.
    pub cell_size: f32,
    /// Walker step length in world units.
    pub step_length: f32,
    /// Steps a single walker may take before it is abandoned.
    pub max_walk_steps: usize,
}

impl DlaSampling {
    pub fn new(particle_count: usize) -> Self {
        Self {
            particle_count,
            cell_size: 1.0,
            step_length: 1.0,
            max_walk_steps: 10_000,
        }
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_step_length(mut self, step_length: f32) -> Self {
        self.step_length = step_length;
        self
    }

    pub fn with_max_walk_steps(mut self, steps: usize) -> Self {
        self.max_walk_steps = steps;
        self
    }

    /// Occupancy cell containing a horizontal position.
    #[inline]
    pub fn cell_of(&self, position: Vec2) -> IVec2 {
        IVec2::new(
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    fn touches_occupied(&self, occupied: &HashSet<IVec2>, cell: IVec2) -> bool {
        (-1..=1).any(|dz| (-1..=1).any(|dx| occupied.contains(&(cell + IVec2::new(dx, dz)))))
    }
}

impl ScatterSampling for DlaSampling {
    fn generate(
        &self,
        finalizer: &PointFinalizer<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<ScatterPoint> {
        let zone = finalizer.zone();
        if self.particle_count == 0 {
            return Vec::new();
        }
        if zone.is_degenerate() {
            warn!("DLA on a zero-area zone; nothing to place.");
            return Vec::new();
        }
        if self.cell_size.is_nan() || self.cell_size <= 0.0 || self.step_length.is_nan() || self.step_length <= 0.0 {
            warn!(
                "DLA cell size and step length must be > 0 (got {}, {}).",
                self.cell_size, self.step_length
            );
            return Vec::new();
        }

        let mut points = Vec::with_capacity(self.particle_count);
        let mut occupied: HashSet<IVec2> = HashSet::new();

        // The seed always anchors the structure, even if it is not placeable.
        let seed = zone.center_xz();
        occupied.insert(self.cell_of(seed));
        if let Some(point) = finalizer.try_place(seed, rng) {
            points.push(point);
        }

        let max_attempts = self.particle_count.saturating_mul(ATTEMPTS_PER_PARTICLE);
        let mut attempts = 0usize;
        while points.len() < self.particle_count && attempts < max_attempts {
            attempts += 1;

            let mut walker = zone.random_point(rng);
            if occupied.contains(&self.cell_of(walker)) {
                continue;
            }

            let mut stuck = false;
            for _ in 0..self.max_walk_steps {
                if self.touches_occupied(&occupied, self.cell_of(walker)) {
                    stuck = true;
                    break;
                }
                let angle = random_angle(rng);
                walker += Vec2::new(angle.cos(), angle.sin()) * self.step_length;
                if !zone.contains_xz(walker) {
                    break;
                }
            }
            if !stuck {
                continue;
            }

            let cell = self.cell_of(walker);
            if occupied.contains(&cell) {
                continue;
            }
            if let Some(point) = finalizer.try_place(walker, rng) {
                occupied.insert(cell);
                points.push(point);
            }
        }

        debug!(
            "DLA produced {} of {} points in {} walker attempts.",
            points.len(),
            self.particle_count,
            attempts
        );
        points
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::settings::ScatterSettings;
    use crate::terrain::NoTerrain;
    use crate::zone::ScatterZone;

    #[test]
    fn every_point_attaches_to_an_earlier_cell() {
        let zone = ScatterZone::new(Vec3::ZERO, 20.0, 20.0);
        let settings = ScatterSettings::default();
        let f = PointFinalizer::new(&zone, &settings, &NoTerrain);
        let mut rng = StdRng::seed_from_u64(17);
        let dla = DlaSampling::new(40);

        let pts = dla.generate(&f, &mut rng);
        assert!(!pts.is_empty());
        assert!(pts.len() <= 40);

        let seed_cell = dla.cell_of(zone.center_xz());
        let mut seen = vec![seed_cell];
        for p in pts.iter().skip(1) {
            let cell = dla.cell_of(p.xz());
            let adjacent = seen.iter().any(|c| {
                let d = (*c - cell).abs();
                d.x <= 1 && d.y <= 1
            });
            assert!(adjacent, "cell {cell:?} is detached");
            seen.push(cell);
        }
    }

    #[test]
    fn zero_particles_is_empty() {
        let zone = ScatterZone::default();
        let settings = ScatterSettings::default();
        let f = PointFinalizer::new(&zone, &settings, &NoTerrain);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(DlaSampling::new(0).generate(&f, &mut rng).is_empty());
    }

    #[test]
    fn points_stay_in_zone() {
        let zone = ScatterZone::new(Vec3::new(5.0, 0.0, 5.0), 8.0, 8.0);
        let settings = ScatterSettings::default();
        let f = PointFinalizer::new(&zone, &settings, &NoTerrain);
        let mut rng = StdRng::seed_from_u64(2);
        for p in DlaSampling::new(25).generate(&f, &mut rng) {
            assert!(zone.contains_xz(p.xz()));
        }
    }

    #[test]
    fn occupied_cells_are_unique() {
        let zone = ScatterZone::new(Vec3::ZERO, 12.0, 12.0);
        let settings = ScatterSettings::default();
        let f = PointFinalizer::new(&zone, &settings, &NoTerrain);
        let mut rng = StdRng::seed_from_u64(6);
        let dla = DlaSampling::new(30);
        let pts = dla.generate(&f, &mut rng);
        let cells: HashSet<IVec2> = pts.iter().map(|p| dla.cell_of(p.xz())).collect();
        assert_eq!(cells.len(), pts.len());
    }
}

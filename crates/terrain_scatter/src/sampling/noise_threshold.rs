//! Layered-noise threshold sampling for dense fields (flowers, grass tufts).
//!
//! Every grid cell is jittered, the octave-summed Perlin value at that spot is
//! normalized to `[0, 1]`, and cells reaching `threshold` become candidates.
//! Columns are independent, so they are split across scoped worker threads;
//! each worker accumulates its own batch and sends it once over a channel.
use std::thread;

use crossbeam_channel::unbounded;
use glam::Vec2;
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, warn};

use crate::finalize::PointFinalizer;
use crate::point::ScatterPoint;
use crate::sampling::{rand01, seed_for_column, ScatterSampling};

/// Octave-summed Perlin noise thresholded per grid cell.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoiseThresholdSampling {
    /// Grid spacing in world units.
    pub cell_size: f32,
    /// Base noise frequency (cycles per world unit).
    pub frequency: f32,
    /// Number of noise layers.
    pub octaves: u32,
    /// Amplitude multiplier per octave.
    pub persistence: f32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Normalized noise value a cell must reach, in `[0, 1]`.
    pub threshold: f32,
    /// Worker threads; `1` runs on the calling thread.
    pub workers: usize,
}

impl Default for NoiseThresholdSampling {
    fn default() -> Self {
        Self {
            cell_size: 0.5,
            frequency: 0.15,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            threshold: 0.55,
            workers: thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl NoiseThresholdSampling {
    pub fn new(cell_size: f32, threshold: f32) -> Self {
        Self {
            cell_size,
            threshold,
            ..Default::default()
        }
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    pub fn with_persistence(mut self, persistence: f32) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn with_lacunarity(mut self, lacunarity: f32) -> Self {
        self.lacunarity = lacunarity;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Layered noise at `position`, normalized to `[0, 1]`.
    pub fn layered_value(&self, noise: &Perlin, position: Vec2) -> f32 {
        let mut amplitude = 1.0f64;
        let mut frequency = self.frequency as f64;
        let mut sum = 0.0f64;
        let mut norm = 0.0f64;
        for _ in 0..self.octaves.max(1) {
            let p = [position.x as f64 * frequency, position.y as f64 * frequency];
            sum += amplitude * noise.get(p);
            norm += amplitude;
            amplitude *= self.persistence as f64;
            frequency *= self.lacunarity as f64;
        }
        if norm <= 0.0 {
            return 0.5;
        }
        (((sum / norm) + 1.0) * 0.5).clamp(0.0, 1.0) as f32
    }

    fn sample_column(
        &self,
        finalizer: &PointFinalizer<'_>,
        noise: &Perlin,
        column: u32,
        rows: u32,
        rng: &mut dyn RngCore,
    ) -> Vec<ScatterPoint> {
        let zone = finalizer.zone();
        let (min, _) = zone.bounds();
        let jitter = finalizer.settings().jitter;
        let mut out = Vec::new();
        for row in 0..rows {
            let cell_center =
                min + (Vec2::new(column as f32, row as f32) + 0.5) * self.cell_size;
            let offset = Vec2::new(rand01(rng) - 0.5, rand01(rng) - 0.5) * jitter;
            let position = cell_center + offset;
            if self.layered_value(noise, position) < self.threshold {
                continue;
            }
            if let Some(point) = finalizer.try_place(position, rng) {
                out.push(point);
            }
        }
        out
    }
}

impl ScatterSampling for NoiseThresholdSampling {
    fn generate(
        &self,
        finalizer: &PointFinalizer<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<ScatterPoint> {
        let zone = finalizer.zone();
        if zone.is_degenerate() {
            warn!("Noise threshold sampling on a zero-area zone; nothing to place.");
            return Vec::new();
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            warn!("Noise cell size must be > 0 (got {}).", self.cell_size);
            return Vec::new();
        }

        let extent = zone.extent();
        let columns = (extent.x / self.cell_size).ceil() as u32;
        let rows = (extent.y / self.cell_size).ceil() as u32;
        if columns == 0 || rows == 0 {
            return Vec::new();
        }

        let noise = Perlin::new(rng.next_u32());
        let base_seed = rng.next_u64();
        let workers = self.workers.clamp(1, columns as usize);

        let mut batches: Vec<(u32, Vec<ScatterPoint>)> = if workers == 1 {
            (0..columns)
                .map(|column| {
                    let mut col_rng = StdRng::seed_from_u64(seed_for_column(base_seed, column));
                    let pts = self.sample_column(finalizer, &noise, column, rows, &mut col_rng);
                    (column, pts)
                })
                .collect()
        } else {
            let (tx, rx) = unbounded::<Vec<(u32, Vec<ScatterPoint>)>>();
            let noise = &noise;
            thread::scope(|scope| {
                for worker in 0..workers {
                    let tx = tx.clone();
                    scope.spawn(move || {
                        let mut local = Vec::new();
                        for column in (worker as u32..columns).step_by(workers) {
                            let mut col_rng =
                                StdRng::seed_from_u64(seed_for_column(base_seed, column));
                            let pts =
                                self.sample_column(finalizer, noise, column, rows, &mut col_rng);
                            local.push((column, pts));
                        }
                        // The receiver outlives the scope; a send cannot fail here.
                        let _ = tx.send(local);
                    });
                }
            });
            drop(tx);
            rx.iter().flatten().collect()
        };

        batches.sort_by_key(|(column, _)| *column);
        let points: Vec<ScatterPoint> = batches.into_iter().flat_map(|(_, pts)| pts).collect();
        debug!(
            "Noise threshold: {columns}x{rows} cells on {workers} worker(s), {} points.",
            points.len()
        );
        points
    }
}

//! Edge-constrained Wang-tile synthesis.
//!
//! A coarse grid over the zone is filled row by row (row 0 at the zone's
//! minimum Z, each row left to right). A tile is eligible for a cell when its
//! north code matches the south code of the cell above and its west code
//! matches the east code of the cell to the left. Each placed tile then seeds
//! points in its footprint with one Bernoulli trial per density value.
use glam::{Vec2, Vec3};
use rand::RngCore;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::finalize::PointFinalizer;
use crate::point::ScatterPoint;
use crate::sampling::{rand01, ScatterSampling};

/// Default tile footprint edge in world units.
pub const DEFAULT_TILE_SIZE: f32 = 10.0;

/// Constraint one already-placed neighbor imposes on an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeConstraint {
    /// No neighbor on that side yet.
    #[default]
    Unconstrained,
    /// The edge code must equal this value.
    Must(u32),
}

impl EdgeConstraint {
    #[inline]
    pub fn admits(self, code: u32) -> bool {
        match self {
            EdgeConstraint::Unconstrained => true,
            EdgeConstraint::Must(required) => required == code,
        }
    }
}

/// One synthesis unit: four edge codes plus parallel height/density samples.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WangTile {
    pub north: u32,
    pub east: u32,
    pub south: u32,
    pub west: u32,
    /// Height offsets (world units above the zone reference height).
    pub heights: Vec<f32>,
    /// Placement probability per sample, in `[0, 1]`.
    pub densities: Vec<f32>,
}

impl WangTile {
    /// Creates a tile from `[north, east, south, west]` codes and samples.
    pub fn new(edges: [u32; 4], heights: Vec<f32>, densities: Vec<f32>) -> Self {
        let [north, east, south, west] = edges;
        Self {
            north,
            east,
            south,
            west,
            heights,
            densities,
        }
    }

    #[inline]
    pub fn fits(&self, north: EdgeConstraint, west: EdgeConstraint) -> bool {
        north.admits(self.north) && west.admits(self.west)
    }
}

/// Validated tile catalog.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSet {
    tiles: Vec<WangTile>,
}

impl TileSet {
    /// Builds a catalog, rejecting empty sets and malformed sample arrays.
    pub fn new(tiles: Vec<WangTile>) -> Result<Self> {
        if tiles.is_empty() {
            return Err(Error::InvalidTileSet("tile set is empty".into()));
        }
        for (i, tile) in tiles.iter().enumerate() {
            if tile.heights.is_empty() || tile.heights.len() != tile.densities.len() {
                return Err(Error::InvalidTileSet(format!(
                    "tile {i}: heights and densities must be non-empty and equally long"
                )));
            }
            if tile.densities.iter().any(|d| !(0.0..=1.0).contains(d)) {
                return Err(Error::InvalidTileSet(format!(
                    "tile {i}: densities must lie in [0, 1]"
                )));
            }
            if tile.heights.iter().any(|h| !h.is_finite()) {
                return Err(Error::InvalidTileSet(format!(
                    "tile {i}: heights must be finite"
                )));
            }
        }
        Ok(Self { tiles })
    }

    /// Four-tile catalog with binary edge codes. Every `(north, west)` pair has
    /// exactly one matching tile, so synthesis never dead-ends.
    pub fn reference() -> Self {
        Self {
            tiles: vec![
                WangTile::new([0, 0, 1, 0], vec![0.0, 0.1, 0.2, 0.1], vec![0.9, 0.6, 0.6, 0.3]),
                WangTile::new([0, 1, 0, 1], vec![0.3, 0.5, 0.4, 0.2], vec![0.4, 0.8, 0.5, 0.5]),
                WangTile::new([1, 1, 1, 0], vec![0.6, 0.4, 0.5, 0.7], vec![0.2, 0.3, 0.7, 0.9]),
                WangTile::new([1, 0, 0, 1], vec![0.2, 0.0, 0.3, 0.1], vec![0.7, 0.4, 0.2, 0.6]),
            ],
        }
    }

    /// Eight-tile binary catalog with two tiles per `(north, west)` pair, so
    /// interior cells still choose between variants. Never dead-ends.
    pub fn two_color() -> Self {
        let mut tiles = Vec::with_capacity(8);
        for north in 0..2u32 {
            for west in 0..2u32 {
                for variant in 0..2u32 {
                    let east = (north + variant) % 2;
                    let south = (west + variant) % 2;
                    let (heights, densities) = match variant {
                        0 => (vec![0.0, 0.2, 0.4, 0.6], vec![0.9, 0.8, 0.9, 0.7]),
                        _ => (vec![0.1, 0.3, 0.3, 0.1], vec![0.3, 0.2, 0.4, 0.3]),
                    };
                    tiles.push(WangTile::new([north, east, south, west], heights, densities));
                }
            }
        }
        Self { tiles }
    }

    #[inline]
    pub fn tiles(&self) -> &[WangTile] {
        &self.tiles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&WangTile> {
        self.tiles.get(index)
    }

    /// Indices of tiles admitted by both constraints.
    pub fn compatible(&self, north: EdgeConstraint, west: EdgeConstraint) -> Vec<usize> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.fits(north, west))
            .map(|(i, _)| i)
            .collect()
    }
}

impl Default for TileSet {
    fn default() -> Self {
        Self::reference()
    }
}

/// Chosen tile index per cell, row-major. `None` marks cells left empty after a dead end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    pub columns: usize,
    pub rows: usize,
    cells: Vec<Option<usize>>,
}

impl TileGrid {
    fn empty(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![None; columns * rows],
        }
    }

    #[inline]
    pub fn get(&self, column: usize, row: usize) -> Option<usize> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells[row * self.columns + column]
    }

    /// True when every cell received a tile.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// Wang-tile synthesis sampler.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WangTileSampling {
    pub tile_set: TileSet,
    /// Nominal tile edge used to size the grid.
    pub tile_size: f32,
}

impl Default for WangTileSampling {
    fn default() -> Self {
        Self {
            tile_set: TileSet::reference(),
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl WangTileSampling {
    pub fn new(tile_set: TileSet) -> Self {
        Self {
            tile_set,
            ..Default::default()
        }
    }

    pub fn with_tile_size(mut self, tile_size: f32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Cells per side for a zone with the given extent.
    pub fn grid_cells_per_side(&self, extent: Vec2) -> usize {
        if self.tile_size <= 0.0 || !self.tile_size.is_finite() {
            return 0;
        }
        (extent.x.max(extent.y) / self.tile_size).ceil().max(0.0) as usize
    }

    /// Fills a `columns × rows` grid with edge-compatible tiles.
    pub fn synthesize_tiles(&self, columns: usize, rows: usize, rng: &mut dyn RngCore) -> TileGrid {
        let mut grid = TileGrid::empty(columns, rows);
        for row in 0..rows {
            for column in 0..columns {
                let north = match row {
                    0 => EdgeConstraint::Unconstrained,
                    _ => self.placed_code(&grid, column, row - 1, |t| t.south),
                };
                let west = match column {
                    0 => EdgeConstraint::Unconstrained,
                    _ => self.placed_code(&grid, column - 1, row, |t| t.east),
                };

                let candidates = self.tile_set.compatible(north, west);
                if candidates.is_empty() {
                    warn!(
                        "No compatible Wang tile at ({column}, {row}); stopping synthesis."
                    );
                    return grid;
                }
                let pick = ((rand01(rng) * candidates.len() as f32) as usize)
                    .min(candidates.len() - 1);
                grid.cells[row * columns + column] = Some(candidates[pick]);
            }
        }
        grid
    }

    fn placed_code(
        &self,
        grid: &TileGrid,
        column: usize,
        row: usize,
        edge: impl Fn(&WangTile) -> u32,
    ) -> EdgeConstraint {
        grid.get(column, row)
            .and_then(|i| self.tile_set.get(i))
            .map_or(EdgeConstraint::Unconstrained, |t| EdgeConstraint::Must(edge(t)))
    }
}

impl ScatterSampling for WangTileSampling {
    fn generate(
        &self,
        finalizer: &PointFinalizer<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<ScatterPoint> {
        let zone = finalizer.zone();
        if zone.is_degenerate() {
            warn!("Wang tile synthesis on a zero-area zone; nothing to place.");
            return Vec::new();
        }
        let n = self.grid_cells_per_side(zone.extent());
        if n == 0 {
            return Vec::new();
        }

        let tiles = self.synthesize_tiles(n, n, rng);
        let (min, _) = zone.bounds();
        let footprint = zone.extent() / n as f32;
        let jitter = finalizer.settings().jitter;

        let mut points = Vec::new();
        for row in 0..n {
            for column in 0..n {
                let Some(tile) = tiles.get(column, row).and_then(|i| self.tile_set.get(i)) else {
                    continue;
                };
                let origin = min + Vec2::new(column as f32, row as f32) * footprint;
                for (height, density) in tile.heights.iter().zip(&tile.densities) {
                    if rand01(rng) >= *density {
                        continue;
                    }
                    let xz = origin + Vec2::new(rand01(rng), rand01(rng)) * footprint;
                    let y = zone.reference_height() + height + (rand01(rng) - 0.5) * jitter;
                    if let Some(point) = finalizer.try_place_at(Vec3::new(xz.x, y, xz.y), rng) {
                        points.push(point);
                    }
                }
            }
        }

        debug!(
            "Wang tiles: {n}x{n} grid, {} points seeded.",
            points.len()
        );
        points
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::settings::ScatterSettings;
    use crate::terrain::NoTerrain;
    use crate::zone::ScatterZone;

    fn assert_edges_consistent(sampler: &WangTileSampling, grid: &TileGrid) {
        let set = &sampler.tile_set;
        for row in 0..grid.rows {
            for column in 0..grid.columns {
                let tile = set.get(grid.get(column, row).unwrap()).unwrap();
                if row > 0 {
                    let above = set.get(grid.get(column, row - 1).unwrap()).unwrap();
                    assert_eq!(tile.north, above.south, "north mismatch at ({column}, {row})");
                }
                if column > 0 {
                    let left = set.get(grid.get(column - 1, row).unwrap()).unwrap();
                    assert_eq!(tile.west, left.east, "west mismatch at ({column}, {row})");
                }
            }
        }
    }

    #[test]
    fn constraint_admits() {
        assert!(EdgeConstraint::Unconstrained.admits(7));
        assert!(EdgeConstraint::Must(2).admits(2));
        assert!(!EdgeConstraint::Must(2).admits(3));
    }

    #[test]
    fn reference_set_fills_grid_with_matching_edges() {
        let sampler = WangTileSampling::default();
        let mut rng = StdRng::seed_from_u64(31);
        let grid = sampler.synthesize_tiles(6, 5, &mut rng);
        assert!(grid.is_complete());
        assert_edges_consistent(&sampler, &grid);
    }

    #[test]
    fn two_color_catalog_varies_interior_cells() {
        let sampler = WangTileSampling::new(TileSet::two_color());
        for north in 0..2 {
            for west in 0..2 {
                let fits = sampler
                    .tile_set
                    .compatible(EdgeConstraint::Must(north), EdgeConstraint::Must(west));
                assert_eq!(fits.len(), 2);
            }
        }

        let mut rng = StdRng::seed_from_u64(21);
        let grid = sampler.synthesize_tiles(10, 10, &mut rng);
        assert!(grid.is_complete());
        assert_edges_consistent(&sampler, &grid);

        // Interior cells are constrained on both sides yet still draw both variants.
        let variants: std::collections::HashSet<usize> = (1..grid.rows)
            .flat_map(|row| (1..grid.columns).map(move |column| (column, row)))
            .filter_map(|(column, row)| grid.get(column, row))
            .map(|tile| tile % 2)
            .collect();
        assert_eq!(variants.len(), 2);
    }

    #[test]
    fn larger_catalog_keeps_edges_consistent() {
        let samples = || (vec![0.0], vec![0.5]);
        let mut tiles = Vec::new();
        for n in 0..3u32 {
            for w in 0..3u32 {
                let (h, d) = samples();
                tiles.push(WangTile::new([n, (n + w) % 3, (n * 2 + w) % 3, w], h, d));
            }
        }
        let sampler = WangTileSampling::new(TileSet::new(tiles).unwrap());
        let mut rng = StdRng::seed_from_u64(8);
        let grid = sampler.synthesize_tiles(8, 8, &mut rng);
        assert!(grid.is_complete());
        assert_edges_consistent(&sampler, &grid);
    }

    #[test]
    fn dead_end_leaves_remaining_cells_empty() {
        // The only tile requires west = 1 but emits east = 0.
        let set = TileSet::new(vec![WangTile::new([0, 0, 0, 1], vec![0.0], vec![1.0])]).unwrap();
        let sampler = WangTileSampling::new(set);
        let mut rng = StdRng::seed_from_u64(1);
        let grid = sampler.synthesize_tiles(3, 2, &mut rng);
        assert_eq!(grid.get(0, 0), Some(0));
        assert_eq!(grid.get(1, 0), None);
        assert!(!grid.is_complete());
    }

    #[test]
    fn tile_set_validation() {
        assert!(TileSet::new(Vec::new()).is_err());
        assert!(TileSet::new(vec![WangTile::new([0; 4], vec![0.0], vec![])]).is_err());
        assert!(TileSet::new(vec![WangTile::new([0; 4], vec![0.0], vec![1.5])]).is_err());
    }

    #[test]
    fn grid_size_follows_largest_extent() {
        let sampler = WangTileSampling::default();
        assert_eq!(sampler.grid_cells_per_side(Vec2::new(25.0, 8.0)), 3);
        assert_eq!(sampler.grid_cells_per_side(Vec2::new(10.0, 10.0)), 1);
    }

    #[test]
    fn seeded_points_stay_in_zone() {
        let zone = ScatterZone::new(Vec3::ZERO, 30.0, 20.0).with_height_range(-1.0, 1.0);
        let settings = ScatterSettings::default();
        let f = PointFinalizer::new(&zone, &settings, &NoTerrain);
        let mut rng = StdRng::seed_from_u64(12);

        let pts = WangTileSampling::default().generate(&f, &mut rng);
        assert!(!pts.is_empty());
        for p in &pts {
            assert!(zone.contains_xz(p.xz()));
            assert!(zone.height_in_range(p.position.y));
        }
    }
}

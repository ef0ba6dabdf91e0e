#![forbid(unsafe_code)]
//! terrain_scatter: terrain-aware procedural point scattering.
//!
//! Modules:
//! - zone, settings, curve: where points may go and how they are scaled, rotated and weighted
//! - terrain: the ray-query seam to a host's terrain, plus flat and height-field implementations
//! - finalize: terrain probe, zone constraints and per-point attributes shared by every sampler
//! - sampling: Poisson disk, blue noise, DLA growth, Wang tiles, noise threshold, clusters
//! - optimize: de-overlap and gap-fill toward a target density
//! - analysis: multi-scale Ripley's K clustering index
//! - scatter: requests, runner, events and background jobs
//!
//! For examples and docs, see README and docs.rs.
pub mod analysis;
pub mod curve;
pub mod error;
pub mod finalize;
pub mod grid;
pub mod optimize;
pub mod point;
pub mod sampling;
pub mod scatter;
pub mod settings;
pub mod terrain;
pub mod zone;

/// Convenient re-exports for common types. Import with `use terrain_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::analysis::{analyze, clustering_index, DistributionReport};
    pub use crate::curve::{CurveKey, ResponseCurve};
    pub use crate::error::{Error, Result};
    pub use crate::finalize::{PointFinalizer, SurfaceSample};
    pub use crate::grid::SpatialGrid;
    pub use crate::optimize::{Optimized, Optimizer};
    pub use crate::point::ScatterPoint;
    pub use crate::sampling::{
        seed_for_column, BlueNoiseSampling, Cluster, ClusterPattern, ClusteredSampling,
        ClusteredScatter, DlaSampling, EdgeConstraint, FrontierSeed, GrowthLimits,
        NoiseThresholdSampling, PoissonDiskSampling, ScatterSampling, TileGrid, TileSet, WangTile,
        WangTileSampling,
    };
    pub use crate::scatter::events::{
        EventSink, FnSink, MultiSink, ScatterEvent, ScatterEventKind, ScatterSummary, VecSink,
    };
    pub use crate::scatter::plan::{ScatterMethod, ScatterRequest};
    pub use crate::scatter::runner::{
        run_scatter, run_scatter_with_events, ScatterEngine, ScatterResult,
    };
    pub use crate::scatter::task::{spawn_generation, ChannelSink, GenerationTask, ScatterJob};
    pub use crate::settings::ScatterSettings;
    pub use crate::terrain::{FlatTerrain, HeightFieldTerrain, NoTerrain, TerrainHit, TerrainQuery};
    pub use crate::zone::ScatterZone;
}

//! High-level entry points: run one request against a zone and terrain.
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::analysis::{analyze, DistributionReport};
use crate::error::Result;
use crate::finalize::PointFinalizer;
use crate::point::ScatterPoint;
use crate::scatter::events::{EventSink, ScatterEvent, ScatterEventKind, ScatterSummary};
use crate::scatter::plan::ScatterRequest;
use crate::settings::ScatterSettings;
use crate::terrain::TerrainQuery;
use crate::zone::ScatterZone;

/// Result of running a scatter request.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct ScatterResult {
    /// Final points.
    pub points: Vec<ScatterPoint>,
    /// Points the sampler produced before optimization.
    pub generated: usize,
    /// Points dropped by the de-overlap pass.
    pub overlaps_removed: usize,
    /// Points added by the gap-fill pass.
    pub gaps_filled: usize,
}

impl ScatterResult {
    pub fn summary(&self) -> ScatterSummary {
        ScatterSummary {
            points: self.points.len(),
            generated: self.generated,
            overlaps_removed: self.overlaps_removed,
            gaps_filled: self.gaps_filled,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Zone, settings and terrain bundled for repeated runs.
pub struct ScatterEngine<'a> {
    pub zone: ScatterZone,
    pub settings: ScatterSettings,
    terrain: &'a dyn TerrainQuery,
}

impl<'a> ScatterEngine<'a> {
    /// Validates zone and settings before building the engine.
    pub fn try_new(
        zone: ScatterZone,
        settings: ScatterSettings,
        terrain: &'a dyn TerrainQuery,
    ) -> Result<Self> {
        zone.validate()?;
        settings.validate()?;
        Ok(Self {
            zone,
            settings,
            terrain,
        })
    }

    pub fn new(zone: ScatterZone, settings: ScatterSettings, terrain: &'a dyn TerrainQuery) -> Self {
        debug_assert!(zone.validate().is_ok(), "invalid scatter zone");
        debug_assert!(settings.validate().is_ok(), "invalid scatter settings");

        Self {
            zone,
            settings,
            terrain,
        }
    }

    pub fn terrain(&self) -> &'a dyn TerrainQuery {
        self.terrain
    }

    pub fn finalizer(&self) -> PointFinalizer<'_> {
        PointFinalizer::new(&self.zone, &self.settings, self.terrain)
    }

    pub fn run(&self, request: &ScatterRequest, rng: &mut dyn RngCore) -> ScatterResult {
        run_scatter(
            request,
            &self.zone,
            &self.settings,
            self.terrain,
            rng,
            None,
        )
    }

    pub fn run_with_events(
        &self,
        request: &ScatterRequest,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> ScatterResult {
        run_scatter_with_events(
            request,
            &self.zone,
            &self.settings,
            self.terrain,
            rng,
            sink,
        )
    }

    /// Clustering report for a point set produced by this engine.
    pub fn analyze(&self, points: &[ScatterPoint]) -> DistributionReport {
        analyze(points)
    }
}

pub fn run_scatter(
    request: &ScatterRequest,
    zone: &ScatterZone,
    settings: &ScatterSettings,
    terrain: &dyn TerrainQuery,
    rng: &mut dyn RngCore,
    sink: Option<&mut dyn EventSink>,
) -> ScatterResult {
    if let Some(s) = sink {
        run_scatter_with_events(request, zone, settings, terrain, rng, s)
    } else {
        run_scatter_with_events(request, zone, settings, terrain, rng, &mut ())
    }
}

pub fn run_scatter_with_events(
    request: &ScatterRequest,
    zone: &ScatterZone,
    settings: &ScatterSettings,
    terrain: &dyn TerrainQuery,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> ScatterResult {
    let method = request.method.name();
    if sink.wants(ScatterEventKind::RunStarted) {
        sink.send(ScatterEvent::RunStarted {
            method,
            zone_area: zone.area(),
        });
    }

    if zone.is_degenerate() {
        warn!("Scatter zone has no horizontal area; nothing to place.");
        if sink.wants(ScatterEventKind::Warning) {
            sink.send(ScatterEvent::Warning {
                context: method.into(),
                message: "Scatter zone has no horizontal area".into(),
            });
        }
    }

    let finalizer = PointFinalizer::new(zone, settings, terrain);
    let points = request.method.sampler().generate(&finalizer, rng);
    let generated = points.len();
    info!("Method '{method}' generated {generated} points.");
    if sink.wants(ScatterEventKind::SamplerFinished) {
        sink.send(ScatterEvent::SamplerFinished {
            method,
            points: generated,
        });
    }

    let mut result = ScatterResult {
        generated,
        ..Default::default()
    };

    result.points = match &request.optimizer {
        None => points,
        Some(optimizer) => {
            let kept = optimizer.remove_overlaps(points);
            result.overlaps_removed = generated - kept.len();
            if sink.wants(ScatterEventKind::OverlapsRemoved) {
                sink.send(ScatterEvent::OverlapsRemoved {
                    removed: result.overlaps_removed,
                    remaining: kept.len(),
                });
            }

            let kept_len = kept.len();
            let filled = optimizer.fill_gaps(kept, &finalizer, rng);
            result.gaps_filled = filled.len() - kept_len;
            if optimizer.target_density.is_some() && sink.wants(ScatterEventKind::GapsFilled) {
                sink.send(ScatterEvent::GapsFilled {
                    added: result.gaps_filled,
                    total: filled.len(),
                });
            }
            debug!(
                "Optimizer: -{} overlapping, +{} gap fills.",
                result.overlaps_removed, result.gaps_filled
            );
            filled
        }
    };

    if sink.wants(ScatterEventKind::RunFinished) {
        sink.send(ScatterEvent::RunFinished {
            summary: result.summary(),
        });
    }

    result
}

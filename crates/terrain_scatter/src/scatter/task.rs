//! Background generation on a worker thread, with results and events over channels.
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::scatter::events::{EventSink, ScatterEvent};
use crate::scatter::plan::ScatterRequest;
use crate::scatter::runner::{run_scatter_with_events, ScatterResult};
use crate::settings::ScatterSettings;
use crate::terrain::TerrainQuery;
use crate::zone::ScatterZone;

/// Handle to a value being produced on a worker thread.
///
/// Poll with [`GenerationTask::try_take`] or block with [`GenerationTask::wait`].
pub struct GenerationTask<T> {
    result: Receiver<T>,
    handle: Option<JoinHandle<()>>,
}

/// Runs `job` on a named worker thread.
pub fn spawn_generation<T, F>(job: F) -> Result<GenerationTask<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    let handle = thread::Builder::new()
        .name("terrain-scatter-worker".into())
        .spawn(move || {
            let _ = tx.send(job());
        })?;
    Ok(GenerationTask {
        result: rx,
        handle: Some(handle),
    })
}

impl<T> GenerationTask<T> {
    /// True once the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Takes the value if it is ready, without blocking.
    pub fn try_take(&mut self) -> Option<T> {
        self.result.try_recv().ok()
    }

    /// Blocks until the worker delivers its value.
    ///
    /// Fails with [`Error::WorkerPanicked`] if the job panicked and with
    /// [`Error::Disconnected`] if the value was already taken.
    pub fn wait(mut self) -> Result<T> {
        let received = self.result.recv();
        let joined = self.handle.take().map(JoinHandle::join);
        match (received, joined) {
            (Ok(value), _) => Ok(value),
            (Err(_), Some(Err(_))) => Err(Error::WorkerPanicked),
            (Err(_), _) => Err(Error::Disconnected),
        }
    }
}

/// Event sink that forwards events over a channel.
pub struct ChannelSink {
    pub tx: Sender<ScatterEvent>,
}

impl EventSink for ChannelSink {
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        let _ = self.tx.send(event);
    }
}

/// Everything one scatter run needs, owned so it can move to a worker thread.
#[derive(Clone)]
pub struct ScatterJob {
    pub zone: ScatterZone,
    pub settings: ScatterSettings,
    pub terrain: Arc<dyn TerrainQuery>,
    pub request: ScatterRequest,
    /// Seed for the run's `StdRng`.
    pub seed: u64,
}

impl ScatterJob {
    pub fn new(
        zone: ScatterZone,
        settings: ScatterSettings,
        terrain: Arc<dyn TerrainQuery>,
        request: ScatterRequest,
        seed: u64,
    ) -> Self {
        Self {
            zone,
            settings,
            terrain,
            request,
            seed,
        }
    }

    /// Runs on the calling thread.
    pub fn run(&self) -> ScatterResult {
        self.run_with_events(&mut ())
    }

    pub fn run_with_events(&self, sink: &mut dyn EventSink) -> ScatterResult {
        let mut rng = StdRng::seed_from_u64(self.seed);
        run_scatter_with_events(
            &self.request,
            &self.zone,
            &self.settings,
            self.terrain.as_ref(),
            &mut rng,
            sink,
        )
    }

    /// Validates the job and runs it on a worker thread.
    pub fn spawn(self) -> Result<GenerationTask<ScatterResult>> {
        self.zone.validate()?;
        self.settings.validate()?;
        debug!(
            "Spawning '{}' scatter job with seed {}.",
            self.request.method.name(),
            self.seed
        );
        spawn_generation(move || self.run())
    }

    /// Like [`ScatterJob::spawn`], streaming events while the job runs.
    pub fn spawn_with_events(
        self,
    ) -> Result<(GenerationTask<ScatterResult>, Receiver<ScatterEvent>)> {
        self.zone.validate()?;
        self.settings.validate()?;
        let (tx, rx) = crossbeam_channel::unbounded();
        let task = spawn_generation(move || {
            let mut sink = ChannelSink { tx };
            self.run_with_events(&mut sink)
        })?;
        Ok((task, rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::PoissonDiskSampling;
    use crate::scatter::events::ScatterEventKind;
    use crate::terrain::FlatTerrain;

    fn job(seed: u64) -> ScatterJob {
        ScatterJob::new(
            ScatterZone::default(),
            ScatterSettings::default(),
            Arc::new(FlatTerrain::new(0.0)),
            ScatterRequest::new(PoissonDiskSampling::new(1.0)),
            seed,
        )
    }

    #[test]
    fn background_result_matches_inline_run() {
        let inline = job(17).run();
        let background = job(17).spawn().unwrap().wait().unwrap();
        assert_eq!(inline.points, background.points);
        assert!(!background.is_empty());
    }

    #[test]
    fn panicking_job_reports_worker_panic() {
        let task = spawn_generation(|| -> u32 { panic!("boom") }).unwrap();
        assert!(matches!(task.wait(), Err(Error::WorkerPanicked)));
    }

    #[test]
    fn taken_value_leaves_task_disconnected() {
        let mut task = spawn_generation(|| 7u32).unwrap();
        let mut value = None;
        while value.is_none() {
            value = task.try_take();
            thread::yield_now();
        }
        assert_eq!(value, Some(7));
        assert!(matches!(task.wait(), Err(Error::Disconnected)));
    }

    #[test]
    fn events_stream_through_channel() {
        let (task, events) = job(3).spawn_with_events().unwrap();
        let result = task.wait().unwrap();
        let kinds: Vec<_> = events.try_iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.first(), Some(&ScatterEventKind::RunStarted));
        assert_eq!(kinds.last(), Some(&ScatterEventKind::RunFinished));
        assert!(!result.is_empty());
    }

    #[test]
    fn invalid_job_is_rejected_before_spawning() {
        let mut bad = job(1);
        bad.settings = bad.settings.with_jitter(-1.0);
        assert!(matches!(bad.spawn(), Err(Error::InvalidConfig(_))));
    }
}

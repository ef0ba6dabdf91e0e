//! Request types selecting a sampler and optional optimizer pass.
use crate::optimize::Optimizer;
use crate::sampling::{
    BlueNoiseSampling, ClusteredSampling, DlaSampling, NoiseThresholdSampling,
    PoissonDiskSampling, ScatterSampling, WangTileSampling,
};

/// The generation strategy for one scatter call.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScatterMethod {
    PoissonDisk(PoissonDiskSampling),
    BlueNoise(BlueNoiseSampling),
    Dla(DlaSampling),
    WangTiles(WangTileSampling),
    NoiseThreshold(NoiseThresholdSampling),
    Clustered(ClusteredSampling),
}

impl ScatterMethod {
    /// Short identifier used in logs and events.
    pub fn name(&self) -> &'static str {
        match self {
            ScatterMethod::PoissonDisk(_) => "poisson_disk",
            ScatterMethod::BlueNoise(_) => "blue_noise",
            ScatterMethod::Dla(_) => "dla",
            ScatterMethod::WangTiles(_) => "wang_tiles",
            ScatterMethod::NoiseThreshold(_) => "noise_threshold",
            ScatterMethod::Clustered(_) => "clustered",
        }
    }

    pub fn sampler(&self) -> &dyn ScatterSampling {
        match self {
            ScatterMethod::PoissonDisk(s) => s,
            ScatterMethod::BlueNoise(s) => s,
            ScatterMethod::Dla(s) => s,
            ScatterMethod::WangTiles(s) => s,
            ScatterMethod::NoiseThreshold(s) => s,
            ScatterMethod::Clustered(s) => s,
        }
    }
}

macro_rules! impl_from_sampling {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ScatterMethod {
                fn from(value: $ty) -> Self {
                    ScatterMethod::$variant(value)
                }
            }
        )*
    };
}

impl_from_sampling! {
    PoissonDiskSampling => PoissonDisk,
    BlueNoiseSampling => BlueNoise,
    DlaSampling => Dla,
    WangTileSampling => WangTiles,
    NoiseThresholdSampling => NoiseThreshold,
    ClusteredSampling => Clustered,
}

/// One sampler run, optionally followed by the optimizer.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterRequest {
    pub method: ScatterMethod,
    pub optimizer: Option<Optimizer>,
}

impl ScatterRequest {
    pub fn new(method: impl Into<ScatterMethod>) -> Self {
        Self {
            method: method.into(),
            optimizer: None,
        }
    }

    /// Runs `optimizer` on the sampler output.
    pub fn with_optimizer(mut self, optimizer: Optimizer) -> Self {
        self.optimizer = Some(optimizer);
        self
    }
}

pub mod asset;
pub mod engine;
pub mod error;
pub mod event;
pub mod rate;
pub mod sampler;
pub mod settings;
pub mod source;
pub mod state;

pub use asset::AssetKey;
pub use engine::{AnimationFrame, Engine, FetchOutcome};
pub use error::{Result, RunCatError};
pub use event::Message;
pub use rate::RateMapper;
pub use sampler::{CpuBreakdown, SampleAggregator, UtilizationSample};
pub use settings::{
    FpsMaxLimit, ReconfigurePolicy, RefreshRate, ResolvedTheme, Runner, SpeedConfig, SpeedLimit,
    Theme,
};
pub use source::{CpuSource, ThemeSource};
pub use state::{MemoryInfo, StorageInfo, SystemSnapshot};

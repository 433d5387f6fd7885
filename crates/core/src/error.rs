use crate::asset::AssetKey;
use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum RunCatError {
    #[error("config error: {0}")]
    Config(String),

    /// The CPU counter could not be opened or read.  Fatal at startup.
    #[error("CPU counter unavailable: {0}")]
    CounterUnavailable(String),

    #[error("system error: {0}")]
    System(String),

    #[error("missing icon asset '{}'", .0.file_stem())]
    MissingAsset(AssetKey),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = RunCatError> = std::result::Result<T, E>;

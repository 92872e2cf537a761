use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or session files.
///
/// The timeline model itself never fails: out-of-range input is clamped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("entity {id} has neither `time` nor `start`")]
    MissingTime { id: u64 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

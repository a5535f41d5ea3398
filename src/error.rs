use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::utils::WorldCoord;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("coordinate {0} is outside the packable range")]
    OutOfRange(WorldCoord),
    #[error("not a coordinate tuple: {0:?}")]
    BadCoordinate(String),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("world file {path} not found")]
    NotFound { path: PathBuf },
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed world json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad world entry: {0}")]
    Entry(#[from] WorldError),
    #[error("coordinate {0} appears more than once")]
    Duplicate(WorldCoord),
}

#[derive(Debug, Error)]
pub enum StressError {
    #[error("failed to spawn {name} worker: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Top-level error for the binary
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Stress(#[from] StressError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("image output failed: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

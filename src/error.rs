use std::path::PathBuf;

use crate::tour::{ImageRef, LocationId};

#[derive(Debug, thiserror::Error)]
pub enum TourError {
    #[error("unknown location id {0}")]
    InvalidTarget(LocationId),

    #[error("tour configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("failed to load panorama {image}: {reason}")]
    ImageLoadFailure { image: ImageRef, reason: String },
}

/// Problems found while reading or validating a tour table.
///
/// All of these are detected before the tour starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read tour file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tour file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tour has no locations")]
    Empty,

    #[error("location id {0} is declared more than once")]
    DuplicateId(LocationId),

    #[error("hotspot #{hotspot} of location {location} targets unknown location {target}")]
    DanglingTarget {
        location: LocationId,
        hotspot: usize,
        target: LocationId,
    },

    #[error("start location {0} is not in the tour")]
    UnknownStart(LocationId),

    #[error("hotspot #{hotspot} of location {location} is out of range (yaw {yaw}, pitch {pitch})")]
    AngleOutOfRange {
        location: LocationId,
        hotspot: usize,
        yaw: f32,
        pitch: f32,
    },

    #[error("invalid viewer settings: {0}")]
    InvalidViewer(String),
}

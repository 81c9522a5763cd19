//! Error types for track loading, strategy loading and turn handling

use std::path::PathBuf;

use thiserror::Error;

use crate::game::vector::Vector2D;

/// Reason a track grid was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFormatError {
    #[error("the track isn't a rectangle")]
    NotARectangle,

    #[error("the grid has fewer than 3 rows")]
    TooFewRows,

    #[error("the track is not surrounded by walls")]
    NotSurroundedByWalls,

    #[error("there are identical cars on the track ('{0}')")]
    DuplicateCarId(char),

    #[error("there are too many cars on the track ({count}, at most {max})")]
    TooManyCars { count: usize, max: usize },

    #[error("there is no car on the track")]
    NoCars,
}

#[derive(Error, Debug)]
pub enum RaceError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid track format: {0}")]
    InvalidTrackFormat(#[from] TrackFormatError),

    #[error("Malformed strategy file {} (line {line}): {reason}", .path.display())]
    MalformedStrategyFile {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Waypoint {index} needs acceleration {acceleration}, which is not a single step")]
    UnreachableWaypoint { index: usize, acceleration: Vector2D },

    #[error("Waypoint {index} at {waypoint} is too far from the previous one")]
    WaypointOutOfRange { index: usize, waypoint: Vector2D },

    #[error("Position {0} is outside the track")]
    OutOfBounds(Vector2D),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Failed to parse settings {}: {source}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, RaceError>;

impl RaceError {
    /// Map an `io::Error` on `path`, keeping "not found" as its own kind
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            RaceError::FileNotFound(path)
        } else {
            RaceError::Io { path, source }
        }
    }
}

//! Config - Race settings
//!
//! Which track to load and how each car is driven. Settings can be read
//! from a JSON file; everything not given falls back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::game::error::{RaceError, Result};
use crate::game::strategy::StrategyKind;

/// Strategy assignment for one car
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarConfig {
    /// Car glyph on the track
    pub id: char,
    pub strategy: StrategyKind,
    /// Move-list or waypoint file; resolved by naming convention when unset
    #[serde(default)]
    pub source: Option<PathBuf>,
}

/// Race configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Track file to load
    pub track_path: PathBuf,
    /// Per-car strategies
    pub cars: Vec<CarConfig>,
    /// Strategy for cars not listed in `cars`
    pub default_strategy: StrategyKind,
    /// Directory searched for move-list files
    pub moves_dir: PathBuf,
    /// Directory searched for waypoint files
    pub follower_dir: PathBuf,
    /// Turn limit for headless runs
    pub max_turns: u32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            track_path: PathBuf::from("tracks/quarter-mile.txt"),
            cars: Vec::new(),
            default_strategy: StrategyKind::Stationary,
            moves_dir: PathBuf::from("moves"),
            follower_dir: PathBuf::from("follower"),
            max_turns: 1000,
        }
    }
}

impl RaceConfig {
    /// Load configuration from a JSON settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| RaceError::from_io(path, e))?;
        serde_json::from_str(&contents).map_err(|source| RaceError::Settings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings for racing `track_path` with default strategies
    pub fn for_track(track_path: impl Into<PathBuf>) -> Self {
        Self {
            track_path: track_path.into(),
            ..Default::default()
        }
    }

    /// Strategy and source file for the car with glyph `id`
    pub fn strategy_for(&self, id: char) -> (StrategyKind, Option<PathBuf>) {
        let entry = self.cars.iter().find(|car| car.id == id);
        let kind = entry.map_or(self.default_strategy, |car| car.strategy);
        let source = entry
            .and_then(|car| car.source.clone())
            .or_else(|| self.conventional_source(kind, id));
        (kind, source)
    }

    /// `<dir>/<track stem>_<car id>.txt` for file-backed strategies
    fn conventional_source(&self, kind: StrategyKind, id: char) -> Option<PathBuf> {
        let dir = match kind {
            StrategyKind::ScriptedList => &self.moves_dir,
            StrategyKind::PathFollower => &self.follower_dir,
            StrategyKind::Interactive | StrategyKind::Stationary => return None,
        };
        let stem = self.track_path.file_stem()?.to_string_lossy();
        Some(dir.join(format!("{}_{}.txt", stem, id)))
    }
}

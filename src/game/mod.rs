//! Game Module
//!
//! Grid track model, cars, move strategies and the turn engine, plus the
//! session that drives a race from a configuration.

pub mod car;
pub mod config;
pub mod error;
pub mod race;
pub mod simulation;
pub mod strategy;
pub mod track;
pub mod vector;

pub use car::{Car, CarSnapshot, CarState};
pub use config::{CarConfig, RaceConfig};
pub use error::{RaceError, Result, TrackFormatError};
pub use race::{calculate_path, Game, TurnOutcome};
pub use simulation::{GameServer, GameState, RaceResult, RaceSnapshot, ServerStats};
pub use strategy::{MoveStrategy, PathFollower, ScriptedMoves, StrategyKind};
pub use track::{SpaceType, Track, MAX_CARS, MIN_GRID_HEIGHT};
pub use vector::{Direction, Vector2D};

//! Racetrack - Turn-based vector racing on a grid
//!
//! Cars accelerate by at most one cell per axis each turn and keep their
//! velocity between turns. Every move is traced cell by cell across the
//! track to find wall hits, car collisions and finish-line crossings.
//!
//! The library never installs a logger; it reports through the `log` facade.

pub mod game;

pub use game::{
    calculate_path, Car, CarConfig, Direction, Game, GameServer, GameState, MoveStrategy,
    RaceConfig, RaceError, RaceResult, RaceSnapshot, Result, SpaceType, StrategyKind, Track,
    TrackFormatError, TurnOutcome, Vector2D, MAX_CARS,
};

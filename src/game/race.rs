//! Race - Turn engine
//!
//! Applies one car's acceleration per turn, traces the cells its movement
//! passes through and resolves wall/car crashes, finish crossings and the
//! winner. Turn order rotates over the cars that have not crashed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::car::Car;
use crate::game::error::{RaceError, Result};
use crate::game::strategy::{MoveStrategy, StrategyKind};
use crate::game::track::{SpaceType, Track};
use crate::game::vector::{Direction, Vector2D};

/// What happened to the active car during a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// Reached its projected position (or stayed put)
    Moved { to: Vector2D },
    /// Stopped in front of a finish line it tried to cross backwards
    Blocked { at: Vector2D },
    /// Hit a wall or another car
    Crashed { at: Vector2D },
    /// Crossed the finish line
    Finished { at: Vector2D },
}

/// Every grid cell on the straight line from `start` to `end`, both included.
///
/// The axis with the larger distance advances every step; the other one
/// advances whenever the error term drops below zero. The result has
/// `1 + max(|dx|, |dy|)` positions and neighbours differ by at most one in
/// each coordinate.
pub fn calculate_path(start: Vector2D, end: Vector2D) -> Vec<Vector2D> {
    let diff = end - start;
    let (dist_x, dist_y) = (diff.x.abs(), diff.y.abs());
    let (dir_x, dir_y) = (diff.x.signum(), diff.y.signum());

    let (parallel_step, slow_distance, fast_distance) = if dist_x > dist_y {
        (Vector2D::new(dir_x, 0), dist_y, dist_x)
    } else {
        (Vector2D::new(0, dir_y), dist_x, dist_y)
    };
    let diagonal_step = Vector2D::new(dir_x, dir_y);

    let mut path = Vec::with_capacity(fast_distance as usize + 1);
    let mut position = start;
    let mut error = fast_distance / 2;
    path.push(position);
    for _ in 0..fast_distance {
        error -= slow_distance;
        if error < 0 {
            error += fast_distance;
            position += diagonal_step;
        } else {
            position += parallel_step;
        }
        path.push(position);
    }
    path
}

/// Game engine for one race on one track
#[derive(Debug, Clone)]
pub struct Game {
    track: Track,
    current_car_index: usize,
    /// Set once, never changed afterwards
    winner: Option<usize>,
}

impl Game {
    /// Start a race on `track`; the first car moves first
    pub fn new(track: Track) -> Self {
        Self {
            track,
            current_car_index: 0,
            winner: None,
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn current_car_index(&self) -> usize {
        self.current_car_index
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn car_count(&self) -> usize {
        self.track.car_count()
    }

    pub fn car(&self, index: usize) -> Option<&Car> {
        self.track.car(index)
    }

    pub fn car_id(&self, index: usize) -> Option<char> {
        self.car(index).map(Car::id)
    }

    pub fn car_position(&self, index: usize) -> Option<Vector2D> {
        self.car(index).map(Car::position)
    }

    pub fn car_velocity(&self, index: usize) -> Option<Vector2D> {
        self.car(index).map(Car::velocity)
    }

    pub fn is_car_crashed(&self, index: usize) -> Option<bool> {
        self.car(index).map(Car::is_crashed)
    }

    pub fn car_strategy(&self, index: usize) -> Option<StrategyKind> {
        self.car(index).and_then(Car::strategy_kind)
    }

    pub fn render_track(&self) -> String {
        self.track.render()
    }

    /// Assign a strategy to a car. File-backed kinds read `source` now.
    pub fn set_strategy(
        &mut self,
        car_index: usize,
        kind: StrategyKind,
        source: Option<&Path>,
    ) -> Result<()> {
        let car = self
            .track
            .car_mut(car_index)
            .ok_or_else(|| RaceError::InvalidOperation(format!("no car with index {}", car_index)))?;
        let strategy = MoveStrategy::load(kind, source, car.position())?;
        log::debug!("Car {} drives with {:?}", car.id(), kind);
        car.set_strategy(strategy);
        Ok(())
    }

    /// Ask the active car's strategy for its next acceleration
    pub fn next_move(&mut self) -> Direction {
        let index = self.current_car_index;
        self.track
            .car_mut(index)
            .map_or(Direction::None, Car::next_move)
    }

    /// Whether a car moving to `position` would crash there
    pub fn will_car_crash(&self, position: Vector2D) -> Result<bool> {
        let space = self.track.lookup_space_type(position)?;
        Ok(matches!(space, SpaceType::Wall | SpaceType::OccupiedByCar))
    }

    /// Whether at least one car can still move on its own: not crashed and
    /// not `Stationary`. When this is false and there is no winner the race
    /// is stalled.
    pub fn has_movable_car(&self) -> bool {
        self.track
            .cars()
            .iter()
            .any(|car| !car.is_crashed() && car.strategy_kind() != Some(StrategyKind::Stationary))
    }

    /// Whether the finish cell `space` at `position` must not be crossed
    /// when coming from `start`. Only the x coordinate is compared, for
    /// every finish orientation.
    fn is_blocking_back_driving(space: SpaceType, start: Vector2D, position: Vector2D) -> bool {
        match space {
            SpaceType::FinishLeft | SpaceType::FinishDown => position.x > start.x,
            SpaceType::FinishRight | SpaceType::FinishUp => position.x < start.x,
            _ => false,
        }
    }

    /// Run the turn of the active car with the requested acceleration.
    ///
    /// Fails without touching any state when the race already has a winner
    /// or the active car has crashed.
    pub fn do_car_turn(&mut self, direction: Direction) -> Result<TurnOutcome> {
        if let Some(winner) = self.winner {
            return Err(RaceError::InvalidOperation(format!(
                "race is over, car {} has won",
                winner
            )));
        }
        let index = self.current_car_index;
        let car = self
            .track
            .car_mut(index)
            .ok_or_else(|| RaceError::InvalidOperation(format!("no car with index {}", index)))?;
        if car.is_crashed() {
            return Err(RaceError::InvalidOperation(format!(
                "car {} has crashed and cannot move",
                car.id()
            )));
        }

        car.accelerate(direction);
        let start = car.position();
        let path = calculate_path(start, car.projected_next_position());

        let mut outcome = TurnOutcome::Moved { to: start };
        for (step, &position) in path.iter().enumerate().skip(1) {
            let space = self.track.lookup_space_type(position)?;
            if matches!(space, SpaceType::Wall | SpaceType::OccupiedByCar) {
                outcome = TurnOutcome::Crashed { at: position };
                break;
            } else if Self::is_blocking_back_driving(space, start, position) {
                outcome = TurnOutcome::Blocked { at: path[step - 1] };
                break;
            } else if space.is_finish() {
                outcome = TurnOutcome::Finished { at: position };
                break;
            }
            outcome = TurnOutcome::Moved { to: position };
        }

        let end = match outcome {
            TurnOutcome::Moved { to } => to,
            TurnOutcome::Blocked { at }
            | TurnOutcome::Crashed { at }
            | TurnOutcome::Finished { at } => at,
        };
        if end != start {
            self.track.update_car_position(end, index)?;
        }

        let car = self
            .track
            .car_mut(index)
            .ok_or_else(|| RaceError::InvalidOperation(format!("no car with index {}", index)))?;
        let id = car.id();
        match outcome {
            TurnOutcome::Crashed { at } => {
                car.crash_at(at);
                log::info!("Car {} crashed at {}", id, at);
                self.winner = self.last_car_standing();
                if let Some(survivor) = self.winner {
                    log::info!("Car {} is the last car standing", self.track.cars()[survivor].id());
                }
            }
            TurnOutcome::Finished { at } => {
                car.move_to(at);
                self.winner = Some(index);
                log::info!("Car {} crossed the finish line at {}", id, at);
            }
            TurnOutcome::Blocked { at } => {
                car.move_to(at);
                log::debug!("Car {} blocked from driving backwards over the finish line", id);
            }
            TurnOutcome::Moved { to } => {
                car.move_to(to);
                log::debug!("Car {} moved to {}", id, to);
            }
        }
        Ok(outcome)
    }

    /// Index of the only car that has not crashed, if exactly one is left
    fn last_car_standing(&self) -> Option<usize> {
        let mut remaining = self
            .track
            .cars()
            .iter()
            .enumerate()
            .filter(|(_, car)| !car.is_crashed())
            .map(|(index, _)| index);
        match (remaining.next(), remaining.next()) {
            (Some(index), None) => Some(index),
            _ => None,
        }
    }

    /// Hand the turn to the next car that has not crashed, wrapping around.
    /// Does nothing once the race has a winner.
    pub fn switch_to_next_active_car(&mut self) {
        if self.winner.is_some() {
            return;
        }
        let count = self.track.car_count();
        let next = (1..=count)
            .map(|offset| (self.current_car_index + offset) % count)
            .find(|&index| !self.track.cars()[index].is_crashed());
        if let Some(next) = next {
            self.current_car_index = next;
        }
    }
}

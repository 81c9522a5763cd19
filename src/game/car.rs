//! Car - Individual car state and movement
//!
//! Each car has a position, a velocity that persists between turns, and the
//! strategy that picks its acceleration. The engine updates one car per turn.

use serde::{Deserialize, Serialize};

use crate::game::strategy::{MoveStrategy, StrategyKind};
use crate::game::vector::{Direction, Vector2D};

/// Car lifecycle; the only transition is `Active -> Crashed`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarState {
    #[default]
    Active,
    Crashed,
}

/// Complete state for a single car
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    /// Glyph the car was drawn with on the track
    id: char,
    position: Vector2D,
    velocity: Vector2D,
    state: CarState,
    /// Unset until the race is configured
    strategy: Option<MoveStrategy>,
}

impl Car {
    /// Create a car standing still at its start position
    pub fn new(id: char, position: Vector2D) -> Self {
        Self {
            id,
            position,
            velocity: Vector2D::ZERO,
            state: CarState::Active,
            strategy: None,
        }
    }

    pub fn id(&self) -> char {
        self.id
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    pub fn state(&self) -> CarState {
        self.state
    }

    pub fn is_crashed(&self) -> bool {
        self.state == CarState::Crashed
    }

    /// Add the direction's unit vector to the velocity; it is never reset
    pub fn accelerate(&mut self, direction: Direction) {
        self.velocity += direction.vector();
    }

    /// Where the car ends up if nothing stops it
    pub fn projected_next_position(&self) -> Vector2D {
        self.position + self.velocity
    }

    pub fn move_to(&mut self, position: Vector2D) {
        self.position = position;
    }

    /// Commit the crash position. There is no way back to `Active`.
    pub fn crash_at(&mut self, position: Vector2D) {
        self.position = position;
        self.state = CarState::Crashed;
    }

    pub fn set_strategy(&mut self, strategy: MoveStrategy) {
        self.strategy = Some(strategy);
    }

    pub fn strategy_kind(&self) -> Option<StrategyKind> {
        self.strategy.as_ref().map(MoveStrategy::kind)
    }

    /// Ask the strategy for this turn's acceleration; cars without one idle
    pub fn next_move(&mut self) -> Direction {
        self.strategy
            .as_mut()
            .map_or(Direction::None, MoveStrategy::next_move)
    }
}

/// Compact car state for snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSnapshot {
    pub id: char,
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub crashed: bool,
    pub strategy: Option<StrategyKind>,
}

impl From<&Car> for CarSnapshot {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id,
            position: car.position,
            velocity: car.velocity,
            crashed: car.is_crashed(),
            strategy: car.strategy_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceleration_accumulates() {
        let mut car = Car::new('a', Vector2D::new(5, 5));
        assert_eq!(car.velocity(), Vector2D::ZERO);

        car.accelerate(Direction::Right);
        assert_eq!(car.projected_next_position(), Vector2D::new(6, 5));
        car.accelerate(Direction::DownRight);
        assert_eq!(car.velocity(), Vector2D::new(2, 1));
        assert_eq!(car.projected_next_position(), Vector2D::new(7, 6));
        // projection does not move the car
        assert_eq!(car.position(), Vector2D::new(5, 5));

        car.accelerate(Direction::None);
        assert_eq!(car.velocity(), Vector2D::new(2, 1));
    }

    #[test]
    fn crash_is_permanent() {
        let mut car = Car::new('b', Vector2D::new(1, 1));
        car.move_to(Vector2D::new(2, 1));
        assert!(!car.is_crashed());

        car.crash_at(Vector2D::new(3, 1));
        assert!(car.is_crashed());
        assert_eq!(car.state(), CarState::Crashed);
        assert_eq!(car.position(), Vector2D::new(3, 1));

        car.move_to(Vector2D::new(4, 1));
        assert!(car.is_crashed());
    }

    #[test]
    fn car_without_strategy_idles() {
        let mut car = Car::new('c', Vector2D::new(1, 1));
        assert_eq!(car.strategy_kind(), None);
        assert_eq!(car.next_move(), Direction::None);

        car.set_strategy(MoveStrategy::Stationary);
        assert_eq!(car.strategy_kind(), Some(StrategyKind::Stationary));
    }

    #[test]
    fn snapshot_copies_state() {
        let mut car = Car::new('d', Vector2D::new(2, 3));
        car.set_strategy(MoveStrategy::Interactive);
        car.accelerate(Direction::Up);
        let snapshot = CarSnapshot::from(&car);
        assert_eq!(snapshot.id, 'd');
        assert_eq!(snapshot.velocity, Vector2D::new(0, -1));
        assert!(!snapshot.crashed);
        assert_eq!(snapshot.strategy, Some(StrategyKind::Interactive));
    }
}

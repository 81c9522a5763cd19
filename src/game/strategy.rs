//! Strategy - Where a car's requested acceleration comes from
//!
//! Each car gets one strategy when the race is set up. The file-backed
//! strategies parse their whole input up front and then only move a cursor.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::error::{RaceError, Result};
use crate::game::vector::{Direction, Vector2D};

/// Strategy selector used by configuration and the assignment surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyKind {
    /// Direction supplied by an operator each turn
    Interactive,
    /// Never accelerates
    Stationary,
    /// Directions read from a move-list file
    ScriptedList,
    /// Directions derived from a waypoint file
    PathFollower,
}

impl StrategyKind {
    /// Whether this kind needs a source file
    pub fn is_file_backed(self) -> bool {
        matches!(self, StrategyKind::ScriptedList | StrategyKind::PathFollower)
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INTERACTIVE" => Ok(StrategyKind::Interactive),
            "STATIONARY" => Ok(StrategyKind::Stationary),
            "SCRIPTED_LIST" => Ok(StrategyKind::ScriptedList),
            "PATH_FOLLOWER" => Ok(StrategyKind::PathFollower),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// Pre-loaded list of directions, consumed one per turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedMoves {
    moves: Vec<Direction>,
    cursor: usize,
}

impl ScriptedMoves {
    pub fn new(moves: Vec<Direction>) -> Self {
        Self { moves, cursor: 0 }
    }

    /// Parse a move list: one direction name per non-empty line
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut moves = Vec::new();
        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let direction = line
                .parse::<Direction>()
                .map_err(|e| RaceError::MalformedStrategyFile {
                    path: path.to_path_buf(),
                    line: number + 1,
                    reason: e.to_string(),
                })?;
            moves.push(direction);
        }
        Ok(Self::new(moves))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| RaceError::from_io(path, e))?;
        Self::parse(&text, path)
    }

    /// Next scripted direction; `None` forever once the list is used up
    pub fn next_move(&mut self) -> Direction {
        match self.moves.get(self.cursor) {
            Some(&direction) => {
                self.cursor += 1;
                direction
            }
            None => Direction::None,
        }
    }

    pub fn remaining(&self) -> usize {
        self.moves.len() - self.cursor
    }
}

/// Follows a closed loop of waypoints, starting at the car's start position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFollower {
    directions: Vec<Direction>,
    cursor: usize,
}

impl PathFollower {
    /// Precompute the acceleration for every leg of the loop
    /// `start -> w1 -> ... -> wn -> start`.
    ///
    /// Each leg must be reachable with a single unit acceleration on top of
    /// the velocity accumulated by the previous legs.
    pub fn from_waypoints(start: Vector2D, waypoints: &[Vector2D]) -> Result<Self> {
        let mut points = Vec::with_capacity(waypoints.len() + 1);
        points.push(start);
        points.extend_from_slice(waypoints);

        let mut velocity = Vector2D::ZERO;
        let mut directions = Vec::with_capacity(points.len());
        for (index, &current) in points.iter().enumerate() {
            let target_index = (index + 1) % points.len();
            let target = points[target_index];
            let acceleration = target
                .checked_sub(current)
                .and_then(|delta| delta.checked_sub(velocity))
                .ok_or(RaceError::WaypointOutOfRange {
                    index: target_index,
                    waypoint: target,
                })?;
            let direction = Direction::from_vector(acceleration).ok_or(
                RaceError::UnreachableWaypoint {
                    index: target_index,
                    acceleration,
                },
            )?;
            velocity += direction.vector();
            directions.push(direction);
        }

        Ok(Self { directions, cursor: 0 })
    }

    /// Parse waypoints: one `x;y` pair per non-empty line
    pub fn parse_waypoints(text: &str, path: &Path) -> Result<Vec<Vector2D>> {
        let malformed = |line: usize, reason: String| RaceError::MalformedStrategyFile {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let mut waypoints = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (x, y) = line
                .split_once(';')
                .ok_or_else(|| malformed(number + 1, format!("expected 'x;y', got '{}'", line)))?;
            let x = x
                .trim()
                .parse::<i32>()
                .map_err(|e| malformed(number + 1, format!("bad x coordinate '{}': {}", x, e)))?;
            let y = y
                .trim()
                .parse::<i32>()
                .map_err(|e| malformed(number + 1, format!("bad y coordinate '{}': {}", y, e)))?;
            waypoints.push(Vector2D::new(x, y));
        }
        Ok(waypoints)
    }

    pub fn from_file(path: &Path, start: Vector2D) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| RaceError::from_io(path, e))?;
        let waypoints = Self::parse_waypoints(&text, path)?;
        Self::from_waypoints(start, &waypoints)
    }

    /// Next direction of the loop, wrapping around after the last leg
    pub fn next_move(&mut self) -> Direction {
        let direction = self.directions[self.cursor];
        self.cursor = (self.cursor + 1) % self.directions.len();
        direction
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }
}

/// The strategy a car is driven by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveStrategy {
    Interactive,
    Stationary,
    ScriptedList(ScriptedMoves),
    PathFollower(PathFollower),
}

impl MoveStrategy {
    /// Build the strategy for `kind`. File-backed kinds need `source`.
    pub fn load(kind: StrategyKind, source: Option<&Path>, start: Vector2D) -> Result<Self> {
        let source_for = |kind: StrategyKind| {
            source.ok_or_else(|| {
                RaceError::InvalidOperation(format!("{:?} strategy needs a source file", kind))
            })
        };

        Ok(match kind {
            StrategyKind::Interactive => MoveStrategy::Interactive,
            StrategyKind::Stationary => MoveStrategy::Stationary,
            StrategyKind::ScriptedList => {
                MoveStrategy::ScriptedList(ScriptedMoves::from_file(source_for(kind)?)?)
            }
            StrategyKind::PathFollower => {
                MoveStrategy::PathFollower(PathFollower::from_file(source_for(kind)?, start)?)
            }
        })
    }

    /// Requested acceleration for this turn.
    ///
    /// `Interactive` answers `None`; the operator's choice is passed to the
    /// engine directly instead.
    pub fn next_move(&mut self) -> Direction {
        match self {
            MoveStrategy::Interactive | MoveStrategy::Stationary => Direction::None,
            MoveStrategy::ScriptedList(moves) => moves.next_move(),
            MoveStrategy::PathFollower(follower) => follower.next_move(),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            MoveStrategy::Interactive => StrategyKind::Interactive,
            MoveStrategy::Stationary => StrategyKind::Stationary,
            MoveStrategy::ScriptedList(_) => StrategyKind::ScriptedList,
            MoveStrategy::PathFollower(_) => StrategyKind::PathFollower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "racetrack-strategy-{}-{}",
            std::process::id(),
            name
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn scripted_moves_in_file_order_then_none() {
        let mut moves =
            ScriptedMoves::parse("LEFT\n\nUP_RIGHT\nNONE\n", Path::new("moves.txt")).unwrap();
        assert_eq!(moves.remaining(), 3);
        assert_eq!(moves.next_move(), Direction::Left);
        assert_eq!(moves.next_move(), Direction::UpRight);
        assert_eq!(moves.next_move(), Direction::None);
        assert_eq!(moves.remaining(), 0);
        assert_eq!(moves.next_move(), Direction::None);
        assert_eq!(moves.next_move(), Direction::None);
    }

    #[test]
    fn scripted_moves_reject_unknown_names() {
        let err = ScriptedMoves::parse("LEFT\nSIDEWAYS\n", Path::new("moves.txt")).unwrap_err();
        match err {
            RaceError::MalformedStrategyFile { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn path_follower_rejects_unreachable_legs() {
        // (2,2) -> (3,2) -> (5,2) -> (6,2), then back to (2,2) from velocity +1
        let start = Vector2D::new(2, 2);
        let waypoints = [Vector2D::new(3, 2), Vector2D::new(5, 2), Vector2D::new(6, 2)];
        match PathFollower::from_waypoints(start, &waypoints) {
            Err(RaceError::UnreachableWaypoint { index, acceleration }) => {
                assert_eq!(index, 0);
                assert_eq!(acceleration, Vector2D::new(-5, 0));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        // a first leg of two cells cannot be reached from standstill
        let err = PathFollower::from_waypoints(start, &[Vector2D::new(4, 2)]).unwrap_err();
        assert!(matches!(err, RaceError::UnreachableWaypoint { index: 1, .. }));
    }

    #[test]
    fn path_follower_rejects_waypoints_beyond_integer_range() {
        let waypoints =
            PathFollower::parse_waypoints("-2147483648;1\n", Path::new("follower.txt")).unwrap();
        let err = PathFollower::from_waypoints(Vector2D::new(1, 1), &waypoints).unwrap_err();
        match err {
            RaceError::WaypointOutOfRange { index, waypoint } => {
                assert_eq!(index, 1);
                assert_eq!(waypoint, Vector2D::new(i32::MIN, 1));
            }
            other => panic!("unexpected error: {other}"),
        }

        // a leg from a negative start towards i32::MAX overflows as well
        let far = [Vector2D::new(i32::MAX, 1)];
        let err = PathFollower::from_waypoints(Vector2D::new(-1, 1), &far).unwrap_err();
        assert!(matches!(err, RaceError::WaypointOutOfRange { index: 1, .. }));
    }

    #[test]
    fn path_follower_directions_drive_through_waypoints() {
        // out and back along a row: velocities 1, 2, 1, 0, -1, -2, -1, 0
        let start = Vector2D::new(1, 1);
        let waypoints = [
            Vector2D::new(2, 1),
            Vector2D::new(4, 1),
            Vector2D::new(5, 1),
            Vector2D::new(5, 1),
            Vector2D::new(4, 1),
            Vector2D::new(2, 1),
            Vector2D::new(1, 1),
        ];
        let mut follower = PathFollower::from_waypoints(start, &waypoints).unwrap();
        assert_eq!(
            follower.directions(),
            &[
                Direction::Right,
                Direction::Right,
                Direction::Left,
                Direction::Left,
                Direction::Left,
                Direction::Left,
                Direction::Right,
                Direction::Right,
            ]
        );

        // replaying the accelerations visits every waypoint
        let mut position = start;
        let mut velocity = Vector2D::ZERO;
        for &waypoint in &waypoints {
            velocity += follower.next_move().vector();
            position += velocity;
            assert_eq!(position, waypoint);
        }
        velocity += follower.next_move().vector();
        position += velocity;
        assert_eq!(position, start);

        // and the loop starts over
        assert_eq!(follower.next_move(), Direction::Right);
    }

    #[test]
    fn path_follower_without_waypoints_stays_put() {
        let mut follower = PathFollower::from_waypoints(Vector2D::new(4, 4), &[]).unwrap();
        assert_eq!(follower.next_move(), Direction::None);
        assert_eq!(follower.next_move(), Direction::None);
    }

    #[test]
    fn waypoint_parsing() {
        let points =
            PathFollower::parse_waypoints("3;4\n\n -2 ; 10 \n", Path::new("follower.txt")).unwrap();
        assert_eq!(points, vec![Vector2D::new(3, 4), Vector2D::new(-2, 10)]);

        let err = PathFollower::parse_waypoints("3;4\n5,6\n", Path::new("follower.txt")).unwrap_err();
        assert!(matches!(err, RaceError::MalformedStrategyFile { line: 2, .. }));

        let err = PathFollower::parse_waypoints("x;4\n", Path::new("follower.txt")).unwrap_err();
        assert!(matches!(err, RaceError::MalformedStrategyFile { line: 1, .. }));
    }

    #[test]
    fn load_from_files() {
        let moves = fixture("moves.txt", "RIGHT\nDOWN\n");
        let mut strategy =
            MoveStrategy::load(StrategyKind::ScriptedList, Some(&moves), Vector2D::ZERO).unwrap();
        assert_eq!(strategy.kind(), StrategyKind::ScriptedList);
        assert_eq!(strategy.next_move(), Direction::Right);

        let waypoints = fixture("follower.txt", "2;1\n2;1\n1;1\n");
        let mut strategy = MoveStrategy::load(
            StrategyKind::PathFollower,
            Some(&waypoints),
            Vector2D::new(1, 1),
        )
        .unwrap();
        assert_eq!(strategy.kind(), StrategyKind::PathFollower);
        assert_eq!(strategy.next_move(), Direction::Right);
        assert_eq!(strategy.next_move(), Direction::Left);

        fs::remove_file(moves).ok();
        fs::remove_file(waypoints).ok();
    }

    #[test]
    fn load_errors() {
        let missing = std::env::temp_dir().join("racetrack-no-such-moves.txt");
        let err = MoveStrategy::load(StrategyKind::ScriptedList, Some(&missing), Vector2D::ZERO)
            .unwrap_err();
        assert!(matches!(err, RaceError::FileNotFound(_)));

        let err =
            MoveStrategy::load(StrategyKind::PathFollower, None, Vector2D::ZERO).unwrap_err();
        assert!(matches!(err, RaceError::InvalidOperation(_)));

        let mut idle = MoveStrategy::load(StrategyKind::Stationary, None, Vector2D::ZERO).unwrap();
        assert_eq!(idle.next_move(), Direction::None);
    }

    #[test]
    fn strategy_kind_names() {
        assert_eq!("path_follower".parse::<StrategyKind>(), Ok(StrategyKind::PathFollower));
        assert_eq!("SCRIPTED_LIST".parse::<StrategyKind>(), Ok(StrategyKind::ScriptedList));
        assert!("teleport".parse::<StrategyKind>().is_err());
        assert!(StrategyKind::ScriptedList.is_file_backed());
        assert!(!StrategyKind::Interactive.is_file_backed());
    }
}

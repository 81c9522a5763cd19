//! Vector - Grid positions, velocities and the nine accelerations
//!
//! The same integer pair is used for absolute positions on the track grid
//! and for velocity/acceleration vectors.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Integer 2D vector (x grows to the right, y grows downwards)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: i32,
    pub y: i32,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Scalar product of two vectors
    pub fn scalar_product(self, other: Vector2D) -> i32 {
        self.x * other.x + self.y * other.y
    }

    /// Component-wise subtraction, `None` on overflow
    pub fn checked_sub(self, rhs: Vector2D) -> Option<Vector2D> {
        Some(Vector2D::new(self.x.checked_sub(rhs.x)?, self.y.checked_sub(rhs.y)?))
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, rhs: Vector2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    fn sub(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(X:{}, Y:{})", self.x, self.y)
    }
}

/// One of the nine accelerations a car may request per turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    DownLeft,
    Down,
    DownRight,
    Left,
    None,
    Right,
    UpLeft,
    Up,
    UpRight,
}

impl Direction {
    pub const ALL: [Direction; 9] = [
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
        Direction::Left,
        Direction::None,
        Direction::Right,
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
    ];

    /// Unit vector bound to this direction
    pub const fn vector(self) -> Vector2D {
        match self {
            Direction::DownLeft => Vector2D::new(-1, 1),
            Direction::Down => Vector2D::new(0, 1),
            Direction::DownRight => Vector2D::new(1, 1),
            Direction::Left => Vector2D::new(-1, 0),
            Direction::None => Vector2D::new(0, 0),
            Direction::Right => Vector2D::new(1, 0),
            Direction::UpLeft => Vector2D::new(-1, -1),
            Direction::Up => Vector2D::new(0, -1),
            Direction::UpRight => Vector2D::new(1, -1),
        }
    }

    /// Exact inverse of [`Direction::vector`]; anything beyond a unit step is `None`
    pub fn from_vector(vector: Vector2D) -> Option<Direction> {
        Self::ALL.into_iter().find(|d| d.vector() == vector)
    }

    /// Name used in move-list files and settings
    pub fn name(self) -> &'static str {
        match self {
            Direction::DownLeft => "DOWN_LEFT",
            Direction::Down => "DOWN",
            Direction::DownRight => "DOWN_RIGHT",
            Direction::Left => "LEFT",
            Direction::None => "NONE",
            Direction::Right => "RIGHT",
            Direction::UpLeft => "UP_LEFT",
            Direction::Up => "UP",
            Direction::UpRight => "UP_RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown direction name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(pub String);

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction '{}'", self.0)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| ParseDirectionError(name.to_string()))
    }
}

//! Track - The race grid and the cars placed on it
//!
//! A track is read from a block of text, one character per cell:
//!
//! ```text
//! #########
//! #  a    #
//! #  b   >#
//! #########
//! ```
//!
//! `#` is a wall, a space is open track, `^ v < >` are finish-line cells
//! and any other glyph is the start position of the car with that id.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::car::Car;
use crate::game::error::{RaceError, Result, TrackFormatError};
use crate::game::vector::Vector2D;

/// Maximum number of cars on one track
pub const MAX_CARS: usize = 9;

/// Minimum number of grid rows
pub const MIN_GRID_HEIGHT: usize = 3;

const WALL_GLYPH: char = '#';
const TRACK_GLYPH: char = ' ';

/// What a grid cell is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceType {
    Wall,
    Track,
    FinishUp,
    FinishDown,
    FinishLeft,
    FinishRight,
    OccupiedByCar,
}

impl SpaceType {
    /// Cell type for a layout glyph; `None` means the glyph is a car
    pub fn from_glyph(glyph: char) -> Option<SpaceType> {
        match glyph {
            WALL_GLYPH => Some(SpaceType::Wall),
            TRACK_GLYPH => Some(SpaceType::Track),
            '^' => Some(SpaceType::FinishUp),
            'v' => Some(SpaceType::FinishDown),
            '<' => Some(SpaceType::FinishLeft),
            '>' => Some(SpaceType::FinishRight),
            _ => None,
        }
    }

    pub fn is_finish(self) -> bool {
        matches!(
            self,
            SpaceType::FinishUp
                | SpaceType::FinishDown
                | SpaceType::FinishLeft
                | SpaceType::FinishRight
        )
    }
}

/// Complete grid state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    width: usize,
    height: usize,
    /// Cell types, row-major
    cells: Vec<SpaceType>,
    /// Display glyphs, parallel to `cells`
    glyphs: Vec<char>,
    /// Cars in the order they appear scanning the grid row by row
    cars: Vec<Car>,
}

impl Track {
    /// Parse a track from text.
    ///
    /// Leading blank lines are skipped and the track ends at the first blank
    /// line after it started (or at the end of the text).
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .skip_while(|line| line.trim().is_empty())
            .take_while(|line| !line.trim().is_empty())
            .map(|line| line.trim_end_matches('\r').chars().collect())
            .collect();

        if rows.len() < MIN_GRID_HEIGHT {
            return Err(TrackFormatError::TooFewRows.into());
        }

        let width = rows[0].len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(TrackFormatError::NotARectangle.into());
        }

        let height = rows.len();
        for (y, row) in rows.iter().enumerate() {
            for (x, &glyph) in row.iter().enumerate() {
                let on_border = y == 0 || y == height - 1 || x == 0 || x == width - 1;
                if on_border && glyph != WALL_GLYPH {
                    return Err(TrackFormatError::NotSurroundedByWalls.into());
                }
            }
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut glyphs = Vec::with_capacity(width * height);
        let mut cars: Vec<Car> = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, &glyph) in row.iter().enumerate() {
                let space = match SpaceType::from_glyph(glyph) {
                    Some(space) => space,
                    None => {
                        if cars.iter().any(|car| car.id() == glyph) {
                            return Err(TrackFormatError::DuplicateCarId(glyph).into());
                        }
                        cars.push(Car::new(glyph, Vector2D::new(x as i32, y as i32)));
                        SpaceType::OccupiedByCar
                    }
                };
                cells.push(space);
                glyphs.push(glyph);
            }
        }

        if cars.len() > MAX_CARS {
            return Err(TrackFormatError::TooManyCars {
                count: cars.len(),
                max: MAX_CARS,
            }
            .into());
        }
        if cars.is_empty() {
            return Err(TrackFormatError::NoCars.into());
        }

        log::debug!(
            "Parsed {}x{} track with {} cars",
            width,
            height,
            cars.len()
        );

        Ok(Self {
            width,
            height,
            cells,
            glyphs,
            cars,
        })
    }

    /// Read and parse a track file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| RaceError::from_io(path, e))?;
        Self::parse(&text)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Linear cell index of a position, if it lies on the grid
    pub fn index_of(&self, position: Vector2D) -> Option<usize> {
        let inside = position.x >= 0
            && position.y >= 0
            && (position.x as usize) < self.width
            && (position.y as usize) < self.height;
        inside.then(|| position.y as usize * self.width + position.x as usize)
    }

    /// Position of a linear cell index
    pub fn position_of(&self, index: usize) -> Vector2D {
        Vector2D::new((index % self.width) as i32, (index / self.width) as i32)
    }

    fn checked_index(&self, position: Vector2D) -> Result<usize> {
        self.index_of(position)
            .ok_or(RaceError::OutOfBounds(position))
    }

    pub fn lookup_space_type(&self, position: Vector2D) -> Result<SpaceType> {
        Ok(self.cells[self.checked_index(position)?])
    }

    /// Glyph currently displayed at a position
    pub fn glyph_at(&self, position: Vector2D) -> Result<char> {
        Ok(self.glyphs[self.checked_index(position)?])
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn car(&self, index: usize) -> Option<&Car> {
        self.cars.get(index)
    }

    pub(crate) fn car_mut(&mut self, index: usize) -> Option<&mut Car> {
        self.cars.get_mut(index)
    }

    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    /// Move a car's mark on the grid from its current position to `new_position`.
    ///
    /// If the destination is occupied by another car only the old cell is
    /// cleared; the destination keeps showing the car that was hit. Walls and
    /// finish cells keep their type and only display the car glyph. The car's
    /// own position is left to the caller.
    pub fn update_car_position(&mut self, new_position: Vector2D, car_index: usize) -> Result<()> {
        let car = self.cars.get(car_index).ok_or_else(|| {
            RaceError::InvalidOperation(format!("no car with index {}", car_index))
        })?;
        let id = car.id();
        let old_index = self.checked_index(car.position())?;
        let new_index = self.checked_index(new_position)?;
        if old_index == new_index {
            return Ok(());
        }

        self.cells[old_index] = SpaceType::Track;
        self.glyphs[old_index] = TRACK_GLYPH;

        match self.cells[new_index] {
            SpaceType::OccupiedByCar => {}
            SpaceType::Track => {
                self.cells[new_index] = SpaceType::OccupiedByCar;
                self.glyphs[new_index] = id;
            }
            _ => self.glyphs[new_index] = id,
        }
        Ok(())
    }

    /// Grid as text, one line per row, in the same format it was read from
    pub fn render(&self) -> String {
        self.glyphs
            .chunks(self.width)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Track {
    type Err = RaceError;

    fn from_str(s: &str) -> Result<Self> {
        Track::parse(s)
    }
}

//! Simulation - Race session and turn loop
//!
//! Manages the session state, assigns strategies from the configuration,
//! runs turns and provides the interface the front end (or the headless
//! binary) talks to.

use serde::{Deserialize, Serialize};

use crate::game::car::CarSnapshot;
use crate::game::config::RaceConfig;
use crate::game::error::{RaceError, Result};
use crate::game::race::{Game, TurnOutcome};
use crate::game::strategy::StrategyKind;
use crate::game::track::Track;
use crate::game::vector::Direction;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Idle,
    Ready,
    Racing,
    /// A car won
    Results,
    /// No winner, and no car left that can move on its own
    Stalled,
}

/// Session statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStats {
    pub turns_played: u32,
    pub car_count: usize,
    pub crashed_count: usize,
    pub game_state: GameState,
}

/// Final result of a race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceResult {
    pub winner_index: Option<usize>,
    pub winner_id: Option<char>,
    pub turns_played: u32,
    /// Ids of the cars that crashed
    pub crashed: Vec<char>,
}

/// Race snapshot for a front end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub state: GameState,
    pub turns_played: u32,
    pub current_car: usize,
    pub winner: Option<usize>,
    pub last_outcome: Option<TurnOutcome>,
    pub cars: Vec<CarSnapshot>,
    /// Rendered track
    pub track: String,
}

/// Race session
pub struct GameServer {
    state: GameState,
    /// Active race (if any)
    game: Option<Game>,
    config: RaceConfig,
    turns_played: u32,
    last_outcome: Option<TurnOutcome>,
}

impl GameServer {
    pub fn new() -> Self {
        Self {
            state: GameState::Idle,
            game: None,
            config: RaceConfig::default(),
            turns_played: 0,
            last_outcome: None,
        }
    }

    /// Load the configured track and set up a race on it
    pub fn init_race(&mut self, config: RaceConfig) -> Result<()> {
        let track = Track::from_file(&config.track_path)?;
        self.init_race_with_track(track, config)
    }

    /// Set up a race on an already loaded track
    pub fn init_race_with_track(&mut self, track: Track, config: RaceConfig) -> Result<()> {
        self.reset();

        let mut game = Game::new(track);
        for index in 0..game.car_count() {
            let id = game.car(index).map(|car| car.id()).unwrap_or_default();
            let (kind, source) = config.strategy_for(id);
            game.set_strategy(index, kind, source.as_deref())?;
        }

        let all_stationary = (0..game.car_count())
            .all(|index| game.car_strategy(index) == Some(StrategyKind::Stationary));
        if all_stationary {
            return Err(RaceError::InvalidOperation(
                "every car is stationary, nobody could ever win".to_string(),
            ));
        }

        log::info!(
            "Race initialized on {} with {} cars",
            config.track_path.display(),
            game.car_count()
        );
        self.game = Some(game);
        self.config = config;
        self.state = GameState::Ready;
        Ok(())
    }

    pub fn start_race(&mut self) -> Result<()> {
        if self.state != GameState::Ready {
            return Err(RaceError::InvalidOperation(format!(
                "cannot start a race in state {:?}",
                self.state
            )));
        }
        self.state = GameState::Racing;
        log::info!("Race started");
        Ok(())
    }

    /// Play one turn with the active car's own strategy
    pub fn tick(&mut self) -> Result<Option<RaceSnapshot>> {
        if self.state != GameState::Racing {
            return Ok(self.get_snapshot());
        }
        let direction = match &mut self.game {
            Some(game) => game.next_move(),
            None => return Ok(None),
        };
        self.play_turn(direction)?;
        Ok(self.get_snapshot())
    }

    /// Play one turn for an interactive car with the operator's direction
    pub fn tick_with(&mut self, direction: Direction) -> Result<Option<RaceSnapshot>> {
        if self.state != GameState::Racing {
            return Err(RaceError::InvalidOperation(format!(
                "no race running (state {:?})",
                self.state
            )));
        }
        let game = self.game.as_ref().ok_or_else(|| {
            RaceError::InvalidOperation("no race initialized".to_string())
        })?;
        let index = game.current_car_index();
        if game.car_strategy(index) != Some(StrategyKind::Interactive) {
            return Err(RaceError::InvalidOperation(format!(
                "car {} is not driven interactively",
                game.car_id(index).unwrap_or('?')
            )));
        }
        self.play_turn(direction)?;
        Ok(self.get_snapshot())
    }

    fn play_turn(&mut self, direction: Direction) -> Result<()> {
        let game = self.game.as_mut().ok_or_else(|| {
            RaceError::InvalidOperation("no race initialized".to_string())
        })?;

        let outcome = game.do_car_turn(direction)?;
        game.switch_to_next_active_car();
        self.turns_played += 1;
        self.last_outcome = Some(outcome);

        // Check for state transitions
        if let Some(winner) = game.winner() {
            self.state = GameState::Results;
            log::info!(
                "Race finished after {} turns, winner: {}",
                self.turns_played,
                game.car_id(winner).unwrap_or('?')
            );
        } else if !game.has_movable_car() {
            self.state = GameState::Stalled;
            log::warn!("No car left that can move, the race has no winner");
        }
        Ok(())
    }

    /// Run strategy-driven turns until the race ends or the turn limit is hit
    pub fn run(&mut self) -> Result<RaceResult> {
        if self.state == GameState::Ready {
            self.start_race()?;
        }
        while self.state == GameState::Racing {
            if self.turns_played >= self.config.max_turns {
                log::warn!("Turn limit of {} reached", self.config.max_turns);
                self.state = GameState::Stalled;
                break;
            }
            self.tick()?;
        }
        self.get_results().ok_or_else(|| {
            RaceError::InvalidOperation(format!("race did not run (state {:?})", self.state))
        })
    }

    pub fn get_snapshot(&self) -> Option<RaceSnapshot> {
        self.game.as_ref().map(|game| RaceSnapshot {
            state: self.state,
            turns_played: self.turns_played,
            current_car: game.current_car_index(),
            winner: game.winner(),
            last_outcome: self.last_outcome,
            cars: game.track().cars().iter().map(CarSnapshot::from).collect(),
            track: game.render_track(),
        })
    }

    /// Race results, once the race is over
    pub fn get_results(&self) -> Option<RaceResult> {
        if !matches!(self.state, GameState::Results | GameState::Stalled) {
            return None;
        }
        self.game.as_ref().map(|game| RaceResult {
            winner_index: game.winner(),
            winner_id: game.winner().and_then(|index| game.car_id(index)),
            turns_played: self.turns_played,
            crashed: game
                .track()
                .cars()
                .iter()
                .filter(|car| car.is_crashed())
                .map(|car| car.id())
                .collect(),
        })
    }

    pub fn get_stats(&self) -> ServerStats {
        let cars = self.game.as_ref().map(|game| game.track().cars());
        ServerStats {
            turns_played: self.turns_played,
            car_count: cars.map_or(0, |cars| cars.len()),
            crashed_count: cars.map_or(0, |cars| cars.iter().filter(|c| c.is_crashed()).count()),
            game_state: self.state,
        }
    }

    pub fn get_state(&self) -> GameState {
        self.state
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Reset to idle state
    pub fn reset(&mut self) {
        self.state = GameState::Idle;
        self.game = None;
        self.turns_played = 0;
        self.last_outcome = None;
    }
}

impl Default for GameServer {
    fn default() -> Self {
        Self::new()
    }
}

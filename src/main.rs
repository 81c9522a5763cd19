//! Headless race runner
//!
//! Runs a race without an operator: every car is driven by its configured
//! strategy (interactive cars idle) until a car wins, the race stalls or the
//! turn limit is reached.
//!
//! Usage:
//!   racetrack settings.json
//!   racetrack tracks/oval.txt --default PATH_FOLLOWER
//!   racetrack tracks/oval.txt --car a=SCRIPTED_LIST=moves/a.txt --max-turns 200 --json

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use racetrack::{CarConfig, GameServer, RaceConfig, StrategyKind};

/// Run a race until a car wins, the race stalls or the turn limit is reached
#[derive(Parser, Debug)]
#[command(name = "racetrack", version, about)]
struct Args {
    /// Settings file (`.json`) or track file
    input: PathBuf,

    /// Strategy for cars without their own `--car` entry
    #[arg(long = "default", value_name = "KIND")]
    default_strategy: Option<StrategyKind>,

    /// Strategy of a single car; may be repeated
    #[arg(long = "car", value_name = "ID=KIND[=FILE]", value_parser = parse_car)]
    cars: Vec<CarConfig>,

    /// Turn limit, overriding the settings file
    #[arg(long, value_name = "N")]
    max_turns: Option<u32>,

    /// Print the final snapshot as JSON instead of the track
    #[arg(long)]
    json: bool,
}

fn parse_car(arg: &str) -> Result<CarConfig, String> {
    let mut parts = arg.splitn(3, '=');
    let id = parts
        .next()
        .and_then(|id| {
            let mut chars = id.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        })
        .ok_or_else(|| format!("car id in '{}' must be a single character", arg))?;
    let strategy = parts
        .next()
        .ok_or_else(|| format!("missing strategy in '{}'", arg))?
        .parse::<StrategyKind>()?;
    let source = parts.next().map(PathBuf::from);
    Ok(CarConfig { id, strategy, source })
}

fn build_config(args: Args) -> racetrack::Result<RaceConfig> {
    let mut config = if args.input.extension().is_some_and(|ext| ext == "json") {
        RaceConfig::from_file(&args.input)?
    } else {
        RaceConfig::for_track(args.input)
    };

    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }
    if let Some(kind) = args.default_strategy {
        config.default_strategy = kind;
    }
    for car in args.cars {
        config.cars.retain(|existing| existing.id != car.id);
        config.cars.push(car);
    }
    Ok(config)
}

fn main() -> ExitCode {
    if let Err(e) = logging::try_init() {
        eprintln!("failed to initialize logging: {}", e);
    }

    let args = Args::parse();
    let json = args.json;

    let mut server = GameServer::new();
    let result = build_config(args)
        .and_then(|config| server.init_race(config))
        .and_then(|()| server.run());

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if json {
        match serde_json::to_string_pretty(&server.get_snapshot()) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                log::error!("failed to serialize snapshot: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        if let Some(game) = server.game() {
            println!("{}", game.render_track());
        }
        match result.winner_id {
            Some(id) => println!("Player {} has won after {} turns!", id, result.turns_played),
            None => println!("No winner after {} turns.", result.turns_played),
        }
    }
    ExitCode::SUCCESS
}

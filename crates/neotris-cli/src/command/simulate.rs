use std::{
    thread,
    time::{Duration, Instant},
};

use neotris_engine::{
    EngineConfig, GameCommand, GameEngine, GameEvent, GameState, Persistence, PieceSeed,
    SessionRecord, Ticker,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{store::FileStore, util};

/// Chance that a simulated player issues a command on a given tick.
const INPUT_PROBABILITY: f64 = 0.15;

const COMMANDS: [GameCommand; 6] = [
    GameCommand::MoveLeft,
    GameCommand::MoveRight,
    GameCommand::MoveDown,
    GameCommand::Rotate,
    GameCommand::RotateCounterClockwise,
    GameCommand::HardDrop,
];

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed for piece generation and simulated input (up to 32 hex digits)
    #[arg(long, value_parser = parse_seed)]
    seed: Option<PieceSeed>,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Tick on the wall clock instead of a simulated 60 Hz clock
    #[arg(long)]
    realtime: bool,
    /// Pause and save a game once it reaches this many ticks
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,
}

fn parse_seed(s: &str) -> Result<PieceSeed, String> {
    PieceSeed::from_hex(s).ok_or_else(|| format!("invalid seed: {s}"))
}

/// Source of tick durations.
#[derive(Debug)]
enum Clock {
    Simulated(Duration),
    Realtime(Ticker),
}

impl Clock {
    fn new(realtime: bool) -> Self {
        let ticker = Ticker::default();
        if realtime {
            Self::Realtime(ticker)
        } else {
            Self::Simulated(ticker.interval())
        }
    }

    fn start(&mut self) {
        if let Self::Realtime(ticker) = self {
            ticker.restart(Instant::now());
        }
    }

    /// Waits for the next tick and returns the time elapsed since the last.
    fn next_tick(&mut self) -> Duration {
        match self {
            Self::Simulated(interval) => *interval,
            Self::Realtime(ticker) => loop {
                let now = Instant::now();
                if let Some(elapsed) = ticker.poll(now) {
                    break elapsed;
                }
                thread::sleep(ticker.time_until_next(now).unwrap_or(ticker.interval()));
            },
        }
    }
}

pub(crate) fn run(arg: &SimulateArg, config: EngineConfig, store: FileStore) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        games,
        realtime,
        max_ticks,
    } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    println!("Seed: {}", seed.to_hex());
    let config = EngineConfig {
        seed: Some(seed),
        ..config
    };

    let mut player = Pcg32::from_seed(seed.to_bytes());
    let mut clock = Clock::new(*realtime);
    let mut engine = GameEngine::new(config, store);

    for game in 1..=*games {
        match play_game(&mut engine, &mut player, &mut clock, *max_ticks) {
            Some(record) => println!(
                "Game {game}: score {}, level {}, {} lines in {}",
                record.final_score,
                record.final_level,
                record.total_lines_cleared,
                util::format_duration(record.play_duration)
            ),
            None => {
                println!(
                    "Game {game}: stopped after {max_ticks} ticks with score {} (saved)",
                    engine.score().score()
                );
                break;
            }
        }
        engine.reset();
    }

    println!("High score: {}", engine.score().high_score());
    Ok(())
}

/// Plays one game to completion and returns its record.
///
/// A game still running after `max_ticks` is paused, leaving it saved for a
/// later run, and `None` is returned.
fn play_game<S, R>(
    engine: &mut GameEngine<S>,
    player: &mut R,
    clock: &mut Clock,
    max_ticks: u64,
) -> Option<SessionRecord>
where
    S: Persistence,
    R: rand::Rng,
{
    match engine.state() {
        GameState::Paused => {
            log::info!("resuming saved game");
            engine.resume().ok();
        }
        GameState::Waiting => {
            engine.start().ok();
        }
        GameState::Playing | GameState::GameOver => {}
    }

    clock.start();
    for _ in 0..max_ticks {
        if player.random_bool(INPUT_PROBABILITY) {
            let command = COMMANDS[player.random_range(0..COMMANDS.len())];
            if let Err(err) = engine.apply(command) {
                log::trace!("{err}");
            }
        }
        engine.tick(clock.next_tick());

        for event in engine.take_events() {
            log::debug!("{event:?}");
            if let GameEvent::GameOver(record) = event {
                return Some(record);
            }
        }
    }

    engine.pause().ok();
    None
}

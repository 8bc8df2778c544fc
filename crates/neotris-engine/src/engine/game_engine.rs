use std::{collections::VecDeque, mem, time::Duration};

use chrono::{DateTime, Utc};

use crate::{
    Board, EngineConfig, GameCommand, GameState, MemoryStore, Persistence, PersistenceError,
    Piece, PieceCollisionError, PieceKind, PieceRandomizer, Progression, SavedGame, Score,
    SessionRecord,
};

/// Change notification queued by the engine and drained by its owner.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    StateChanged { from: GameState, to: GameState },
    PieceLocked { kind: PieceKind, lines_cleared: usize },
    LevelUp { level: u32 },
    NewHighScore { high_score: u64 },
    GameOver(SessionRecord),
}

/// Reason a command left the game unchanged.
///
/// Purely informational: a rejected command is a normal part of play, and
/// hosts driving the engine from player input may discard it.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CommandError {
    #[display("{command:?} is not accepted while {state}")]
    NotAccepted {
        command: GameCommand,
        state: GameState,
    },
    #[display("{_0}")]
    PieceCollision(PieceCollisionError),
}

/// A single game of Neotris: board, falling piece, scoring and lifecycle.
///
/// The engine is driven by discrete commands and by [`Self::tick`], which
/// receives the play time elapsed since the previous tick. Commands that are
/// not valid in the current state, or that would move the piece into an
/// illegal position, leave the game unchanged and return an error that callers
/// are free to ignore.
///
/// Progress is reported to a [`Persistence`] backend on a best-effort basis.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use neotris_engine::{EngineConfig, GameEngine, GameState, MemoryStore};
///
/// let mut engine = GameEngine::new(EngineConfig::default(), MemoryStore::new());
/// assert_eq!(engine.state(), GameState::Waiting);
///
/// engine.start().unwrap();
/// engine.hard_drop().unwrap();
/// engine.tick(Duration::from_secs(1));
///
/// assert_eq!(engine.board().filled_count(), 4);
/// ```
#[derive(Debug)]
pub struct GameEngine<S = MemoryStore> {
    config: EngineConfig,
    board: Board,
    current: Piece,
    ghost: Piece,
    next: VecDeque<PieceKind>,
    randomizer: PieceRandomizer,
    progression: Progression,
    score: Score,
    state: GameState,
    since_last_drop: Duration,
    play_time: Duration,
    level_up_remaining: Option<Duration>,
    created_at: DateTime<Utc>,
    events: Vec<GameEvent>,
    store: S,
}

impl<S> GameEngine<S>
where
    S: Persistence,
{
    /// Creates an engine, restoring the game saved in `store` when there is one.
    ///
    /// A saved game that cannot be read, does not fit the configured board or
    /// leaves no room for its falling piece is discarded in favor of a fresh
    /// game.
    pub fn new(config: EngineConfig, mut store: S) -> Self {
        let high_score = store.high_score().unwrap_or_else(|err| {
            log::warn!("failed to load high score: {err}");
            0
        });
        let saved = store.load_in_progress().unwrap_or_else(|err| {
            log::warn!("failed to load saved game: {err}");
            None
        });
        let setup = saved
            .and_then(|saved| {
                Setup::restore(&config, saved).unwrap_or_else(|err| {
                    log::warn!("discarding saved game: {err}");
                    None
                })
            })
            .unwrap_or_else(|| Setup::deal(&config));

        let Setup {
            board,
            current,
            next,
            randomizer,
            progression,
            mut score,
            state,
            created_at,
            play_time,
        } = setup;
        score.merge_high_score(high_score);

        let mut engine = Self {
            config,
            board,
            current,
            ghost: current,
            next,
            randomizer,
            progression,
            score,
            state,
            since_last_drop: Duration::ZERO,
            play_time,
            level_up_remaining: None,
            created_at,
            events: vec![],
            store,
        };
        engine.refresh_ghost();
        engine
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> &Piece {
        &self.current
    }

    /// Where the current piece would land if hard-dropped now.
    #[must_use]
    pub fn ghost_piece(&self) -> &Piece {
        &self.ghost
    }

    /// Upcoming piece kinds, nearest first.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.next.iter().copied()
    }

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Time spent in the playing state during this game.
    #[must_use]
    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn is_level_up_active(&self) -> bool {
        self.level_up_remaining.is_some()
    }

    pub fn clear_level_up(&mut self) {
        self.level_up_remaining = None;
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Removes and returns every event queued since the previous call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Captures the current game for later restoration.
    #[must_use]
    pub fn snapshot(&self) -> SavedGame {
        SavedGame {
            board: self.board.to_tags(),
            current_piece: Some(self.current),
            next_pieces: self.next.iter().copied().collect(),
            randomizer: self.randomizer.clone(),
            progression: self.progression,
            score: self.score,
            state: self.state,
            created_at: self.created_at,
            last_played_at: Utc::now(),
            play_duration: self.play_time,
        }
    }

    pub fn apply(&mut self, command: GameCommand) -> Result<(), CommandError> {
        match command {
            GameCommand::Start => self.start(),
            GameCommand::Pause => self.pause(),
            GameCommand::Resume => self.resume(),
            GameCommand::TogglePause => self.toggle_pause(),
            GameCommand::Reset => {
                self.reset();
                Ok(())
            }
            GameCommand::MoveLeft => self.move_left(),
            GameCommand::MoveRight => self.move_right(),
            GameCommand::MoveDown => self.move_down(),
            GameCommand::Rotate => self.rotate(),
            GameCommand::RotateCounterClockwise => self.rotate_counter_clockwise(),
            GameCommand::HardDrop => self.hard_drop(),
        }
    }

    pub fn start(&mut self) -> Result<(), CommandError> {
        self.expect_state(GameCommand::Start, GameState::Waiting)?;
        self.created_at = Utc::now();
        self.since_last_drop = Duration::ZERO;
        self.set_state(GameState::Playing);
        self.save_in_progress();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), CommandError> {
        self.expect_state(GameCommand::Pause, GameState::Playing)?;
        self.set_state(GameState::Paused);
        self.save_in_progress();
        Ok(())
    }

    /// Continues a paused game with a fresh drop timer.
    pub fn resume(&mut self) -> Result<(), CommandError> {
        self.expect_state(GameCommand::Resume, GameState::Paused)?;
        self.since_last_drop = Duration::ZERO;
        self.set_state(GameState::Playing);
        self.save_in_progress();
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), CommandError> {
        match self.state {
            GameState::Playing => self.pause(),
            GameState::Paused => self.resume(),
            state => Err(CommandError::NotAccepted {
                command: GameCommand::TogglePause,
                state,
            }),
        }
    }

    /// Discards the current game and waits for a new start.
    ///
    /// The high score is kept.
    pub fn reset(&mut self) {
        log::info!("resetting game");
        self.new_game();
        self.clear_in_progress();
    }

    pub fn move_left(&mut self) -> Result<(), CommandError> {
        self.transform_piece(GameCommand::MoveLeft, Piece::left)
    }

    pub fn move_right(&mut self) -> Result<(), CommandError> {
        self.transform_piece(GameCommand::MoveRight, Piece::right)
    }

    pub fn move_down(&mut self) -> Result<(), CommandError> {
        self.transform_piece(GameCommand::MoveDown, Piece::down)
    }

    pub fn rotate(&mut self) -> Result<(), CommandError> {
        self.transform_piece(GameCommand::Rotate, |piece| piece.rotated(true))
    }

    pub fn rotate_counter_clockwise(&mut self) -> Result<(), CommandError> {
        self.transform_piece(GameCommand::RotateCounterClockwise, |piece| {
            piece.rotated(false)
        })
    }

    /// Moves the piece straight to its landing row without locking it.
    ///
    /// The piece locks on the first automatic drop after a full drop interval.
    pub fn hard_drop(&mut self) -> Result<(), CommandError> {
        self.expect_state(GameCommand::HardDrop, GameState::Playing)?;
        if self.ghost != self.current {
            self.current = self.ghost;
            self.since_last_drop = Duration::ZERO;
        }
        Ok(())
    }

    /// Advances the game by `elapsed` of play time.
    ///
    /// Ignored unless playing. When a drop interval has passed the piece moves
    /// down one row, or locks if it cannot.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.state.is_playing() {
            return;
        }
        self.play_time += elapsed;
        self.age_level_up(elapsed);

        self.since_last_drop += elapsed;
        if self.since_last_drop < self.progression.drop_interval() {
            return;
        }
        self.since_last_drop = Duration::ZERO;
        if self.set_current(self.current.down()).is_err() {
            self.lock_current();
        }
    }

    fn expect_state(&self, command: GameCommand, expected: GameState) -> Result<(), CommandError> {
        if self.state != expected {
            log::trace!("ignoring {command:?} while {}", self.state);
            return Err(CommandError::NotAccepted {
                command,
                state: self.state,
            });
        }
        Ok(())
    }

    fn transform_piece(
        &mut self,
        command: GameCommand,
        f: impl FnOnce(&Piece) -> Piece,
    ) -> Result<(), CommandError> {
        self.expect_state(command, GameState::Playing)?;
        let piece = f(&self.current);
        self.set_current(piece)
            .map_err(CommandError::PieceCollision)
    }

    fn set_current(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.current = piece;
        self.refresh_ghost();
        Ok(())
    }

    fn refresh_ghost(&mut self) {
        let mut piece = self.current;
        loop {
            let below = piece.down();
            if self.board.is_colliding(&below) {
                break;
            }
            piece = below;
        }
        self.ghost = piece;
    }

    fn set_state(&mut self, state: GameState) {
        if self.state == state {
            return;
        }
        log::debug!("game state {} -> {state}", self.state);
        self.events.push(GameEvent::StateChanged {
            from: self.state,
            to: state,
        });
        self.state = state;
    }

    fn fill_preview(&mut self) {
        while self.next.len() < self.config.preview_len {
            self.next.push_back(self.randomizer.next_kind());
        }
    }

    /// Promotes the head of the preview queue and draws a new tail.
    fn draw_next(&mut self) -> PieceKind {
        let kind = self
            .next
            .pop_front()
            .unwrap_or_else(|| self.randomizer.next_kind());
        self.fill_preview();
        kind
    }

    fn spawn_next(&mut self) {
        let kind = self.draw_next();
        self.current = Piece::spawn(kind, self.board.width());
        self.refresh_ghost();
    }

    fn age_level_up(&mut self, elapsed: Duration) {
        if let Some(remaining) = self.level_up_remaining {
            let remaining = remaining.saturating_sub(elapsed);
            self.level_up_remaining = (!remaining.is_zero()).then_some(remaining);
        }
    }

    fn lock_current(&mut self) {
        let piece = self.current;
        self.board.fill_piece(&piece);
        let lines_cleared = self.board.clear_completed_rows();
        if lines_cleared > 0 {
            self.register_clear(lines_cleared);
        }
        log::debug!(
            "locked {} piece at {:?}, {lines_cleared} rows cleared",
            piece.kind().as_char(),
            piece.origin()
        );
        self.events.push(GameEvent::PieceLocked {
            kind: piece.kind(),
            lines_cleared,
        });

        let topped_out = self.board.is_top_row_occupied();
        self.spawn_next();
        if topped_out || self.board.is_colliding(&self.current) {
            self.end_game();
        } else {
            self.save_in_progress();
        }
    }

    fn register_clear(&mut self, lines_cleared: usize) {
        let previous_high_score = self.score.high_score();
        self.score.award(lines_cleared, self.progression.level());

        let count = u32::try_from(lines_cleared).unwrap_or(u32::MAX);
        if self.progression.register_lines_cleared(count) {
            let level = self.progression.level();
            log::info!("level up: {level}");
            self.level_up_remaining = Some(self.config.level_up_display);
            self.events.push(GameEvent::LevelUp { level });
        }

        let high_score = self.score.high_score();
        if high_score > previous_high_score {
            self.events.push(GameEvent::NewHighScore { high_score });
            if let Err(err) = self.store.set_high_score(high_score) {
                log::warn!("failed to save high score: {err}");
            }
        }
    }

    fn end_game(&mut self) {
        self.set_state(GameState::GameOver);
        let record = SessionRecord {
            created_at: self.created_at,
            completed_at: Utc::now(),
            final_score: self.score.score(),
            final_level: self.progression.level(),
            total_lines_cleared: self.progression.lines_cleared(),
            play_duration: self.play_time,
        };
        log::info!(
            "game over: score {}, level {}, {} lines",
            record.final_score,
            record.final_level,
            record.total_lines_cleared
        );
        if let Err(err) = self.store.append_session(&record) {
            log::warn!("failed to record session: {err}");
        }
        self.clear_in_progress();
        self.events.push(GameEvent::GameOver(record));
    }

    fn new_game(&mut self) {
        self.board = self.config.board();
        self.next.clear();
        self.fill_preview();
        self.spawn_next();
        self.progression = Progression::new();
        self.score.reset();
        self.since_last_drop = Duration::ZERO;
        self.play_time = Duration::ZERO;
        self.level_up_remaining = None;
        self.created_at = Utc::now();
        self.set_state(GameState::Waiting);
    }

    fn save_in_progress(&mut self) {
        let saved = self.snapshot();
        if let Err(err) = self.store.save_in_progress(&saved) {
            log::warn!("failed to save game in progress: {err}");
        }
    }

    fn clear_in_progress(&mut self) {
        if let Err(err) = self.store.clear_in_progress() {
            log::warn!("failed to clear saved game: {err}");
        }
    }
}

/// Starting position of an engine, either freshly dealt or read from a snapshot.
#[derive(Debug)]
struct Setup {
    board: Board,
    current: Piece,
    next: VecDeque<PieceKind>,
    randomizer: PieceRandomizer,
    progression: Progression,
    score: Score,
    state: GameState,
    created_at: DateTime<Utc>,
    play_time: Duration,
}

impl Setup {
    fn deal(config: &EngineConfig) -> Self {
        let board = config.board();
        let mut randomizer = config.randomizer();
        let current = Piece::spawn(randomizer.next_kind(), board.width());
        let next = (0..config.preview_len)
            .map(|_| randomizer.next_kind())
            .collect();
        Self {
            board,
            current,
            next,
            randomizer,
            progression: Progression::new(),
            score: Score::new(),
            state: GameState::Waiting,
            created_at: Utc::now(),
            play_time: Duration::ZERO,
        }
    }

    /// Decodes a snapshot, or returns `None` for a game that already ended.
    ///
    /// A game saved while playing comes back paused. The level is recomputed
    /// from the cleared line count.
    fn restore(
        config: &EngineConfig,
        saved: SavedGame,
    ) -> Result<Option<Self>, PersistenceError> {
        if saved.state.is_game_over() {
            log::debug!("ignoring saved game that already ended");
            return Ok(None);
        }
        let empty = config.board();
        let board = Board::from_tags(empty.width(), empty.height(), &saved.board)?;

        let mut randomizer = saved.randomizer;
        let mut next: VecDeque<_> = saved.next_pieces.into_iter().collect();
        let current = match saved.current_piece {
            Some(piece) if !board.is_colliding(&piece) => piece,
            _ => {
                let kind = next.pop_front().unwrap_or_else(|| randomizer.next_kind());
                Piece::spawn(kind, board.width())
            }
        };
        if board.is_colliding(&current) {
            return Err(PieceCollisionError.into());
        }
        while next.len() < config.preview_len {
            next.push_back(randomizer.next_kind());
        }

        let progression = Progression::from_lines_cleared(saved.progression.lines_cleared());
        let state = match saved.state {
            GameState::Playing => GameState::Paused,
            state => state,
        };
        log::info!(
            "restored saved game: score {}, level {}",
            saved.score.score(),
            progression.level()
        );
        Ok(Some(Self {
            board,
            current,
            next,
            randomizer,
            progression,
            score: saved.score,
            state,
            created_at: saved.created_at,
            play_time: saved.play_duration,
        }))
    }
}

use std::io;

use crate::{BoardDecodeError, PieceCollisionError, SavedGame, SessionRecord};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PersistenceError {
    #[display("storage I/O failed: {_0}")]
    Io(io::Error),
    #[display("stored data is not valid JSON: {_0}")]
    Json(serde_json::Error),
    #[display("saved board does not fit this game: {_0}")]
    Corrupt(BoardDecodeError),
    #[display("saved game has no room for its falling piece: {_0}")]
    Blocked(PieceCollisionError),
}

/// Storage boundary for game progress, finished sessions and the high score.
///
/// The engine treats every failure here as non-fatal: errors are logged and
/// play continues.
pub trait Persistence {
    fn save_in_progress(&mut self, game: &SavedGame) -> Result<(), PersistenceError>;

    /// Loads the in-progress snapshot, if one exists.
    fn load_in_progress(&mut self) -> Result<Option<SavedGame>, PersistenceError>;

    fn clear_in_progress(&mut self) -> Result<(), PersistenceError>;

    fn append_session(&mut self, record: &SessionRecord) -> Result<(), PersistenceError>;

    /// Stored high score, `0` when none has been recorded yet.
    fn high_score(&mut self) -> Result<u64, PersistenceError>;

    fn set_high_score(&mut self, high_score: u64) -> Result<(), PersistenceError>;
}

/// In-memory [`Persistence`] backend.
///
/// The snapshot is kept as serialized JSON so it goes through the same
/// encoding as a file-backed store. Writes can be made to fail on demand.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    in_progress: Option<String>,
    sessions: Vec<SessionRecord>,
    high_score: u64,
    fail_writes: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    /// Raw JSON of the in-progress snapshot.
    #[must_use]
    pub fn raw_in_progress(&self) -> Option<&str> {
        self.in_progress.as_deref()
    }

    /// Replaces the stored snapshot with arbitrary text.
    pub fn set_raw_in_progress(&mut self, raw: impl Into<String>) {
        self.in_progress = Some(raw.into());
    }

    /// Makes every subsequent write fail with an I/O error.
    pub fn set_fail_writes(&mut self, fail_writes: bool) {
        self.fail_writes = fail_writes;
    }

    fn check_writable(&self) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(io::Error::other("memory store is read-only").into());
        }
        Ok(())
    }
}

impl Persistence for MemoryStore {
    fn save_in_progress(&mut self, game: &SavedGame) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.in_progress = Some(serde_json::to_string(game)?);
        Ok(())
    }

    fn load_in_progress(&mut self) -> Result<Option<SavedGame>, PersistenceError> {
        let Some(raw) = &self.in_progress else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(raw)?))
    }

    fn clear_in_progress(&mut self) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.in_progress = None;
        Ok(())
    }

    fn append_session(&mut self, record: &SessionRecord) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.sessions.push(record.clone());
        Ok(())
    }

    fn high_score(&mut self) -> Result<u64, PersistenceError> {
        Ok(self.high_score)
    }

    fn set_high_score(&mut self, high_score: u64) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.high_score = high_score;
        Ok(())
    }
}

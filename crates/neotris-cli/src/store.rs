use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use neotris_engine::{Persistence, PersistenceError, SavedGame, SessionRecord};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

const SAVED_GAME_FILE: &str = "saved_game.json";
const SESSIONS_FILE: &str = "sessions.json";
const HIGH_SCORE_FILE: &str = "high_score.json";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct HighScoreFile {
    high_score: u64,
}

/// [`Persistence`] backend keeping one JSON file per concern in a data directory.
///
/// - `saved_game.json`: the game in progress
/// - `sessions.json`: every finished game, oldest first
/// - `high_score.json`: the best score so far
///
/// Missing files read as empty. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Sessions in listing order, most recently completed first.
    pub fn recent_sessions(&self) -> Result<Vec<SessionRecord>, PersistenceError> {
        let mut sessions = self.read_sessions()?;
        sessions.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(sessions)
    }

    /// Deletes the session at `index` in [`Self::recent_sessions`] order.
    ///
    /// Returns the removed record, or `None` when the index is out of range.
    pub fn delete_session(
        &self,
        index: usize,
    ) -> Result<Option<SessionRecord>, PersistenceError> {
        let mut sessions = self.recent_sessions()?;
        if index >= sessions.len() {
            return Ok(None);
        }
        let removed = sessions.remove(index);
        sessions.reverse();
        self.write_json(SESSIONS_FILE, &sessions)?;
        log::info!("deleted session completed at {}", removed.completed_at);
        Ok(Some(removed))
    }

    fn read_sessions(&self) -> Result<Vec<SessionRecord>, PersistenceError> {
        Ok(self.read_json(SESSIONS_FILE)?.unwrap_or_default())
    }

    fn read_json<T>(&self, file_name: &str) -> Result<Option<T>, PersistenceError>
    where
        T: DeserializeOwned,
    {
        let path = self.path(file_name);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let value = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(value))
    }

    fn write_json<T>(&self, file_name: &str, value: &T) -> Result<(), PersistenceError>
    where
        T: Serialize + ?Sized,
    {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(file_name);
        // Written beside the target and renamed so readers never see a partial file.
        let tmp_path = path.with_extension("json.tmp");
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_path, &path)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    fn remove(&self, file_name: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path(file_name)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

impl Persistence for FileStore {
    fn save_in_progress(&mut self, game: &SavedGame) -> Result<(), PersistenceError> {
        self.write_json(SAVED_GAME_FILE, game)
    }

    fn load_in_progress(&mut self) -> Result<Option<SavedGame>, PersistenceError> {
        self.read_json(SAVED_GAME_FILE)
    }

    fn clear_in_progress(&mut self) -> Result<(), PersistenceError> {
        self.remove(SAVED_GAME_FILE)
    }

    fn append_session(&mut self, record: &SessionRecord) -> Result<(), PersistenceError> {
        let mut sessions = self.read_sessions()?;
        sessions.push(record.clone());
        self.write_json(SESSIONS_FILE, &sessions)
    }

    fn high_score(&mut self) -> Result<u64, PersistenceError> {
        let file: Option<HighScoreFile> = self.read_json(HIGH_SCORE_FILE)?;
        Ok(file.unwrap_or_default().high_score)
    }

    fn set_high_score(&mut self, high_score: u64) -> Result<(), PersistenceError> {
        self.write_json(HIGH_SCORE_FILE, &HighScoreFile { high_score })
    }
}

//! Settings and high score storage
//!
//! The game core owns no storage. It reads settings and scores at start and
//! writes the board at game over through a [`ScoreStore`].
//!
//! Error handling:
//! - Load failures fall back to defaults (logged by the caller)
//! - Save failures are logged but never block a phase transition

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GameResult;
use crate::highscores::HighScores;
use crate::settings::Settings;

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";
/// High score filename
const HIGH_SCORES_FILENAME: &str = "highScores.json";

/// External settings/score store
pub trait ScoreStore {
    /// Stored settings, or `Ok(None)` if nothing was saved yet
    fn load_settings(&mut self) -> GameResult<Option<Settings>>;

    fn save_settings(&mut self, settings: &Settings) -> GameResult<()>;

    /// Stored board, or an empty one if nothing was saved yet
    fn load_high_scores(&mut self) -> GameResult<HighScores>;

    fn save_high_scores(&mut self, scores: &HighScores) -> GameResult<()>;
}

/// JSON files in a data directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, name: &str) -> GameResult<Option<String>> {
        let path = self.dir.join(name);
        if !path.exists() {
            log::info!("No {} found at {:?}", name, path);
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, name: &str, json: String) -> GameResult<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        // Write-then-rename
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        log::info!("Saved {:?}", path);
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn load_settings(&mut self) -> GameResult<Option<Settings>> {
        match self.read(SETTINGS_FILENAME)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save_settings(&mut self, settings: &Settings) -> GameResult<()> {
        self.write(SETTINGS_FILENAME, serde_json::to_string_pretty(settings)?)
    }

    fn load_high_scores(&mut self) -> GameResult<HighScores> {
        match self.read(HIGH_SCORES_FILENAME)? {
            Some(json) => {
                let scores: Vec<u32> = serde_json::from_str(&json)?;
                Ok(HighScores::from_scores(scores))
            }
            None => Ok(HighScores::new()),
        }
    }

    fn save_high_scores(&mut self, scores: &HighScores) -> GameResult<()> {
        self.write(HIGH_SCORES_FILENAME, serde_json::to_string(scores)?)
    }
}

/// In-process store for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub settings: Option<Settings>,
    pub high_scores: HighScores,
    /// Number of successful board saves
    pub saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: Some(settings),
            ..Default::default()
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load_settings(&mut self) -> GameResult<Option<Settings>> {
        Ok(self.settings.clone())
    }

    fn save_settings(&mut self, settings: &Settings) -> GameResult<()> {
        self.settings = Some(settings.clone());
        Ok(())
    }

    fn load_high_scores(&mut self) -> GameResult<HighScores> {
        Ok(self.high_scores.clone())
    }

    fn save_high_scores(&mut self, scores: &HighScores) -> GameResult<()> {
        self.high_scores = scores.clone();
        self.saves += 1;
        Ok(())
    }
}

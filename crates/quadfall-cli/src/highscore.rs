use std::{
    fs::{self, File},
    io::BufWriter,
    path::PathBuf,
};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// On-disk record: a single integer keyed by `high_score`.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
struct HighScoreRecord {
    high_score: usize,
}

/// File-backed high score, owned entirely by the CLI.
///
/// The engine knows nothing about persistence; finished games are submitted
/// here and only a new best is written back.
#[derive(Debug)]
pub struct HighScoreStore {
    path: PathBuf,
    best: usize,
    dirty: bool,
}

impl HighScoreStore {
    /// Loads the stored best score.
    ///
    /// A missing or unreadable file degrades to a best of 0; it never aborts
    /// the game.
    pub fn load(path: PathBuf) -> Self {
        let best = fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str::<HighScoreRecord>(&text).ok())
            .map_or(0, |record| record.high_score);
        Self {
            path,
            best,
            dirty: false,
        }
    }

    pub fn best(&self) -> usize {
        self.best
    }

    /// Records a finished game's score, keeping only the best.
    pub fn submit(&mut self, score: usize) {
        if score > self.best {
            self.best = score;
            self.dirty = true;
        }
    }

    /// Writes the record back, if a new best was submitted.
    pub fn save(&self) -> anyhow::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = File::create(&self.path)
            .with_context(|| format!("failed to create {}", self.path.display()))?;
        let record = HighScoreRecord {
            high_score: self.best,
        };
        serde_json::to_writer_pretty(BufWriter::new(file), &record)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("quadfall-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_missing_file_degrades_to_zero() {
        let store = HighScoreStore::load(scratch_path("missing"));
        assert_eq!(store.best(), 0);
    }

    #[test]
    fn test_corrupt_file_degrades_to_zero() {
        let path = scratch_path("corrupt");
        fs::write(&path, "not json at all").unwrap();
        let store = HighScoreStore::load(path.clone());
        assert_eq!(store.best(), 0);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_submit_keeps_only_the_best() {
        let mut store = HighScoreStore::load(scratch_path("submit"));
        store.submit(500);
        store.submit(300);
        assert_eq!(store.best(), 500);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let path = scratch_path("roundtrip");
        let mut store = HighScoreStore::load(path.clone());
        store.submit(1200);
        store.save().unwrap();

        let reloaded = HighScoreStore::load(path.clone());
        assert_eq!(reloaded.best(), 1200);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_save_without_a_new_best_writes_nothing() {
        let path = scratch_path("untouched");
        let store = HighScoreStore::load(path.clone());
        store.save().unwrap();
        assert!(!path.exists());
    }
}

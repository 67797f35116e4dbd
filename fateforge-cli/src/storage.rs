//! File-backed run storage.
//!
//! The save is one JSON document. Writes go to a sibling temp file first
//! and land via rename, so a crash mid-write never leaves a half-updated
//! record behind.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fateforge_game::{RunStorage, ScenarioProgress};

#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    #[error("save file I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Run storage over a single JSON save file.
pub struct FileRunStorage {
    path: PathBuf,
}

impl FileRunStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RunStorage for FileRunStorage {
    type Error = FileStorageError;

    fn save_run(&self, run: &ScenarioProgress) -> Result<(), Self::Error> {
        let json = run.to_json()?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn load_run(&self) -> Result<Option<ScenarioProgress>, Self::Error> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match ScenarioProgress::from_json(&json) {
            Ok(run) => Ok(Some(run)),
            Err(err) => {
                // Corrupt save: discard it and start fresh.
                log::warn!("discarding unreadable save {}: {err}", self.path.display());
                let _ = fs::remove_file(&self.path);
                Ok(None)
            }
        }
    }

    fn clear_run(&self) -> Result<(), Self::Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

//! Save record persistence
//!
//! The save record is a single JSON file holding settings and per-map
//! highscores. Reads never fail; a missing or damaged file yields the
//! defaults. Writes go to a sibling temp file first and are renamed into
//! place.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::highscores::HighScores;
use crate::settings::Settings;

/// Everything that survives between runs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveRecord {
    pub settings: Settings,
    pub highscores: HighScores,
}

/// Writing the save record failed
#[derive(Debug)]
pub enum PersistError {
    Io { path: PathBuf, source: io::Error },
    Encode(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io { path, source } => {
                write!(f, "failed to write save file {}: {}", path.display(), source)
            }
            PersistError::Encode(e) => write!(f, "failed to encode save record: {}", e),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io { source, .. } => Some(source),
            PersistError::Encode(e) => Some(e),
        }
    }
}

/// Load the save record at `path`, falling back to defaults
pub fn load(path: &Path) -> SaveRecord {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("No save file at {}, starting fresh", path.display());
            return SaveRecord::default();
        }
        Err(e) => {
            log::warn!("Could not read save file {}: {}; using defaults", path.display(), e);
            return SaveRecord::default();
        }
    };

    match serde_json::from_str(&json) {
        Ok(record) => {
            log::info!("Loaded save file {}", path.display());
            record
        }
        Err(e) => {
            log::warn!("Save file {} is corrupt: {}; using defaults", path.display(), e);
            SaveRecord::default()
        }
    }
}

/// Write the save record to `path` (tmp → save)
pub fn save(path: &Path, record: &SaveRecord) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(record).map_err(PersistError::Encode)?;

    let tmp = path.with_extension("tmp");
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;

    log::debug!("Save file written to {}", path.display());
    Ok(())
}

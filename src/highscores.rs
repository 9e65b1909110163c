//! Per-map best scores

use serde::{Deserialize, Serialize};

use crate::consts::MAP_COUNT;

/// Best score for each map slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HighScores {
    pub best: [u64; MAP_COUNT],
}

impl HighScores {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score on `map`, zero for unknown slots
    pub fn best(&self, map: usize) -> u64 {
        self.best.get(map).copied().unwrap_or(0)
    }

    /// Check if a score would replace the current best
    pub fn qualifies(&self, map: usize, score: u64) -> bool {
        map < MAP_COUNT && score > self.best(map)
    }

    /// Store `score` if it beats the current best on `map`.
    /// Returns whether the table changed.
    pub fn record(&mut self, map: usize, score: u64) -> bool {
        if !self.qualifies(map, score) {
            return false;
        }
        self.best[map] = score;
        log::info!("New highscore {} on map {}", score, map);
        true
    }
}

//! Disorderly Conduct - body-swapping arcade platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity pools, tile collision, AI, possession)
//! - `tilemap`: Tile grid loading and classification
//! - `platform`: Input/audio abstraction for the host engine
//! - `persistence`: Save record load/save
//! - `tuning`: Data-driven physics balance
//! - `game`: Session driver tying the simulation to the host

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tilemap;
pub mod tuning;

pub use game::Game;
pub use highscores::HighScores;
pub use settings::Settings;
pub use tilemap::{LevelError, TileMap};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (the host engine ticks at 30 Hz)
    pub const SIM_DT: f32 = 1.0 / 30.0;
    /// Maximum ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Pool capacities
    pub const MAX_CHARACTERS: usize = 64;
    pub const MAX_PROJECTILES: usize = 128;
    pub const MAX_PARTICLES: usize = 512;

    /// Velocity clamp on both axes (pixels per tick)
    pub const SPEED_LIMIT: f32 = 12.0;
    /// Added to y-velocity every tick (pixels per tick²)
    pub const GRAVITY: f32 = 0.6;
    pub const GROUND_FRICTION: f32 = 0.3;
    pub const AIR_FRICTION: f32 = 0.04;
    /// Fraction of velocity kept (inverted) after hitting a wall or entity
    pub const BOUNCE_PRESERVED: f32 = 0.2;
    /// Fraction of velocity kept (inverted) after hitting a bouncy wall
    pub const BOUNCE_PRESERVED_BOUNCE_WALL: f32 = 0.5;
    /// Step used when backing a body out of a blocking collision
    pub const RETREAT_STEP: f32 = 0.1;
    /// Distance below the feet probed for ground contact
    pub const GROUND_PROBE: f32 = 1.0;
    /// Horizontal impact speed that produces a wall-bump sound
    pub const WALL_BUMP_SPEED: f32 = 4.0;
    /// Downward impact speed that produces a landing sound and dust
    pub const HARD_LANDING_SPEED: f32 = 7.0;

    /// Player acceleration multiplier over the archetype's AI value
    pub const PLAYER_SPEED_FACTOR: f32 = 1.4;
    /// Post-hit invulnerability window (seconds)
    pub const PLAYER_IFRAMES: f32 = 1.5;
    /// Fraction of lifespan left after a non-lethal hit
    pub const DAMAGE_LIFESPAN_FACTOR: f32 = 0.75;
    /// Kills needed for the first takeover
    pub const START_REQ_KILLS: u32 = 2;
    /// Takeovers needed before the kill quota grows by one
    pub const REQ_KILLS_ACCUMULATOR: u32 = 3;

    /// Scores that fire a one-shot celebration
    pub const SCORE_MILESTONES: [u64; 6] = [5_000, 10_000, 20_000, 40_000, 100_000, 200_000];

    /// Characters this far below the level are out of bounds
    pub const LEVEL_BOTTOM_MARGIN: f32 = 32.0;

    /// Number of selectable maps (and highscore slots)
    pub const MAP_COUNT: usize = 3;
}

/// Axis-aligned bounding box (top-left corner + size, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Box of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test (touching edges do not overlap)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    /// The four corner sample points, in tie-break order
    pub fn corners(&self) -> [Vec2; 4] {
        let max = self.max();
        [
            self.min,
            Vec2::new(max.x, self.min.y),
            Vec2::new(self.min.x, max.y),
            max,
        ]
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap_is_strict() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let inside = Aabb::new(Vec2::new(9.0, 9.0), Vec2::splat(10.0));

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_aabb_centered() {
        let b = Aabb::centered(Vec2::new(10.0, 10.0), Vec2::new(4.0, 6.0));
        assert_eq!(b.min, Vec2::new(8.0, 7.0));
        assert_eq!(b.center(), Vec2::new(10.0, 10.0));
    }
}

//! Simulation outbox
//!
//! The simulation never talks to audio, persistence or UI directly. It
//! pushes events here and the host drains them after each tick.

use super::archetype::CharacterType;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Hard horizontal stop against a wall
    WallBump,
    /// Hard landing
    Land,
    Jump,
    Shoot,
    Laser,
    Explosion,
    Punch,
    Stomp,
    /// AI character killed
    CharacterDeath,
    /// Player body hurt but still alive
    PlayerHit,
    PlayerDeath,
    /// Control moved to a new body
    TakeBody,
    /// Score milestone reached
    Milestone,
    HighScore,
}

/// Something the host may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound { effect: SoundEffect, volume: f32 },
    CharacterKilled { id: u32, kind: CharacterType, by_player: bool },
    BodyTaken { from: u32, to: u32, kind: CharacterType },
    PlayerHit { lifespan: f32 },
    PlayerDied { score: u64, frame: u64 },
    ScoreMilestone { threshold: u64 },
    NewHighscore { map: usize, score: u64 },
    PhaseAdvanced { phase: usize },
    TutorialComplete,
}

impl GameEvent {
    pub fn sound(effect: SoundEffect, volume: f32) -> Self {
        GameEvent::Sound { effect, volume }
    }
}

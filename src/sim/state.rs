//! Session state and core simulation types
//!
//! `SessionState` is built at game begin and dropped on return to the menu.
//! Everything a tick reads or writes lives here; there are no statics.

use super::archetype::CharacterType;
use super::character::{Character, CharacterHandle};
use super::events::GameEvent;
use super::particle::Particle;
use super::pool::Pool;
use super::projectile::Projectile;
use super::rng::SimRng;
use crate::consts::*;
use crate::tilemap::TileMap;
use crate::tuning::PhysicsTuning;

/// Body the player starts every session in
pub const START_BODY: CharacterType = CharacterType::Jumper;

/// Everything that collides: the tile grid plus the character and
/// projectile pools
#[derive(Debug, Clone)]
pub struct World {
    pub tiles: TileMap,
    pub characters: Pool<Character>,
    pub projectiles: Pool<Projectile>,
}

impl World {
    pub fn new(tiles: TileMap) -> Self {
        Self {
            tiles,
            characters: Pool::with_capacity(MAX_CHARACTERS),
            projectiles: Pool::with_capacity(MAX_PROJECTILES),
        }
    }

    /// Anything whose top edge is below this has fallen out of the level
    pub fn bottom_bound(&self) -> f32 {
        self.tiles.pixel_size().y + LEVEL_BOTTOM_MARGIN
    }
}

/// Where the player is in the possession cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PossessionState {
    /// Normal play, lifespan counting down
    Inhabiting(CharacterType),
    /// Control moved to a new body this frame
    Transforming,
    /// Session over
    PlayerDead,
}

/// Per-session simulation state
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Active map slot (selects phase table and highscore slot)
    pub map_index: usize,
    pub seed: u64,
    pub rng: SimRng,
    pub tuning: PhysicsTuning,
    pub world: World,
    /// Cosmetic only, never part of collision
    pub particles: Pool<Particle>,

    /// The player-controlled body, `None` once dead
    pub player: Option<CharacterHandle>,
    /// Seconds left in the current body
    pub lifespan: f32,
    pub max_lifespan: f32,
    pub current_kills: u32,
    pub req_kills: u32,
    pub req_kills_accumulator: u32,
    /// Seconds of post-hit invulnerability left
    pub player_iframes: f32,
    pub player_died: bool,
    pub death_frame: Option<u64>,

    pub score: u64,
    /// Best score for this map when the session began
    pub highscore: u64,
    pub got_highscore: bool,

    /// Spawn director phase (0..PHASE_COUNT)
    pub game_phase: usize,
    pub phase_frames: u32,
    pub spawn_timer: u32,
    pub frame_count: u64,

    /// No decay, score or damage until the first takeover
    pub tutorial: bool,
    /// Set by `take_body`, cleared at the start of every tick
    pub transformed_this_frame: bool,

    /// Outbox drained by the host after each tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl SessionState {
    /// Start a session on `tiles` with the player dropped in at the map's
    /// spawn point
    pub fn new(map_index: usize, tiles: TileMap, seed: u64, highscore: u64, tutorial: bool) -> Self {
        let spawn = tiles.player_spawn();
        let mut state = Self {
            map_index,
            seed,
            rng: SimRng::new(seed),
            tuning: PhysicsTuning::default(),
            world: World::new(tiles),
            particles: Pool::with_capacity(MAX_PARTICLES),
            player: None,
            lifespan: START_BODY.lifespan(),
            max_lifespan: START_BODY.lifespan(),
            current_kills: 0,
            req_kills: START_REQ_KILLS,
            req_kills_accumulator: 0,
            player_iframes: 0.0,
            player_died: false,
            death_frame: None,
            score: 0,
            highscore,
            got_highscore: false,
            game_phase: 0,
            phase_frames: 0,
            spawn_timer: 0,
            frame_count: 0,
            tutorial,
            transformed_this_frame: false,
            events: Vec::new(),
            next_id: 1,
        };

        let id = state.next_entity_id();
        let size = START_BODY.archetype().size;
        let mut body = Character::new(id, START_BODY, spawn - size * 0.5, 1.0);
        body.player_controlled = true;
        state.player = state.world.characters.allocate(body);

        log::info!(
            "Session begin: map {} seed {} tutorial {}",
            map_index,
            seed,
            tutorial
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player_character(&self) -> Option<&Character> {
        self.player.and_then(|h| self.world.characters.get(h))
    }

    pub fn is_player(&self, handle: CharacterHandle) -> bool {
        self.player == Some(handle)
    }

    pub fn possession(&self) -> PossessionState {
        if self.player_died {
            PossessionState::PlayerDead
        } else if self.transformed_this_frame {
            PossessionState::Transforming
        } else {
            let kind = self
                .player_character()
                .map(|c| c.kind)
                .unwrap_or(CharacterType::Invalid);
            PossessionState::Inhabiting(kind)
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether damage, decay and scoring are live
    pub fn in_play(&self) -> bool {
        !self.tutorial && !self.player_died
    }
}

//! Spawn director
//!
//! Walks each map through a fixed sequence of difficulty phases and drops
//! AI characters in from the side walls at a phase-dependent rate.

use glam::Vec2;

use super::archetype::CharacterType;
use super::archetype::CharacterType::*;
use super::character::{Character, CharacterHandle};
use super::events::GameEvent;
use super::state::SessionState;
use crate::consts::MAP_COUNT;

pub const PHASE_COUNT: usize = 8;

/// Gap between a side wall and a fresh spawn
pub const SPAWN_EDGE_MARGIN: f32 = 2.0;

/// Frames spent in each phase before advancing, per map. The last phase
/// never ends.
pub const PHASE_DURATIONS: [[u32; PHASE_COUNT - 1]; MAP_COUNT] = [
    [600, 900, 900, 1200, 1200, 1500, 1800],
    [450, 750, 900, 1050, 1200, 1350, 1500],
    [360, 600, 750, 900, 1050, 1200, 1350],
];

/// Frames between spawns in each phase
pub const SPAWN_FREQUENCIES: [u32; PHASE_COUNT] = [90, 80, 70, 60, 50, 45, 40, 30];

/// Types drawn uniformly in each phase; repeats act as weights
pub const PHASE_CANDIDATES: [&[CharacterType]; PHASE_COUNT] = [
    &[Jumper, XShooter],
    &[Jumper, XShooter, YShooter],
    &[Jumper, XShooter, YShooter, Dasher],
    &[Jumper, XShooter, YShooter, XYShooter, Dasher],
    &[Jumper, XShooter, XYShooter, Dasher, Bomber],
    &[Jumper, XYShooter, Dasher, Bomber, Laser],
    &[XShooter, YShooter, XYShooter, Dasher, Bomber, Laser],
    &[Jumper, XYShooter, Dasher, Dasher, Bomber, Laser, Laser],
];

/// Run the director for one frame
pub fn update(state: &mut SessionState) {
    advance_phase(state);

    let phase = state.game_phase.min(PHASE_COUNT - 1);
    state.spawn_timer += 1;
    if state.spawn_timer < SPAWN_FREQUENCIES[phase] {
        return;
    }
    state.spawn_timer = 0;

    let candidates = PHASE_CANDIDATES[phase];
    let kind = candidates[state.rng.index(candidates.len())];
    spawn_ai(state, kind);
}

fn advance_phase(state: &mut SessionState) {
    if state.player_died {
        return;
    }
    state.phase_frames += 1;
    if state.tutorial || state.game_phase >= PHASE_COUNT - 1 {
        return;
    }

    let durations = &PHASE_DURATIONS[state.map_index.min(MAP_COUNT - 1)];
    if state.phase_frames < durations[state.game_phase] {
        return;
    }
    state.game_phase += 1;
    state.phase_frames = 0;
    state.events.push(GameEvent::PhaseAdvanced {
        phase: state.game_phase,
    });
    log::info!(
        "Phase {} on frame {}",
        state.game_phase,
        state.frame_count
    );
}

/// Drop an AI character in just inside a random side wall, above the top
/// of the level, heading toward the middle
pub fn spawn_ai(state: &mut SessionState, kind: CharacterType) -> Option<CharacterHandle> {
    let size = kind.archetype().size;
    let level = state.world.tiles.pixel_size();
    let cell = state.world.tiles.cell_width();

    let from_left = state.rng.sign() < 0.0;
    let (x, direction) = if from_left {
        (cell + SPAWN_EDGE_MARGIN, 1.0)
    } else {
        (level.x - cell - size.x - SPAWN_EDGE_MARGIN, -1.0)
    };

    let id = state.next_entity_id();
    let character = Character::new(id, kind, Vec2::new(x, -size.y), direction);
    let handle = state.world.characters.allocate(character);
    if handle.is_none() {
        log::debug!("Character pool full, dropped {:?} spawn", kind);
    }
    handle
}

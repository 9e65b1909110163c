//! Kills, body takeover and player progression
//!
//! Every kill, takeover and player hit goes through this module so the
//! bookkeeping (kill credit, lifespan, i-frames, events) stays in one place.

use glam::Vec2;

use super::character::CharacterHandle;
use super::events::{GameEvent, SoundEffect};
use super::particle::{CONFETTI, GIBS, spawn_burst};
use super::projectile::ProjectileHandle;
use super::state::SessionState;
use crate::consts::*;

const GIB_COUNT: usize = 10;
const GIB_SPEED: f32 = 4.0;
const GIB_LIFETIME: f32 = 1.2;
const CONFETTI_COUNT: usize = 24;

/// Kill an AI character.
///
/// The player body is never removed here; hurting the player goes through
/// [`damage_player`]. When `by_player` is set and this kill fills the
/// quota, the victim is taken over instead of dying. Returns whether the
/// character left the AI population.
pub fn kill_character(state: &mut SessionState, handle: CharacterHandle, by_player: bool) -> bool {
    let Some(victim) = state.world.characters.get(handle) else {
        return false;
    };
    if victim.player_controlled {
        return false;
    }
    let (id, kind, center) = (victim.id, victim.kind, victim.bounds().center());

    let credited = by_player && !state.player_died && !state.transformed_this_frame;
    if credited {
        state.current_kills += 1;
        if state.current_kills >= state.req_kills && take_body(state, handle) {
            return true;
        }
    }

    state.world.characters.free(handle);
    spawn_burst(state, center, GIB_COUNT, GIB_SPEED, GIB_LIFETIME, GIBS);
    state.events.push(GameEvent::CharacterKilled {
        id,
        kind,
        by_player: credited,
    });
    state.events.push(GameEvent::sound(SoundEffect::CharacterDeath, 1.0));
    true
}

/// Move the player into `target`, killing the old body.
///
/// At most one takeover happens per frame. Returns false when the takeover
/// was refused.
pub fn take_body(state: &mut SessionState, target: CharacterHandle) -> bool {
    if state.transformed_this_frame || state.player_died {
        return false;
    }
    let Some(old) = state.player else {
        return false;
    };
    if old == target || !state.world.characters.is_alive(target) {
        return false;
    }

    state.req_kills_accumulator += 1;
    if state.req_kills_accumulator % REQ_KILLS_ACCUMULATOR == 0 {
        state.req_kills += 1;
    }
    state.current_kills = 0;
    state.player_iframes = PLAYER_IFRAMES;

    let from = match state.world.characters.get_mut(old) {
        Some(body) => {
            body.player_controlled = false;
            body.id
        }
        None => 0,
    };
    let Some(body) = state.world.characters.get_mut(target) else {
        return false;
    };
    body.player_controlled = true;
    body.wants_to_action = false;
    body.action_timer = 0.0;
    body.cooldown = 0.0;
    let (to, kind) = (body.id, body.kind);

    state.player = Some(target);
    state.lifespan = kind.lifespan();
    state.max_lifespan = state.lifespan;
    state.transformed_this_frame = true;
    state.events.push(GameEvent::BodyTaken { from, to, kind });
    state.events.push(GameEvent::sound(SoundEffect::TakeBody, 1.0));
    log::debug!(
        "Took body {} ({:?}), now need {} kills",
        to,
        kind,
        state.req_kills
    );

    if state.tutorial {
        state.tutorial = false;
        state.events.push(GameEvent::TutorialComplete);
        log::info!("Tutorial complete");
    }

    kill_character(state, old, false);
    true
}

/// Hurt the player body. Returns whether the hit landed.
///
/// A hit with lifespan already spent is fatal; any other hit costs a
/// quarter of what is left and grants i-frames.
pub fn damage_player(state: &mut SessionState) -> bool {
    if state.player_iframes > 0.0 || state.player_died || state.tutorial {
        return false;
    }
    state.player_iframes = PLAYER_IFRAMES;

    if state.lifespan <= 0.0 {
        kill_player(state);
    } else {
        state.lifespan *= DAMAGE_LIFESPAN_FACTOR;
        state.events.push(GameEvent::PlayerHit {
            lifespan: state.lifespan,
        });
        state.events.push(GameEvent::sound(SoundEffect::PlayerHit, 1.0));
    }
    true
}

/// End the session for the player, ignoring i-frames
pub fn kill_player(state: &mut SessionState) {
    if state.player_died {
        return;
    }
    state.player_died = true;
    state.lifespan = state.lifespan.min(0.0);
    state.death_frame = Some(state.frame_count);

    if let Some(handle) = state.player.take() {
        let center = state
            .world
            .characters
            .get(handle)
            .map(|c| c.bounds().center());
        state.world.characters.free(handle);
        if let Some(center) = center {
            spawn_burst(state, center, GIB_COUNT * 2, GIB_SPEED, GIB_LIFETIME, GIBS);
        }
    }

    state.events.push(GameEvent::PlayerDied {
        score: state.score,
        frame: state.frame_count,
    });
    state.events.push(GameEvent::sound(SoundEffect::PlayerDeath, 1.0));
    log::info!(
        "Player died on frame {} with score {}",
        state.frame_count,
        state.score
    );

    if state.score > state.highscore {
        state.highscore = state.score;
        state.got_highscore = true;
        state.events.push(GameEvent::NewHighscore {
            map: state.map_index,
            score: state.score,
        });
        state.events.push(GameEvent::sound(SoundEffect::HighScore, 1.0));
    }
}

/// A projectile touched `target`. The projectile is spent either way;
/// the target is hurt unless the shot is friendly.
pub fn projectile_hit(state: &mut SessionState, projectile: ProjectileHandle, target: CharacterHandle) {
    let Some(shot) = state.world.projectiles.get(projectile) else {
        return;
    };
    let player_bullet = shot.player_bullet;
    let target_is_player = state.is_player(target);
    let hurts = shot.hurts(target_is_player);
    state.world.projectiles.free(projectile);

    if !hurts {
        return;
    }
    if target_is_player {
        damage_player(state);
    } else {
        kill_character(state, target, player_bullet);
    }
}

/// Lifespan decay, i-frames and score for one tick
pub fn update_progression(state: &mut SessionState, dt: f32) {
    if state.player_iframes > 0.0 {
        state.player_iframes = (state.player_iframes - dt).max(0.0);
    }
    if !state.in_play() {
        return;
    }

    state.lifespan -= dt;
    if state.lifespan <= 0.0 {
        damage_player(state);
    }
    if state.player_died {
        return;
    }

    let before = state.score;
    state.score += 1 + state.game_phase as u64;
    for threshold in SCORE_MILESTONES {
        if before < threshold && state.score >= threshold {
            state.events.push(GameEvent::ScoreMilestone { threshold });
            state.events.push(GameEvent::sound(SoundEffect::Milestone, 1.0));
            let center = state
                .player_character()
                .map(|c| c.bounds().center())
                .unwrap_or(Vec2::ZERO);
            spawn_burst(state, center, CONFETTI_COUNT, 5.0, 2.0, CONFETTI);
            log::debug!("Score milestone {}", threshold);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::archetype::CharacterType;
    use crate::sim::character::Character;
    use crate::sim::projectile::Projectile;
    use crate::tilemap::TileMap;

    fn session() -> SessionState {
        SessionState::new(0, TileMap::builtin(0).unwrap(), 99, 0, false)
    }

    fn spawn(state: &mut SessionState, kind: CharacterType, x: f32) -> CharacterHandle {
        let id = state.next_entity_id();
        state
            .world
            .characters
            .allocate(Character::new(id, kind, Vec2::new(x, 40.0), 1.0))
            .unwrap()
    }

    fn count(state: &SessionState, pred: impl Fn(&GameEvent) -> bool) -> usize {
        state.events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_kill_below_quota_frees_slot() {
        let mut state = session();
        let victim = spawn(&mut state, CharacterType::XShooter, 100.0);
        assert!(kill_character(&mut state, victim, true));
        assert!(!state.world.characters.is_alive(victim));
        assert_eq!(state.current_kills, 1);
        assert!(!state.particles.is_empty());
        assert_eq!(
            count(&state, |e| matches!(e, GameEvent::CharacterKilled { by_player: true, .. })),
            1
        );
    }

    #[test]
    fn test_quota_kill_takes_body() {
        let mut state = session();
        let old = state.player.unwrap();
        let first = spawn(&mut state, CharacterType::XShooter, 100.0);
        let second = spawn(&mut state, CharacterType::Laser, 160.0);

        kill_character(&mut state, first, true);
        assert!(kill_character(&mut state, second, true));

        assert_eq!(state.player, Some(second));
        assert!(state.world.characters.get(second).unwrap().player_controlled);
        assert!(!state.world.characters.is_alive(old));
        assert_eq!(state.lifespan, CharacterType::Laser.lifespan());
        assert_eq!(state.max_lifespan, state.lifespan);
        assert_eq!(state.current_kills, 0);
        assert_eq!(state.player_iframes, PLAYER_IFRAMES);
        assert!(state.transformed_this_frame);

        let players = state
            .world
            .characters
            .iter()
            .filter(|(_, c)| c.player_controlled)
            .count();
        assert_eq!(players, 1);
    }

    #[test]
    fn test_one_takeover_per_frame() {
        let mut state = session();
        state.req_kills = 1;
        let a = spawn(&mut state, CharacterType::XShooter, 100.0);
        let b = spawn(&mut state, CharacterType::YShooter, 140.0);
        let c = spawn(&mut state, CharacterType::Bomber, 180.0);

        kill_character(&mut state, a, true);
        kill_character(&mut state, b, true);
        kill_character(&mut state, c, true);

        assert_eq!(state.player, Some(a));
        assert_eq!(count(&state, |e| matches!(e, GameEvent::BodyTaken { .. })), 1);
        assert!(!state.world.characters.is_alive(b));
        assert!(!state.world.characters.is_alive(c));
        assert_eq!(state.current_kills, 0);
    }

    #[test]
    fn test_required_kills_grow_every_third_takeover() {
        let mut state = session();
        for i in 0..3 {
            state.transformed_this_frame = false;
            let target = spawn(&mut state, CharacterType::Jumper, 60.0 + i as f32 * 30.0);
            assert!(take_body(&mut state, target));
        }
        assert_eq!(state.req_kills, START_REQ_KILLS + 1);
        assert_eq!(state.req_kills_accumulator, 3);
    }

    #[test]
    fn test_first_takeover_ends_tutorial() {
        let mut state = SessionState::new(0, TileMap::builtin(0).unwrap(), 5, 0, true);
        let target = spawn(&mut state, CharacterType::Dasher, 100.0);
        assert!(take_body(&mut state, target));
        assert!(!state.tutorial);
        assert_eq!(count(&state, |e| *e == GameEvent::TutorialComplete), 1);
    }

    #[test]
    fn test_damage_respects_iframes() {
        let mut state = session();
        let before = state.lifespan;
        assert!(damage_player(&mut state));
        assert_eq!(state.lifespan, before * DAMAGE_LIFESPAN_FACTOR);
        assert!(!damage_player(&mut state));
        assert_eq!(state.lifespan, before * DAMAGE_LIFESPAN_FACTOR);
    }

    #[test]
    fn test_tutorial_ignores_damage() {
        let mut state = SessionState::new(0, TileMap::builtin(0).unwrap(), 5, 0, true);
        state.lifespan = -1.0;
        assert!(!damage_player(&mut state));
        assert!(!state.player_died);
    }

    #[test]
    fn test_lifespan_running_out_kills_once() {
        let mut state = session();
        state.lifespan = 0.01;
        update_progression(&mut state, SIM_DT);
        assert!(state.player_died);
        assert!(state.player.is_none());
        assert_eq!(state.death_frame, Some(state.frame_count));

        update_progression(&mut state, SIM_DT);
        update_progression(&mut state, SIM_DT);
        assert_eq!(count(&state, |e| matches!(e, GameEvent::PlayerDied { .. })), 1);
    }

    #[test]
    fn test_death_with_better_score_is_highscore() {
        let mut state = SessionState::new(2, TileMap::builtin(2).unwrap(), 1, 100, false);
        state.score = 250;
        kill_player(&mut state);
        assert!(state.got_highscore);
        assert_eq!(state.highscore, 250);
        assert_eq!(
            count(&state, |e| *e == GameEvent::NewHighscore { map: 2, score: 250 }),
            1
        );
    }

    #[test]
    fn test_milestone_fires_once_per_threshold() {
        let mut state = session();
        state.lifespan = 1.0e9;
        state.score = 4_990;
        for _ in 0..5_100 {
            update_progression(&mut state, SIM_DT);
        }
        assert!(state.score > 10_000);
        let milestones: Vec<u64> = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ScoreMilestone { threshold } => Some(*threshold),
                _ => None,
            })
            .collect();
        assert_eq!(milestones, vec![5_000, 10_000]);
    }

    #[test]
    fn test_score_scales_with_phase() {
        let mut state = session();
        state.game_phase = 3;
        update_progression(&mut state, SIM_DT);
        assert_eq!(state.score, 4);
    }

    #[test]
    fn test_friendly_bullet_is_spent_without_damage() {
        let mut state = session();
        let player = state.player.unwrap();
        let center = state.player_character().unwrap().bounds().center();
        let shot = state
            .world
            .projectiles
            .allocate(Projectile::new(50, center, Vec2::X, 1.0, true))
            .unwrap();
        let before = state.lifespan;
        projectile_hit(&mut state, shot, player);
        assert!(!state.world.projectiles.is_alive(shot));
        assert_eq!(state.lifespan, before);
        assert_eq!(state.player_iframes, 0.0);
    }

    #[test]
    fn test_ai_bullet_kill_gives_no_credit() {
        let mut state = session();
        let victim = spawn(&mut state, CharacterType::Bomber, 100.0);
        let shot = state
            .world
            .projectiles
            .allocate(Projectile::new(51, Vec2::new(106.0, 47.0), Vec2::X, 1.0, false))
            .unwrap();
        projectile_hit(&mut state, shot, victim);
        assert!(!state.world.characters.is_alive(victim));
        assert_eq!(state.current_kills, 0);
    }
}

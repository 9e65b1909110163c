//! Per-character update: player control, AI, actions and stomps

use glam::Vec2;

use super::archetype::{ActionKind, CharacterType};
use super::character::CharacterHandle;
use super::collision::{Collision, Mover, characters_in, tile_collision};
use super::events::{GameEvent, SoundEffect};
use super::particle::{DUST, SPARK, spawn_burst};
use super::physics::step_body;
use super::possession::{damage_player, kill_character, kill_player, projectile_hit};
use super::projectile::{PROJECTILE_LIFETIME, PROJECTILE_SIZE, Projectile, ProjectileHandle};
use super::state::SessionState;
use super::tick::TickInput;
use crate::Aabb;
use crate::consts::*;

/// Half the side of the bomber's blast box
pub const BOMB_RADIUS: f32 = 40.0;
pub const LASER_BEAM_HEIGHT: f32 = 6.0;
/// Seconds the laser mouth stays open after firing
pub const LASER_MOUTH_TIME: f32 = 0.3;
/// How far past its sides a punch reaches
pub const PUNCH_REACH: f32 = 3.0;
pub const POUND_WIDTH_FACTOR: f32 = 3.0;
pub const POUND_DEPTH: f32 = 8.0;
pub const STOMP_BOUNCE: f32 = 7.0;
pub const STOMP_SPREAD: f32 = 3.0;

/// Update every live character once, in slot order
pub fn update_characters(state: &mut SessionState, input: &TickInput, dt: f32) {
    for handle in state.world.characters.handles() {
        update_character(state, handle, input, dt);
    }
}

/// Timers, intent, physics and post-physics reactions for one character.
/// A handle that died earlier in the frame is skipped.
pub fn update_character(state: &mut SessionState, handle: CharacterHandle, input: &TickInput, dt: f32) {
    let Some(c) = state.world.characters.get_mut(handle) else {
        return;
    };
    c.action_timer -= dt;
    c.cooldown = (c.cooldown - dt).max(0.0);
    c.mouth_open = (c.mouth_open - dt).max(0.0);

    let accel = if c.player_controlled {
        player_intent(state, handle, input)
    } else {
        ai_intent(state, handle)
    };

    // Acting can kill this body or move the player out of it
    let Some(c) = state.world.characters.get(handle) else {
        return;
    };
    let player = c.player_controlled;
    let kind = c.kind;
    let mut body = c.body;
    let pre_vel = body.vel;

    let mover = Mover::Character { handle, player };
    let outcome = step_body(&mut state.world, &mut body, mover, accel, &state.tuning, dt);

    let Some(c) = state.world.characters.get_mut(handle) else {
        return;
    };
    c.body = body;
    c.grounded = outcome.grounded;
    let feet = c.feet();

    let volume = if player { 1.0 } else { 0.5 };
    if outcome.wall_bump {
        state.events.push(GameEvent::sound(SoundEffect::WallBump, volume));
    }
    if outcome.hard_landing {
        state.events.push(GameEvent::sound(SoundEffect::Land, volume));
        spawn_burst(state, feet, 6, 1.5, 0.5, DUST);
    }

    if let Some(Collision::Projectile(shot)) = outcome.blocking() {
        projectile_hit(state, shot, handle);
    }
    if kind == CharacterType::Jumper && pre_vel.y > 0.0 {
        stomp(state, handle);
    }

    let turn = outcome.hit_x && outcome.x.is_wall();
    settle(state, handle, turn);
}

fn player_intent(state: &mut SessionState, handle: CharacterHandle, input: &TickInput) -> Vec2 {
    let Some(c) = state.world.characters.get_mut(handle) else {
        return Vec2::ZERO;
    };
    let arch = c.archetype();

    let mut dir = 0.0;
    if input.left {
        dir -= 1.0;
    }
    if input.right {
        dir += 1.0;
    }
    if dir != 0.0 {
        c.facing = dir;
    }

    if input.jump && c.grounded {
        c.body.vel.y = -arch.jump_speed;
        state.events.push(GameEvent::sound(SoundEffect::Jump, 1.0));
    }

    if input.action {
        perform_action(state, handle, arch.player_action, true);
    }
    Vec2::new(dir * arch.acceleration * PLAYER_SPEED_FACTOR, 0.0)
}

fn ai_intent(state: &mut SessionState, handle: CharacterHandle) -> Vec2 {
    let frame = state.frame_count;
    let Some(c) = state.world.characters.get_mut(handle) else {
        return Vec2::ZERO;
    };
    let arch = c.archetype();
    let accel = Vec2::new(arch.acceleration * c.direction, 0.0);

    let fire = match arch.ai_action {
        ActionKind::None => None,
        // Dashers always want to hit something
        ActionKind::Punch => {
            c.wants_to_action = true;
            c.grounded.then_some(ActionKind::Punch)
        }
        action if c.wants_to_action => {
            if c.action_timer <= 0.0 {
                c.wants_to_action = false;
                c.cooldown = arch.cooldown;
                Some(action)
            } else {
                None
            }
        }
        _ => {
            if c.grounded
                && c.cooldown <= 0.0
                && frame % u64::from(arch.check_frequency) == 0
                && state.rng.chance(arch.action_chance)
            {
                c.wants_to_action = true;
                c.action_timer = arch.telegraph;
            }
            None
        }
    };

    if let Some(action) = fire {
        perform_action(state, handle, action, false);
    }
    accel
}

/// Carry out `action` for `actor`. `by_player` gives kill credit.
pub fn perform_action(state: &mut SessionState, actor: CharacterHandle, action: ActionKind, by_player: bool) {
    let Some(c) = state.world.characters.get_mut(actor) else {
        return;
    };
    let arch = c.archetype();

    match action {
        ActionKind::None => {}
        ActionKind::Jump => {
            if c.grounded {
                c.body.vel.y = -arch.jump_speed;
                state.events.push(GameEvent::sound(SoundEffect::Jump, 0.5));
            }
        }
        ActionKind::FastFall => {
            c.body.vel.y = state.tuning.speed_limit;
        }
        ActionKind::Shoot { dir, speed, recoil } => {
            let dir = Vec2::new(dir.x * c.facing, dir.y);
            if fire_projectile(state, actor, dir, speed, by_player).is_some() {
                if let Some(c) = state.world.characters.get_mut(actor) {
                    c.body.vel -= dir * recoil;
                }
            }
        }
        ActionKind::Bomb => explode(state, actor, by_player),
        ActionKind::Laser => fire_laser(state, actor, by_player),
        ActionKind::GroundPound => ground_pound(state, actor, by_player),
        ActionKind::Punch => punch(state, actor, by_player),
    }
}

/// Launch a shot from just outside `shooter`'s box
pub fn fire_projectile(
    state: &mut SessionState,
    shooter: CharacterHandle,
    dir: Vec2,
    speed: f32,
    player_bullet: bool,
) -> Option<ProjectileHandle> {
    let c = state.world.characters.get(shooter)?;
    let reach = c.body.size.length() * 0.5 + PROJECTILE_SIZE.length() * 0.5 + 1.0;
    let center = c.bounds().center() + dir * reach;
    spawn_projectile(state, center, dir * speed, player_bullet)
}

/// Place a projectile at `center`. Refused when the spot is inside a wall
/// or another projectile, or the pool is full.
pub fn spawn_projectile(
    state: &mut SessionState,
    center: Vec2,
    vel: Vec2,
    player_bullet: bool,
) -> Option<ProjectileHandle> {
    let rect = Aabb::centered(center, PROJECTILE_SIZE);
    let blocked = !tile_collision(&state.world.tiles, rect, false).is_none()
        || state
            .world
            .projectiles
            .iter()
            .any(|(_, p)| p.body.bounds().overlaps(&rect));
    if blocked {
        return None;
    }

    let id = state.next_entity_id();
    let shot = Projectile::new(id, center, vel, PROJECTILE_LIFETIME, player_bullet);
    let Some(handle) = state.world.projectiles.allocate(shot) else {
        log::debug!("Projectile pool full, dropped shot");
        return None;
    };
    state.events.push(GameEvent::sound(SoundEffect::Shoot, 0.7));
    Some(handle)
}

/// Kill or hurt everything overlapping `rect` except `attacker`.
/// Returns how many hits landed.
pub fn kill_in_box(state: &mut SessionState, rect: Aabb, attacker: CharacterHandle, by_player: bool) -> usize {
    let mut hits = 0;
    for victim in characters_in(&state.world, rect, Some(attacker)) {
        let landed = if state.is_player(victim) {
            damage_player(state)
        } else {
            kill_character(state, victim, by_player)
        };
        if landed {
            hits += 1;
        }
    }
    hits
}

fn explode(state: &mut SessionState, bomber: CharacterHandle, by_player: bool) {
    let Some(c) = state.world.characters.get(bomber) else {
        return;
    };
    let center = c.bounds().center();
    let blast = Aabb::centered(center, Vec2::splat(BOMB_RADIUS * 2.0));

    state.events.push(GameEvent::sound(SoundEffect::Explosion, 1.0));
    spawn_burst(state, center, 16, 5.0, 0.6, SPARK);
    kill_in_box(state, blast, bomber, by_player);

    // The bomber goes up with its own bomb unless the blast already
    // moved the player out of it. I-frames do not save a player bomber.
    if state.world.characters.is_alive(bomber) {
        if state.is_player(bomber) {
            kill_player(state);
        } else {
            kill_character(state, bomber, false);
        }
    }
}

fn fire_laser(state: &mut SessionState, shooter: CharacterHandle, by_player: bool) {
    let Some(c) = state.world.characters.get_mut(shooter) else {
        return;
    };
    c.mouth_open = LASER_MOUTH_TIME;
    let y = c.bounds().center().y;
    let width = state.world.tiles.pixel_size().x;
    let beam = Aabb::new(
        Vec2::new(0.0, y - LASER_BEAM_HEIGHT * 0.5),
        Vec2::new(width, LASER_BEAM_HEIGHT),
    );
    state.events.push(GameEvent::sound(SoundEffect::Laser, 1.0));
    kill_in_box(state, beam, shooter, by_player);
}

fn ground_pound(state: &mut SessionState, actor: CharacterHandle, by_player: bool) {
    let Some(c) = state.world.characters.get_mut(actor) else {
        return;
    };
    if !c.grounded {
        c.body.vel.y = state.tuning.speed_limit;
    }
    let feet = c.feet();
    let width = c.body.size.x * POUND_WIDTH_FACTOR;
    let area = Aabb::new(
        Vec2::new(feet.x - width * 0.5, feet.y - POUND_DEPTH * 0.5),
        Vec2::new(width, POUND_DEPTH),
    );
    state.events.push(GameEvent::sound(SoundEffect::Punch, 1.0));
    kill_in_box(state, area, actor, by_player);
}

fn punch(state: &mut SessionState, actor: CharacterHandle, by_player: bool) {
    let Some(c) = state.world.characters.get(actor) else {
        return;
    };
    let reach = Aabb::new(
        c.body.pos - Vec2::new(PUNCH_REACH, 0.0),
        c.body.size + Vec2::new(PUNCH_REACH * 2.0, 0.0),
    );
    if kill_in_box(state, reach, actor, by_player) > 0 {
        state.events.push(GameEvent::sound(SoundEffect::Punch, 0.8));
    }
}

/// A falling jumper kills whatever is under its feet and bounces off
fn stomp(state: &mut SessionState, jumper: CharacterHandle) {
    let Some(c) = state.world.characters.get(jumper) else {
        return;
    };
    let b = c.bounds();
    let under = Aabb::new(Vec2::new(b.min.x, b.max().y - 2.0), Vec2::new(b.size.x, 6.0));
    let victim = characters_in(&state.world, under, Some(jumper))
        .into_iter()
        .find(|v| {
            state
                .world
                .characters
                .get(*v)
                .is_some_and(|o| o.bounds().min.y >= b.center().y)
        });
    let Some(victim) = victim else {
        return;
    };

    let by_player = state.is_player(jumper);
    if state.is_player(victim) {
        damage_player(state);
    } else {
        kill_character(state, victim, by_player);
    }
    state.events.push(GameEvent::sound(SoundEffect::Stomp, 1.0));

    let spread = state.rng.range(-STOMP_SPREAD, STOMP_SPREAD);
    if let Some(c) = state.world.characters.get_mut(jumper) {
        c.body.vel = Vec2::new(spread, -STOMP_BOUNCE);
    }
}

/// Wall turn-around for AI and the fell-out-of-the-level check
fn settle(state: &mut SessionState, handle: CharacterHandle, turn: bool) {
    let bottom = state.world.bottom_bound();
    let Some(c) = state.world.characters.get_mut(handle) else {
        return;
    };
    let fell = c.body.pos.y > bottom;

    if c.player_controlled {
        if fell {
            player_fell(state, handle);
        }
        return;
    }
    if turn {
        c.direction = -c.direction;
        c.facing = c.direction;
    }
    if fell {
        state.world.characters.free(handle);
    }
}

fn player_fell(state: &mut SessionState, handle: CharacterHandle) {
    if !state.tutorial {
        kill_player(state);
        return;
    }
    let spawn = state.world.tiles.player_spawn();
    if let Some(c) = state.world.characters.get_mut(handle) {
        c.body.pos = spawn - c.body.size * 0.5;
        c.body.vel = Vec2::ZERO;
    }
}

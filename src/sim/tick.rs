//! Simulation tick
//!
//! Advances a session by one step. Systems run in a fixed order: director,
//! characters, projectiles, particles, then lifespan and score.

use glam::Vec2;

use super::behavior::update_characters;
use super::collision::{Collision, Mover};
use super::director;
use super::particle::{SPARK, spawn_burst};
use super::physics::step_body;
use super::possession::{projectile_hit, update_progression};
use super::state::SessionState;

/// Projectiles this far outside the level are discarded
const OFFSCREEN_MARGIN: f32 = 64.0;

/// Player intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held
    pub left: bool,
    /// Held
    pub right: bool,
    /// Pressed this frame
    pub jump: bool,
    /// Pressed this frame
    pub action: bool,
}

/// Advance the session by `dt` seconds
pub fn tick(state: &mut SessionState, input: &TickInput, dt: f32) {
    state.transformed_this_frame = false;
    state.frame_count += 1;

    director::update(state);
    update_characters(state, input, dt);
    update_projectiles(state, dt);
    update_particles(state, dt);
    update_progression(state, dt);
}

/// Age, move and resolve every live projectile
pub fn update_projectiles(state: &mut SessionState, dt: f32) {
    let tuning = state.tuning.projectile();
    let level = state.world.tiles.pixel_size();

    for handle in state.world.projectiles.handles() {
        let Some(shot) = state.world.projectiles.get_mut(handle) else {
            continue;
        };
        shot.lifetime -= dt;
        if shot.lifetime <= 0.0 {
            state.world.projectiles.free(handle);
            continue;
        }

        let mut body = shot.body;
        let outcome = step_body(
            &mut state.world,
            &mut body,
            Mover::Projectile(handle),
            Vec2::ZERO,
            &tuning,
            dt,
        );
        if let Some(shot) = state.world.projectiles.get_mut(handle) {
            shot.body = body;
        }

        match outcome.blocking() {
            Some(Collision::Character(target)) => projectile_hit(state, handle, target),
            Some(_) => {
                state.world.projectiles.free(handle);
                spawn_burst(state, body.bounds().center(), 3, 2.0, 0.3, SPARK);
            }
            None => {
                let b = body.bounds();
                let gone = b.max().x < -OFFSCREEN_MARGIN
                    || b.min.x > level.x + OFFSCREEN_MARGIN
                    || b.max().y < -OFFSCREEN_MARGIN
                    || b.min.y > state.world.bottom_bound();
                if gone {
                    state.world.projectiles.free(handle);
                }
            }
        }
    }
}

/// Age and drift every live particle
pub fn update_particles(state: &mut SessionState, dt: f32) {
    let tuning = state.tuning.particle();
    for handle in state.particles.handles() {
        let Some(p) = state.particles.get_mut(handle) else {
            continue;
        };
        p.lifetime -= dt;
        if p.lifetime <= 0.0 {
            state.particles.free(handle);
            continue;
        }
        let mut body = p.body;
        step_body(&mut state.world, &mut body, Mover::Particle, Vec2::ZERO, &tuning, dt);
        if let Some(p) = state.particles.get_mut(handle) {
            p.body = body;
        }
    }
}

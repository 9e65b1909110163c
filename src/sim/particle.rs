//! Cosmetic particles
//!
//! Particles never collide and nothing in gameplay reads them. The host
//! draws them with `alpha()` as the fade.

use glam::Vec2;

use super::physics::PhysicsBody;
use super::pool::Handle;
use super::state::SessionState;

pub type ParticleHandle = Handle<Particle>;

/// What the host should draw for a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleVisual {
    /// Animated sprite by asset key
    Sprite(&'static str),
    /// Plain texture by asset key
    Texture(&'static str),
    #[default]
    Dot,
}

pub const DUST: ParticleVisual = ParticleVisual::Texture("textures/dust");
pub const GIBS: ParticleVisual = ParticleVisual::Sprite("sprites/gibs");
pub const SPARK: ParticleVisual = ParticleVisual::Texture("textures/spark");
pub const CONFETTI: ParticleVisual = ParticleVisual::Sprite("sprites/confetti");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Particle {
    pub id: u32,
    pub body: PhysicsBody,
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub visual: ParticleVisual,
}

impl Particle {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, lifetime: f32, visual: ParticleVisual) -> Self {
        let mut body = PhysicsBody::new(pos, Vec2::splat(2.0));
        body.vel = vel;
        body.noclip = true;
        Self {
            id,
            body,
            lifetime,
            max_lifetime: lifetime,
            visual,
        }
    }

    /// Fade from 1 at spawn to 0 at expiry
    pub fn alpha(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            return 0.0;
        }
        (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
    }
}

/// Throw `count` particles out of `center` in random directions.
///
/// Drops the rest of the burst once the pool is full.
pub fn spawn_burst(
    state: &mut SessionState,
    center: Vec2,
    count: usize,
    speed: f32,
    lifetime: f32,
    visual: ParticleVisual,
) -> usize {
    let mut spawned = 0;
    for _ in 0..count {
        let angle = state.rng.range(0.0, std::f32::consts::TAU);
        let vel = Vec2::from_angle(angle) * state.rng.range(speed * 0.25, speed);
        let life = state.rng.range(lifetime * 0.5, lifetime);
        let id = state.next_entity_id();
        let particle = Particle::new(id, center - Vec2::ONE, vel, life, visual);
        if state.particles.allocate(particle).is_none() {
            log::debug!("Particle pool full, dropped {} of burst", count - spawned);
            break;
        }
        spawned += 1;
    }
    spawned
}

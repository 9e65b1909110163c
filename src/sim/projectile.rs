//! Projectile entity

use glam::Vec2;

use super::physics::PhysicsBody;
use super::pool::Handle;

pub type ProjectileHandle = Handle<Projectile>;

/// Projectile bounding box
pub const PROJECTILE_SIZE: Vec2 = Vec2::new(4.0, 4.0);
/// Seconds a projectile flies before fizzling out
pub const PROJECTILE_LIFETIME: f32 = 2.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub body: PhysicsBody,
    /// Seconds left
    pub lifetime: f32,
    pub max_lifetime: f32,
    /// Fired by the player-controlled body
    pub player_bullet: bool,
}

impl Projectile {
    /// Projectile centered on `center`
    pub fn new(id: u32, center: Vec2, vel: Vec2, lifetime: f32, player_bullet: bool) -> Self {
        let mut body = PhysicsBody::new(center - PROJECTILE_SIZE * 0.5, PROJECTILE_SIZE);
        body.vel = vel;
        Self {
            id,
            body,
            lifetime,
            max_lifetime: lifetime,
            player_bullet,
        }
    }

    /// Whether this projectile may hurt a character
    pub fn hurts(&self, target_is_player: bool) -> bool {
        !(self.player_bullet && target_is_player)
    }
}

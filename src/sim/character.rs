//! Character entity (player body or AI)

use glam::Vec2;

use super::archetype::{Archetype, CharacterType};
use super::physics::PhysicsBody;
use super::pool::Handle;
use crate::Aabb;

pub type CharacterHandle = Handle<Character>;

/// A character in the character pool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Character {
    /// Unique for the session; never reused
    pub id: u32,
    pub kind: CharacterType,
    pub body: PhysicsBody,
    pub player_controlled: bool,
    /// ±1, which way the sprite and shots face
    pub facing: f32,
    /// ±1 patrol heading (AI only)
    pub direction: f32,
    /// Telegraph in progress (AI only)
    pub wants_to_action: bool,
    /// Seconds left on the telegraph
    pub action_timer: f32,
    /// Seconds until the AI may roll for another action
    pub cooldown: f32,
    /// Cosmetic: seconds the laser mouth stays open
    pub mouth_open: f32,
    /// Ground contact from the last physics step
    pub grounded: bool,
}

impl Character {
    /// Fresh character of `kind` with its top-left at `pos`
    pub fn new(id: u32, kind: CharacterType, pos: Vec2, direction: f32) -> Self {
        let direction = if direction < 0.0 { -1.0 } else { 1.0 };
        Self {
            id,
            kind,
            body: PhysicsBody::new(pos, kind.archetype().size),
            player_controlled: false,
            facing: direction,
            direction,
            wants_to_action: false,
            action_timer: 0.0,
            cooldown: 0.0,
            mouth_open: 0.0,
            grounded: false,
        }
    }

    #[inline]
    pub fn archetype(&self) -> &'static Archetype {
        self.kind.archetype()
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.body.bounds()
    }

    /// Middle of the bottom edge
    pub fn feet(&self) -> Vec2 {
        let b = self.bounds();
        Vec2::new(b.center().x, b.max().y)
    }
}

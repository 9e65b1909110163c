//! Data-driven physics balance
//!
//! Values are per-tick quantities at the reference 30 Hz step. The resolver
//! rescales them by `dt / SIM_DT` so other step sizes keep the same feel.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics constants applied by `sim::physics::step_body`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub speed_limit: f32,
    pub gravity: f32,
    pub ground_friction: f32,
    pub air_friction: f32,
    pub bounce_preserved: f32,
    pub bounce_preserved_bouncy: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            speed_limit: SPEED_LIMIT,
            gravity: GRAVITY,
            ground_friction: GROUND_FRICTION,
            air_friction: AIR_FRICTION,
            bounce_preserved: BOUNCE_PRESERVED,
            bounce_preserved_bouncy: BOUNCE_PRESERVED_BOUNCE_WALL,
        }
    }
}

impl PhysicsTuning {
    /// Projectiles fly straight: no gravity, no drag
    pub fn projectile(&self) -> Self {
        Self {
            gravity: 0.0,
            ground_friction: 0.0,
            air_friction: 0.0,
            ..*self
        }
    }

    /// Particles drift down at half gravity and lose speed in the air
    pub fn particle(&self) -> Self {
        Self {
            gravity: self.gravity * 0.5,
            air_friction: 0.08,
            ..*self
        }
    }

    /// Parse overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering, audio or platform dependencies

pub mod archetype;
pub mod behavior;
pub mod character;
pub mod collision;
pub mod director;
pub mod events;
pub mod particle;
pub mod physics;
pub mod pool;
pub mod possession;
pub mod projectile;
pub mod rng;
pub mod state;
pub mod tick;

pub use archetype::{ActionKind, Archetype, CharacterType};
pub use character::{Character, CharacterHandle};
pub use collision::{Collision, Mover, query};
pub use events::{GameEvent, SoundEffect};
pub use particle::{Particle, ParticleHandle, ParticleVisual};
pub use physics::{PhysicsBody, StepOutcome, step_body};
pub use pool::{Handle, Pool};
pub use possession::{damage_player, kill_character, take_body};
pub use projectile::{Projectile, ProjectileHandle};
pub use state::{PossessionState, SessionState, World};
pub use tick::{TickInput, tick};

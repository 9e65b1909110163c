//! Per-tick physics for characters, projectiles and particles
//!
//! Movement is resolved one axis at a time, X then Y. A blocked move is
//! backed out toward the starting position in `RETREAT_STEP` increments
//! until the body is free, then the velocity on that axis is inverted and
//! scaled by the bounce factor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Collision, Mover, query};
use super::state::World;
use crate::Aabb;
use crate::consts::*;
use crate::tilemap::TILE_ICE;
use crate::tuning::PhysicsTuning;

/// Position, velocity and bounding box of an entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    /// Top-left of the bounding box
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub size: Vec2,
    /// Skip collision entirely (particles)
    pub noclip: bool,
}

impl PhysicsBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            noclip: false,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// What happened during one `step_body`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// Standing on something solid before the move
    pub grounded: bool,
    /// Horizontal move was blocked
    pub hit_x: bool,
    /// Vertical move was blocked
    pub hit_y: bool,
    /// Collision seen on the X move (blocking or not)
    pub x: Collision,
    /// Collision seen on the Y move (blocking or not)
    pub y: Collision,
    /// Hard horizontal stop, worth a bump sound
    pub wall_bump: bool,
    /// Hard downward stop, worth a sound and dust
    pub hard_landing: bool,
}

impl StepOutcome {
    /// The first blocking collision this step, X before Y
    pub fn blocking(&self) -> Option<Collision> {
        if self.hit_x {
            Some(self.x)
        } else if self.hit_y {
            Some(self.y)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X = 0,
    Y = 1,
}

struct AxisOutcome {
    collision: Collision,
    blocked: bool,
    impact: f32,
}

/// Advance `body` by one step of `dt` seconds.
///
/// `body` must be a copy taken out of its pool slot; the caller writes it
/// back. Other entities struck by a blocking move receive the mover's
/// velocity on that axis.
pub fn step_body(
    world: &mut World,
    body: &mut PhysicsBody,
    mover: Mover,
    accel: Vec2,
    tuning: &PhysicsTuning,
    dt: f32,
) -> StepOutcome {
    let scale = dt / SIM_DT;
    let limit = Vec2::splat(tuning.speed_limit);

    body.vel = (body.vel + accel * scale).clamp(-limit, limit);

    let mut outcome = StepOutcome::default();
    let mut friction = tuning.air_friction;
    if !body.noclip {
        let probe = body.bounds().translated(Vec2::new(0.0, GROUND_PROBE));
        let ground = query(world, probe, mover);
        outcome.grounded = ground.blocks(mover);
        if outcome.grounded {
            friction = if ground == Collision::Wall(TILE_ICE) {
                0.0
            } else {
                tuning.ground_friction
            };
        }
    }

    body.vel.x *= (1.0 - friction).powf(scale);
    body.vel.y += tuning.gravity * scale;

    if body.noclip {
        body.pos += body.vel * scale;
        return outcome;
    }

    let x = resolve_axis(world, body, mover, Axis::X, tuning, scale);
    outcome.x = x.collision;
    outcome.hit_x = x.blocked;
    outcome.wall_bump = x.blocked && x.impact.abs() > WALL_BUMP_SPEED;

    let y = resolve_axis(world, body, mover, Axis::Y, tuning, scale);
    outcome.y = y.collision;
    outcome.hit_y = y.blocked;
    outcome.hard_landing = y.blocked && y.impact > HARD_LANDING_SPEED;

    outcome
}

fn resolve_axis(
    world: &mut World,
    body: &mut PhysicsBody,
    mover: Mover,
    axis: Axis,
    tuning: &PhysicsTuning,
    scale: f32,
) -> AxisOutcome {
    let i = axis as usize;
    let vel = body.vel[i];
    let start = body.pos;
    let mut target = start;
    target[i] += vel * scale;

    let collision = query(world, Aabb::new(target, body.size), mover);
    if !collision.blocks(mover) {
        body.pos = target;
        return AxisOutcome {
            collision,
            blocked: false,
            impact: 0.0,
        };
    }

    // Back out toward the start; snapping to it once closer than a step
    // keeps resting bodies from creeping. The retreated position is final
    // for this step: the bounced velocity only applies from the next one.
    let step = -vel.signum() * RETREAT_STEP;
    loop {
        if (target[i] - start[i]).abs() <= RETREAT_STEP {
            target = start;
            break;
        }
        target[i] += step;
        if !query(world, Aabb::new(target, body.size), mover).blocks(mover) {
            break;
        }
    }
    body.pos = target;

    match collision {
        Collision::Character(h) => {
            if let Some(other) = world.characters.get_mut(h) {
                other.body.vel[i] += vel;
            }
        }
        Collision::Projectile(h) => {
            if let Some(other) = world.projectiles.get_mut(h) {
                other.body.vel[i] += vel;
            }
        }
        _ => {}
    }

    let preserved = if matches!(collision, Collision::BouncyWall(_)) {
        tuning.bounce_preserved_bouncy
    } else {
        tuning.bounce_preserved
    };
    body.vel[i] = -vel * preserved;

    AxisOutcome {
        collision,
        blocked: true,
        impact: vel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::archetype::CharacterType;
    use crate::sim::character::{Character, CharacterHandle};
    use crate::sim::projectile::Projectile;
    use crate::tilemap::TileMap;

    /// 8x6 room: solid floor, plain wall on the right, bouncy wall on the left
    fn room() -> World {
        let layout = "\
2 0 0 0 0 0 0 1
2 0 0 0 0 0 0 1
2 0 0 0 0 0 0 1
2 0 0 0 0 0 0 1
2 0 0 0 0 0 0 1
1 1 1 1 1 1 1 1
";
        World::new(TileMap::parse(layout, 16.0, 16.0).unwrap())
    }

    fn add_character(world: &mut World, pos: Vec2) -> CharacterHandle {
        world
            .characters
            .allocate(Character::new(1, CharacterType::Jumper, pos, 1.0))
            .unwrap()
    }

    fn step_character(world: &mut World, h: CharacterHandle, accel: Vec2) -> StepOutcome {
        let mut body = world.characters.get(h).unwrap().body;
        let mover = Mover::Character {
            handle: h,
            player: false,
        };
        let outcome = step_body(world, &mut body, mover, accel, &PhysicsTuning::default(), SIM_DT);
        world.characters.get_mut(h).unwrap().body = body;
        outcome
    }

    #[test]
    fn test_resting_body_stays_put() {
        let mut world = room();
        // Floor top is y=80; body is 14 tall, parked just above contact
        let start = Vec2::new(40.0, 80.0 - 14.0 - 0.05);
        let h = add_character(&mut world, start);

        let outcome = step_character(&mut world, h, Vec2::ZERO);
        let body = world.characters.get(h).unwrap().body;

        assert!(outcome.grounded);
        assert!(outcome.hit_y);
        assert!(!outcome.hit_x);
        assert_eq!(body.pos.x, start.x);
        assert!((body.pos.y - start.y).abs() < 1e-3, "y drifted to {}", body.pos.y);
    }

    #[test]
    fn test_normal_wall_bounce() {
        let mut world = room();
        // Airborne, moving right into the plain wall at x=112
        let h = add_character(&mut world, Vec2::new(112.0 - 12.0 - 2.0, 20.0));
        world.characters.get_mut(h).unwrap().body.vel = Vec2::new(10.0, 0.0);

        let outcome = step_character(&mut world, h, Vec2::ZERO);
        let body = world.characters.get(h).unwrap().body;
        let v = 10.0 * (1.0 - AIR_FRICTION);

        assert!(outcome.hit_x);
        assert_eq!(outcome.x, Collision::Wall(1));
        assert!(outcome.wall_bump);
        assert!((body.vel.x - (-v * BOUNCE_PRESERVED)).abs() < 1e-4);
        assert!(body.bounds().max().x < 112.0);
        assert!(body.bounds().max().x > 112.0 - 2.0 - RETREAT_STEP);
    }

    #[test]
    fn test_bouncy_wall_bounce() {
        let mut world = room();
        // Moving left into the bouncy wall whose right edge is x=16
        let h = add_character(&mut world, Vec2::new(16.0 + 3.0, 20.0));
        world.characters.get_mut(h).unwrap().body.vel = Vec2::new(-8.0, 0.0);

        let outcome = step_character(&mut world, h, Vec2::ZERO);
        let body = world.characters.get(h).unwrap().body;
        let v = -8.0 * (1.0 - AIR_FRICTION);

        assert_eq!(outcome.x, Collision::BouncyWall(2));
        assert!((body.vel.x - (-v * BOUNCE_PRESERVED_BOUNCE_WALL)).abs() < 1e-4);
        assert!(body.pos.x > 16.0);
    }

    #[test]
    fn test_velocity_clamped() {
        let mut world = room();
        let h = add_character(&mut world, Vec2::new(40.0, 10.0));
        world.characters.get_mut(h).unwrap().body.vel = Vec2::new(0.0, -100.0);
        step_character(&mut world, h, Vec2::new(50.0, 0.0));
        let body = world.characters.get(h).unwrap().body;
        assert!(body.vel.x <= SPEED_LIMIT);
        // Clamp happens before gravity is added
        assert!((body.vel.y - (-SPEED_LIMIT + GRAVITY)).abs() < 1e-4);
    }

    #[test]
    fn test_hard_landing_reported() {
        let mut world = room();
        let h = add_character(&mut world, Vec2::new(40.0, 80.0 - 14.0 - 3.0));
        world.characters.get_mut(h).unwrap().body.vel = Vec2::new(0.0, 10.0);
        let outcome = step_character(&mut world, h, Vec2::ZERO);
        assert!(outcome.hit_y);
        assert!(outcome.hard_landing);
        let body = world.characters.get(h).unwrap().body;
        assert!(body.vel.y < 0.0);
        assert!(body.bounds().max().y < 80.0);
    }

    #[test]
    fn test_ground_friction_only_when_grounded() {
        let mut world = room();
        let grounded = add_character(&mut world, Vec2::new(30.0, 80.0 - 14.0 - 0.05));
        let airborne = add_character(&mut world, Vec2::new(60.0, 10.0));
        world.characters.get_mut(grounded).unwrap().body.vel.x = 2.0;
        world.characters.get_mut(airborne).unwrap().body.vel.x = 2.0;

        step_character(&mut world, grounded, Vec2::ZERO);
        step_character(&mut world, airborne, Vec2::ZERO);

        let g = world.characters.get(grounded).unwrap().body.vel.x;
        let a = world.characters.get(airborne).unwrap().body.vel.x;
        assert!((g - 2.0 * (1.0 - GROUND_FRICTION)).abs() < 1e-5);
        assert!((a - 2.0 * (1.0 - AIR_FRICTION)).abs() < 1e-5);
    }

    #[test]
    fn test_ice_has_no_ground_friction() {
        let layout = "0 0 0\n0 0 0\n20 20 20\n";
        let mut world = World::new(TileMap::parse(layout, 16.0, 16.0).unwrap());
        let h = add_character(&mut world, Vec2::new(10.0, 32.0 - 14.0 - 0.05));
        world.characters.get_mut(h).unwrap().body.vel.x = 1.0;
        let outcome = step_character(&mut world, h, Vec2::ZERO);
        assert!(outcome.grounded);
        assert_eq!(world.characters.get(h).unwrap().body.vel.x, 1.0);
    }

    #[test]
    fn test_noclip_ignores_walls() {
        let mut world = room();
        let mut body = PhysicsBody::new(Vec2::new(100.0, 20.0), Vec2::splat(2.0));
        body.noclip = true;
        body.vel = Vec2::new(10.0, 0.0);
        let outcome = step_body(
            &mut world,
            &mut body,
            Mover::Particle,
            Vec2::ZERO,
            &PhysicsTuning::default().projectile(),
            SIM_DT,
        );
        assert!(!outcome.hit_x);
        assert_eq!(body.pos, Vec2::new(110.0, 20.0));
    }

    #[test]
    fn test_projectile_imparts_velocity_on_character() {
        let mut world = room();
        let target = add_character(&mut world, Vec2::new(60.0, 40.0));
        let shot = world
            .projectiles
            .allocate(Projectile::new(2, Vec2::new(52.0, 45.0), Vec2::new(7.0, 0.0), 1.0, true))
            .unwrap();
        let mut body = world.projectiles.get(shot).unwrap().body;
        let outcome = step_body(
            &mut world,
            &mut body,
            Mover::Projectile(shot),
            Vec2::ZERO,
            &PhysicsTuning::default().projectile(),
            SIM_DT,
        );

        assert_eq!(outcome.x, Collision::Character(target));
        assert!(outcome.hit_x);
        assert_eq!(world.characters.get(target).unwrap().body.vel.x, 7.0);
        assert!(body.vel.x < 0.0);
    }

    #[test]
    fn test_characters_pass_through_each_other() {
        let mut world = room();
        let a = add_character(&mut world, Vec2::new(40.0, 20.0));
        let _b = add_character(&mut world, Vec2::new(46.0, 20.0));
        world.characters.get_mut(a).unwrap().body.vel.x = 4.0;
        let outcome = step_character(&mut world, a, Vec2::ZERO);
        assert!(!outcome.hit_x);
        assert!(matches!(outcome.x, Collision::Character(_)));
        assert!(world.characters.get(a).unwrap().body.pos.x > 43.0);
    }

    #[test]
    fn test_explicit_dt_scales_motion() {
        let mut world = room();
        let mut body = PhysicsBody::new(Vec2::new(40.0, 20.0), Vec2::splat(2.0));
        body.vel = Vec2::new(3.0, 0.0);
        let tuning = PhysicsTuning::default().projectile();
        step_body(&mut world, &mut body, Mover::Particle, Vec2::ZERO, &tuning, SIM_DT * 2.0);
        assert!((body.pos.x - 46.0).abs() < 1e-4);
    }
}

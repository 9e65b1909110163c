//! Collision queries against the tile grid and the entity pools
//!
//! A query samples the four corners of a box against the tile grid (first
//! non-empty tile wins), then looks for overlapping live characters, then
//! projectiles. Walls always win over entities at the same query.

use super::character::CharacterHandle;
use super::projectile::ProjectileHandle;
use super::state::World;
use crate::Aabb;
use crate::tilemap::{TileClass, TileMap};

/// Result of a collision query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Collision {
    #[default]
    None,
    Wall(u16),
    BouncyWall(u16),
    Character(CharacterHandle),
    Projectile(ProjectileHandle),
}

/// Identity of whatever is asking, so it never collides with itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mover {
    Character { handle: CharacterHandle, player: bool },
    Projectile(ProjectileHandle),
    Particle,
}

impl Mover {
    /// Player-only walls stop the player body and nothing else
    fn feels_player_walls(&self) -> bool {
        matches!(self, Mover::Character { player: true, .. })
    }
}

impl Collision {
    pub fn is_none(&self) -> bool {
        matches!(self, Collision::None)
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Collision::Wall(_) | Collision::BouncyWall(_))
    }

    /// Whether this result stops `mover`. Same-kind entity overlaps
    /// (character/character, projectile/projectile) never block.
    pub fn blocks(&self, mover: Mover) -> bool {
        match self {
            Collision::None => false,
            Collision::Wall(_) | Collision::BouncyWall(_) => true,
            Collision::Character(_) => matches!(mover, Mover::Projectile(_)),
            Collision::Projectile(_) => matches!(mover, Mover::Character { .. }),
        }
    }
}

/// Tile collision for a box, corners in tie-break order
pub fn tile_collision(tiles: &TileMap, rect: Aabb, player_walls: bool) -> Collision {
    for corner in rect.corners() {
        let id = tiles.tile_at_point(corner);
        match TileClass::of(id) {
            TileClass::Empty => continue,
            TileClass::PlayerOnly if !player_walls => continue,
            TileClass::BouncyWall => return Collision::BouncyWall(id),
            TileClass::Wall | TileClass::Ice | TileClass::PlayerOnly => return Collision::Wall(id),
        }
    }
    Collision::None
}

/// Full query for `mover` occupying `rect`.
///
/// A blocking entity hit is preferred over a non-blocking one so that a
/// character overlapping another character still sees a projectile behind it.
pub fn query(world: &World, rect: Aabb, mover: Mover) -> Collision {
    let wall = tile_collision(&world.tiles, rect, mover.feels_player_walls());
    if !wall.is_none() {
        return wall;
    }
    if mover == Mover::Particle {
        return Collision::None;
    }

    let self_character = match mover {
        Mover::Character { handle, .. } => Some(handle),
        _ => None,
    };
    let self_projectile = match mover {
        Mover::Projectile(handle) => Some(handle),
        _ => None,
    };

    let character = world
        .characters
        .iter()
        .find(|(h, c)| Some(*h) != self_character && c.bounds().overlaps(&rect))
        .map(|(h, _)| Collision::Character(h));
    let projectile = world
        .projectiles
        .iter()
        .find(|(h, p)| Some(*h) != self_projectile && p.body.bounds().overlaps(&rect))
        .map(|(h, _)| Collision::Projectile(h));

    let mut informational = Collision::None;
    for hit in [character, projectile].into_iter().flatten() {
        if hit.blocks(mover) {
            return hit;
        }
        if informational.is_none() {
            informational = hit;
        }
    }
    informational
}

/// Every live character overlapping `rect`, except `exclude`
pub fn characters_in(world: &World, rect: Aabb, exclude: Option<CharacterHandle>) -> Vec<CharacterHandle> {
    world
        .characters
        .iter()
        .filter(|(h, c)| Some(*h) != exclude && c.bounds().overlaps(&rect))
        .map(|(h, _)| h)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::archetype::CharacterType;
    use crate::sim::character::Character;
    use crate::sim::projectile::Projectile;
    use crate::tilemap::TILE_PLAYER_WALL;
    use glam::Vec2;
    use proptest::prelude::*;

    fn world(layout: &str) -> World {
        World::new(TileMap::parse(layout, 16.0, 16.0).unwrap())
    }

    fn open_world() -> World {
        world("0 0 0 0\n0 0 0 0\n0 0 0 0\n1 1 1 1\n")
    }

    fn spawn_character(world: &mut World, pos: Vec2) -> CharacterHandle {
        world
            .characters
            .allocate(Character::new(0, CharacterType::Jumper, pos, 1.0))
            .unwrap()
    }

    #[test]
    fn test_first_corner_wins() {
        // Bouncy on the left, plain wall on the right: top-left corner wins
        let w = world("2 1\n0 0\n");
        let rect = Aabb::new(Vec2::new(10.0, 2.0), Vec2::new(10.0, 4.0));
        assert_eq!(tile_collision(&w.tiles, rect, false), Collision::BouncyWall(2));
    }

    #[test]
    fn test_player_only_wall() {
        let w = world("21 0\n0 0\n");
        let rect = Aabb::new(Vec2::new(2.0, 2.0), Vec2::new(4.0, 4.0));
        assert_eq!(tile_collision(&w.tiles, rect, false), Collision::None);
        assert_eq!(
            tile_collision(&w.tiles, rect, true),
            Collision::Wall(TILE_PLAYER_WALL)
        );
    }

    #[test]
    fn test_blocking_table() {
        let mut w = open_world();
        let c = spawn_character(&mut w, Vec2::ZERO);
        let p = w
            .projectiles
            .allocate(Projectile::new(0, Vec2::new(30.0, 5.0), Vec2::ZERO, 1.0, false))
            .unwrap();
        let as_character = Mover::Character {
            handle: c,
            player: false,
        };
        let as_projectile = Mover::Projectile(p);

        assert!(Collision::Wall(1).blocks(as_character));
        assert!(Collision::BouncyWall(3).blocks(as_projectile));
        assert!(!Collision::Character(c).blocks(as_character));
        assert!(Collision::Character(c).blocks(as_projectile));
        assert!(Collision::Projectile(p).blocks(as_character));
        assert!(!Collision::Projectile(p).blocks(as_projectile));
        assert!(!Collision::None.blocks(as_character));
    }

    #[test]
    fn test_query_ignores_self() {
        let mut w = open_world();
        let c = spawn_character(&mut w, Vec2::new(8.0, 8.0));
        let rect = w.characters.get(c).unwrap().bounds();
        let mover = Mover::Character {
            handle: c,
            player: false,
        };
        assert_eq!(query(&w, rect, mover), Collision::None);
    }

    #[test]
    fn test_blocking_projectile_preferred_over_character_overlap() {
        let mut w = open_world();
        let me = spawn_character(&mut w, Vec2::new(0.0, 0.0));
        let other = spawn_character(&mut w, Vec2::new(4.0, 0.0));
        let shot = w
            .projectiles
            .allocate(Projectile::new(0, Vec2::new(10.0, 6.0), Vec2::ZERO, 1.0, false))
            .unwrap();
        let rect = w.characters.get(me).unwrap().bounds();
        let mover = Mover::Character {
            handle: me,
            player: false,
        };
        assert_eq!(query(&w, rect, mover), Collision::Projectile(shot));

        w.projectiles.free(shot);
        assert_eq!(query(&w, rect, mover), Collision::Character(other));
    }

    #[test]
    fn test_characters_in_box() {
        let mut w = open_world();
        let a = spawn_character(&mut w, Vec2::new(0.0, 0.0));
        let b = spawn_character(&mut w, Vec2::new(20.0, 0.0));
        let _far = spawn_character(&mut w, Vec2::new(50.0, 30.0));
        let rect = Aabb::new(Vec2::ZERO, Vec2::new(30.0, 10.0));
        assert_eq!(characters_in(&w, rect, None), vec![a, b]);
        assert_eq!(characters_in(&w, rect, Some(a)), vec![b]);
    }

    proptest! {
        #[test]
        fn prop_wall_beats_character(col in 0i32..4, x_off in 0.0f32..8.0, y_off in 0.0f32..8.0) {
            // Bottom row is solid; park a character across it and query there
            let mut w = open_world();
            let pos = Vec2::new(col as f32 * 16.0 + x_off, 48.0 + y_off - 7.0);
            let _c = spawn_character(&mut w, pos);
            let p = w
                .projectiles
                .allocate(Projectile::new(0, Vec2::new(-100.0, -100.0), Vec2::ZERO, 1.0, false))
                .unwrap();
            let rect = Aabb::new(pos, Vec2::new(4.0, 8.0));
            let result = query(&w, rect, Mover::Projectile(p));
            prop_assert_eq!(result, Collision::Wall(1));
        }
    }
}

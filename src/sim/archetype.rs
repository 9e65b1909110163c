//! Character archetypes
//!
//! One record per character type holds everything that varies by type:
//! sprite key, movement, lifespan, AI telegraph parameters and the action
//! each side performs. Behavior code looks the record up once and never
//! switches on the type directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Character type; `Invalid` marks an empty/uninitialised record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CharacterType {
    #[default]
    Invalid = 0,
    Jumper = 1,
    XShooter = 2,
    YShooter = 3,
    XYShooter = 4,
    Bomber = 5,
    Laser = 6,
    Dasher = 7,
}

impl CharacterType {
    /// Every spawnable type
    pub const PLAYABLE: [CharacterType; 7] = [
        CharacterType::Jumper,
        CharacterType::XShooter,
        CharacterType::YShooter,
        CharacterType::XYShooter,
        CharacterType::Bomber,
        CharacterType::Laser,
        CharacterType::Dasher,
    ];

    #[inline]
    pub fn archetype(self) -> &'static Archetype {
        &ARCHETYPES[self as usize]
    }

    /// Seconds a player survives in this body
    #[inline]
    pub fn lifespan(self) -> f32 {
        self.archetype().lifespan
    }
}

/// What pressing the action button (or an expired telegraph) does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionKind {
    /// Nothing (invalid type)
    None,
    Jump,
    /// Slam straight down at the speed limit
    FastFall,
    /// Fire a projectile; `dir.x` is mirrored by facing
    Shoot { dir: Vec2, speed: f32, recoil: f32 },
    /// Kill everything nearby, then the bomber itself
    Bomb,
    /// Kill everything in a horizontal beam across the level
    Laser,
    /// Kill everything in a wide box at the feet
    GroundPound,
    /// Kill anything touching
    Punch,
}

/// Per-type capability table entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Archetype {
    pub name: &'static str,
    pub sprite: &'static str,
    pub size: Vec2,
    /// Horizontal acceleration (pixels per tick²)
    pub acceleration: f32,
    pub jump_speed: f32,
    /// Player lifespan in seconds
    pub lifespan: f32,
    /// Minimum seconds between AI actions
    pub cooldown: f32,
    /// Seconds between an AI deciding to act and acting
    pub telegraph: f32,
    /// Chance of deciding to act on each check
    pub action_chance: f32,
    /// Frames between action checks
    pub check_frequency: u32,
    pub player_action: ActionKind,
    pub ai_action: ActionKind,
}

const BODY: Vec2 = Vec2::new(12.0, 14.0);
const SHOT_SPEED: f32 = 8.0;

static ARCHETYPES: [Archetype; 8] = [
    Archetype {
        name: "invalid",
        sprite: "",
        size: BODY,
        acceleration: 0.0,
        jump_speed: 0.0,
        lifespan: 0.0,
        cooldown: 0.0,
        telegraph: 0.0,
        action_chance: 0.0,
        check_frequency: 1,
        player_action: ActionKind::None,
        ai_action: ActionKind::None,
    },
    Archetype {
        name: "jumper",
        sprite: "sprites/jumper",
        size: BODY,
        acceleration: 0.5,
        jump_speed: 9.0,
        lifespan: 5.0,
        cooldown: 1.5,
        telegraph: 0.4,
        action_chance: 0.35,
        check_frequency: 10,
        player_action: ActionKind::FastFall,
        ai_action: ActionKind::Jump,
    },
    Archetype {
        name: "x-shooter",
        sprite: "sprites/x_shooter",
        size: BODY,
        acceleration: 0.4,
        jump_speed: 7.0,
        lifespan: 5.0,
        cooldown: 2.0,
        telegraph: 0.6,
        action_chance: 0.3,
        check_frequency: 15,
        player_action: ActionKind::Shoot {
            dir: Vec2::new(1.0, 0.0),
            speed: SHOT_SPEED,
            recoil: 2.0,
        },
        ai_action: ActionKind::Shoot {
            dir: Vec2::new(1.0, 0.0),
            speed: SHOT_SPEED,
            recoil: 2.0,
        },
    },
    Archetype {
        name: "y-shooter",
        sprite: "sprites/y_shooter",
        size: BODY,
        acceleration: 0.4,
        jump_speed: 7.0,
        lifespan: 5.0,
        cooldown: 2.0,
        telegraph: 0.6,
        action_chance: 0.3,
        check_frequency: 15,
        player_action: ActionKind::Shoot {
            dir: Vec2::new(0.0, -1.0),
            speed: SHOT_SPEED,
            recoil: 0.0,
        },
        ai_action: ActionKind::Shoot {
            dir: Vec2::new(0.0, -1.0),
            speed: SHOT_SPEED,
            recoil: 0.0,
        },
    },
    Archetype {
        name: "xy-shooter",
        sprite: "sprites/xy_shooter",
        size: BODY,
        acceleration: 0.4,
        jump_speed: 7.0,
        lifespan: 6.0,
        cooldown: 2.5,
        telegraph: 0.7,
        action_chance: 0.3,
        check_frequency: 15,
        player_action: ActionKind::Shoot {
            dir: Vec2::new(core::f32::consts::FRAC_1_SQRT_2, -core::f32::consts::FRAC_1_SQRT_2),
            speed: SHOT_SPEED,
            recoil: 1.5,
        },
        ai_action: ActionKind::Shoot {
            dir: Vec2::new(core::f32::consts::FRAC_1_SQRT_2, -core::f32::consts::FRAC_1_SQRT_2),
            speed: SHOT_SPEED,
            recoil: 1.5,
        },
    },
    Archetype {
        name: "bomber",
        sprite: "sprites/bomber",
        size: BODY,
        acceleration: 0.35,
        jump_speed: 6.0,
        lifespan: 4.0,
        cooldown: 3.0,
        telegraph: 1.0,
        action_chance: 0.2,
        check_frequency: 20,
        player_action: ActionKind::Bomb,
        ai_action: ActionKind::Bomb,
    },
    Archetype {
        name: "laser",
        sprite: "sprites/laser",
        size: BODY,
        acceleration: 0.3,
        jump_speed: 6.0,
        lifespan: 3.0,
        cooldown: 3.5,
        telegraph: 1.2,
        action_chance: 0.25,
        check_frequency: 20,
        player_action: ActionKind::Laser,
        ai_action: ActionKind::Laser,
    },
    Archetype {
        name: "dasher",
        sprite: "sprites/dasher",
        size: BODY,
        acceleration: 0.8,
        jump_speed: 7.0,
        lifespan: 4.0,
        cooldown: 0.0,
        telegraph: 0.0,
        action_chance: 1.0,
        check_frequency: 1,
        player_action: ActionKind::GroundPound,
        ai_action: ActionKind::Punch,
    },
];

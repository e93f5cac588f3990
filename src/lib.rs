//! Nebula Strike - a wave-based arcade space shooter
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, waves, collisions, game state)
//! - `audio`: Sound catalog and the bridge to an external audio backend
//! - `settings`: Player preferences (volume, mute)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioManager, SoundKind, SoundSink};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Viewport dimensions (screen space, y grows downward)
    pub const VIEW_WIDTH: f32 = 1600.0;
    pub const VIEW_HEIGHT: f32 = 1000.0;

    /// Frame step used when no previous timestamp exists
    pub const NOMINAL_DT: f32 = 1.0 / 60.0;
    /// Largest step a single tick may integrate (tab switches, hitches)
    pub const MAX_DT: f32 = 0.1;

    /// Player ship
    pub const PLAYER_RADIUS: f32 = 25.0;
    /// Distance from the bottom edge where the ship spawns
    pub const PLAYER_SPAWN_OFFSET: f32 = 120.0;
    /// Fraction of the remaining distance to the pointer covered per second
    pub const PLAYER_FOLLOW_RATE: f32 = 8.0;

    /// Enemies
    pub const ENEMY_RADIUS: f32 = 22.0;
    pub const ENEMY_HEALTH: u32 = 10;
    pub const ENEMY_BASE_SPEED: f32 = 110.0;
    pub const ENEMY_SPEED_PER_WAVE: f32 = 12.0;

    /// Boss
    pub const BOSS_WIDTH: f32 = 220.0;
    pub const BOSS_HEIGHT: f32 = 140.0;
    pub const BOSS_RADIUS: f32 = 80.0;
    pub const BOSS_CRUISE_Y: f32 = 180.0;
    pub const BOSS_SPEED: f32 = 140.0;
    pub const BOSS_BULLET_INTERVAL_MS: f64 = 900.0;
    pub const BOSS_MISSILE_INTERVAL_MS: f64 = 2600.0;
    pub const BOSS_BULLET_SPEED: f32 = 320.0;
    pub const BOSS_MISSILE_SPEED: f32 = 220.0;
    /// Radians per second a missile may turn toward its target
    pub const MISSILE_TURN_RATE: f32 = 1.6;
    /// Homing time after launch; afterwards a missile flies straight off screen
    pub const MISSILE_FUEL_MS: f64 = 3000.0;

    /// Projectiles
    pub const BOSS_BULLET_RADIUS: f32 = 7.0;
    pub const MISSILE_RADIUS: f32 = 10.0;

    /// Power-ups
    pub const POWERUP_RADIUS: f32 = 16.0;
    pub const POWERUP_FALL_SPEED: f32 = 110.0;

    /// Explosions
    pub const EXPLOSION_DURATION_MS: f64 = 600.0;
    pub const EXPLOSION_RADIUS: f32 = 40.0;

    /// Highest weapon level
    pub const MAX_WEAPON_LEVEL: u8 = 3;
}

/// Rotate `v` by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Pack an RGB colour into a u32 (0xRRGGBB)
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

//! Render-facing view of the game
//!
//! Owned copies of everything a renderer or HUD needs for one frame. Entity
//! collections keep the simulation's order.

use serde::Serialize;

use super::entity::{Boss, Enemy, Explosion, Player, PowerUp, Projectile};
use super::state::GameState;
use super::weapon::WeaponKind;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Projectile>,
    /// Carries its own bullets and missiles
    pub boss: Option<Boss>,
    pub explosions: Vec<Explosion>,
    pub power_ups: Vec<PowerUp>,
    pub hud: Hud,
}

/// Score, progression and flags
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hud {
    pub score: u64,
    pub wave: u32,
    pub health: u32,
    pub max_health: u32,
    pub weapon: WeaponKind,
    pub weapon_level: u8,
    /// 0 when no boost is running
    pub boost_remaining_ms: f64,
    pub bomb_count: u32,
    pub enemies_defeated: u32,
    pub boss_wave: bool,
    pub muted: bool,
    pub game_over: bool,
}

impl Snapshot {
    pub fn capture(state: &GameState, now_ms: f64) -> Self {
        Self {
            player: state.player.clone(),
            enemies: state.enemies.clone(),
            bullets: state.bullets.clone(),
            boss: state.boss.clone(),
            explosions: state.explosions.clone(),
            power_ups: state.power_ups.clone(),
            hud: Hud::capture(state, now_ms),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Hud {
    pub fn capture(state: &GameState, now_ms: f64) -> Self {
        Self {
            score: state.score,
            wave: state.wave,
            health: state.player.health,
            max_health: state.player.max_health,
            weapon: state.player.weapon,
            weapon_level: state.player.weapon_level,
            boost_remaining_ms: state.weapon_boost.remaining_ms(now_ms),
            bomb_count: state.bomb_count,
            enemies_defeated: state.enemies_defeated,
            boss_wave: state.is_boss_wave(),
            muted: state.muted,
            game_over: state.game_over,
        }
    }
}

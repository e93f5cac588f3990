//! Data-driven game balance
//!
//! Every gameplay number that a designer might want to tweak lives here.
//! Defaults reproduce the stock difficulty curve.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Balance values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Starting (and maximum) hull points
    pub player_max_health: u32,
    /// Grace period after a confirmed hit
    pub player_invulnerable_ms: f64,
    /// Minimum time between two weapon switches
    pub weapon_switch_cooldown_ms: f64,

    // === Spawning ===
    /// Delay between enemy spawns at the start of a run
    pub spawn_delay_start_ms: f64,
    /// Lowest spawn delay reachable
    pub spawn_delay_floor_ms: f64,
    /// Spawn delay reduction per wave (`start - wave * step`)
    pub spawn_delay_per_wave_ms: f64,
    /// Extra reduction applied on every wave milestone kill
    pub spawn_delay_milestone_ms: f64,

    // === Progression ===
    /// Every Nth wave is a boss wave
    pub boss_wave_interval: u32,
    /// Kills needed per weapon level-up
    pub kills_per_level_up: u32,
    /// Kills needed per wave advance
    pub kills_per_wave: u32,
    /// Boss hull at wave 0; grows by `boss_health_per_wave`
    pub boss_base_health: u32,
    pub boss_health_per_wave: u32,

    // === Scoring ===
    pub kill_score: u64,
    pub boss_score: u64,
    pub escape_penalty: u64,

    // === Damage ===
    /// Damage a player bullet deals to the boss
    pub boss_hit_damage: u32,
    /// Splash damage a bomb deals to the boss
    pub bomb_boss_damage: u32,

    // === Power-ups ===
    /// Chance an enemy carries a power-up (0-1)
    pub drop_chance: f32,
    /// Share of drops that are bombs (0-1)
    pub bomb_drop_share: f32,
    /// Weapon boost duration; re-pickup restarts it
    pub weapon_boost_ms: f64,

    // === Audio ===
    /// Delay between the fatal hit and the game-over jingle
    pub game_over_sound_delay_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_max_health: 5,
            player_invulnerable_ms: 1000.0,
            weapon_switch_cooldown_ms: 500.0,

            spawn_delay_start_ms: 1000.0,
            spawn_delay_floor_ms: 200.0,
            spawn_delay_per_wave_ms: 50.0,
            spawn_delay_milestone_ms: 100.0,

            boss_wave_interval: 3,
            kills_per_level_up: 10,
            kills_per_wave: 30,
            boss_base_health: 300,
            boss_health_per_wave: 100,

            kill_score: 10,
            boss_score: 100,
            escape_penalty: 5,

            boss_hit_damage: 10,
            bomb_boss_damage: 50,

            drop_chance: 0.1,
            bomb_drop_share: 0.3,
            weapon_boost_ms: 10_000.0,

            game_over_sound_delay_ms: 500.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Load tuning from a file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Clamp values the simulation cannot work with
    pub fn sanitized(mut self) -> Self {
        self.player_max_health = self.player_max_health.max(1);
        // Either would leave the boss unkillable
        self.boss_hit_damage = self.boss_hit_damage.max(1);
        self.bomb_boss_damage = self.bomb_boss_damage.max(1);
        self.boss_wave_interval = self.boss_wave_interval.max(1);
        self.kills_per_level_up = self.kills_per_level_up.max(1);
        self.kills_per_wave = self.kills_per_wave.max(1);
        self.boss_base_health = self.boss_base_health.max(1);
        self.spawn_delay_floor_ms = self.spawn_delay_floor_ms.max(1.0);
        self.spawn_delay_start_ms = self.spawn_delay_start_ms.max(self.spawn_delay_floor_ms);
        self.drop_chance = self.drop_chance.clamp(0.0, 1.0);
        self.bomb_drop_share = self.bomb_drop_share.clamp(0.0, 1.0);
        self.weapon_boost_ms = self.weapon_boost_ms.max(0.0);
        self.player_invulnerable_ms = self.player_invulnerable_ms.max(0.0);
        self
    }

    /// Spawn delay dictated by the wave number alone
    pub fn spawn_delay_for_wave(&self, wave: u32) -> f64 {
        (self.spawn_delay_start_ms - wave as f64 * self.spawn_delay_per_wave_ms)
            .max(self.spawn_delay_floor_ms)
    }

    /// Boss hull for a given wave
    pub fn boss_health_for_wave(&self, wave: u32) -> u32 {
        self.boss_base_health
            .saturating_add(self.boss_health_per_wave.saturating_mul(wave))
    }
}

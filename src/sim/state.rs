//! Session state
//!
//! One `GameState` is one run. It owns every entity collection, the score and
//! wave counters, the RNG and the outgoing sound queue. `tick` is the only
//! thing that advances it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::entity::{Boss, Enemy, Explosion, Player, PowerUp, Projectile, Viewport};
use super::weapon::WeaponBoost;
use crate::audio::SoundKind;
use crate::consts::*;
use crate::tuning::Tuning;

/// Wave state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WavePhase {
    /// Enemies spawn on a timer
    #[default]
    Normal,
    /// A boss is alive; enemy spawning is suspended
    BossWave,
}

/// A sound due at an absolute time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledSound {
    pub at_ms: f64,
    pub kind: SoundKind,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub viewport: Viewport,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Player projectiles (boss projectiles live on the boss)
    pub bullets: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub power_ups: Vec<PowerUp>,
    pub boss: Option<Boss>,

    pub score: u64,
    /// Starts at 1, only ever increases
    pub wave: u32,
    pub enemies_defeated: u32,
    pub phase: WavePhase,
    /// Current gap between enemy spawns; only ever shrinks
    pub spawn_delay_ms: f64,
    pub last_spawn_ms: Option<f64>,

    pub weapon_boost: WeaponBoost,
    pub bomb_count: u32,
    pub game_over: bool,
    /// Survives restarts
    pub muted: bool,

    /// Last known aim target
    pub pointer: Vec2,
    pub last_tick_ms: Option<f64>,
    pub last_weapon_switch_ms: Option<f64>,
    pub last_fire_ms: Option<f64>,
    /// Ticks since the run started
    pub time_ticks: u64,

    sounds: Vec<SoundKind>,
    scheduled: Vec<ScheduledSound>,
}

impl GameState {
    /// Fresh run with stock balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let viewport = Viewport::default();
        let player = Self::spawn_player(&viewport, &tuning);
        let pointer = player.pos;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            viewport,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            power_ups: Vec::new(),
            boss: None,
            score: 0,
            wave: 1,
            enemies_defeated: 0,
            phase: WavePhase::Normal,
            spawn_delay_ms: tuning.spawn_delay_start_ms,
            last_spawn_ms: None,
            weapon_boost: WeaponBoost::default(),
            bomb_count: 0,
            game_over: false,
            muted: false,
            pointer,
            last_tick_ms: None,
            last_weapon_switch_ms: None,
            last_fire_ms: None,
            time_ticks: 0,
            sounds: Vec::new(),
            scheduled: Vec::new(),
            tuning,
        }
    }

    fn spawn_player(viewport: &Viewport, tuning: &Tuning) -> Player {
        let pos = Vec2::new(viewport.width / 2.0, viewport.height - PLAYER_SPAWN_OFFSET);
        Player::new(pos, tuning.player_max_health, tuning.player_invulnerable_ms)
    }

    /// Start a new run in place. Mute, tuning and the RNG stream carry over;
    /// pending deferred sounds belong to the old run and are dropped.
    pub fn restart(&mut self) {
        let mut fresh = Self::with_tuning(self.seed, self.tuning.clone());
        fresh.rng = self.rng.clone();
        fresh.muted = self.muted;
        fresh.last_tick_ms = self.last_tick_ms;
        fresh.sounds = std::mem::take(&mut self.sounds);
        *self = fresh;
        log::info!("New run started");
    }

    pub fn is_boss_wave(&self) -> bool {
        self.phase == WavePhase::BossWave
    }

    pub fn is_weapon_boosted(&self, now_ms: f64) -> bool {
        self.weapon_boost.is_active(now_ms)
    }

    /// Queue a sound for the host; dropped while muted
    pub fn play_sound(&mut self, kind: SoundKind) {
        if !self.muted {
            self.sounds.push(kind);
        }
    }

    pub fn schedule_sound(&mut self, kind: SoundKind, at_ms: f64) {
        self.scheduled.push(ScheduledSound { at_ms, kind });
    }

    /// Play every deferred sound whose time has come
    pub fn fire_due_sounds(&mut self, now_ms: f64) {
        if self.scheduled.is_empty() {
            return;
        }
        let (due, pending): (Vec<_>, Vec<_>) = self
            .scheduled
            .drain(..)
            .partition(|s| s.at_ms <= now_ms);
        self.scheduled = pending;
        for sound in due {
            self.play_sound(sound.kind);
        }
    }

    pub fn pending_sounds(&self) -> &[ScheduledSound] {
        &self.scheduled
    }

    /// Drain the sounds queued since the last call
    pub fn take_sounds(&mut self) -> Vec<SoundKind> {
        std::mem::take(&mut self.sounds)
    }

    /// Enter game over; only the first call has any effect
    pub fn enter_game_over(&mut self, now_ms: f64) -> bool {
        if self.game_over {
            return false;
        }
        self.game_over = true;
        let at = now_ms + self.tuning.game_over_sound_delay_ms;
        self.schedule_sound(SoundKind::GameOver, at);
        log::info!(
            "Game over: score {} on wave {} ({} kills)",
            self.score,
            self.wave,
            self.enemies_defeated
        );
        true
    }
}

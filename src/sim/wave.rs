//! Enemy spawning, boss waves and kill milestones

use super::entity::{Boss, Enemy, Explosion};
use super::state::{GameState, WavePhase};
use crate::audio::SoundKind;

/// Explosions in the boss death burst
pub const BOSS_BURST_COUNT: usize = 5;

impl GameState {
    /// Normal -> BossWave when the wave calls for it and the field is clear
    pub fn update_wave_phase(&mut self, now_ms: f64) {
        if self.phase != WavePhase::Normal
            || self.wave % self.tuning.boss_wave_interval != 0
            || !self.enemies.is_empty()
        {
            return;
        }
        let health = self.tuning.boss_health_for_wave(self.wave);
        self.boss = Some(Boss::new(self.wave, health, &self.viewport, now_ms));
        self.phase = WavePhase::BossWave;
        log::info!("Boss wave {} ({} hp)", self.wave, health);
    }

    /// Spawn one enemy if the spawn delay has elapsed
    pub fn maybe_spawn_enemy(&mut self, now_ms: f64) -> bool {
        if self.is_boss_wave() {
            return false;
        }
        let due = self
            .last_spawn_ms
            .is_none_or(|last| now_ms - last >= self.spawn_delay_ms);
        if !due {
            return false;
        }
        self.spawn_enemy();
        self.last_spawn_ms = Some(now_ms);
        self.spawn_delay_ms = self
            .spawn_delay_ms
            .min(self.tuning.spawn_delay_for_wave(self.wave));
        true
    }

    /// Push a random enemy for the current wave
    pub fn spawn_enemy(&mut self) {
        let enemy = Enemy::spawn(
            &mut self.rng,
            self.wave,
            &self.viewport,
            self.tuning.drop_chance,
            self.tuning.bomb_drop_share,
        );
        self.enemies.push(enemy);
    }

    /// Score a kill and apply the level/wave milestones
    pub fn record_kill(&mut self) {
        self.score = self.score.saturating_add(self.tuning.kill_score);
        self.enemies_defeated = self.enemies_defeated.saturating_add(1);
        let defeated = self.enemies_defeated;

        if defeated % self.tuning.kills_per_level_up == 0 && self.player.level_up() {
            log::info!("Weapon level {}", self.player.weapon_level);
        }

        if defeated % self.tuning.kills_per_wave == 0 {
            self.wave = self.wave.saturating_add(1);
            self.spawn_delay_ms = (self.spawn_delay_ms - self.tuning.spawn_delay_milestone_ms)
                .max(self.tuning.spawn_delay_floor_ms);
            log::info!("Wave {} (spawn every {}ms)", self.wave, self.spawn_delay_ms);
        }
    }

    /// BossWave -> Normal. No-op when there is no boss.
    pub fn defeat_boss(&mut self, now_ms: f64) {
        let Some(boss) = self.boss.take() else {
            return;
        };
        for pos in boss.burst_points(&mut self.rng, BOSS_BURST_COUNT) {
            self.explosions.push(Explosion::large(pos, boss.color, now_ms));
        }
        self.score = self.score.saturating_add(self.tuning.boss_score);
        self.wave = self.wave.saturating_add(1);
        self.phase = WavePhase::Normal;
        self.play_sound(SoundKind::Explosion);
        log::info!("Boss of wave {} destroyed, now wave {}", boss.wave, self.wave);
    }
}

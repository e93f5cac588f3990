//! Weapon catalog, fire patterns, weapon boost and bombs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Explosion, PowerUpKind, Projectile};
use super::state::GameState;
use crate::audio::SoundKind;
use crate::rotate;
use crate::rgb;

/// Player weapon types, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeaponKind {
    #[default]
    Laser,
    Plasma,
    Ion,
    Quantum,
    Nova,
    Pulse,
    Beam,
    Wave,
}

/// Fixed cycle order for `cycle_weapon`
pub const WEAPON_CATALOG: [WeaponKind; 8] = [
    WeaponKind::Laser,
    WeaponKind::Plasma,
    WeaponKind::Ion,
    WeaponKind::Quantum,
    WeaponKind::Nova,
    WeaponKind::Pulse,
    WeaponKind::Beam,
    WeaponKind::Wave,
];

/// How a volley is laid out around the aim vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FirePattern {
    /// Side by side, all along the aim vector (pixels between shots)
    Parallel { spacing: f32 },
    /// Fanned out around the aim vector (radians between shots)
    Fan { spread: f32 },
    /// Evenly around the ship, first shot along the aim vector
    Radial,
}

/// Static stats for a weapon kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    pub pattern: FirePattern,
    pub speed: f32,
    pub radius: f32,
    pub damage: u32,
    /// Shots at level 1
    pub base_count: u32,
    /// Extra shots per level above 1
    pub per_level: u32,
}

impl WeaponProfile {
    /// Shots per trigger pull; a boost adds one
    pub fn shot_count(&self, level: u8, boosted: bool) -> u32 {
        let level = u32::from(level.max(1));
        self.base_count + self.per_level * (level - 1) + u32::from(boosted)
    }

    /// Damage per shot; a boost doubles it
    pub fn shot_damage(&self, boosted: bool) -> u32 {
        if boosted { self.damage * 2 } else { self.damage }
    }
}

impl WeaponKind {
    /// Next weapon in catalog order (wraps)
    pub fn next(self) -> Self {
        let idx = WEAPON_CATALOG.iter().position(|&k| k == self).unwrap_or(0);
        WEAPON_CATALOG[(idx + 1) % WEAPON_CATALOG.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Laser => "laser",
            WeaponKind::Plasma => "plasma",
            WeaponKind::Ion => "ion",
            WeaponKind::Quantum => "quantum",
            WeaponKind::Nova => "nova",
            WeaponKind::Pulse => "pulse",
            WeaponKind::Beam => "beam",
            WeaponKind::Wave => "wave",
        }
    }

    /// Shot sound (1:1 with weapon kind)
    pub fn sound(self) -> SoundKind {
        match self {
            WeaponKind::Laser => SoundKind::Laser,
            WeaponKind::Plasma => SoundKind::Plasma,
            WeaponKind::Ion => SoundKind::Ion,
            WeaponKind::Quantum => SoundKind::Quantum,
            WeaponKind::Nova => SoundKind::Nova,
            WeaponKind::Pulse => SoundKind::Pulse,
            WeaponKind::Beam => SoundKind::Beam,
            WeaponKind::Wave => SoundKind::Wave,
        }
    }

    /// Projectile/HUD colour
    pub fn color(self) -> u32 {
        match self {
            WeaponKind::Laser => rgb(255, 60, 60),
            WeaponKind::Plasma => rgb(80, 160, 255),
            WeaponKind::Ion => rgb(120, 255, 255),
            WeaponKind::Quantum => rgb(190, 90, 255),
            WeaponKind::Nova => rgb(255, 200, 40),
            WeaponKind::Pulse => rgb(60, 255, 120),
            WeaponKind::Beam => rgb(255, 255, 255),
            WeaponKind::Wave => rgb(255, 120, 200),
        }
    }

    pub fn profile(self) -> WeaponProfile {
        use FirePattern::*;
        let (pattern, speed, radius, damage, base_count, per_level) = match self {
            WeaponKind::Laser => (Parallel { spacing: 12.0 }, 700.0, 4.0, 10, 1, 1),
            WeaponKind::Plasma => (Fan { spread: 0.12 }, 520.0, 7.0, 15, 1, 2),
            WeaponKind::Ion => (Parallel { spacing: 8.0 }, 900.0, 3.0, 10, 1, 1),
            WeaponKind::Quantum => (Fan { spread: 0.25 }, 600.0, 5.0, 12, 3, 1),
            WeaponKind::Nova => (Radial, 450.0, 6.0, 10, 6, 2),
            WeaponKind::Pulse => (Fan { spread: 0.08 }, 480.0, 10.0, 20, 1, 1),
            WeaponKind::Beam => (Parallel { spacing: 4.0 }, 1100.0, 4.0, 25, 1, 1),
            WeaponKind::Wave => (Fan { spread: 0.35 }, 500.0, 8.0, 10, 3, 2),
        };
        WeaponProfile {
            pattern,
            speed,
            radius,
            damage,
            base_count,
            per_level,
        }
    }
}

/// Build one volley for `kind` fired from `origin` toward `aim`
pub fn volley(kind: WeaponKind, level: u8, boosted: bool, origin: Vec2, aim: Vec2) -> Vec<Projectile> {
    let profile = kind.profile();
    let count = profile.shot_count(level, boosted);
    let damage = profile.shot_damage(boosted);
    let aim = aim.normalize_or(Vec2::NEG_Y);
    // Offset of shot i from the centre of the volley
    let centered = |i: u32| i as f32 - (count as f32 - 1.0) / 2.0;

    (0..count)
        .map(|i| {
            let (pos, dir) = match profile.pattern {
                FirePattern::Parallel { spacing } => {
                    (origin + aim.perp() * centered(i) * spacing, aim)
                }
                FirePattern::Fan { spread } => (origin, rotate(aim, centered(i) * spread)),
                FirePattern::Radial => {
                    let angle = i as f32 * std::f32::consts::TAU / count as f32;
                    (origin, rotate(aim, angle))
                }
            };
            Projectile::player_shot(pos, dir * profile.speed, profile.radius, damage, kind.color())
        })
        .collect()
}

/// Timed weapon boost (re-pickup restarts the timer, never stacks)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeaponBoost {
    expires_at_ms: Option<f64>,
}

impl WeaponBoost {
    pub fn activate(&mut self, now_ms: f64, duration_ms: f64) {
        self.expires_at_ms = Some(now_ms + duration_ms);
    }

    pub fn is_active(&self, now_ms: f64) -> bool {
        matches!(self.expires_at_ms, Some(expiry) if now_ms < expiry)
    }

    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        self.expires_at_ms
            .map(|expiry| (expiry - now_ms).max(0.0))
            .unwrap_or(0.0)
    }

    pub fn expires_at_ms(&self) -> Option<f64> {
        self.expires_at_ms
    }
}

impl GameState {
    /// Apply a collected power-up
    pub fn apply_power_up(&mut self, kind: PowerUpKind, now_ms: f64) {
        match kind {
            PowerUpKind::Weapon => {
                self.weapon_boost.activate(now_ms, self.tuning.weapon_boost_ms);
                log::debug!("Weapon boost until {:?}", self.weapon_boost.expires_at_ms());
            }
            PowerUpKind::Bomb => {
                self.bomb_count = self.bomb_count.saturating_add(1);
                self.play_sound(SoundKind::Bomb);
                log::debug!("Bomb collected ({} held)", self.bomb_count);
            }
        }
        self.play_sound(SoundKind::PowerUp);
    }

    /// Detonate a bomb: every enemy dies, the boss takes splash damage.
    /// Returns false when no bomb was available.
    pub fn detonate_bomb(&mut self, now_ms: f64) -> bool {
        if self.bomb_count == 0 || self.game_over {
            return false;
        }
        self.bomb_count -= 1;
        self.play_sound(SoundKind::Bomb);

        let victims = std::mem::take(&mut self.enemies);
        let kills = victims.len();
        for enemy in victims {
            self.explosions.push(Explosion::new(enemy.pos, enemy.color, now_ms));
            self.record_kill();
        }

        let splash = self.tuning.bomb_boss_damage;
        let boss_defeated = self
            .boss
            .as_mut()
            .is_some_and(|boss| boss.take_damage(splash));
        if boss_defeated {
            self.defeat_boss(now_ms);
        }

        log::debug!("Bomb detonated: {} enemies cleared, {} left", kills, self.bomb_count);
        true
    }
}

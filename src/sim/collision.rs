//! Collision detection and combat resolution
//!
//! Everything is a circle. Resolution runs in a fixed order each tick; every
//! step first collects what it hit into index masks, then applies removals,
//! so a projectile consumed once is never matched again.

use glam::Vec2;

use super::entity::{Boss, Enemy, Explosion, Player, PowerUp, Projectile};
use super::state::GameState;
use crate::audio::SoundKind;

/// Anything with a circular hitbox
pub trait Body {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

macro_rules! impl_body {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Body for $ty {
                fn center(&self) -> Vec2 {
                    self.pos
                }
                fn radius(&self) -> f32 {
                    self.radius
                }
            }
        )*
    };
}

impl_body!(Player, Enemy, Boss, Projectile, PowerUp, Explosion);

/// Circles overlap when the centre distance is at most the radius sum.
/// Degenerate pairs (radius sum <= 0) never collide.
pub fn overlaps(a: &impl Body, b: &impl Body) -> bool {
    let reach = a.radius() + b.radius();
    if reach <= 0.0 {
        return false;
    }
    a.center().distance_squared(b.center()) <= reach * reach
}

/// Drop every item whose mark is set, keeping order
fn retain_unmarked<T>(items: &mut Vec<T>, marks: &[bool]) {
    let mut idx = 0;
    items.retain(|_| {
        let keep = !marks.get(idx).copied().unwrap_or(false);
        idx += 1;
        keep
    });
}

/// Remove and return every marked item, both halves keeping order
fn take_marked<T>(items: &mut Vec<T>, marks: &[bool]) -> Vec<T> {
    let (taken, kept): (Vec<_>, Vec<_>) = items
        .drain(..)
        .enumerate()
        .partition(|(idx, _)| marks.get(*idx).copied().unwrap_or(false));
    *items = kept.into_iter().map(|(_, item)| item).collect();
    taken.into_iter().map(|(_, item)| item).collect()
}

impl GameState {
    /// Run all collision steps for this tick
    pub fn resolve_collisions(&mut self, now_ms: f64) {
        self.boss_projectiles_vs_player(now_ms);
        self.power_ups_vs_player(now_ms);
        self.bullets_vs_enemies(now_ms);
        self.enemies_vs_player(now_ms);
        self.bullets_vs_boss(now_ms);
        self.boss_body_vs_player(now_ms);
        // The boss may have fired or moved since step one
        self.boss_projectiles_vs_player(now_ms);
    }

    /// Damage the player once. Returns false when the hit is ignored
    /// (invulnerable, or the run is already over).
    pub fn hit_player(&mut self, now_ms: f64) -> bool {
        if self.game_over || self.player.is_invulnerable(now_ms) {
            return false;
        }
        self.play_sound(SoundKind::Hit);
        if self.player.take_damage(now_ms) {
            self.enter_game_over(now_ms);
        }
        true
    }

    fn boss_projectiles_vs_player(&mut self, now_ms: f64) {
        for missiles in [false, true] {
            let overlapping: Vec<usize> = match self.boss.as_ref() {
                Some(boss) => {
                    let projectiles = if missiles { &boss.missiles } else { &boss.bullets };
                    projectiles
                        .iter()
                        .enumerate()
                        .filter(|(_, p)| overlaps(*p, &self.player))
                        .map(|(idx, _)| idx)
                        .collect()
                }
                None => return,
            };
            if overlapping.is_empty() {
                continue;
            }

            let mut consumed = vec![false; overlapping.last().map_or(0, |&i| i + 1)];
            for idx in overlapping {
                consumed[idx] = self.hit_player(now_ms);
            }

            if let Some(boss) = self.boss.as_mut() {
                let projectiles = if missiles {
                    &mut boss.missiles
                } else {
                    &mut boss.bullets
                };
                retain_unmarked(projectiles, &consumed);
            }
        }
    }

    fn power_ups_vs_player(&mut self, now_ms: f64) {
        let touched: Vec<bool> = self
            .power_ups
            .iter()
            .map(|p| overlaps(p, &self.player))
            .collect();
        for power_up in take_marked(&mut self.power_ups, &touched) {
            self.apply_power_up(power_up.kind, now_ms);
        }
    }

    fn bullets_vs_enemies(&mut self, now_ms: f64) {
        let mut consumed = vec![false; self.bullets.len()];
        let mut killed = vec![false; self.enemies.len()];

        for (enemy_idx, enemy) in self.enemies.iter_mut().enumerate() {
            let hit = self
                .bullets
                .iter()
                .enumerate()
                .find(|(b_idx, bullet)| !consumed[*b_idx] && overlaps(*bullet, &*enemy));
            if let Some((b_idx, bullet)) = hit {
                consumed[b_idx] = true;
                killed[enemy_idx] = enemy.take_damage(bullet.damage);
            }
        }

        retain_unmarked(&mut self.bullets, &consumed);
        for enemy in take_marked(&mut self.enemies, &killed) {
            self.explosions
                .push(Explosion::new(enemy.pos, enemy.color, now_ms));
            if let Some(kind) = enemy.drop {
                self.power_ups.push(PowerUp::new(enemy.pos, kind));
            }
            self.play_sound(SoundKind::Explosion);
            self.record_kill();
        }
    }

    fn enemies_vs_player(&mut self, now_ms: f64) {
        let touching = self
            .enemies
            .iter()
            .filter(|e| overlaps(*e, &self.player))
            .count();
        for _ in 0..touching {
            self.hit_player(now_ms);
        }
    }

    fn bullets_vs_boss(&mut self, now_ms: f64) {
        let damage = self.tuning.boss_hit_damage;
        let Some(boss) = self.boss.as_mut() else {
            return;
        };

        let mut consumed = vec![false; self.bullets.len()];
        let mut defeated = false;
        for (idx, bullet) in self.bullets.iter().enumerate() {
            if boss.is_defeated() {
                break;
            }
            if overlaps(bullet, &*boss) {
                consumed[idx] = true;
                defeated |= boss.take_damage(damage);
            }
        }

        retain_unmarked(&mut self.bullets, &consumed);
        if defeated {
            self.defeat_boss(now_ms);
        }
    }

    fn boss_body_vs_player(&mut self, now_ms: f64) {
        let touching = self
            .boss
            .as_ref()
            .is_some_and(|boss| overlaps(boss, &self.player));
        if touching {
            self.hit_player(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EnemyPattern, PowerUpKind};
    use crate::sim::state::WavePhase;

    fn enemy_at(pos: Vec2) -> Enemy {
        Enemy::new(pos, Vec2::ZERO, EnemyPattern::Straight, 0xffffff, None)
    }

    fn shot_at(pos: Vec2) -> Projectile {
        Projectile::player_shot(pos, Vec2::new(0.0, -500.0), 4.0, 10, 0)
    }

    /// State with the player parked far from everything at the bottom
    fn quiet_state() -> GameState {
        let mut state = GameState::new(3);
        state.player.pos = Vec2::new(100.0, 950.0);
        state
    }

    #[test]
    fn test_overlap_edges() {
        let a = shot_at(Vec2::ZERO);
        let b = shot_at(Vec2::new(8.0, 0.0));
        assert!(overlaps(&a, &b));
        let c = shot_at(Vec2::new(8.01, 0.0));
        assert!(!overlaps(&a, &c));

        let mut ghost = shot_at(Vec2::ZERO);
        ghost.radius = 0.0;
        let mut ghost2 = shot_at(Vec2::ZERO);
        ghost2.radius = 0.0;
        assert!(!overlaps(&ghost, &ghost2));
    }

    #[test]
    fn test_one_bullet_kills_one_enemy() {
        let mut state = quiet_state();
        state.enemies.push(enemy_at(Vec2::new(500.0, 300.0)));
        state.enemies.push(enemy_at(Vec2::new(510.0, 300.0)));
        state.bullets.push(shot_at(Vec2::new(505.0, 300.0)));

        state.resolve_collisions(0.0);

        assert_eq!(state.enemies.len(), 1);
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 10);
        assert_eq!(state.enemies_defeated, 1);
        assert_eq!(state.explosions.len(), 1);
        // The first enemy in order takes the hit
        assert_eq!(state.enemies[0].pos.x, 510.0);
    }

    #[test]
    fn test_two_bullets_two_enemies() {
        let mut state = quiet_state();
        state.enemies.push(enemy_at(Vec2::new(500.0, 300.0)));
        state.enemies.push(enemy_at(Vec2::new(510.0, 300.0)));
        state.bullets.push(shot_at(Vec2::new(505.0, 300.0)));
        state.bullets.push(shot_at(Vec2::new(506.0, 300.0)));

        state.resolve_collisions(0.0);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.enemies_defeated, 2);
    }

    #[test]
    fn test_kill_drops_power_up() {
        let mut state = quiet_state();
        let mut enemy = enemy_at(Vec2::new(500.0, 300.0));
        enemy.drop = Some(PowerUpKind::Bomb);
        state.enemies.push(enemy);
        state.bullets.push(shot_at(Vec2::new(500.0, 300.0)));

        state.resolve_collisions(0.0);

        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups[0].kind, PowerUpKind::Bomb);
    }

    #[test]
    fn test_boss_defeat_on_last_hit() {
        let mut state = quiet_state();
        state.wave = 3;
        state.phase = WavePhase::BossWave;
        let mut boss = Boss::new(3, 600, &state.viewport, 0.0);
        boss.pos = Vec2::new(800.0, 200.0);
        boss.health = 10;
        state.boss = Some(boss);
        state.bullets.push(shot_at(Vec2::new(800.0, 200.0)));
        state.bullets.push(shot_at(Vec2::new(800.0, 210.0)));

        state.resolve_collisions(0.0);

        assert!(state.boss.is_none());
        assert_eq!(state.phase, WavePhase::Normal);
        assert_eq!(state.wave, 4);
        assert_eq!(state.score, 100);
        assert_eq!(state.explosions.len(), 5);
        // The second bullet had nothing left to hit
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_enemy_contact_persists() {
        let mut state = quiet_state();
        let pos = state.player.pos;
        state.enemies.push(enemy_at(pos));

        state.resolve_collisions(0.0);
        assert_eq!(state.player.health, 4);
        assert_eq!(state.enemies.len(), 1);

        // Still touching inside the grace window
        state.resolve_collisions(500.0);
        assert_eq!(state.player.health, 4);

        state.resolve_collisions(1_000.0);
        assert_eq!(state.player.health, 3);
    }

    #[test]
    fn test_boss_bullet_consumed_on_hit() {
        let mut state = quiet_state();
        let mut boss = Boss::new(3, 600, &state.viewport, 0.0);
        boss.pos = Vec2::new(800.0, 100.0);
        let pos = state.player.pos;
        boss.bullets.push(Projectile::boss_bullet(pos, Vec2::ZERO));
        boss.missiles.push(Projectile::missile(pos, Vec2::ZERO, 0.0));
        state.boss = Some(boss);

        state.resolve_collisions(0.0);

        assert_eq!(state.player.health, 4);
        let boss = state.boss.as_ref().expect("boss alive");
        assert!(boss.bullets.is_empty());
        // Invulnerable by the time the missile is checked
        assert_eq!(boss.missiles.len(), 1);
    }

    #[test]
    fn test_power_up_pickup() {
        let mut state = quiet_state();
        let pos = state.player.pos;
        state.power_ups.push(PowerUp::new(pos, PowerUpKind::Weapon));
        state.power_ups.push(PowerUp::new(Vec2::new(900.0, 100.0), PowerUpKind::Bomb));

        state.resolve_collisions(2_000.0);

        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups[0].kind, PowerUpKind::Bomb);
        assert!(state.is_weapon_boosted(2_000.0));
        assert!(state.take_sounds().contains(&SoundKind::PowerUp));
    }

    #[test]
    fn test_terminal_hit_enters_game_over_once() {
        let mut state = quiet_state();
        state.player.health = 1;
        let pos = state.player.pos;
        state.enemies.push(enemy_at(pos));
        state.enemies.push(enemy_at(pos));

        state.resolve_collisions(0.0);

        assert!(state.game_over);
        assert_eq!(state.player.health, 0);
        assert_eq!(state.take_sounds(), vec![SoundKind::Hit]);
        assert_eq!(state.pending_sounds().len(), 1);

        state.resolve_collisions(5_000.0);
        assert_eq!(state.pending_sounds().len(), 1);
    }
}

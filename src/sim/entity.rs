//! Entity types and their per-frame movement rules
//!
//! Every entity advances through `advance(&StepContext) -> bool`, where
//! `true` means "remove me". None of them look at each other; collisions are
//! resolved afterwards in `collision`.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::weapon::{WeaponKind, volley};
use crate::consts::*;
use crate::{rgb, rotate};

/// Playfield rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEW_WIDTH,
            height: VIEW_HEIGHT,
        }
    }
}

impl Viewport {
    /// True once a circle of `radius` at `pos` is fully off screen
    pub fn is_outside(&self, pos: Vec2, radius: f32) -> bool {
        pos.x < -radius
            || pos.x > self.width + radius
            || pos.y < -radius
            || pos.y > self.height + radius
    }
}

/// Everything an entity may read while advancing
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Wall-clock time of this tick
    pub now_ms: f64,
    /// Seconds since the previous tick
    pub dt: f32,
    /// Current aim target
    pub pointer: Vec2,
    pub viewport: Viewport,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// The player's ship
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub pos: Vec2,
    /// Unit vector toward the pointer
    pub aim: Vec2,
    pub radius: f32,
    pub health: u32,
    pub max_health: u32,
    pub weapon: WeaponKind,
    /// 1..=MAX_WEAPON_LEVEL, never decreases within a run
    pub weapon_level: u8,
    /// Hits are ignored until this time
    pub invulnerable_until_ms: f64,
    #[serde(skip)]
    invulnerable_ms: f64,
}

impl Player {
    pub fn new(pos: Vec2, max_health: u32, invulnerable_ms: f64) -> Self {
        Self {
            pos,
            aim: Vec2::NEG_Y,
            radius: PLAYER_RADIUS,
            health: max_health,
            max_health,
            weapon: WeaponKind::default(),
            weapon_level: 1,
            invulnerable_until_ms: f64::NEG_INFINITY,
            invulnerable_ms,
        }
    }

    /// Ease toward the pointer and re-aim. The ship is confined to the lower
    /// part of the screen; the pointer itself is not.
    pub fn advance(&mut self, ctx: &StepContext) -> bool {
        let view = ctx.viewport;
        let follow = (PLAYER_FOLLOW_RATE * ctx.dt).min(1.0);
        self.pos += (ctx.pointer - self.pos) * follow;
        self.pos.x = self.pos.x.clamp(self.radius, view.width - self.radius);
        self.pos.y = self
            .pos
            .y
            .clamp(view.height * 0.55, view.height - self.radius);

        let to_pointer = ctx.pointer - self.pos;
        self.aim = if to_pointer.length() > self.radius {
            to_pointer.normalize()
        } else {
            Vec2::NEG_Y
        };
        false
    }

    /// Projectiles for one trigger pull
    pub fn fire(&self, boosted: bool) -> Vec<Projectile> {
        let muzzle = self.pos + self.aim * self.radius;
        volley(self.weapon, self.weapon_level, boosted, muzzle, self.aim)
    }

    /// Switch to the next weapon in the catalog (caller rate-limits)
    pub fn cycle_weapon(&mut self) -> WeaponKind {
        self.weapon = self.weapon.next();
        self.weapon
    }

    /// Raise weapon level; returns false when already maxed
    pub fn level_up(&mut self) -> bool {
        if self.weapon_level >= MAX_WEAPON_LEVEL {
            return false;
        }
        self.weapon_level += 1;
        true
    }

    pub fn is_invulnerable(&self, now_ms: f64) -> bool {
        now_ms < self.invulnerable_until_ms
    }

    /// Lose one hull point; returns true once health is 0
    pub fn take_damage(&mut self, now_ms: f64) -> bool {
        self.health = self.health.saturating_sub(1);
        self.invulnerable_until_ms = now_ms + self.invulnerable_ms;
        self.health == 0
    }
}

// ---------------------------------------------------------------------------
// Enemy
// ---------------------------------------------------------------------------

/// Movement pattern, picked at spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EnemyPattern {
    /// Straight line along the velocity
    Straight,
    /// Falls while swaying around `anchor_x`
    Zigzag {
        anchor_x: f32,
        amplitude: f32,
        frequency: f32,
    },
    /// Diagonal drift that bounces off the side walls
    Diagonal,
}

const ENEMY_COLORS: [u32; 5] = [
    rgb(255, 80, 80),
    rgb(255, 160, 40),
    rgb(200, 60, 255),
    rgb(60, 220, 120),
    rgb(255, 220, 60),
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: u32,
    pub color: u32,
    pub pattern: EnemyPattern,
    /// Power-up released on death, decided at spawn
    pub drop: Option<PowerUpKind>,
    #[serde(skip)]
    age: f32,
}

impl Enemy {
    pub fn new(
        pos: Vec2,
        vel: Vec2,
        pattern: EnemyPattern,
        color: u32,
        drop: Option<PowerUpKind>,
    ) -> Self {
        Self {
            pos,
            vel,
            radius: ENEMY_RADIUS,
            health: ENEMY_HEALTH,
            color,
            pattern,
            drop,
            age: 0.0,
        }
    }

    /// Random enemy entering from the top edge; faster on later waves
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        wave: u32,
        view: &Viewport,
        drop_chance: f32,
        bomb_share: f32,
    ) -> Self {
        let r = ENEMY_RADIUS;
        let speed = ENEMY_BASE_SPEED + wave as f32 * ENEMY_SPEED_PER_WAVE;
        let speed = speed * rng.random_range(0.85..1.15);
        let x = rng.random_range(r..view.width - r);
        let pos = Vec2::new(x, -r);

        let (pattern, vel) = match rng.random_range(0..3) {
            0 => (EnemyPattern::Straight, Vec2::new(0.0, speed)),
            1 => {
                let amplitude = rng.random_range(40.0..120.0);
                let anchor_x = x.clamp(r + amplitude, view.width - r - amplitude);
                let pattern = EnemyPattern::Zigzag {
                    anchor_x,
                    amplitude,
                    frequency: rng.random_range(1.5..3.5),
                };
                (pattern, Vec2::new(0.0, speed * 0.85))
            }
            _ => {
                let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                (EnemyPattern::Diagonal, Vec2::new(side * speed * 0.6, speed * 0.8))
            }
        };

        let drop = rng.random_bool(f64::from(drop_chance)).then(|| {
            if rng.random_bool(f64::from(bomb_share)) {
                PowerUpKind::Bomb
            } else {
                PowerUpKind::Weapon
            }
        });

        let color = ENEMY_COLORS[rng.random_range(0..ENEMY_COLORS.len())];
        let mut enemy = Self::new(pos, vel, pattern, color, drop);
        if let EnemyPattern::Zigzag { anchor_x, .. } = pattern {
            enemy.pos.x = anchor_x;
        }
        enemy
    }

    /// Move along the pattern; true once the enemy has left the playfield
    pub fn advance(&mut self, ctx: &StepContext) -> bool {
        let dt = ctx.dt;
        self.age += dt;
        match self.pattern {
            EnemyPattern::Straight => self.pos += self.vel * dt,
            EnemyPattern::Zigzag {
                anchor_x,
                amplitude,
                frequency,
            } => {
                self.pos.y += self.vel.y * dt;
                self.pos.x = anchor_x + amplitude * (self.age * frequency).sin();
            }
            EnemyPattern::Diagonal => {
                self.pos += self.vel * dt;
                let max_x = ctx.viewport.width - self.radius;
                if self.pos.x < self.radius || self.pos.x > max_x {
                    self.vel.x = -self.vel.x;
                    self.pos.x = self.pos.x.clamp(self.radius, max_x);
                }
            }
        }
        ctx.viewport.is_outside(self.pos, self.radius)
    }

    /// Apply damage; returns true when the enemy is destroyed
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }
}

// ---------------------------------------------------------------------------
// Boss
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Boss {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub health: u32,
    pub max_health: u32,
    pub color: u32,
    pub wave: u32,
    /// Aimed shots fired by the boss
    pub bullets: Vec<Projectile>,
    /// Homing missiles fired by the boss
    pub missiles: Vec<Projectile>,
    #[serde(skip)]
    last_bullet_ms: f64,
    #[serde(skip)]
    last_missile_ms: f64,
    #[serde(skip)]
    sway: f32,
}

impl Boss {
    /// Spawn above the top edge, centred; fires only once on station
    pub fn new(wave: u32, max_health: u32, view: &Viewport, now_ms: f64) -> Self {
        let max_health = max_health.max(1);
        Self {
            pos: Vec2::new(view.width / 2.0, -BOSS_HEIGHT / 2.0),
            width: BOSS_WIDTH,
            height: BOSS_HEIGHT,
            radius: BOSS_RADIUS,
            health: max_health,
            max_health,
            color: rgb(255, 40, 90),
            wave,
            bullets: Vec::new(),
            missiles: Vec::new(),
            last_bullet_ms: now_ms,
            last_missile_ms: now_ms,
            sway: 0.0,
        }
    }

    pub fn is_on_station(&self) -> bool {
        self.pos.y >= BOSS_CRUISE_Y
    }

    pub fn advance(&mut self, ctx: &StepContext) -> bool {
        let dt = ctx.dt;
        let step = BOSS_SPEED * dt;

        if !self.is_on_station() {
            self.pos.y = (self.pos.y + step).min(BOSS_CRUISE_Y);
        } else {
            self.sway += dt;
            let half = self.width / 2.0;
            let target_x = (ctx.pointer.x + (self.sway * 1.3).sin() * 160.0)
                .clamp(half, ctx.viewport.width - half);
            self.pos.x += (target_x - self.pos.x).clamp(-step, step);

            if ctx.now_ms - self.last_bullet_ms >= BOSS_BULLET_INTERVAL_MS {
                self.last_bullet_ms = ctx.now_ms;
                self.fire_bullets(ctx.pointer);
            }
            if ctx.now_ms - self.last_missile_ms >= BOSS_MISSILE_INTERVAL_MS {
                self.last_missile_ms = ctx.now_ms;
                self.fire_missiles(ctx.now_ms);
            }
        }

        self.bullets.retain_mut(|b| !b.advance(ctx));
        self.missiles.retain_mut(|m| !m.advance(ctx));
        false
    }

    /// Three-way spread aimed at the target
    fn fire_bullets(&mut self, target: Vec2) {
        let muzzle = self.pos + Vec2::new(0.0, self.height / 2.0);
        let aim = (target - muzzle).normalize_or(Vec2::Y);
        for i in -1..=1 {
            let dir = rotate(aim, i as f32 * 0.2);
            self.bullets
                .push(Projectile::boss_bullet(muzzle, dir * BOSS_BULLET_SPEED));
        }
    }

    /// One missile from each wing, launched outward-down
    fn fire_missiles(&mut self, now_ms: f64) {
        for side in [-1.0, 1.0] {
            let pos = self.pos + Vec2::new(side * self.width / 2.0, 0.0);
            let vel = Vec2::new(side * 0.5, 1.0).normalize() * BOSS_MISSILE_SPEED;
            self.missiles.push(Projectile::missile(pos, vel, now_ms));
        }
    }

    /// Subtract health, clamped at 0. Returns true only on the call that
    /// brings health to 0.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if amount == 0 || self.health == 0 {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Random points inside the bounding box (for the death burst)
    pub fn burst_points<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Vec2> {
        let half = Vec2::new(self.width / 2.0, self.height / 2.0);
        (0..count)
            .map(|_| {
                self.pos
                    + Vec2::new(
                        rng.random_range(-half.x..=half.x),
                        rng.random_range(-half.y..=half.y),
                    )
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Projectiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectileKind {
    Bullet,
    Missile,
}

/// Who fired it; decides which collision checks apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Owner {
    Player,
    Boss,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub owner: Owner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: u32,
    pub color: u32,
    /// Missiles steer until this time, then fly straight
    #[serde(skip)]
    homing_until_ms: Option<f64>,
}

impl Projectile {
    pub fn player_shot(pos: Vec2, vel: Vec2, radius: f32, damage: u32, color: u32) -> Self {
        Self {
            kind: ProjectileKind::Bullet,
            owner: Owner::Player,
            pos,
            vel,
            radius,
            damage,
            color,
            homing_until_ms: None,
        }
    }

    pub fn boss_bullet(pos: Vec2, vel: Vec2) -> Self {
        Self {
            kind: ProjectileKind::Bullet,
            owner: Owner::Boss,
            pos,
            vel,
            radius: BOSS_BULLET_RADIUS,
            damage: 1,
            color: rgb(255, 90, 60),
            homing_until_ms: None,
        }
    }

    pub fn missile(pos: Vec2, vel: Vec2, now_ms: f64) -> Self {
        Self {
            kind: ProjectileKind::Missile,
            owner: Owner::Boss,
            pos,
            vel,
            radius: MISSILE_RADIUS,
            damage: 1,
            color: rgb(255, 200, 80),
            homing_until_ms: Some(now_ms + MISSILE_FUEL_MS),
        }
    }

    pub fn is_homing(&self, now_ms: f64) -> bool {
        self.homing_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Move one step; missiles with fuel left steer toward the pointer first.
    /// Returns true once off screen.
    pub fn advance(&mut self, ctx: &StepContext) -> bool {
        if self.is_homing(ctx.now_ms) {
            let to_target = ctx.pointer - self.pos;
            if to_target.length_squared() > 1.0 {
                let heading = self.vel.y.atan2(self.vel.x);
                let wanted = to_target.y.atan2(to_target.x);
                let mut turn = wanted - heading;
                // Shortest way round
                if turn > std::f32::consts::PI {
                    turn -= std::f32::consts::TAU;
                } else if turn < -std::f32::consts::PI {
                    turn += std::f32::consts::TAU;
                }
                let max_turn = MISSILE_TURN_RATE * ctx.dt;
                self.vel = rotate(self.vel, turn.clamp(-max_turn, max_turn));
            }
        }
        self.pos += self.vel * ctx.dt;
        ctx.viewport.is_outside(self.pos, self.radius)
    }
}

// ---------------------------------------------------------------------------
// Explosion (visual only)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Explosion {
    pub pos: Vec2,
    pub color: u32,
    pub radius: f32,
    pub started_at_ms: f64,
    /// 0 at spawn, 1 when finished
    pub progress: f32,
}

impl Explosion {
    pub fn new(pos: Vec2, color: u32, now_ms: f64) -> Self {
        Self {
            pos,
            color,
            radius: EXPLOSION_RADIUS,
            started_at_ms: now_ms,
            progress: 0.0,
        }
    }

    /// Larger burst used for the boss
    pub fn large(pos: Vec2, color: u32, now_ms: f64) -> Self {
        Self {
            radius: EXPLOSION_RADIUS * 2.0,
            ..Self::new(pos, color, now_ms)
        }
    }

    pub fn advance(&mut self, ctx: &StepContext) -> bool {
        let elapsed = (ctx.now_ms - self.started_at_ms).max(0.0);
        self.progress = (elapsed / EXPLOSION_DURATION_MS).min(1.0) as f32;
        self.progress >= 1.0
    }
}

// ---------------------------------------------------------------------------
// Power-ups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    /// Timed weapon boost
    Weapon,
    /// One more bomb
    Bomb,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub radius: f32,
    #[serde(skip)]
    drift: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            kind,
            radius: POWERUP_RADIUS,
            drift: 0.0,
        }
    }

    /// Fall with a gentle sideways sway; true once off screen
    pub fn advance(&mut self, ctx: &StepContext) -> bool {
        self.drift += ctx.dt;
        self.pos.y += POWERUP_FALL_SPEED * ctx.dt;
        self.pos.x += (self.drift * 3.0).sin() * 30.0 * ctx.dt;
        ctx.viewport.is_outside(self.pos, self.radius)
    }
}

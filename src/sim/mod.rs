//! Simulation module
//!
//! All gameplay logic lives here:
//! - Wall-clock driven, one `tick` per frame
//! - Seeded RNG only (same seed and inputs, same run)
//! - Stable iteration order (collections keep insertion order)
//! - No rendering, audio playback or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;
pub mod weapon;

pub use collision::{Body, overlaps};
pub use entity::{
    Boss, Enemy, EnemyPattern, Explosion, Owner, Player, PowerUp, PowerUpKind, Projectile,
    ProjectileKind, StepContext, Viewport,
};
pub use snapshot::{Hud, Snapshot};
pub use state::{GameState, ScheduledSound, WavePhase};
pub use tick::{TickInput, tick};
pub use weapon::{WEAPON_CATALOG, WeaponBoost, WeaponKind};

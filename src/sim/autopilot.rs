//! Idle/demo mode
//!
//! Turns the current state into the input a reasonable player would give.
//! Only pointer, fire and bomb are decided here; mute and restart still come
//! from the host.

use glam::Vec2;

use super::state::GameState;
use super::tick::TickInput;

/// Minimum gap between autopilot volleys
const FIRE_INTERVAL_MS: f64 = 100.0;
/// Enemies on screen before the autopilot spends a bomb
const BOMB_CROWD: usize = 5;
/// Enemies above this line are not an immediate threat
const THREAT_LINE: f32 = 0.45;

/// Input the autopilot would give this tick
pub fn drive(state: &GameState, input: &TickInput, now_ms: f64) -> TickInput {
    let mut out = input.clone();
    let view = state.viewport;

    // Most dangerous enemy = lowest on screen
    let threat = state
        .enemies
        .iter()
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
    let threatened = threat.is_some_and(|e| e.pos.y > view.height * THREAT_LINE);

    // Go grab a falling power-up when nothing is close
    let pickup = if threatened {
        None
    } else {
        state
            .power_ups
            .iter()
            .min_by(|a, b| {
                let da = a.pos.distance_squared(state.player.pos);
                let db = b.pos.distance_squared(state.player.pos);
                da.total_cmp(&db)
            })
            .map(|p| p.pos)
    };

    let target = if let Some(pos) = pickup {
        Some(Vec2::new(pos.x, view.height))
    } else if let Some(boss) = state.boss.as_ref() {
        // Strafe under the boss so its aimed shots keep missing
        let t = (now_ms / 1000.0 * 1.2) as f32;
        Some(Vec2::new(boss.pos.x + t.sin() * 180.0, boss.pos.y))
    } else {
        threat.map(|e| e.pos + e.vel * 0.2)
    };

    if let Some(target) = target {
        out.pointer = Some(target);
    }
    out.fire = state
        .last_fire_ms
        .is_none_or(|last| now_ms - last >= FIRE_INTERVAL_MS);
    out.activate_bomb = state.bomb_count > 0 && state.enemies.len() >= BOMB_CROWD;
    out
}

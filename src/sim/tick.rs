//! Frame-driven simulation tick
//!
//! One call per rendered frame with the host's wall-clock timestamp.

use glam::Vec2;

use super::autopilot;
use super::entity::StepContext;
use super::state::GameState;
use crate::consts::*;

/// Input gathered by the host since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Aim target (mouse/touch position); `None` keeps the last one
    pub pointer: Option<Vec2>,
    /// Fire one volley
    pub fire: bool,
    /// Switch to the next weapon
    pub cycle_weapon: bool,
    /// Detonate a bomb
    pub activate_bomb: bool,
    /// Flip mute
    pub toggle_mute: bool,
    /// Start a new run (only honoured after game over)
    pub restart: bool,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    let dt = match state.last_tick_ms {
        Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, f64::from(MAX_DT)) as f32,
        None => NOMINAL_DT,
    };
    state.last_tick_ms = Some(now_ms);

    // Deferred sounds outlive the run that scheduled them
    state.fire_due_sounds(now_ms);

    if input.toggle_mute {
        state.muted = !state.muted;
        log::info!("Sound {}", if state.muted { "muted" } else { "on" });
    }

    if state.game_over {
        if input.restart {
            state.restart();
        }
        return;
    }

    let input = if input.idle_mode {
        autopilot::drive(state, input, now_ms)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    handle_actions(state, &input, now_ms);

    let ctx = StepContext {
        now_ms,
        dt,
        pointer: state.pointer,
        viewport: state.viewport,
    };
    advance_entities(state, &ctx);
    state.resolve_collisions(now_ms);
}

/// Pointer, weapon switch, bomb and fire
fn handle_actions(state: &mut GameState, input: &TickInput, now_ms: f64) {
    if let Some(pointer) = input.pointer {
        state.pointer = pointer;
    }

    if input.cycle_weapon {
        let cooldown = state.tuning.weapon_switch_cooldown_ms;
        let ready = state
            .last_weapon_switch_ms
            .is_none_or(|last| now_ms - last >= cooldown);
        if ready {
            let kind = state.player.cycle_weapon();
            state.last_weapon_switch_ms = Some(now_ms);
            log::debug!("Weapon switched to {}", kind.name());
        }
    }

    if input.activate_bomb {
        state.detonate_bomb(now_ms);
    }

    if input.fire {
        let boosted = state.is_weapon_boosted(now_ms);
        let volley = state.player.fire(boosted);
        state.bullets.extend(volley);
        state.last_fire_ms = Some(now_ms);
        state.play_sound(state.player.weapon.sound());
    }
}

/// Move everything, spawn, and prune whatever left the field
fn advance_entities(state: &mut GameState, ctx: &StepContext) {
    state.player.advance(ctx);

    state.update_wave_phase(ctx.now_ms);
    state.maybe_spawn_enemy(ctx.now_ms);

    state.bullets.retain_mut(|b| !b.advance(ctx));

    let before = state.enemies.len();
    state.enemies.retain_mut(|e| !e.advance(ctx));
    let escaped = (before - state.enemies.len()) as u64;
    if escaped > 0 {
        let penalty = state.tuning.escape_penalty.saturating_mul(escaped);
        state.score = state.score.saturating_sub(penalty);
    }

    if let Some(boss) = state.boss.as_mut() {
        boss.advance(ctx);
    }
    state.explosions.retain_mut(|e| !e.advance(ctx));
    state.power_ups.retain_mut(|p| !p.advance(ctx));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundKind;
    use crate::sim::entity::{Boss, Enemy, EnemyPattern};
    use crate::sim::state::WavePhase;
    use crate::sim::weapon::WeaponKind;
    use proptest::prelude::*;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[test]
    fn test_first_tick_spawns_enemy() {
        let mut state = GameState::new(12345);
        tick(&mut state, &TickInput::default(), 1_000.0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_boss_wave_after_one_tick() {
        let mut state = GameState::new(1);
        state.wave = 3;
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.phase, WavePhase::BossWave);
        let boss = state.boss.as_ref().expect("boss");
        assert_eq!(boss.health, boss.max_health);
        // Spawning is suspended
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_escape_penalty() {
        let mut state = GameState::new(1);
        state.phase = WavePhase::BossWave; // no spawning
        state.boss = Some(Boss::new(3, 600, &state.viewport, 0.0));
        state.score = 3;
        let y = state.viewport.height + ENEMY_RADIUS - 1.0;
        state.enemies.push(Enemy::new(
            Vec2::new(800.0, y),
            Vec2::new(0.0, 300.0),
            EnemyPattern::Straight,
            0,
            None,
        ));
        tick(&mut state, &TickInput::default(), 0.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.enemies_defeated, 0);
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_weapon_switch_cooldown() {
        let mut state = GameState::new(1);
        let input = TickInput {
            cycle_weapon: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);
        assert_eq!(state.player.weapon, WeaponKind::Plasma);
        tick(&mut state, &input, 300.0);
        assert_eq!(state.player.weapon, WeaponKind::Plasma);
        tick(&mut state, &input, 500.0);
        assert_eq!(state.player.weapon, WeaponKind::Ion);
    }

    #[test]
    fn test_fire_plays_weapon_sound() {
        let mut state = GameState::new(1);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);
        assert!(!state.bullets.is_empty());
        assert!(state.take_sounds().contains(&SoundKind::Laser));
    }

    #[test]
    fn test_mute_silences_queue() {
        let mut state = GameState::new(1);
        let input = TickInput {
            toggle_mute: true,
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);
        assert!(state.muted);
        assert!(state.take_sounds().is_empty());
    }

    #[test]
    fn test_game_over_freezes_until_restart() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), 0.0);
        state.enter_game_over(0.0);
        let ticks = state.time_ticks;
        let enemy_y = state.enemies[0].pos.y;

        tick(&mut state, &TickInput::default(), 100.0);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.enemies[0].pos.y, enemy_y);

        // Mute still works while the run is over
        let mute = TickInput {
            toggle_mute: true,
            ..Default::default()
        };
        tick(&mut state, &mute, 200.0);
        assert!(state.muted);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, 300.0);
        assert!(!state.game_over);
        assert!(state.muted);
        assert_eq!(state.player.health, state.player.max_health);
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut state = GameState::new(1);
        state.score = 40;
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, 0.0);
        assert_eq!(state.score, 40);
    }

    #[test]
    fn test_game_over_sound_is_deferred() {
        let mut state = GameState::new(1);
        state.phase = WavePhase::BossWave;
        state.player.health = 1;
        let pos = state.player.pos;
        state.enemies.push(Enemy::new(pos, Vec2::ZERO, EnemyPattern::Straight, 0, None));
        let input = TickInput {
            pointer: Some(pos),
            ..Default::default()
        };

        tick(&mut state, &input, 1_000.0);
        assert!(state.game_over);
        assert_eq!(state.take_sounds(), vec![SoundKind::Hit]);

        tick(&mut state, &input, 1_400.0);
        assert!(state.take_sounds().is_empty());
        tick(&mut state, &input, 1_500.0);
        assert_eq!(state.take_sounds(), vec![SoundKind::GameOver]);
        tick(&mut state, &input, 2_000.0);
        assert!(state.take_sounds().is_empty());
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = GameState::new(1);
        state.phase = WavePhase::BossWave;
        state.boss = Some(Boss::new(3, 600, &state.viewport, 0.0));
        state.enemies.push(Enemy::new(
            Vec2::new(800.0, 100.0),
            Vec2::new(0.0, 100.0),
            EnemyPattern::Straight,
            0,
            None,
        ));
        tick(&mut state, &TickInput::default(), 0.0);
        let y = state.enemies[0].pos.y;
        // A ten second stall integrates at most MAX_DT
        tick(&mut state, &TickInput::default(), 10_000.0);
        assert!((state.enemies[0].pos.y - y - 100.0 * MAX_DT).abs() < 1e-3);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for frame in 0..600 {
            let now = frame as f64 * FRAME_MS;
            tick(&mut a, &input, now);
            tick(&mut b, &input, now);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.player.pos, b.player.pos);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (
            proptest::option::of((0.0f32..1600.0, 0.0f32..1000.0)),
            any::<bool>(),
            any::<bool>(),
            proptest::bool::weighted(0.05),
            proptest::bool::weighted(0.02),
            proptest::bool::weighted(0.05),
            proptest::bool::weighted(0.3),
        )
            .prop_map(|(pointer, fire, cycle_weapon, activate_bomb, toggle_mute, restart, idle_mode)| {
                TickInput {
                    pointer: pointer.map(|(x, y)| Vec2::new(x, y)),
                    fire,
                    cycle_weapon,
                    activate_bomb,
                    toggle_mute,
                    restart,
                    idle_mode,
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_invariants_hold(
            seed in any::<u64>(),
            frames in proptest::collection::vec((arb_input(), 0.0f64..200.0), 1..400),
        ) {
            let mut state = GameState::new(seed);
            state.bomb_count = 2;
            let mut now = 0.0;
            let mut prev_wave = state.wave;
            let mut prev_defeated = state.enemies_defeated;
            let mut prev_level = state.player.weapon_level;
            let mut was_over = false;

            for (input, step) in frames {
                now += step;
                let restarting = was_over && input.restart;
                tick(&mut state, &input, now);

                prop_assert!(state.player.health <= state.player.max_health);
                if let Some(boss) = state.boss.as_ref() {
                    prop_assert!(boss.health <= boss.max_health);
                    prop_assert!(state.is_boss_wave());
                }
                prop_assert!((1..=MAX_WEAPON_LEVEL).contains(&state.player.weapon_level));
                prop_assert_eq!(state.game_over, state.player.health == 0);

                if !restarting {
                    prop_assert!(state.wave >= prev_wave);
                    prop_assert!(state.enemies_defeated >= prev_defeated);
                    prop_assert!(state.player.weapon_level >= prev_level);
                    // Game over never re-enters and never un-sets on its own
                    if was_over {
                        prop_assert!(state.game_over);
                    }
                }
                prop_assert!(state.pending_sounds().len() <= 1);

                prev_wave = state.wave;
                prev_defeated = state.enemies_defeated;
                prev_level = state.player.weapon_level;
                was_over = state.game_over;
                state.take_sounds();
            }
        }

        #[test]
        fn prop_boss_damage_is_bounded(health in 1u32..2000, hits in proptest::collection::vec(0u32..200, 0..50)) {
            let mut boss = Boss::new(3, health, &crate::sim::entity::Viewport::default(), 0.0);
            let mut signals = 0;
            for amount in hits {
                let before = boss.health;
                if boss.take_damage(amount) {
                    signals += 1;
                }
                prop_assert!(boss.health <= before);
                if amount == 0 {
                    prop_assert_eq!(boss.health, before);
                }
            }
            prop_assert!(signals <= 1);
            prop_assert_eq!(signals == 1, boss.health == 0);
        }
    }
}

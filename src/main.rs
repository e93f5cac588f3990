//! Nebula Strike - headless runner
//!
//! Plays one run with the autopilot against a synthetic 60 Hz clock and
//! prints the final snapshot as JSON.
//!
//! Usage: `nebula-strike [frames] [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use nebula_strike::audio::LogSink;
    use nebula_strike::sim::{GameState, Snapshot, TickInput, tick};
    use nebula_strike::{AudioManager, Settings, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const SETTINGS_PATH: &str = "nebula_settings.json";

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let frames: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(60 * 120);
    let seed: u64 = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or_else(clock_seed);
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(Path::new(&path)),
        None => Tuning::default(),
    };

    let settings = Settings::load_or_default(Path::new(SETTINGS_PATH));
    let mut audio = AudioManager::with_settings(LogSink::default(), &settings);
    let mut state = GameState::with_tuning(seed, tuning);
    state.muted = settings.muted;

    log::info!("Nebula Strike (headless) starting with seed {seed} for {frames} frames");

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut now = 0.0;
    for _ in 0..frames {
        tick(&mut state, &input, now);
        audio.play_all(state.take_sounds());
        if state.game_over {
            break;
        }
        now += FRAME_MS;
    }

    log::info!(
        "Finished after {:.1}s: score {}, wave {}, {} kills, {} sounds",
        now / 1000.0,
        state.score,
        state.wave,
        state.enemies_defeated,
        audio.sink().played
    );

    match Snapshot::capture(&state, now).to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize snapshot: {e}"),
    }
}

/// Seed from wall-clock milliseconds when none is given
#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(millis_seed)
        .unwrap_or(0)
}

/// Saturates instead of wrapping when the millisecond count exceeds `u64`
#[cfg(not(target_arch = "wasm32"))]
fn millis_seed(elapsed: std::time::Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `sim::tick` directly
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_millis_seed() {
        assert_eq!(millis_seed(Duration::from_millis(1_234)), 1_234);
        // u64::MAX seconds is far more milliseconds than fit in a u64
        assert_eq!(millis_seed(Duration::from_secs(u64::MAX)), u64::MAX);
    }
}

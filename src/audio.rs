//! Sound catalog and the bridge to an external audio backend
//!
//! The simulation only queues `SoundKind`s. Decoding and playback belong to
//! whatever implements `SoundSink` on the host side.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundKind {
    // Weapon shots, one per weapon kind
    Laser,
    Plasma,
    Ion,
    Quantum,
    Nova,
    Pulse,
    Beam,
    Wave,
    /// Enemy or boss destroyed
    Explosion,
    /// Any power-up collected
    PowerUp,
    /// Player took a hit
    Hit,
    /// Run ended
    GameOver,
    /// Bomb picked up or detonated
    Bomb,
}

impl SoundKind {
    /// Asset name used by the host to look up the sample
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundKind::Laser => "laser",
            SoundKind::Plasma => "plasma",
            SoundKind::Ion => "ion",
            SoundKind::Quantum => "quantum",
            SoundKind::Nova => "nova",
            SoundKind::Pulse => "pulse",
            SoundKind::Beam => "beam",
            SoundKind::Wave => "wave",
            SoundKind::Explosion => "explosion",
            SoundKind::PowerUp => "powerup",
            SoundKind::Hit => "hit",
            SoundKind::GameOver => "gameOver",
            SoundKind::Bomb => "bomb",
        }
    }
}

/// Playback backend supplied by the host
pub trait SoundSink {
    /// Fire-and-forget; nothing flows back into the simulation
    fn play(&mut self, kind: SoundKind, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink {
    pub played: usize,
}

impl SoundSink for LogSink {
    fn play(&mut self, kind: SoundKind, volume: f32) {
        self.played += 1;
        log::debug!("sfx {} @ {:.2}", kind.as_str(), volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<S: SoundSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: SoundSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Build a manager with volumes taken from the player's settings
    pub fn with_settings(sink: S, settings: &Settings) -> Self {
        let mut manager = Self::new(sink);
        manager.apply_settings(settings);
        manager
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, kind: SoundKind) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(kind, vol);
    }

    /// Forward everything the simulation queued this frame
    pub fn play_all(&mut self, sounds: impl IntoIterator<Item = SoundKind>) {
        for kind in sounds {
            self.play(kind);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

//! Sound cues for simulation events
//!
//! The core never plays audio. Hosts drain [`SimEvent`]s, map them to a
//! [`SoundCue`] here and hand the file path plus volume to whatever playback
//! they have.

use serde::Serialize;

use crate::sim::{AbilityKind, SimEvent};

const AUDIO_DIR: &str = "Assets/Audios/";

/// Volume for files without an entry in the normalisation table
pub const DEFAULT_SFX_VOLUME: f32 = 0.45;

/// Placement sound files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEffect {
    Heat,
    Cold,
    Gravity,
    Pressure,
    Vacuum,
    Quantum,
}

impl SoundEffect {
    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::Heat => "heat.mp3",
            SoundEffect::Cold => "cold.mp3",
            SoundEffect::Gravity => "gravity.mp3",
            SoundEffect::Pressure => "pressure.mp3",
            SoundEffect::Vacuum => "vacuum.mp3",
            SoundEffect::Quantum => "quantum.mp3",
        }
    }

    /// Per-file loudness normalisation
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Heat => 0.45,
            SoundEffect::Cold => 0.25,
            SoundEffect::Gravity => 0.40,
            SoundEffect::Pressure => 0.35,
            SoundEffect::Vacuum => 0.40,
            SoundEffect::Quantum => 0.05,
        }
    }

    /// Sound played when a law of this kind is dropped
    pub fn for_kind(kind: AbilityKind) -> Option<Self> {
        match kind {
            AbilityKind::Heat => Some(SoundEffect::Heat),
            AbilityKind::Cold => Some(SoundEffect::Cold),
            AbilityKind::Mass | AbilityKind::Gravity | AbilityKind::DarkEnergy => {
                Some(SoundEffect::Gravity)
            }
            AbilityKind::HighPressure | AbilityKind::LowPressure | AbilityKind::WindJet => {
                Some(SoundEffect::Pressure)
            }
            AbilityKind::Vacuum | AbilityKind::Viscosity => Some(SoundEffect::Vacuum),
            AbilityKind::Tunneling => Some(SoundEffect::Quantum),
            AbilityKind::Elasticity | AbilityKind::Entropy => None,
        }
    }
}

/// A sound the host should play
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundCue {
    pub path: String,
    /// 0.0 - 1.0, mixer already applied
    pub volume: f32,
}

impl SoundCue {
    /// Cue at the file's normalised volume, no host mixer applied
    pub fn for_event(event: &SimEvent) -> Option<Self> {
        Mixer {
            master_volume: 1.0,
            ..Mixer::default()
        }
        .cue_for(event)
    }
}

/// Host volume settings
#[derive(Debug, Clone, Copy)]
pub struct Mixer {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Mixer {
    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cue for an event, `None` if it is silent or the mixer is muted
    pub fn cue_for(&self, event: &SimEvent) -> Option<SoundCue> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return None;
        }
        let SimEvent::EffectPlaced { kind, .. } = event else {
            return None;
        };
        let effect = SoundEffect::for_kind(*kind)?;
        Some(SoundCue {
            path: format!("{AUDIO_DIR}{}", effect.file_name()),
            volume: (effect.base_volume() * vol).clamp(0.0, 1.0),
        })
    }
}

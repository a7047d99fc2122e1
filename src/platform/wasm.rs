//! Browser bindings
//!
//! The page owns the canvas, the toolbar and audio playback. It calls
//! `update` from `requestAnimationFrame`, forwards drops and right-clicks,
//! and reads back JSON snapshots and events.

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::audio::{Mixer, SoundCue};
use crate::sim::{AbilityKind, Level, Phase, SimEvent, Simulation};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed (hot reload)
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already initialised");
    }
}

/// Event plus the sound the page should play for it
#[derive(Serialize)]
struct HostEvent {
    #[serde(flatten)]
    event: SimEvent,
    sound: Option<SoundCue>,
}

#[wasm_bindgen]
pub struct WebSimulation {
    sim: Simulation,
    mixer: Mixer,
}

#[wasm_bindgen]
impl WebSimulation {
    /// Build from level and tuning JSON; `None` picks the demo level /
    /// default tuning
    #[wasm_bindgen(constructor)]
    pub fn new(level_json: Option<String>, tuning_json: Option<String>) -> Result<WebSimulation, JsError> {
        let level = match level_json {
            Some(json) => Level::from_json(&json)?,
            None => Level::demo(),
        };
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json)?,
            None => Tuning::default(),
        };
        Ok(Self {
            sim: Simulation::new(level, tuning),
            mixer: Mixer::default(),
        })
    }

    /// Advance one animation frame (seconds)
    pub fn update(&mut self, dt: f32) {
        self.sim.update(dt);
    }

    /// Drop a law; false when the drop is refused (toolbar unchanged)
    pub fn place(&mut self, kind: &str, x: f32, y: f32, timestamp: f64) -> bool {
        let Some(kind) = AbilityKind::from_id(kind) else {
            log::warn!("unknown ability id '{kind}'");
            return false;
        };
        match self.sim.place_effect(kind, Vec2::new(x, y), timestamp) {
            Ok(_) => true,
            Err(err) => {
                log::debug!("placement refused: {err}");
                false
            }
        }
    }

    /// Right-click delete
    pub fn remove_at(&mut self, x: f32, y: f32) -> bool {
        self.sim.remove_effect_at(Vec2::new(x, y)).is_some()
    }

    pub fn restart(&mut self) {
        self.sim.restart();
    }

    pub fn is_won(&self) -> bool {
        self.sim.phase() == Phase::Won
    }

    /// Index into the snapshot's wall list, or -1
    pub fn nearest_tunnelable_wall(&self, x: f32, y: f32, max_distance: f32) -> i32 {
        self.sim
            .nearest_tunnelable_wall(Vec2::new(x, y), max_distance)
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1)
    }

    pub fn set_volume(&mut self, master: f32, sfx: f32, muted: bool) {
        self.mixer.set_master_volume(master);
        self.mixer.set_sfx_volume(sfx);
        self.mixer.set_muted(muted);
    }

    pub fn snapshot_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.sim.snapshot())?)
    }

    /// Events since the last call, each with its sound cue
    pub fn drain_events_json(&mut self) -> Result<String, JsError> {
        let events: Vec<HostEvent> = self
            .sim
            .drain_events()
            .into_iter()
            .map(|event| HostEvent {
                sound: self.mixer.cue_for(&event),
                event,
            })
            .collect();
        Ok(serde_json::to_string(&events)?)
    }
}

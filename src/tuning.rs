//! Data-driven game balance
//!
//! Everything the simulation treats as a tunable constant lives here so
//! levels and playtest builds can ship a JSON file instead of a rebuild.
//! Missing fields fall back to the defaults in [`crate::consts`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::AbilityKind;
use crate::sim::LoadError;

/// How long a placed field lives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifetimeSpec {
    /// Expires after this many seconds
    Timed { seconds: f32 },
    /// Fires on its first ticks, one charge per tick, then expires
    Charges { count: u32 },
}

/// Per-ability parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityTuning {
    /// Influence radius (ignored by global kinds)
    pub radius: f32,
    /// Force magnitude, damping rate or override amount depending on kind
    pub strength: f32,
    pub lifetime: LifetimeSpec,
    /// Cap on placements per level (`None` = unlimited)
    #[serde(default)]
    pub max_uses: Option<u32>,
}

/// Body and integrator constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub max_speed: f32,
    pub base_damping: f32,
    pub base_elasticity: f32,
    pub base_radius: f32,
    pub base_mass: f32,
    pub radius_smoothing: f32,
    pub min_dt: f32,
    pub max_dt: f32,
    pub collision_iterations: u32,
    pub frame_friction: f32,
    pub interior_friction: f32,
    pub ghost_decay: f32,
    pub temperature_decay: f32,
    /// Upward acceleration (px/s²) from lift; 0 disables it
    pub buoyancy: f32,
    pub goal_dwell: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            base_damping: BALLOON_DAMPING,
            base_elasticity: BALLOON_ELASTICITY,
            base_radius: BALLOON_RADIUS,
            base_mass: BALLOON_MASS,
            radius_smoothing: RADIUS_SMOOTHING,
            min_dt: MIN_DT,
            max_dt: MAX_DT,
            collision_iterations: COLLISION_ITERATIONS,
            frame_friction: FRAME_FRICTION,
            interior_friction: INTERIOR_FRICTION,
            ghost_decay: GHOST_DECAY,
            temperature_decay: TEMPERATURE_DECAY,
            buoyancy: 0.0,
            goal_dwell: GOAL_DWELL,
        }
    }
}

impl PhysicsTuning {
    /// Clamp a raw frame delta into the stable range
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(self.min_dt, self.max_dt)
        } else {
            self.min_dt
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    /// Per-kind overrides on top of [`AbilityKind::default_tuning`]
    pub abilities: BTreeMap<AbilityKind, AbilityTuning>,
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning file and sanitize it
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate();
        Ok(tuning)
    }

    /// Effective parameters for one ability kind
    pub fn ability(&self, kind: AbilityKind) -> AbilityTuning {
        self.abilities
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_tuning())
    }

    /// Repair values that would break the integrator. Each fix is logged.
    pub fn validate(&mut self) {
        let p = &mut self.physics;
        let defaults = PhysicsTuning::default();

        if !(p.base_radius > 0.0) {
            log::warn!("tuning: base_radius {} invalid, using default", p.base_radius);
            p.base_radius = defaults.base_radius;
        }
        if !(p.base_mass > 0.0) {
            log::warn!("tuning: base_mass {} invalid, using default", p.base_mass);
            p.base_mass = defaults.base_mass;
        }
        if !(p.max_speed > 0.0) {
            log::warn!("tuning: max_speed {} invalid, using default", p.max_speed);
            p.max_speed = defaults.max_speed;
        }
        if !(p.min_dt > 0.0) || !(p.max_dt >= p.min_dt) {
            log::warn!(
                "tuning: dt range [{}, {}] invalid, using default",
                p.min_dt,
                p.max_dt
            );
            p.min_dt = defaults.min_dt;
            p.max_dt = defaults.max_dt;
        }
        if p.collision_iterations == 0 {
            log::warn!("tuning: collision_iterations must be at least 1");
            p.collision_iterations = 1;
        }
        p.base_damping = p.base_damping.max(0.0);
        p.radius_smoothing = p.radius_smoothing.max(0.0);

        for (kind, ability) in self.abilities.iter_mut() {
            if !(ability.radius >= 0.0) {
                log::warn!("tuning: {} radius {} invalid", kind.id(), ability.radius);
                ability.radius = kind.default_tuning().radius;
            }
            match ability.lifetime {
                LifetimeSpec::Timed { seconds } if !(seconds > 0.0) => {
                    log::warn!("tuning: {} lifetime {} invalid", kind.id(), seconds);
                    ability.lifetime = kind.default_tuning().lifetime;
                }
                LifetimeSpec::Charges { count: 0 } => {
                    log::warn!("tuning: {} has zero charges", kind.id());
                    ability.lifetime = LifetimeSpec::Charges { count: 1 };
                }
                _ => {}
            }
        }
    }
}

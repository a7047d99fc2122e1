//! Placed ability fields
//!
//! Every placed law is an [`Effect`]: a [`Field`] variant (what it does) plus
//! placement, strength and a [`Lifetime`]. Once per tick the simulation calls
//! [`Effect::update`], which may write body overrides or switch walls off
//! directly, and returns the force/impulse it contributes so the caller can
//! sum them before integrating.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::catalog::AbilityKind;
use super::geometry::falloff;
use super::wall::Wall;
use crate::tuning::{AbilityTuning, LifetimeSpec};

/// Stable handle for a placed effect
pub type EffectId = u32;

/// Radial fields skip the body when it sits this close to the origin
const ORIGIN_GUARD: f32 = 1.0;
/// Extra reach of a tunneling zone beyond its radius
const TUNNEL_MARGIN: f32 = 10.0;
/// Rolling disablement window re-armed every tick by a tunneling zone
const TUNNEL_TTL: f32 = 0.12;
/// Material overrides reach full strength after 1/rate seconds
const MATERIAL_RAMP_RATE: f32 = 2.5;
/// Temperature approach rate while a thermal override is active
const TEMPERATURE_RATE: f32 = 3.0;

/// Remaining life of an effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Lifetime {
    Timed { remaining: f32, total: f32 },
    Charges { remaining: u32, total: u32 },
}

impl Lifetime {
    pub fn from_spec(spec: LifetimeSpec) -> Self {
        match spec {
            LifetimeSpec::Timed { seconds } => Lifetime::Timed {
                remaining: seconds,
                total: seconds,
            },
            LifetimeSpec::Charges { count } => Lifetime::Charges {
                remaining: count,
                total: count,
            },
        }
    }

    /// 1 when fresh, 0 when spent
    pub fn fraction(&self) -> f32 {
        match *self {
            Lifetime::Timed { remaining, total } if total > 0.0 => (remaining / total).clamp(0.0, 1.0),
            Lifetime::Charges { remaining, total } if total > 0 => remaining as f32 / total as f32,
            _ => 0.0,
        }
    }

    pub fn is_spent(&self) -> bool {
        match *self {
            Lifetime::Timed { remaining, .. } => remaining <= 0.0,
            Lifetime::Charges { remaining, .. } => remaining == 0,
        }
    }

    /// Timed lives count down by `dt`; charges spend one per evaluated tick
    fn advance(&mut self, dt: f32) {
        match self {
            Lifetime::Timed { remaining, .. } => *remaining = (*remaining - dt).max(0.0),
            Lifetime::Charges { remaining, .. } => *remaining = remaining.saturating_sub(1),
        }
    }
}

/// Body property overrides applied by global material laws
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialOverride {
    /// Forced restitution
    pub elasticity: Option<f32>,
    /// Target radius multiplier at full ramp
    pub radius_scale: Option<f32>,
    /// Mass multiplier at full ramp
    pub mass_scale: Option<f32>,
    /// Extra damping rate (1/s) at full ramp
    pub extra_damping: f32,
    /// Temperature the balloon is pulled toward (visual only)
    pub temperature: f32,
}

/// What an effect does. Closed set, one arm per behavior in [`Effect::update`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Field {
    /// Pull toward the origin, `strength · falloff^exponent`
    RadialAttract { exponent: f32, impulse: bool },
    /// Push away from the origin, `strength · falloff^exponent`
    RadialRepel { exponent: f32, impulse: bool },
    /// Constant direction inside the radius
    Directional { direction: Vec2 },
    /// Drag force opposing velocity
    Damping,
    /// Smooth pseudo-random force driven by a phase accumulator
    Noise { phase: f32 },
    /// Global body property override, ramping in over time
    Material { material: MaterialOverride, ramp: f32 },
    /// Switch tunnelable walls in the zone off, drag the balloon inside it
    WallDisable { margin: f32, ttl: f32 },
}

impl Field {
    /// Build the field a catalog kind places
    pub fn for_kind(kind: AbilityKind, tuning: &AbilityTuning, noise_phase: f32) -> Self {
        let s = tuning.strength;
        match kind {
            AbilityKind::LowPressure => Field::RadialAttract {
                exponent: 1.0,
                impulse: false,
            },
            AbilityKind::Mass => Field::RadialAttract {
                exponent: 2.0,
                impulse: false,
            },
            AbilityKind::Vacuum => Field::RadialAttract {
                exponent: 1.5,
                impulse: true,
            },
            AbilityKind::HighPressure => Field::RadialRepel {
                exponent: 1.0,
                impulse: true,
            },
            AbilityKind::DarkEnergy => Field::RadialRepel {
                exponent: 2.0,
                impulse: false,
            },
            AbilityKind::WindJet => Field::Directional { direction: Vec2::X },
            AbilityKind::Gravity => Field::Directional { direction: Vec2::Y },
            AbilityKind::Viscosity => Field::Damping,
            AbilityKind::Entropy => Field::Noise { phase: noise_phase },
            AbilityKind::Heat => Field::Material {
                material: MaterialOverride {
                    radius_scale: Some(s),
                    mass_scale: Some(0.8),
                    temperature: 1.0,
                    ..Default::default()
                },
                ramp: 0.0,
            },
            AbilityKind::Cold => Field::Material {
                material: MaterialOverride {
                    radius_scale: Some(s),
                    mass_scale: Some(1.6),
                    extra_damping: 0.6,
                    temperature: -1.0,
                    ..Default::default()
                },
                ramp: 0.0,
            },
            AbilityKind::Elasticity => Field::Material {
                material: MaterialOverride {
                    elasticity: Some(s),
                    ..Default::default()
                },
                ramp: 0.0,
            },
            AbilityKind::Tunneling => Field::WallDisable {
                margin: TUNNEL_MARGIN,
                ttl: TUNNEL_TTL,
            },
        }
    }
}

/// What one effect contributed this tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectStep {
    pub force: Vec2,
    pub impulse: Vec2,
    /// Still alive after this tick
    pub alive: bool,
}

/// A placed ability instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub id: EffectId,
    pub kind: AbilityKind,
    pub field: Field,
    /// Where it was dropped (origin of radial fields, gizmo anchor of global ones)
    pub pos: Vec2,
    /// Influence radius; for global fields only the pick/gizmo radius
    pub radius: f32,
    pub strength: f32,
    pub life: Lifetime,
    /// Host timestamp of the placement
    pub placed_at: f64,
    pub dead: bool,
}

impl Effect {
    pub fn new(
        id: EffectId,
        kind: AbilityKind,
        pos: Vec2,
        tuning: &AbilityTuning,
        noise_phase: f32,
        placed_at: f64,
    ) -> Self {
        Self {
            id,
            kind,
            field: Field::for_kind(kind, tuning, noise_phase),
            pos,
            radius: tuning.radius,
            strength: tuning.strength,
            life: Lifetime::from_spec(tuning.lifetime),
            placed_at,
            dead: false,
        }
    }

    /// Global fields act on the balloon regardless of distance
    pub fn is_global(&self) -> bool {
        matches!(self.field, Field::Material { .. })
    }

    /// Spatial origin, `None` for global fields
    pub fn origin(&self) -> Option<Vec2> {
        (!self.is_global()).then_some(self.pos)
    }

    /// Hit test used by "remove effect at"
    pub fn contains(&self, point: Vec2) -> bool {
        (point - self.pos).length_squared() <= self.radius * self.radius
    }

    /// Remaining life in `[0, 1]`
    pub fn life_fraction(&self) -> f32 {
        if self.dead { 0.0 } else { self.life.fraction() }
    }

    /// Evaluate the effect for one tick
    pub fn update(&mut self, dt: f32, body: &mut Body, walls: &mut [Wall]) -> EffectStep {
        if self.dead || self.life.is_spent() {
            self.dead = true;
            return EffectStep::default();
        }

        let mut step = EffectStep::default();
        let (origin, radius, strength) = (self.pos, self.radius, self.strength);
        let offset = body.pos - origin;
        let distance = offset.length();
        let in_range = distance <= radius;
        let f = falloff(distance, radius);
        let sign: f32 = if matches!(self.field, Field::RadialAttract { .. }) {
            -1.0
        } else {
            1.0
        };

        match &mut self.field {
            Field::RadialAttract { exponent, impulse } | Field::RadialRepel { exponent, impulse } => {
                if in_range && distance > ORIGIN_GUARD {
                    let magnitude = strength * f.powf(*exponent);
                    let dir = offset / distance * sign;
                    if *impulse {
                        // strength is a velocity change for bursts
                        step.impulse = dir * magnitude * body.mass;
                    } else {
                        step.force = dir * magnitude;
                    }
                }
            }
            Field::Directional { direction } => {
                if in_range {
                    step.force = *direction * strength * f;
                }
            }
            Field::Damping => {
                if in_range {
                    step.force = -body.vel * strength * f;
                }
            }
            Field::Noise { phase } => {
                *phase += dt;
                if in_range {
                    let p = *phase;
                    let n = Vec2::new(
                        (p * 2.3 + 17.1).sin() * (p * 1.7 + 3.2).cos(),
                        (p * 1.9 + 7.8).cos() * (p * 2.1 + 11.3).sin(),
                    );
                    step.force = n * strength * f;
                }
            }
            Field::Material { material, ramp } => {
                *ramp = (*ramp + dt * MATERIAL_RAMP_RATE).min(1.0);
                apply_material(material, *ramp, dt, body);
            }
            Field::WallDisable { margin, ttl } => {
                let reach = radius + *margin;
                for wall in walls.iter_mut().filter(|w| w.can_tunnel) {
                    if wall.surface_distance(origin) <= reach {
                        wall.disable_for(*ttl);
                    }
                }
                if in_range {
                    step.force = -body.vel * strength * f;
                    body.phasing = true;
                    body.ghost = 1.0;
                }
            }
        }

        self.life.advance(dt);
        if self.life.is_spent() {
            self.dead = true;
        }
        step.alive = !self.dead;
        step
    }
}

fn apply_material(material: &MaterialOverride, ramp: f32, dt: f32, body: &mut Body) {
    if let Some(elasticity) = material.elasticity {
        body.elasticity = elasticity;
    }
    if let Some(scale) = material.radius_scale {
        body.target_radius *= 1.0 + (scale - 1.0) * ramp;
    }
    if let Some(scale) = material.mass_scale {
        body.mass *= 1.0 + (scale - 1.0) * ramp;
    }
    body.damping += material.extra_damping * ramp;
    if material.temperature != 0.0 {
        body.temperature += (material.temperature - body.temperature) * (dt * TEMPERATURE_RATE).min(1.0);
    }
}

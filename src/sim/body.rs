//! The balloon: the one dynamic body in the chamber
//!
//! Effects write per-frame overrides (damping, mass, elasticity, target
//! radius) and accumulate forces; [`Body::begin_frame`] puts the overrides
//! back to baseline before effects run and [`Body::integrate`] turns the
//! accumulated force into motion.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::PhysicsTuning;

/// Per-level baseline the per-frame overrides reset to
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Baseline {
    pub radius: f32,
    pub mass: f32,
    pub elasticity: f32,
}

/// The balloon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current collision radius (animated toward `target_radius`)
    pub radius: f32,
    /// Radius goal for this frame
    pub target_radius: f32,
    /// Effective mass for this frame
    pub mass: f32,
    /// Restitution for this frame
    pub elasticity: f32,
    /// Extra exponential damping rate (1/s) contributed by effects this frame
    pub damping: f32,
    /// Thermal visual scalar, decays toward 0
    pub temperature: f32,
    /// Tunnel ghost visual, fades toward 0
    pub ghost: f32,
    /// A tunneling field touched the balloon this frame
    pub phasing: bool,
    /// Force accumulated this frame
    pub force: Vec2,
    /// Instantaneous momentum change accumulated this frame
    pub impulse: Vec2,
    baseline: Baseline,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, physics: &PhysicsTuning) -> Self {
        let baseline = Baseline {
            radius: physics.base_radius,
            mass: physics.base_mass,
            elasticity: physics.base_elasticity,
        };
        Self {
            pos,
            vel,
            radius: baseline.radius,
            target_radius: baseline.radius,
            mass: baseline.mass,
            elasticity: baseline.elasticity,
            damping: 0.0,
            temperature: 0.0,
            ghost: 0.0,
            phasing: false,
            force: Vec2::ZERO,
            impulse: Vec2::ZERO,
            baseline,
        }
    }

    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Reset overrides to baseline and decay one-shot visual state
    pub fn begin_frame(&mut self, dt: f32, physics: &PhysicsTuning) {
        self.damping = 0.0;
        self.mass = self.baseline.mass;
        self.elasticity = self.baseline.elasticity;
        self.target_radius = self.baseline.radius;
        self.phasing = false;
        self.force = Vec2::ZERO;
        self.impulse = Vec2::ZERO;

        self.ghost = (self.ghost - dt * physics.ghost_decay).max(0.0);
        self.temperature *= (-physics.temperature_decay * dt).exp();
    }

    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn add_impulse(&mut self, impulse: Vec2) {
        self.impulse += impulse;
    }

    /// Advance one step: radius animation, forces, damping, speed clamp,
    /// position. Collisions are resolved separately.
    pub fn integrate(&mut self, dt: f32, physics: &PhysicsTuning) {
        // Critically damped approach, multiplier capped so it never overshoots
        let blend = (dt * physics.radius_smoothing).min(1.0);
        self.radius += (self.target_radius - self.radius) * blend;
        self.radius = self.radius.max(f32::EPSILON);

        let mass = self.mass.max(f32::EPSILON);
        self.vel += self.force / mass * dt + self.impulse / mass;

        let rate = physics.base_damping / self.mass.max(1.0) + self.damping.max(0.0);
        self.vel *= (-rate * dt).exp();

        let speed = self.vel.length();
        if speed > physics.max_speed {
            self.vel *= physics.max_speed / speed;
        }

        self.pos += self.vel * dt;
    }
}

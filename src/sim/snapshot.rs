//! Read-only view of the simulation for a renderer

use glam::Vec2;
use serde::Serialize;

use super::catalog::AbilityKind;
use super::effect::EffectId;
use super::geometry::Rect;
use super::inventory::Uses;
use super::state::{Phase, Simulation};

#[derive(Debug, Clone, Serialize)]
pub struct BodyView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub temperature: f32,
    pub ghost: f32,
    pub phasing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectView {
    pub id: EffectId,
    pub kind: AbilityKind,
    /// `None` for global laws
    pub origin: Option<Vec2>,
    pub radius: f32,
    pub life: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WallView {
    pub a: Vec2,
    pub b: Vec2,
    pub width: f32,
    pub is_frame: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolView {
    pub kind: AbilityKind,
    pub remaining: Uses,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub time: f32,
    pub goal: Rect,
    pub body: BodyView,
    pub effects: Vec<EffectView>,
    pub walls: Vec<WallView>,
    pub tools: Vec<ToolView>,
}

impl Snapshot {
    pub fn capture(sim: &Simulation) -> Self {
        let body = sim.body();
        Self {
            phase: sim.phase(),
            time: sim.time(),
            goal: sim.level().goal,
            body: BodyView {
                pos: body.pos,
                vel: body.vel,
                radius: body.radius,
                temperature: body.temperature,
                ghost: body.ghost,
                phasing: body.phasing,
            },
            effects: sim
                .effects()
                .map(|e| EffectView {
                    id: e.id,
                    kind: e.kind,
                    origin: e.origin(),
                    radius: e.radius,
                    life: e.life_fraction(),
                })
                .collect(),
            walls: sim
                .walls()
                .iter()
                .map(|w| WallView {
                    a: w.a,
                    b: w.b,
                    width: w.width,
                    is_frame: w.is_frame,
                    disabled: w.is_disabled(),
                })
                .collect(),
            tools: sim
                .inventory()
                .slots()
                .map(|s| ToolView {
                    kind: s.kind,
                    remaining: s.remaining,
                })
                .collect(),
        }
    }
}

impl Simulation {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}

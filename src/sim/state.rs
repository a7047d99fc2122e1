//! Simulation state and the host-facing operations on it
//!
//! The host drives it with [`Simulation::update`] once per animation frame and
//! places or removes laws between frames.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::Body;
use super::catalog::{AbilityKind, select_abilities};
use super::effect::{Effect, EffectId};
use super::inventory::Inventory;
use super::level::Level;
use super::wall::Wall;
use crate::tuning::Tuning;

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Playing,
    /// Balloon settled in the goal; updates are no-ops until restart
    Won,
}

/// Discrete things the host may want to react to (sound, UI counters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    EffectPlaced { id: EffectId, kind: AbilityKind },
    EffectRemoved { id: EffectId, kind: AbilityKind },
    EffectExpired { id: EffectId, kind: AbilityKind },
    GoalReached { time: f32 },
}

/// Why a placement was refused. The simulation is unchanged on error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("placement point is outside the board")]
    OutsideBoard,
    #[error("no uses left for {}", .0.id())]
    NoUsesLeft(AbilityKind),
    #[error("{} is not in this level's toolbar", .0.id())]
    NotInInventory(AbilityKind),
    #[error("level already complete")]
    LevelComplete,
}

/// One level being played
#[derive(Debug, Clone)]
pub struct Simulation {
    level: Level,
    tuning: Tuning,
    pub(crate) body: Body,
    pub(crate) walls: Vec<Wall>,
    /// Active set, in placement order
    pub(crate) effects: Vec<Effect>,
    inventory: Inventory,
    pub(crate) phase: Phase,
    /// Simulated seconds since (re)start
    pub(crate) time: f32,
    /// Seconds the balloon centre has been inside the goal
    pub(crate) goal_timer: f32,
    pub(crate) events: Vec<SimEvent>,
    rng: Pcg32,
    next_id: EffectId,
}

impl Simulation {
    pub fn new(level: Level, mut tuning: Tuning) -> Self {
        tuning.validate();
        let body = Body::new(level.spawn, level.spawn_velocity, &tuning.physics);
        let walls = level.build_walls();
        let inventory = build_inventory(&level, &tuning);
        log::info!(
            "level '{}' loaded: {} walls, {} tools, seed {}",
            level.name,
            walls.len(),
            inventory.len(),
            level.seed
        );
        Self {
            rng: Pcg32::seed_from_u64(u64::from(level.seed)),
            level,
            tuning,
            body,
            walls,
            effects: Vec::new(),
            inventory,
            phase: Phase::Playing,
            time: 0.0,
            goal_timer: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reload the level from its description: fresh body, walls, toolbar
    pub fn restart(&mut self) {
        let level = self.level.clone();
        let tuning = self.tuning.clone();
        *self = Self::new(level, tuning);
    }

    /// Advance one animation frame (`dt` is clamped)
    pub fn update(&mut self, dt: f32) {
        super::tick::tick(self, dt);
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Live effects in placement order
    pub fn effects(&self) -> impl Iterator<Item = &Effect> + '_ {
        self.effects.iter().filter(|e| !e.dead)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    fn next_effect_id(&mut self) -> EffectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop a law at `pos`. `placed_at` is the host's timestamp, kept for
    /// rendering only.
    pub fn place_effect(
        &mut self,
        kind: AbilityKind,
        pos: Vec2,
        placed_at: f64,
    ) -> Result<EffectId, PlacementError> {
        if self.phase == Phase::Won {
            return Err(PlacementError::LevelComplete);
        }
        if !kind.allows_outside_board() && !self.level.board.contains(pos) {
            return Err(PlacementError::OutsideBoard);
        }
        if !self.inventory.contains(kind) {
            return Err(PlacementError::NotInInventory(kind));
        }
        if !self.inventory.try_consume(kind) {
            return Err(PlacementError::NoUsesLeft(kind));
        }

        let id = self.next_effect_id();
        let tuning = self.tuning.ability(kind);
        let noise_phase = self.rng.random_range(0.0..std::f32::consts::TAU);
        self.effects
            .push(Effect::new(id, kind, pos, &tuning, noise_phase, placed_at));
        self.events.push(SimEvent::EffectPlaced { id, kind });
        log::debug!(
            "placed {} #{} at ({:.0}, {:.0})",
            kind.id(),
            id,
            pos.x,
            pos.y
        );
        Ok(id)
    }

    /// Remove the most recently placed live effect under `pos` and refund
    /// its use. It stops acting from the next tick.
    pub fn remove_effect_at(&mut self, pos: Vec2) -> Option<EffectId> {
        let effect = self
            .effects
            .iter_mut()
            .rev()
            .find(|e| !e.dead && e.contains(pos))?;
        effect.dead = true;
        let (id, kind) = (effect.id, effect.kind);
        self.inventory.refund(kind);
        self.events.push(SimEvent::EffectRemoved { id, kind });
        log::debug!("removed {} #{}", kind.id(), id);
        Some(id)
    }

    /// Take queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Closest tunnelable wall whose surface is within `max_distance` of
    /// `point` (for highlighting what a tunneling drop would open)
    pub fn nearest_tunnelable_wall(&self, point: Vec2, max_distance: f32) -> Option<usize> {
        self.walls
            .iter()
            .enumerate()
            .filter(|(_, w)| w.can_tunnel)
            .map(|(i, w)| (i, w.surface_distance(point)))
            .filter(|&(_, d)| d <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

fn build_inventory(level: &Level, tuning: &Tuning) -> Inventory {
    let cap = |kind: AbilityKind| tuning.ability(kind).max_uses;
    match &level.tools {
        Some(budgets) => Inventory::from_budgets(budgets, cap),
        None => Inventory::from_selection(&select_abilities(level.ability_count, level.seed), cap),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;
    use crate::sim::inventory::{ToolBudget, Uses};
    use crate::sim::wall::WallDef;

    fn open_level(tools: Vec<ToolBudget>) -> Level {
        Level {
            name: "test".into(),
            board: Rect::new(0.0, 0.0, 800.0, 600.0),
            spawn: Vec2::new(100.0, 300.0),
            spawn_velocity: Vec2::ZERO,
            goal: Rect::new(700.0, 250.0, 60.0, 100.0),
            walls: vec![WallDef::rect(Rect::new(400.0, 100.0, 10.0, 400.0))],
            frame: true,
            seed: 3,
            ability_count: 10,
            tools: Some(tools),
        }
    }

    fn budget(kind: AbilityKind, uses: Option<u32>) -> ToolBudget {
        ToolBudget { kind, uses }
    }

    #[test]
    fn test_place_consumes_and_emits() {
        let mut sim = Simulation::new(
            open_level(vec![budget(AbilityKind::Mass, Some(1))]),
            Tuning::default(),
        );
        let id = sim.place_effect(AbilityKind::Mass, Vec2::new(200.0, 200.0), 0.0).unwrap();
        assert_eq!(sim.effects().count(), 1);
        assert_eq!(
            sim.drain_events(),
            vec![SimEvent::EffectPlaced {
                id,
                kind: AbilityKind::Mass
            }]
        );
        assert!(sim.drain_events().is_empty());

        let err = sim.place_effect(AbilityKind::Mass, Vec2::new(200.0, 200.0), 0.0);
        assert_eq!(err, Err(PlacementError::NoUsesLeft(AbilityKind::Mass)));
        assert_eq!(sim.effects().count(), 1);
    }

    #[test]
    fn test_outside_board_rejected_unless_global() {
        let mut sim = Simulation::new(
            open_level(vec![
                budget(AbilityKind::Mass, None),
                budget(AbilityKind::Heat, None),
            ]),
            Tuning::default(),
        );
        let outside = Vec2::new(-50.0, 300.0);
        assert_eq!(
            sim.place_effect(AbilityKind::Mass, outside, 0.0),
            Err(PlacementError::OutsideBoard)
        );
        assert!(sim.place_effect(AbilityKind::Heat, outside, 0.0).is_ok());
    }

    #[test]
    fn test_rejected_placement_leaves_budget() {
        let mut sim = Simulation::new(
            open_level(vec![budget(AbilityKind::Vacuum, Some(2))]),
            Tuning::default(),
        );
        let _ = sim.place_effect(AbilityKind::Vacuum, Vec2::new(9000.0, 0.0), 0.0);
        assert_eq!(
            sim.inventory().remaining(AbilityKind::Vacuum),
            Some(Uses::Finite(2))
        );
        assert_eq!(
            sim.place_effect(AbilityKind::Cold, Vec2::new(10.0, 10.0), 0.0),
            Err(PlacementError::NotInInventory(AbilityKind::Cold))
        );
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_remove_refunds() {
        let mut sim = Simulation::new(
            open_level(vec![budget(AbilityKind::Gravity, Some(1))]),
            Tuning::default(),
        );
        let pos = Vec2::new(300.0, 300.0);
        let id = sim.place_effect(AbilityKind::Gravity, pos, 0.0).unwrap();
        assert!(!sim.inventory().can_use(AbilityKind::Gravity));
        assert_eq!(sim.remove_effect_at(pos + Vec2::new(5.0, 0.0)), Some(id));
        assert!(sim.inventory().can_use(AbilityKind::Gravity));
        assert_eq!(sim.effects().count(), 0);
        assert_eq!(sim.remove_effect_at(pos), None);
    }

    #[test]
    fn test_remove_picks_latest() {
        let mut sim = Simulation::new(
            open_level(vec![budget(AbilityKind::LowPressure, None)]),
            Tuning::default(),
        );
        let pos = Vec2::new(300.0, 300.0);
        let first = sim.place_effect(AbilityKind::LowPressure, pos, 0.0).unwrap();
        let second = sim.place_effect(AbilityKind::LowPressure, pos, 1.0).unwrap();
        assert_eq!(sim.remove_effect_at(pos), Some(second));
        assert_eq!(sim.remove_effect_at(pos), Some(first));
    }

    #[test]
    fn test_restart_restores_everything() {
        let mut sim = Simulation::new(
            open_level(vec![budget(AbilityKind::WindJet, Some(1))]),
            Tuning::default(),
        );
        sim.place_effect(AbilityKind::WindJet, Vec2::new(150.0, 300.0), 0.0)
            .unwrap();
        for _ in 0..30 {
            sim.update(1.0 / 60.0);
        }
        sim.restart();
        assert_eq!(sim.body().pos, sim.level().spawn);
        assert_eq!(sim.effects().count(), 0);
        assert!(sim.inventory().can_use(AbilityKind::WindJet));
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.phase(), Phase::Playing);
    }

    #[test]
    fn test_seeded_toolbar() {
        let mut level = open_level(Vec::new());
        level.tools = None;
        level.ability_count = 4;
        let a = Simulation::new(level.clone(), Tuning::default());
        let b = Simulation::new(level, Tuning::default());
        let kinds = |s: &Simulation| s.inventory().slots().map(|t| t.kind).collect::<Vec<_>>();
        assert_eq!(kinds(&a), kinds(&b));
        assert_eq!(kinds(&a), select_abilities(4, 3));
    }

    #[test]
    fn test_nearest_tunnelable_wall() {
        let sim = Simulation::new(open_level(Vec::new()), Tuning::default());
        // Interior wall is index 0, frame walls follow and are never offered
        assert_eq!(sim.nearest_tunnelable_wall(Vec2::new(380.0, 300.0), 50.0), Some(0));
        assert_eq!(sim.nearest_tunnelable_wall(Vec2::new(5.0, 300.0), 50.0), None);
        assert_eq!(sim.nearest_tunnelable_wall(Vec2::new(100.0, 300.0), 50.0), None);
    }

    #[test]
    fn test_placement_error_messages() {
        assert_eq!(
            PlacementError::NoUsesLeft(AbilityKind::DarkEnergy).to_string(),
            "no uses left for dark-energy"
        );
    }
}

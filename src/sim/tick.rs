//! Per-frame simulation step
//!
//! Order within a tick is fixed: walls decay, body overrides reset, effects
//! evaluate and their forces are summed, the body integrates, collisions
//! resolve, then the goal is checked.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::state::{Phase, SimEvent, Simulation};

/// Advance the simulation by one (clamped) frame
pub fn tick(sim: &mut Simulation, dt: f32) {
    if sim.phase == Phase::Won {
        return;
    }
    let physics = sim.tuning().physics.clone();
    let dt = physics.clamp_dt(dt);

    // Removed effects leave at the tick boundary
    sim.effects.retain(|e| !e.dead);

    for wall in &mut sim.walls {
        wall.decay(dt);
    }

    sim.body.begin_frame(dt, &physics);
    if physics.buoyancy != 0.0 {
        let lift = Vec2::new(0.0, -physics.buoyancy * sim.body.mass);
        sim.body.add_force(lift);
    }

    let (mut force, mut impulse) = (Vec2::ZERO, Vec2::ZERO);
    for effect in &mut sim.effects {
        let step = effect.update(dt, &mut sim.body, &mut sim.walls);
        force += step.force;
        impulse += step.impulse;
        if !step.alive {
            sim.events.push(SimEvent::EffectExpired {
                id: effect.id,
                kind: effect.kind,
            });
            log::debug!("{} #{} expired", effect.kind.id(), effect.id);
        }
    }
    sim.effects.retain(|e| !e.dead);
    sim.body.add_force(force);
    sim.body.add_impulse(impulse);

    sim.body.integrate(dt, &physics);
    resolve_collisions(&mut sim.body, &sim.walls, &physics);
    sim.time += dt;

    if sim.level().goal.contains(sim.body.pos) {
        sim.goal_timer += dt;
        if sim.goal_timer >= physics.goal_dwell {
            sim.phase = Phase::Won;
            sim.events.push(SimEvent::GoalReached { time: sim.time });
            log::info!("goal reached after {:.2}s", sim.time);
        }
    } else {
        sim.goal_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::AbilityKind;
    use crate::sim::geometry::Rect;
    use crate::sim::inventory::ToolBudget;
    use crate::sim::level::Level;
    use crate::sim::wall::WallDef;
    use crate::tuning::Tuning;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn level(walls: Vec<WallDef>, tools: &[AbilityKind]) -> Level {
        Level {
            name: "tick".into(),
            board: Rect::new(0.0, 0.0, 1000.0, 800.0),
            spawn: Vec2::new(200.0, 400.0),
            spawn_velocity: Vec2::ZERO,
            goal: Rect::new(900.0, 50.0, 60.0, 60.0),
            walls,
            frame: true,
            seed: 11,
            ability_count: 0,
            tools: Some(
                tools
                    .iter()
                    .map(|&kind| ToolBudget { kind, uses: None })
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_resting_body_stays_put() {
        let mut sim = Simulation::new(level(Vec::new(), &[]), Tuning::default());
        for _ in 0..120 {
            tick(&mut sim, DT);
        }
        assert_eq!(sim.body().pos, Vec2::new(200.0, 400.0));
        assert_relative_eq!(sim.time(), 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut sim = Simulation::new(level(Vec::new(), &[]), Tuning::default());
        tick(&mut sim, 5.0);
        assert_relative_eq!(sim.time(), crate::consts::MAX_DT, epsilon = 1e-6);
        tick(&mut sim, -1.0);
        assert_relative_eq!(
            sim.time(),
            crate::consts::MAX_DT + crate::consts::MIN_DT,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_effect_force_moves_body() {
        let mut sim = Simulation::new(level(Vec::new(), &[AbilityKind::WindJet]), Tuning::default());
        sim.place_effect(AbilityKind::WindJet, Vec2::new(200.0, 400.0), 0.0)
            .unwrap();
        for _ in 0..10 {
            tick(&mut sim, DT);
        }
        assert!(sim.body().vel.x > 0.0);
        assert!(sim.body().pos.x > 200.0);
        assert_relative_eq!(sim.body().vel.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_burst_fires_once_and_expires() {
        let mut sim = Simulation::new(level(Vec::new(), &[AbilityKind::HighPressure]), Tuning::default());
        let id = sim
            .place_effect(AbilityKind::HighPressure, Vec2::new(150.0, 400.0), 0.0)
            .unwrap();
        sim.drain_events();
        tick(&mut sim, DT);
        let after_burst = sim.body().vel.x;
        assert!(after_burst > 0.0);
        assert_eq!(sim.effects().count(), 0);
        assert_eq!(
            sim.drain_events(),
            vec![SimEvent::EffectExpired {
                id,
                kind: AbilityKind::HighPressure
            }]
        );
        tick(&mut sim, DT);
        // Only damping acts now
        assert!(sim.body().vel.x <= after_burst);
    }

    #[test]
    fn test_timed_effect_expires() {
        let mut tuning = Tuning::default();
        let mut gravity = AbilityKind::Gravity.default_tuning();
        gravity.lifetime = crate::tuning::LifetimeSpec::Timed { seconds: 0.1 };
        tuning.abilities.insert(AbilityKind::Gravity, gravity);
        let mut sim = Simulation::new(level(Vec::new(), &[AbilityKind::Gravity]), tuning);
        sim.place_effect(AbilityKind::Gravity, Vec2::new(600.0, 400.0), 0.0)
            .unwrap();
        for _ in 0..10 {
            tick(&mut sim, DT);
        }
        assert_eq!(sim.effects().count(), 0);
        let expired = sim
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SimEvent::EffectExpired { .. }))
            .count();
        assert_eq!(expired, 1);
    }

    #[test]
    fn test_removed_effect_stops_acting() {
        let mut sim = Simulation::new(level(Vec::new(), &[AbilityKind::WindJet]), Tuning::default());
        let pos = Vec2::new(200.0, 400.0);
        sim.place_effect(AbilityKind::WindJet, pos, 0.0).unwrap();
        sim.remove_effect_at(pos);
        tick(&mut sim, DT);
        assert_eq!(sim.body().vel, Vec2::ZERO);
    }

    #[test]
    fn test_goal_dwell_wins() {
        let mut lvl = level(Vec::new(), &[]);
        lvl.spawn = lvl.goal.center();
        let mut sim = Simulation::new(lvl, Tuning::default());
        for _ in 0..29 {
            tick(&mut sim, DT);
        }
        assert_eq!(sim.phase(), Phase::Playing);
        for _ in 0..2 {
            tick(&mut sim, DT);
        }
        assert_eq!(sim.phase(), Phase::Won);
        let won = sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::GoalReached { .. }));
        assert!(won);

        let frozen = sim.time();
        tick(&mut sim, DT);
        assert_eq!(sim.time(), frozen);
    }

    #[test]
    fn test_buoyancy_lifts() {
        let mut tuning = Tuning::default();
        tuning.physics.buoyancy = 50.0;
        let mut sim = Simulation::new(level(Vec::new(), &[]), tuning);
        for _ in 0..30 {
            tick(&mut sim, DT);
        }
        assert!(sim.body().vel.y < 0.0);
        assert!(sim.body().pos.y < 400.0);
    }

    #[test]
    fn test_walls_reenable_after_tunneling() {
        let wall = WallDef::rect(Rect::new(300.0, 200.0, 10.0, 400.0));
        let mut sim = Simulation::new(level(vec![wall], &[AbilityKind::Tunneling]), Tuning::default());
        sim.place_effect(AbilityKind::Tunneling, Vec2::new(305.0, 400.0), 0.0)
            .unwrap();
        tick(&mut sim, DT);
        assert!(sim.walls()[0].is_disabled());
        // Default tunneling lasts five seconds, plus the rolling window
        for _ in 0..320 {
            tick(&mut sim, DT);
        }
        assert_eq!(sim.effects().count(), 0);
        assert!(!sim.walls()[0].is_disabled());
    }
}

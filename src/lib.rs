//! Ten Laws - a physics sandbox puzzle
//!
//! A balloon drifts through a walled chamber. The player cannot touch it
//! directly; instead they drop short-lived "laws" (force fields, material
//! overrides, tunneling zones) onto the board to steer it into the goal.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integrator, collisions, ability fields)
//! - `tuning`: Data-driven physics and ability balance
//! - `audio`: Sound cue mapping for simulation events
//! - `platform`: Browser host bindings

pub mod audio;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use sim::{AbilityKind, Level, PlacementError, SimEvent, Simulation, Snapshot};
pub use tuning::Tuning;

/// Physics defaults. Everything here can be overridden through [`Tuning`].
pub mod consts {
    /// Nominal frame step used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Smallest step a frame may advance (guards against zero/negative dt)
    pub const MIN_DT: f32 = 1.0 / 180.0;
    /// Largest step a frame may advance (tab switch / pause hiccups)
    pub const MAX_DT: f32 = 1.0 / 25.0;

    /// Balloon defaults
    pub const BALLOON_RADIUS: f32 = 36.0;
    pub const BALLOON_MASS: f32 = 5.0;
    pub const BALLOON_ELASTICITY: f32 = 0.85;
    /// Baseline exponential damping rate (1/s), divided by mass
    pub const BALLOON_DAMPING: f32 = 0.12;
    /// Hard speed cap (px/s)
    pub const MAX_SPEED: f32 = 980.0;
    /// Radius approach rate toward its target (1/s)
    pub const RADIUS_SMOOTHING: f32 = 6.4;
    /// Tunnel ghost fade rate (units/s)
    pub const GHOST_DECAY: f32 = 2.2;
    /// Temperature exponential decay rate (1/s)
    pub const TEMPERATURE_DECAY: f32 = 1.5;

    /// Wall defaults
    pub const DEFAULT_WALL_WIDTH: f32 = 20.0;
    pub const MIN_WALL_WIDTH: f32 = 2.0;
    /// Tangential velocity kept on contact with the outer frame
    pub const FRAME_FRICTION: f32 = 0.995;
    /// Tangential velocity kept on contact with interior walls
    pub const INTERIOR_FRICTION: f32 = 0.992;
    /// Resolver passes per tick
    pub const COLLISION_ITERATIONS: u32 = 4;

    /// Seconds the balloon must stay in the goal to win
    pub const GOAL_DWELL: f32 = 0.5;
}

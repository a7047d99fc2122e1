//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Clamped timestep only
//! - Seeded RNG only (level seed)
//! - Stable iteration order (walls in level order, effects in placement order)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod catalog;
pub mod collision;
pub mod effect;
pub mod geometry;
pub mod inventory;
pub mod level;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wall;

pub use body::Body;
pub use catalog::{AbilityKind, Mulberry32, select_abilities};
pub use collision::{CollisionResult, ResolveReport, circle_wall_collision, resolve_collisions};
pub use effect::{Effect, EffectId, EffectStep, Field, Lifetime};
pub use geometry::{Rect, clamp, closest_point_on_segment, falloff};
pub use inventory::{Inventory, ToolBudget, ToolSlot, Uses};
pub use level::{Level, LoadError};
pub use snapshot::Snapshot;
pub use state::{Phase, PlacementError, SimEvent, Simulation};
pub use tick::tick;
pub use wall::{Wall, WallDef, WallShape};

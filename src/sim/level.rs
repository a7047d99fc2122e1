//! Level description: board, spawn, goal, walls and toolbar budget
//!
//! Geometry arrives already parsed (JSON or [`Level::demo`]); authoring
//! formats live elsewhere.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;
use super::inventory::ToolBudget;
use super::wall::{Wall, WallDef, frame_walls};
use crate::consts::DEFAULT_WALL_WIDTH;

/// Errors from loading level or tuning data
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("board must have a positive area")]
    EmptyBoard,
    #[error("goal zone must have a positive area")]
    EmptyGoal,
    #[error("spawn point ({x}, {y}) lies outside the board")]
    SpawnOutsideBoard { x: f32, y: f32 },
    #[error("wall {index} has non-finite geometry")]
    InvalidWall { index: usize },
}

fn default_name() -> String {
    "Untitled".to_string()
}

fn default_frame() -> bool {
    true
}

fn default_ability_count() -> usize {
    10
}

/// A playable chamber
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    #[serde(default = "default_name")]
    pub name: String,
    /// Playable area; placements outside it are rejected
    pub board: Rect,
    pub spawn: Vec2,
    #[serde(default)]
    pub spawn_velocity: Vec2,
    pub goal: Rect,
    #[serde(default)]
    pub walls: Vec<WallDef>,
    /// Surround the board with four frame walls
    #[serde(default = "default_frame")]
    pub frame: bool,
    /// Drives toolbar selection and noise phases
    #[serde(default)]
    pub seed: u32,
    /// Toolbar size when `tools` is absent
    #[serde(default = "default_ability_count")]
    pub ability_count: usize,
    /// Explicit budgets; overrides the seeded selection
    #[serde(default)]
    pub tools: Option<Vec<ToolBudget>>,
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if self.board.is_empty() {
            return Err(LoadError::EmptyBoard);
        }
        if self.goal.is_empty() {
            return Err(LoadError::EmptyGoal);
        }
        if !self.board.contains(self.spawn) {
            return Err(LoadError::SpawnOutsideBoard {
                x: self.spawn.x,
                y: self.spawn.y,
            });
        }
        for (index, def) in self.walls.iter().enumerate() {
            let wall = def.to_wall();
            if !(wall.a.is_finite() && wall.b.is_finite() && wall.width.is_finite()) {
                return Err(LoadError::InvalidWall { index });
            }
        }
        Ok(())
    }

    /// Runtime walls: level walls in file order, then the frame
    pub fn build_walls(&self) -> Vec<Wall> {
        let mut walls: Vec<Wall> = self.walls.iter().map(WallDef::to_wall).collect();
        if self.frame {
            walls.extend(frame_walls(self.board, DEFAULT_WALL_WIDTH));
        }
        walls
    }

    /// The first chamber: thin partitions forming a maze with the goal
    /// pocket in the top right
    pub fn demo() -> Self {
        let board = Rect::new(258.0, 56.0, 890.0, 656.0);
        let at = |x: f32, y: f32, w: f32, h: f32| {
            WallDef::rect(Rect::new(board.min.x + x, board.min.y + y, w, h))
        };
        Self {
            name: "Level 1 - Demo".to_string(),
            board,
            spawn: board.min + Vec2::new(165.0, 195.0),
            spawn_velocity: Vec2::ZERO,
            goal: Rect::new(board.min.x + 760.0, board.min.y + 126.0, 16.0, 46.0),
            walls: vec![
                at(96.0, 96.0, 6.0, 465.0),
                at(96.0, 96.0, 250.0, 6.0),
                at(340.0, 96.0, 6.0, 250.0),
                at(460.0, 96.0, 6.0, 248.0),
                at(340.0, 340.0, 230.0, 6.0),
                at(676.0, 96.0, 6.0, 380.0),
                at(788.0, 96.0, 6.0, 278.0),
                at(676.0, 374.0, 112.0, 6.0),
            ],
            frame: true,
            seed: 1,
            ability_count: 10,
            tools: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "board": { "min": [0, 0], "max": [400, 300] },
        "spawn": [50, 50],
        "goal": { "min": [350, 250], "max": [390, 290] }
    }"#;

    #[test]
    fn test_minimal_json_defaults() {
        let level = Level::from_json(MINIMAL).unwrap();
        assert_eq!(level.name, "Untitled");
        assert!(level.frame);
        assert_eq!(level.ability_count, 10);
        assert!(level.tools.is_none());
        assert_eq!(level.build_walls().len(), 4);
    }

    #[test]
    fn test_spawn_outside_board_rejected() {
        let json = MINIMAL.replace("[50, 50]", "[500, 50]");
        assert!(matches!(
            Level::from_json(&json),
            Err(LoadError::SpawnOutsideBoard { .. })
        ));
    }

    #[test]
    fn test_empty_board_rejected() {
        let json = MINIMAL.replace("[400, 300]", "[0, 300]");
        assert!(matches!(Level::from_json(&json), Err(LoadError::EmptyBoard)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Level::from_json("{"), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_tools_and_walls() {
        let json = r#"{
            "board": { "min": [0, 0], "max": [400, 300] },
            "spawn": [50, 50],
            "goal": { "min": [350, 250], "max": [390, 290] },
            "frame": false,
            "walls": [
                { "a": [200, 0], "b": [200, 200], "width": 10 },
                { "min": [0, 150], "max": [100, 156], "can_tunnel": false }
            ],
            "tools": [
                { "kind": "mass", "uses": 2 },
                { "kind": "tunneling" }
            ]
        }"#;
        let level = Level::from_json(json).unwrap();
        let walls = level.build_walls();
        assert_eq!(walls.len(), 2);
        assert!(!walls[1].can_tunnel);
        let tools = level.tools.unwrap();
        assert_eq!(tools[0].uses, Some(2));
        assert_eq!(tools[1].uses, None);
    }

    #[test]
    fn test_demo_is_valid() {
        let level = Level::demo();
        level.validate().unwrap();
        let walls = level.build_walls();
        assert_eq!(walls.len(), 12);
        assert!(level.board.contains(level.goal.center()));
        // Spawn is clear of every partition
        for wall in &walls {
            assert!(wall.surface_distance(level.spawn) > crate::consts::BALLOON_RADIUS);
        }
    }

    #[test]
    fn test_demo_json_round_trip() {
        let json = serde_json::to_string(&Level::demo()).unwrap();
        let level = Level::from_json(&json).unwrap();
        assert_eq!(level.walls.len(), 8);
        assert_eq!(level.seed, 1);
    }
}

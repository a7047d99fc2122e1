//! Static wall geometry
//!
//! A wall is a thick segment: a centerline from `a` to `b` swept by
//! `width / 2` on both sides, with rounded caps. Axis-aligned rect walls are
//! stored the same way, centerline along their long axis.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, closest_point_on_segment};
use crate::consts::{DEFAULT_WALL_WIDTH, MIN_WALL_WIDTH};

/// A static obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    /// Centerline start
    pub a: Vec2,
    /// Centerline end
    pub b: Vec2,
    /// Full thickness (never below `MIN_WALL_WIDTH`)
    pub width: f32,
    /// Restitution override (falls back to the balloon's)
    pub elasticity: Option<f32>,
    /// Tangential retention override (falls back to frame/interior default)
    pub friction: Option<f32>,
    /// Outer chamber boundary
    pub is_frame: bool,
    /// Tunneling fields may switch this wall off
    pub can_tunnel: bool,
    /// Seconds of disablement left (0 = solid)
    #[serde(default)]
    disabled_ttl: f32,
}

impl Wall {
    pub fn segment(a: Vec2, b: Vec2, width: f32) -> Self {
        Self {
            a,
            b,
            width: width.max(MIN_WALL_WIDTH),
            elasticity: None,
            friction: None,
            is_frame: false,
            can_tunnel: true,
            disabled_ttl: 0.0,
        }
    }

    /// Rect wall: centerline through the long axis, width = short side
    pub fn from_rect(rect: Rect) -> Self {
        let c = rect.center();
        let (w, h) = (rect.width(), rect.height());
        if w >= h {
            let half = (w - h).max(0.0) * 0.5;
            Self::segment(c - Vec2::new(half, 0.0), c + Vec2::new(half, 0.0), h)
        } else {
            let half = (h - w) * 0.5;
            Self::segment(c - Vec2::new(0.0, half), c + Vec2::new(0.0, half), w)
        }
    }

    /// Outer boundary wall: never tunnelable
    pub fn frame(a: Vec2, b: Vec2, width: f32) -> Self {
        Self {
            is_frame: true,
            can_tunnel: false,
            ..Self::segment(a, b, width)
        }
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = Some(elasticity);
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = Some(friction);
        self
    }

    pub fn solid(mut self) -> Self {
        self.can_tunnel = false;
        self
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    /// Unit direction from `a` to `b` (zero for a degenerate wall)
    pub fn direction(&self) -> Vec2 {
        (self.b - self.a).normalize_or_zero()
    }

    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        closest_point_on_segment(p, self.a, self.b)
    }

    /// Distance from `p` to the wall surface (negative inside the wall)
    pub fn surface_distance(&self, p: Vec2) -> f32 {
        (p - self.closest_point(p)).length() - self.half_width()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled_ttl > 0.0
    }

    /// Remaining disablement in seconds
    pub fn disabled_ttl(&self) -> f32 {
        self.disabled_ttl
    }

    /// Switch collision off for at least `ttl` seconds. Rolling: a shorter
    /// request never cuts an existing window short.
    pub(crate) fn disable_for(&mut self, ttl: f32) {
        if self.can_tunnel {
            self.disabled_ttl = self.disabled_ttl.max(ttl);
        }
    }

    /// Count the disablement window down
    pub fn decay(&mut self, dt: f32) {
        if self.disabled_ttl > 0.0 {
            self.disabled_ttl = (self.disabled_ttl - dt).max(0.0);
        }
    }

    pub fn elasticity_or(&self, fallback: f32) -> f32 {
        self.elasticity.unwrap_or(fallback)
    }

    pub fn friction_or(&self, frame_default: f32, interior_default: f32) -> f32 {
        self.friction.unwrap_or(if self.is_frame {
            frame_default
        } else {
            interior_default
        })
    }
}

/// Wall shape as written in level files
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WallShape {
    Segment { a: Vec2, b: Vec2 },
    Rect { min: Vec2, max: Vec2 },
}

/// A wall entry in a level file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallDef {
    #[serde(flatten)]
    pub shape: WallShape,
    /// Segment thickness; rect walls take it from their short side
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub elasticity: Option<f32>,
    #[serde(default)]
    pub friction: Option<f32>,
    #[serde(default = "default_can_tunnel")]
    pub can_tunnel: bool,
}

fn default_can_tunnel() -> bool {
    true
}

impl WallDef {
    pub fn rect(rect: Rect) -> Self {
        Self {
            shape: WallShape::Rect {
                min: rect.min,
                max: rect.max,
            },
            width: None,
            elasticity: None,
            friction: None,
            can_tunnel: true,
        }
    }

    pub fn to_wall(&self) -> Wall {
        let mut wall = match self.shape {
            WallShape::Segment { a, b } => {
                Wall::segment(a, b, self.width.unwrap_or(DEFAULT_WALL_WIDTH))
            }
            WallShape::Rect { min, max } => Wall::from_rect(Rect { min, max }),
        };
        wall.elasticity = self.elasticity;
        wall.friction = self.friction;
        wall.can_tunnel = self.can_tunnel;
        wall
    }
}

/// Four frame walls hugging the outside of `board`
pub fn frame_walls(board: Rect, width: f32) -> Vec<Wall> {
    let h = width.max(MIN_WALL_WIDTH) * 0.5;
    let (min, max) = (board.min - Vec2::splat(h), board.max + Vec2::splat(h));
    vec![
        Wall::frame(Vec2::new(min.x, min.y), Vec2::new(max.x, min.y), width),
        Wall::frame(Vec2::new(max.x, min.y), Vec2::new(max.x, max.y), width),
        Wall::frame(Vec2::new(max.x, max.y), Vec2::new(min.x, max.y), width),
        Wall::frame(Vec2::new(min.x, max.y), Vec2::new(min.x, min.y), width),
    ]
}

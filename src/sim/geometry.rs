//! Geometry helpers shared by the resolver and the ability fields
//!
//! Pure functions, no state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Clamp `v` into `[lo, hi]`
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// Project `p` onto the segment `[a, b]`, parameter clamped to `[0, 1]`.
///
/// A degenerate segment (`a == b`) returns `a`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = clamp((p - a).dot(ab) / len_sq, 0.0, 1.0);
    a + ab * t
}

/// Linear influence curve: 1 at the origin, 0 at (and beyond) `radius`
#[inline]
pub fn falloff(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / radius).max(0.0)
}

/// Axis-aligned rectangle (board, goal zone, rect walls)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Build from the corner plus size, the way level tables store it
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        let a = Vec2::new(x, y);
        let b = Vec2::new(x + w, y + h);
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive point test
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x <= self.max.x && p.y <= self.max.y
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

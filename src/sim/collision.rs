//! Collision detection and response against thick wall segments
//!
//! Positional correction plus restitution/friction impulse, iterated a few
//! passes so that pushing out of one wall into another (corners) settles.
//! Not an exact constraint solver: walls are resolved one at a time in level
//! order, and a tick that runs out of passes keeps its best-effort position.

use glam::Vec2;

use super::body::Body;
use super::wall::Wall;
use crate::tuning::PhysicsTuning;

/// Below this centerline distance the contact normal is synthesized
const NORMAL_EPSILON: f32 = 1.0e-4;

/// Result of a circle-vs-wall check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the circle overlaps the wall
    pub hit: bool,
    /// Closest point on the wall centerline
    pub point: Vec2,
    /// Unit normal pointing from the wall toward the circle
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Summary of one resolver run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Passes executed
    pub iterations: u32,
    /// Individual wall contacts handled across all passes
    pub contacts: u32,
    /// The last pass found no penetration
    pub converged: bool,
}

/// Check a circle against one wall (ignores disablement)
pub fn circle_wall_collision(center: Vec2, radius: f32, wall: &Wall) -> CollisionResult {
    let closest = wall.closest_point(center);
    let offset = center - closest;
    let dist = offset.length();
    let min_dist = radius + wall.half_width();

    if dist >= min_dist {
        return CollisionResult::miss();
    }

    let normal = if dist > NORMAL_EPSILON {
        offset / dist
    } else {
        // Centre sits on the centerline: take the wall perpendicular, flipped
        // to the side the centre lies on relative to the first endpoint
        let dir = wall.direction();
        let dir = if dir == Vec2::ZERO { Vec2::X } else { dir };
        let perp = dir.perp();
        if (center - wall.a).dot(perp) < 0.0 {
            -perp
        } else {
            perp
        }
    };
    let dist = if dist > NORMAL_EPSILON { dist } else { 0.0 };

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: min_dist - dist,
    }
}

/// Bounce velocity off a surface: restitution on the normal part, friction
/// on the tangential part. Only applies while moving into the surface.
pub fn respond(velocity: Vec2, normal: Vec2, elasticity: f32, friction: f32) -> Vec2 {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        return velocity;
    }
    let mut v = velocity - (1.0 + elasticity) * vn * normal;
    let tangent = normal.perp();
    let vt = v.dot(tangent);
    v -= vt * (1.0 - friction) * tangent;
    v
}

/// Push the body out of every active wall and bounce it
pub fn resolve_collisions(body: &mut Body, walls: &[Wall], physics: &PhysicsTuning) -> ResolveReport {
    let mut report = ResolveReport::default();

    for _ in 0..physics.collision_iterations.max(1) {
        report.iterations += 1;
        let mut hit = false;

        for wall in walls {
            if wall.is_disabled() {
                continue;
            }
            let result = circle_wall_collision(body.pos, body.radius, wall);
            if !result.hit {
                continue;
            }
            hit = true;
            report.contacts += 1;

            body.pos += result.normal * result.penetration;

            let elasticity = wall.elasticity_or(body.elasticity);
            let friction = wall.friction_or(physics.frame_friction, physics.interior_friction);
            body.vel = respond(body.vel, result.normal, elasticity, friction);
        }

        if !hit {
            report.converged = true;
            break;
        }
    }

    if !report.converged {
        log::trace!(
            "collision passes exhausted ({} contacts) at ({:.1}, {:.1})",
            report.contacts,
            body.pos.x,
            body.pos.y
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vertical_wall() -> Wall {
        Wall::segment(Vec2::new(100.0, 0.0), Vec2::new(100.0, 100.0), 20.0)
    }

    fn body(pos: Vec2, vel: Vec2, radius: f32) -> (Body, PhysicsTuning) {
        let physics = PhysicsTuning {
            base_radius: radius,
            ..PhysicsTuning::default()
        };
        (Body::new(pos, vel, &physics), physics)
    }

    #[test]
    fn test_miss_when_clear() {
        let result = circle_wall_collision(Vec2::new(70.0, 50.0), 10.0, &vertical_wall());
        assert!(!result.hit);
    }

    #[test]
    fn test_hit_left_side() {
        let result = circle_wall_collision(Vec2::new(85.0, 50.0), 10.0, &vertical_wall());
        assert!(result.hit);
        assert_relative_eq!(result.normal.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(result.penetration, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_cap_contact_uses_radial_normal() {
        // Just past the top endpoint: normal points away from the cap
        let result = circle_wall_collision(Vec2::new(100.0, -15.0), 10.0, &vertical_wall());
        assert!(result.hit);
        assert_relative_eq!(result.normal.y, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_centerline_overlap_synthesizes_normal() {
        let wall = Wall::segment(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 10.0);
        let result = circle_wall_collision(Vec2::new(50.0, 0.0), 8.0, &wall);
        assert!(result.hit);
        assert!(result.normal.is_finite());
        assert_relative_eq!(result.normal.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(result.normal.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(result.penetration, 13.0, epsilon = 1e-4);
    }

    #[test]
    fn test_degenerate_wall_still_has_normal() {
        let p = Vec2::new(5.0, 5.0);
        let wall = Wall::segment(p, p, 4.0);
        let result = circle_wall_collision(p, 3.0, &wall);
        assert!(result.hit);
        assert!(result.normal.is_finite());
        assert_relative_eq!(result.normal.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_respond_reflects_incoming() {
        let v = respond(Vec2::new(50.0, 0.0), Vec2::new(-1.0, 0.0), 1.0, 1.0);
        assert_relative_eq!(v.x, -50.0, epsilon = 1e-4);
        let v = respond(Vec2::new(50.0, 0.0), Vec2::new(-1.0, 0.0), 0.5, 1.0);
        assert_relative_eq!(v.x, -25.0, epsilon = 1e-4);
    }

    #[test]
    fn test_respond_ignores_separating() {
        let v = Vec2::new(-50.0, 10.0);
        assert_eq!(respond(v, Vec2::new(-1.0, 0.0), 0.85, 0.9), v);
    }

    #[test]
    fn test_respond_friction_damps_tangent() {
        let v = respond(Vec2::new(50.0, 40.0), Vec2::new(-1.0, 0.0), 0.0, 0.5);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(v.y, 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_resolve_pushes_out_and_bounces() {
        let (mut b, physics) = body(Vec2::new(85.0, 50.0), Vec2::new(50.0, 0.0), 10.0);
        let walls = [vertical_wall()];
        let report = resolve_collisions(&mut b, &walls, &physics);
        assert!(report.converged);
        assert_eq!(report.contacts, 1);
        assert_relative_eq!(b.pos.x, 80.0, epsilon = 1e-3);
        assert!(b.vel.x < 0.0);
    }

    #[test]
    fn test_disabled_wall_is_skipped() {
        let (mut b, physics) = body(Vec2::new(95.0, 50.0), Vec2::new(50.0, 0.0), 10.0);
        let mut wall = vertical_wall();
        wall.disable_for(1.0);
        let report = resolve_collisions(&mut b, &[wall], &physics);
        assert_eq!(report.contacts, 0);
        assert_eq!(b.pos, Vec2::new(95.0, 50.0));
    }

    #[test]
    fn test_corner_settles() {
        let floor = Wall::segment(Vec2::new(0.0, 100.0), Vec2::new(200.0, 100.0), 10.0);
        let side = Wall::segment(Vec2::new(100.0, 0.0), Vec2::new(100.0, 100.0), 10.0);
        let walls = [floor, side];
        let (mut b, physics) = body(Vec2::new(92.0, 92.0), Vec2::new(30.0, 30.0), 10.0);
        let report = resolve_collisions(&mut b, &walls, &physics);
        assert!(report.converged);
        for wall in &walls {
            assert!(wall.surface_distance(b.pos) >= b.radius - 1e-3);
        }
    }
}

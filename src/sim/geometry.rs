//! Geometry primitives for the arena
//!
//! Screen-style coordinates: +x right, +y down. Rectangles are anchored at
//! their top-left corner. All functions are pure; NaN/Inf inputs give
//! unspecified (but non-panicking) results.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Whether the point lies inside (or on the border of) the rect
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Closest point on or inside the rect to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }
}

/// A circle (ball footprint)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Circle/rect overlap test (touching counts as overlap)
pub fn circle_intersects_rect(circle: Circle, rect: Rect) -> bool {
    let closest = rect.closest_point(circle.center);
    (circle.center - closest).length_squared() <= circle.radius * circle.radius
}

/// Circle/circle overlap test (touching counts as overlap)
pub fn circle_intersects_circle(c1: Circle, c2: Circle) -> bool {
    let r = c1.radius + c2.radius;
    (c1.center - c2.center).length_squared() <= r * r
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, with `normal` of unit length.
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Outward unit normal of the rect edge nearest to `p`
///
/// Outside the rect, the edge is chosen by the axis along which the point
/// lies furthest beyond the rect's half extents. Inside the rect, the edge
/// with the smallest penetration wins.
/// Ties resolve to the vertical faces (top/bottom), which is what a ball
/// coming down onto a row of blocks expects.
pub fn closest_edge_normal(rect: Rect, p: Vec2) -> Vec2 {
    if rect.contains(p) {
        let to_left = p.x - rect.left();
        let to_right = rect.right() - p.x;
        let to_top = p.y - rect.top();
        let to_bottom = rect.bottom() - p.y;
        let min_x = to_left.min(to_right);
        let min_y = to_top.min(to_bottom);
        if min_x < min_y {
            if to_left < to_right { Vec2::NEG_X } else { Vec2::X }
        } else if to_top < to_bottom {
            Vec2::NEG_Y
        } else {
            Vec2::Y
        }
    } else {
        let half = (rect.size * 0.5).max(Vec2::splat(f32::EPSILON));
        let d = p - rect.center();
        let overshoot_x = d.x.abs() - half.x;
        let overshoot_y = d.y.abs() - half.y;
        if overshoot_x > overshoot_y {
            Vec2::new(d.x.signum(), 0.0)
        } else {
            Vec2::new(0.0, d.y.signum())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_circle_rect_overlap() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);

        // Just above the top edge, touching
        assert!(circle_intersects_rect(
            Circle::new(Vec2::new(125.0, 92.0), 8.0),
            rect
        ));
        // Clear of the top edge
        assert!(!circle_intersects_rect(
            Circle::new(Vec2::new(125.0, 90.0), 8.0),
            rect
        ));
        // Near a corner but outside the corner radius
        assert!(!circle_intersects_rect(
            Circle::new(Vec2::new(94.0, 94.0), 8.0),
            rect
        ));
        // Centre inside
        assert!(circle_intersects_rect(
            Circle::new(Vec2::new(110.0, 110.0), 1.0),
            rect
        ));
    }

    #[test]
    fn test_circle_circle_overlap() {
        let a = Circle::new(Vec2::ZERO, 5.0);
        assert!(circle_intersects_circle(a, Circle::new(Vec2::new(9.0, 0.0), 5.0)));
        assert!(!circle_intersects_circle(a, Circle::new(Vec2::new(11.0, 0.0), 5.0)));
    }

    #[test]
    fn test_reflect() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let reflected = reflect(Vec2::new(100.0, 20.0), Vec2::NEG_X);
        assert!((reflected.x + 100.0).abs() < 0.001);
        assert!((reflected.y - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_closest_edge_normal_outside() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
        assert_eq!(closest_edge_normal(rect, Vec2::new(125.0, 95.0)), Vec2::NEG_Y);
        assert_eq!(closest_edge_normal(rect, Vec2::new(125.0, 125.0)), Vec2::Y);
        assert_eq!(closest_edge_normal(rect, Vec2::new(95.0, 110.0)), Vec2::NEG_X);
        assert_eq!(closest_edge_normal(rect, Vec2::new(155.0, 110.0)), Vec2::X);
    }

    #[test]
    fn test_closest_edge_normal_inside() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
        // 2px below the top edge, far from the sides
        assert_eq!(closest_edge_normal(rect, Vec2::new(125.0, 102.0)), Vec2::NEG_Y);
        // 1px right of the left edge
        assert_eq!(closest_edge_normal(rect, Vec2::new(101.0, 110.0)), Vec2::NEG_X);
    }

    proptest! {
        #[test]
        fn reflect_preserves_speed(vx in -500.0f32..500.0, vy in -500.0f32..500.0, angle in 0.0f32..std::f32::consts::TAU) {
            let v = Vec2::new(vx, vy);
            let n = Vec2::new(angle.cos(), angle.sin());
            let r = reflect(v, n);
            prop_assert!((r.length() - v.length()).abs() < 1e-2);
        }

        #[test]
        fn closest_point_is_inside(px in -500.0f32..500.0, py in -500.0f32..500.0) {
            let rect = Rect::new(-20.0, 10.0, 60.0, 30.0);
            prop_assert!(rect.contains(rect.closest_point(Vec2::new(px, py))));
        }
    }
}

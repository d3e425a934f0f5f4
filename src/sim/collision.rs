//! Collision detection and response
//!
//! Balls are circles; walls, blocks and the paddle are axis-aligned
//! rectangles. Block and paddle normals come from the closest-edge rule in
//! [`super::geometry::closest_edge_normal`], so every bounce is axis-aligned.

use glam::Vec2;

use super::entity::{Ball, Block};
use super::geometry::{
    Circle, Rect, circle_intersects_circle, circle_intersects_rect, closest_edge_normal, distance,
    reflect,
};
use super::state::Paddle;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the surface (if hit)
    pub point: Vec2,
    /// Surface normal at contact (pointing toward the ball, for reflection)
    pub normal: Vec2,
    /// Penetration depth along `normal` (for position correction)
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

/// What happened to a ball against the arena walls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallOutcome {
    /// Ball is clear of every wall
    Clear,
    /// Ball bounced off the left, right or top wall
    Bounced,
    /// Ball crossed the player's (bottom) edge
    Lost,
}

/// Check collision between a ball and a rectangle
pub fn ball_rect_collision(circle: Circle, rect: Rect) -> CollisionResult {
    if !circle_intersects_rect(circle, rect) {
        return CollisionResult::miss();
    }

    let normal = closest_edge_normal(rect, circle.center);
    // Signed distance from the centre to the plane of the chosen face
    let face_distance = if normal.x < 0.0 {
        rect.left() - circle.center.x
    } else if normal.x > 0.0 {
        circle.center.x - rect.right()
    } else if normal.y < 0.0 {
        rect.top() - circle.center.y
    } else {
        circle.center.y - rect.bottom()
    };

    CollisionResult {
        hit: true,
        point: rect.closest_point(circle.center),
        normal,
        penetration: (circle.radius - face_distance).max(0.0),
    }
}

/// Resolve a ball against the arena walls
///
/// Left, right and top walls reflect the violated velocity component and
/// clamp the ball back inside. A ball whose centre has crossed the bottom
/// edge is lost and left untouched.
pub fn resolve_ball_walls(ball: &mut Ball, bounds: Rect) -> WallOutcome {
    if ball.pos.y > bounds.bottom() {
        return WallOutcome::Lost;
    }

    let r = ball.radius;
    let mut outcome = WallOutcome::Clear;

    if ball.pos.x - r < bounds.left() {
        ball.pos.x = bounds.left() + r;
        ball.vel.x = ball.vel.x.abs();
        outcome = WallOutcome::Bounced;
    } else if ball.pos.x + r > bounds.right() {
        ball.pos.x = bounds.right() - r;
        ball.vel.x = -ball.vel.x.abs();
        outcome = WallOutcome::Bounced;
    }

    if ball.pos.y - r < bounds.top() {
        ball.pos.y = bounds.top() + r;
        ball.vel.y = ball.vel.y.abs();
        outcome = WallOutcome::Bounced;
    }

    outcome
}

/// First alive block (in registration order) the ball overlaps
pub fn find_block_hit(ball: &Ball, blocks: &[Block]) -> Option<(usize, CollisionResult)> {
    let circle = ball.circle();
    blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| block.alive)
        .map(|(i, block)| (i, ball_rect_collision(circle, block.rect)))
        .find(|(_, result)| result.hit)
}

/// Bounce a ball off a surface described by `result`
///
/// Only reflects when the ball is moving into the surface, then pushes it
/// out so it no longer overlaps.
pub fn apply_bounce(ball: &mut Ball, result: &CollisionResult) {
    if ball.vel.dot(result.normal) < 0.0 {
        ball.vel = reflect(ball.vel, result.normal);
    }
    ball.pos += result.normal * result.penetration;
}

/// Bounce a ball off the paddle
///
/// Hits on the top face get "english": the further from the paddle centre,
/// the more the ball is bent toward that side. Speed is preserved.
pub fn resolve_ball_paddle(ball: &mut Ball, paddle: &Paddle, english: f32) -> bool {
    let result = ball_rect_collision(ball.circle(), paddle.rect);
    if !result.hit {
        return false;
    }

    let approaching = ball.vel.dot(result.normal) < 0.0;
    apply_bounce(ball, &result);

    if approaching && result.normal == Vec2::NEG_Y && english > 0.0 {
        let speed = ball.vel.length();
        let half_width = (paddle.rect.size.x * 0.5).max(f32::EPSILON);
        let offset = ((ball.pos.x - paddle.rect.center().x) / half_width).clamp(-1.0, 1.0);
        let bent = ball.vel + Vec2::new(offset * speed * english, 0.0);
        // Keep the ball moving upward after the bend
        let bent = Vec2::new(bent.x, bent.y.min(-speed * 0.2));
        ball.vel = bent.normalize_or_zero() * speed;
    }

    true
}

/// Equal-mass elastic collision between two balls
///
/// Exchanges the velocity components along the line between centres when
/// the balls are approaching, and separates any overlap symmetrically.
pub fn resolve_ball_ball(a: &mut Ball, b: &mut Ball) -> bool {
    if !circle_intersects_circle(a.circle(), b.circle()) {
        return false;
    }

    let delta = b.pos - a.pos;
    let min_dist = a.radius + b.radius;
    let dist = distance(a.pos, b.pos);
    let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::X };

    let va = a.vel.dot(normal);
    let vb = b.vel.dot(normal);
    if va - vb > 0.0 {
        a.vel += (vb - va) * normal;
        b.vel += (va - vb) * normal;
    }

    let overlap = min_dist - dist;
    if overlap > 0.0 {
        a.pos -= normal * (overlap * 0.5);
        b.pos += normal * (overlap * 0.5);
    }

    true
}

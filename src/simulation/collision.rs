//! Continuous circle-circle collision
//!
//! For each unordered pair the resolver solves for the fraction `t` of the current
//! step at which the two circles first touch. When `0 <= t <= 1` both bodies are
//! advanced by `t * v` to the contact configuration and an impulse is exchanged
//! along the line between their centers.
//!
//! Shape pairs are routed through a dispatch table indexed by [`ShapeKind`]; only
//! (Circle, Circle) has a handler, every other combination is a no-op.
//!
//! Pairs that already overlap at the start of the solve are not pushed apart; the
//! advance to the impact time is the only positional correction.

use tracing::trace;

use crate::simulation::states::{Body, NVec2, Shape, ShapeKind};

/// Handler for one ordered pair of shape kinds; returns true if an impulse was applied
pub type CollisionHandler = fn(&mut Body, &mut Body) -> bool;

const DISPATCH: [[Option<CollisionHandler>; ShapeKind::COUNT]; ShapeKind::COUNT] = [
    // Circle vs { Circle, Rectangle }
    [Some(collide_circles as CollisionHandler), None],
    // Rectangle vs { Circle, Rectangle }
    [None, None],
];

/// Handler registered for a pair of shape kinds, if any
pub fn handler_for(a: ShapeKind, b: ShapeKind) -> Option<CollisionHandler> {
    DISPATCH[a as usize][b as usize]
}

/// Impact time of two moving circles within the current step.
///
/// With `r = (ra + rb)^2`, `dp = pb - pa`, `dv = vb - va`:
/// - `a = c = dv.dv`, `b = dp.dp - r`
/// - `d = 2 (dv.x dp.x - dv.y dp.y)`
/// - `t = min((d - e) / 2c, (d + e) / 2c)` with `e = sqrt(d^2 - 4bc)`
///
/// The cross term keeps its mixed sign. Returns `None` for a negative
/// discriminant, zero relative velocity, or `t` outside `[0, 1]`.
pub fn time_of_impact(pa: &NVec2, va: &NVec2, ra: f64, pb: &NVec2, vb: &NVec2, rb: f64) -> Option<f64> {
    // Squared contact distance: centers exactly ra + rb apart
    let reach = ra + rb;
    let r = reach * reach;
    // Relative position and velocity of b as seen from a
    let dp = pb - pa;
    let dv = vb - va;

    // Quadratic coefficients
    let a = dv.dot(&dv);
    let b = dp.dot(&dp) - r; // > 0 while separated, < 0 while overlapping
    let c = a;
    let d = 2.0 * (dv.x * dp.x - dv.y * dp.y);

    // Same velocity: the gap never changes
    if c == 0.0 {
        return None;
    }
    // No real root: the paths never come within reach
    let discriminant = d * d - 4.0 * b * c;
    if discriminant < 0.0 {
        return None;
    }
    let e = discriminant.sqrt();
    // Earlier of the two roots
    let t = ((-e + d) / (2.0 * c)).min((e + d) / (2.0 * c));
    // Only impacts inside this step count
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(t)
}

/// 1-D collision law with coefficient of restitution `restitution`.
/// Returns the post-impact velocity of the first body.
#[inline]
pub fn partially_elastic(v1: f64, v2: f64, m1: f64, m2: f64, restitution: f64) -> f64 {
    (restitution * m2 * (v2 - v1) + m1 * v1 + m2 * v2) / (m1 + m2)
}

/// Circle-circle handler: advance to contact, then exchange the normal components
/// of velocity using the product of the two dampings as restitution. Tangential
/// components are unchanged.
pub fn collide_circles(a: &mut Body, b: &mut Body) -> bool {
    let (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) = (*a.shape(), *b.shape()) else {
        return false;
    };
    let Some(t) = time_of_impact(&a.x, &a.v, ra, &b.x, &b.v, rb) else {
        return false;
    };

    a.x += t * a.v;
    b.x += t * b.v;

    let between = b.x - a.x;
    let d = between.norm();
    if d == 0.0 {
        return false;
    }
    // rotate into the (normal, tangent) frame
    let normal = between / d;
    let tangent = NVec2::new(-normal.y, normal.x);

    let (an, at) = (a.v.dot(&normal), a.v.dot(&tangent));
    let (bn, bt) = (b.v.dot(&normal), b.v.dot(&tangent));

    let restitution = a.damping * b.damping;
    let (ma, mb) = (a.mass(), b.mass());
    let an_new = partially_elastic(an, bn, ma, mb, restitution);
    let bn_new = partially_elastic(bn, an, mb, ma, restitution);

    // and back to world axes
    a.v = normal * an_new + tangent * at;
    b.v = normal * bn_new + tangent * bt;

    trace!(t, restitution, "circle impact resolved");
    true
}

/// Mutable references to two distinct bodies, `i < j`
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Check every unordered pair once, in body order. Returns the number of impacts.
pub fn resolve_collisions(bodies: &mut [Body]) -> usize {
    let n = bodies.len();
    let mut impacts = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            let Some(handler) = handler_for(bodies[i].shape().kind(), bodies[j].shape().kind()) else {
                continue;
            };
            let (a, b) = pair_mut(bodies, i, j);
            if handler(a, b) {
                impacts += 1;
            }
        }
    }
    impacts
}

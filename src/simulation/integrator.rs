//! Explicit Euler position update with per-shape wall containment
//!
//! For every body: friction (if enabled), then `x += v * delta`, then the body is
//! clamped into the world bounds. Circles reflect with their `damping`, rectangles
//! reflect fully elastically.

use super::forces::apply_friction;
use super::params::{Bounds, Parameters};
use super::states::{Body, Shape};

/// Advance every body by `delta`
pub fn euler_integrator(bodies: &mut [Body], params: &Parameters, bounds: &Bounds, delta: f64) {
    for b in bodies.iter_mut() {
        // Drag: slow the body before it moves
        if params.background_friction {
            apply_friction(b, params.friction_force, delta);
        }
        // Drift: x(t + delta) = x(t) + v * delta, using the updated v
        b.x += b.v * delta;
        // Walls: clamp and reflect whatever left the world
        contain(b, bounds);
    }
}

/// Clamp `body` into `bounds`, reflecting the velocity on each axis it crossed
pub fn contain(body: &mut Body, bounds: &Bounds) {
    let shape = *body.shape();
    match shape {
        // Circles are placed by their center, so they stop `radius` from each wall
        Shape::Circle { radius } => {
            let damping = body.damping;
            reflect_axis(&mut body.x.x, &mut body.v.x, radius, bounds.width - radius, damping);
            reflect_axis(&mut body.x.y, &mut body.v.y, radius, bounds.height - radius, damping);
        }
        // Rectangles are placed by their top-left corner and bounce without loss
        Shape::Rectangle { width, height } => {
            reflect_axis(&mut body.x.x, &mut body.v.x, 0.0, bounds.width - width, 1.0);
            reflect_axis(&mut body.x.y, &mut body.v.y, 0.0, bounds.height - height, 1.0);
        }
    }
}

/// Low wall is checked first, then the high wall, each independently
#[inline]
fn reflect_axis(x: &mut f64, v: &mut f64, lo: f64, hi: f64, damping: f64) {
    if *x < lo {
        *x = lo;
        *v = -*v * damping;
    }
    if *x > hi {
        *x = hi;
        *v = -*v * damping;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::NVec2;

    fn bounds() -> Bounds {
        Bounds::new(100.0, 100.0)
    }

    #[test]
    fn free_flight_is_linear() {
        let mut bodies = vec![Body::circle(NVec2::new(10.0, 10.0), NVec2::new(2.0, -1.0), 1.0).unwrap()];
        euler_integrator(&mut bodies, &Parameters::default(), &bounds(), 3.0);
        assert_eq!(bodies[0].x, NVec2::new(16.0, 7.0));
        assert_eq!(bodies[0].v, NVec2::new(2.0, -1.0));
    }

    #[test]
    fn circle_reflects_with_damping() {
        let mut b = Body::circle(NVec2::new(5.0, 50.0), NVec2::new(-10.0, 0.0), 2.0)
            .unwrap()
            .with_damping(0.5);
        euler_integrator(std::slice::from_mut(&mut b), &Parameters::default(), &bounds(), 1.0);
        assert_eq!(b.x.x, 2.0);
        assert_eq!(b.v.x, 5.0);

        b.x = NVec2::new(50.0, 99.0);
        b.v = NVec2::new(0.0, 4.0);
        euler_integrator(std::slice::from_mut(&mut b), &Parameters::default(), &bounds(), 1.0);
        assert_eq!(b.x.y, 98.0);
        assert_eq!(b.v.y, -2.0);
    }

    #[test]
    fn rectangle_reflects_elastically_from_its_corner() {
        let mut b = Body::rectangle(NVec2::new(85.0, 1.0), NVec2::new(10.0, -3.0), 10.0, 20.0, 0.001)
            .unwrap()
            .with_damping(0.5);
        euler_integrator(std::slice::from_mut(&mut b), &Parameters::default(), &bounds(), 1.0);
        assert_eq!(b.x, NVec2::new(90.0, 0.0));
        // damping ignored for rectangles
        assert_eq!(b.v, NVec2::new(-10.0, 3.0));
    }

    #[test]
    fn friction_runs_before_the_move() {
        let params = Parameters {
            background_friction: true,
            friction_force: 1.0,
            ..Parameters::default()
        };
        let mut b = Body::circle(NVec2::new(50.0, 50.0), NVec2::new(1e-3, 0.0), 1.0).unwrap();
        euler_integrator(std::slice::from_mut(&mut b), &params, &bounds(), 1.0);
        // friction clamps the tiny velocity to zero, so nothing moves
        assert_eq!(b.v, NVec2::zeros());
        assert_eq!(b.x, NVec2::new(50.0, 50.0));
    }

    #[test]
    fn contain_without_motion_pulls_body_inside() {
        let mut b = Body::circle(NVec2::new(150.0, 50.0), NVec2::new(1.0, 0.0), 5.0).unwrap();
        contain(&mut b, &bounds());
        assert_eq!(b.x.x, 95.0);
        assert_eq!(b.v.x, -1.0);
    }
}

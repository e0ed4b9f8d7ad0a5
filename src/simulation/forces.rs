//! Velocity contributors for the body simulation
//!
//! Defines the [`Force`] trait and the [`ForceSet`] that runs every enabled term
//! over the body list, plus the per-body friction and per-edge spring laws used by
//! the integrator and the spring maintainer. Every term changes velocities only.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec2};

/// Collection of velocity terms (radial gravity, vertical gravity, ...)
/// Terms run in insertion order and each one mutates velocities in place
pub struct ForceSet {
    terms: Vec<Box<dyn Force + Send + Sync>>,
}

impl Default for ForceSet {
    /// Radial gravity followed by vertical gravity
    fn default() -> Self {
        Self::new().with(RadialGravity).with(VerticalGravity)
    }
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Force + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Run every term whose toggle is on
    pub fn apply(&self, params: &Parameters, bodies: &mut [Body], delta: f64) {
        for term in &self.terms {
            if term.enabled(params) {
                term.apply(params, bodies, delta);
            }
        }
    }
}

/// A velocity source switched by [`Parameters`]
pub trait Force {
    fn enabled(&self, params: &Parameters) -> bool;
    fn apply(&self, params: &Parameters, bodies: &mut [Body], delta: f64);
}

/// Pairwise attraction G * m_a * m_b / d^2 evaluated for every ordered pair.
/// Coincident bodies exert nothing on each other.
pub struct RadialGravity;

impl RadialGravity {
    /// Velocity change of body `i` from every other body
    fn velocity_delta(g: f64, bodies: &[Body], i: usize, delta: f64) -> NVec2 {
        let bi = &bodies[i];
        let mi = bi.mass(); // mass of body i
        let mut dv = NVec2::zeros();

        // Every other body j pulls on i; j's own update is computed separately
        for (j, bj) in bodies.iter().enumerate() {
            if i == j {
                continue;
            }
            // r is the displacement vector from i to j
            // i feels a pull along +r
            let r = bj.x - bi.x;
            let d = r.norm();
            if d == 0.0 { // coincident centers, no direction
                continue;
            }
            // Magnitude G * mi * mj / d^2, no softening
            let force = g * mi * bj.mass() / (d * d);
            // Unit direction times acceleration (F / mi), integrated over delta
            dv += r / d * (force / mi * delta);
        }
        dv
    }
}

impl Force for RadialGravity {
    fn enabled(&self, params: &Parameters) -> bool {
        params.radial_gravity
    }

    fn apply(&self, params: &Parameters, bodies: &mut [Body], delta: f64) {
        let n = bodies.len();
        if n < 2 {
            return;
        }
        let g = params.radial_gravity_force;

        // Deltas depend on positions only, so gather first and apply after
        #[cfg(feature = "parallel")]
        let deltas: Vec<NVec2> = {
            let view: &[Body] = bodies;
            (0..n)
                .into_par_iter()
                .map(|i| Self::velocity_delta(g, view, i, delta))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let deltas: Vec<NVec2> = (0..n)
            .map(|i| Self::velocity_delta(g, bodies, i, delta))
            .collect();

        // Apply in body order once every delta is known
        for (b, dv) in bodies.iter_mut().zip(deltas) {
            b.v += dv;
        }
    }
}

/// Uniform downward pull (+y is down in world coordinates)
pub struct VerticalGravity;

impl Force for VerticalGravity {
    fn enabled(&self, params: &Parameters) -> bool {
        params.vertical_gravity
    }

    fn apply(&self, params: &Parameters, bodies: &mut [Body], delta: f64) {
        for b in bodies.iter_mut() {
            b.v.y += params.vertical_gravity_force * delta;
        }
    }
}

/// Constant-magnitude drag opposing the body's motion.
///
/// A component that would change sign is set to exactly zero instead, so slow
/// bodies come to rest rather than oscillate.
pub fn apply_friction(body: &mut Body, friction_force: f64, delta: f64) {
    let speed = body.v.norm();
    if speed == 0.0 {
        return;
    }
    let old = body.v;
    let force = -old / speed * friction_force;
    body.v += force / body.mass() * delta;

    if body.v.x * old.x < 0.0 {
        body.v.x = 0.0;
    }
    if body.v.y * old.y < 0.0 {
        body.v.y = 0.0;
    }
}

/// Velocity change of `owner` from its spring to `target`.
///
/// Stretch force `(d - rest_length) * spring_force` acts along owner->target,
/// reduced by the damping magnitude `|v_rel| * spring_damping`; the damping vector
/// `v_rel * spring_damping` is added on top. Returns `None` when the two centers
/// coincide (no direction).
pub fn spring_velocity_delta(owner: &Body, target: &Body, params: &Parameters, delta: f64) -> Option<NVec2> {
    // r is the displacement vector from owner to target
    let r = target.x - owner.x;
    let d = r.norm();
    if d == 0.0 {
        return None;
    }
    // Positive when stretched (pulls owner toward target), negative when compressed
    let offset = d - params.rest_length;

    // Relative velocity of the target as seen from the owner
    let relative_v = target.v - owner.v;
    let relative_speed = relative_v.norm();
    // Damping magnitude, and the same magnitude along relative_v
    let damping_force = relative_speed * params.spring_damping;
    let damping_vec = if relative_speed != 0.0 {
        relative_v / relative_speed * damping_force
    } else {
        NVec2::zeros()
    };

    // Scalar along r: stretch term minus damping magnitude
    let force = offset * params.spring_force - damping_force;
    // Direction of r plus the damping vector
    let f = r / d * force + damping_vec;
    // a = F / m, integrated over delta
    Some(f / owner.mass() * delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(x: f64, y: f64, r: f64) -> Body {
        Body::circle(NVec2::new(x, y), NVec2::zeros(), r).unwrap()
    }

    fn gravity_params() -> Parameters {
        Parameters {
            radial_gravity: true,
            vertical_gravity: true,
            paused: false,
            ..Parameters::default()
        }
    }

    #[test]
    fn radial_gravity_conserves_momentum() {
        let mut bodies = vec![circle(0.0, 0.0, 1.0), circle(10.0, 0.0, 2.0)];
        let p = Parameters { vertical_gravity: false, ..gravity_params() };
        ForceSet::default().apply(&p, &mut bodies, 1.0);
        let net = bodies[0].momentum() + bodies[1].momentum();
        assert!(net.norm() < 1e-12, "net momentum {net:?}");
        assert!(bodies[0].v.x > 0.0 && bodies[1].v.x < 0.0);
    }

    #[test]
    fn radial_gravity_matches_inverse_square() {
        let mut bodies = vec![circle(0.0, 0.0, 1.0), circle(10.0, 0.0, 1.0)];
        let p = Parameters { vertical_gravity: false, ..gravity_params() };
        ForceSet::new().with(RadialGravity).apply(&p, &mut bodies, 0.5);
        // dv = G * m_other / d^2 * delta
        let expected = 0.1 * std::f64::consts::PI / 100.0 * 0.5;
        assert!((bodies[0].v.x - expected).abs() < 1e-12);
        assert_eq!(bodies[0].v.y, 0.0);
    }

    #[test]
    fn coincident_bodies_feel_no_gravity() {
        let mut bodies = vec![circle(5.0, 5.0, 1.0), circle(5.0, 5.0, 1.0)];
        let p = Parameters { vertical_gravity: false, ..gravity_params() };
        ForceSet::default().apply(&p, &mut bodies, 1.0);
        assert_eq!(bodies[0].v, NVec2::zeros());
        assert_eq!(bodies[1].v, NVec2::zeros());
    }

    #[test]
    fn vertical_gravity_is_mass_independent() {
        let mut bodies = vec![circle(0.0, 0.0, 1.0), circle(100.0, 0.0, 9.0)];
        let p = Parameters { radial_gravity: false, ..gravity_params() };
        ForceSet::default().apply(&p, &mut bodies, 2.0);
        for b in &bodies {
            assert!((b.v.y - 0.2).abs() < 1e-12);
            assert_eq!(b.v.x, 0.0);
        }
    }

    #[test]
    fn disabled_terms_do_nothing() {
        let mut bodies = vec![circle(0.0, 0.0, 1.0), circle(10.0, 0.0, 1.0)];
        ForceSet::default().apply(&Parameters::default(), &mut bodies, 1.0);
        assert_eq!(bodies[0].v, NVec2::zeros());
    }

    #[test]
    fn friction_slows_and_clamps_at_zero() {
        let mut b = circle(0.0, 0.0, 1.0);
        let m = b.mass();
        b.v = NVec2::new(3.0, 0.0);
        apply_friction(&mut b, 1.0, 1.0);
        assert!((b.v.x - (3.0 - 1.0 / m)).abs() < 1e-12);

        // overshoot: would reverse, clamped instead
        b.v = NVec2::new(1e-3, -1e-3);
        apply_friction(&mut b, 100.0, 1.0);
        assert_eq!(b.v, NVec2::zeros());

        // at rest stays at rest
        apply_friction(&mut b, 100.0, 1.0);
        assert_eq!(b.v, NVec2::zeros());
    }

    #[test]
    fn spring_pulls_when_stretched_and_pushes_when_compressed() {
        let p = Parameters::default(); // rest length 20
        let owner = circle(0.0, 0.0, 1.0);
        let far = circle(24.0, 0.0, 1.0);
        let near = circle(10.0, 0.0, 1.0);
        assert!(spring_velocity_delta(&owner, &far, &p, 1.0).unwrap().x > 0.0);
        assert!(spring_velocity_delta(&owner, &near, &p, 1.0).unwrap().x < 0.0);
        let at_rest = circle(20.0, 0.0, 1.0);
        assert_eq!(spring_velocity_delta(&owner, &at_rest, &p, 1.0).unwrap(), NVec2::zeros());
    }

    #[test]
    fn spring_damping_opposes_relative_motion() {
        let p = Parameters { spring_force: 0.0, ..Parameters::default() };
        let owner = circle(0.0, 0.0, 1.0);
        let mut target = circle(20.0, 0.0, 1.0);
        target.v = NVec2::new(2.0, 0.0);
        // separating along the axis: the damping magnitude and vector cancel on x
        let dv = spring_velocity_delta(&owner, &target, &p, 1.0).unwrap();
        assert!(dv.norm() < 1e-12);

        // sideways relative motion drags the owner along with the target
        target.v = NVec2::new(0.0, 2.0);
        let dv = spring_velocity_delta(&owner, &target, &p, 1.0).unwrap();
        assert!(dv.y > 0.0);
        assert!(dv.x < 0.0);
    }

    #[test]
    fn spring_between_coincident_bodies_is_skipped() {
        let p = Parameters::default();
        let a = circle(3.0, 3.0, 1.0);
        let b = circle(3.0, 3.0, 1.0);
        assert!(spring_velocity_delta(&a, &b, &p, 1.0).is_none());
    }
}

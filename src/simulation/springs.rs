//! Dynamic spring network
//!
//! Edges are directed: the owner keeps the target's index in its `springs` list and
//! is the only body the spring accelerates. The target tracks how many edges point
//! at it in `incoming_springs`, which exists only to enforce the degree cap and must
//! always equal the number of owners listing it.
//!
//! Per step (springs enabled):
//! 1. [`connect_within_reach`] adds edges between bodies closer than
//!    `max_spring_distance`, in body order, respecting the cap on both ends
//! 2. [`apply_springs`] walks each owner's edges back to front, pruning edges
//!    stretched beyond `max_spring_distance` and applying the spring law to the rest
//!
//! Because creation runs in body order, the lowest-index owners claim capacity first
//! once caps start to bind.

use tracing::debug;

use crate::simulation::forces::spring_velocity_delta;
use crate::simulation::params::Parameters;
use crate::simulation::states::Body;
use crate::simulation::utils::distance;

/// Counts of edges touched during one maintenance pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpringChurn {
    pub created: usize,
    pub pruned: usize,
}

#[inline]
pub fn has_edge(bodies: &[Body], owner: usize, target: usize) -> bool {
    bodies[owner].springs.contains(&target)
}

fn connect(bodies: &mut [Body], owner: usize, target: usize) {
    bodies[owner].springs.push(target);
    bodies[target].incoming_springs += 1;
}

/// Remove the `slot`-th outgoing edge of `owner`, keeping the order of the rest
fn disconnect(bodies: &mut [Body], owner: usize, slot: usize) {
    let target = bodies[owner].springs.remove(slot);
    debug_assert!(bodies[target].incoming_springs > 0, "incoming counter underflow on body {target}");
    bodies[target].incoming_springs = bodies[target].incoming_springs.saturating_sub(1);
}

/// Create edges between every ordered pair closer than `max_spring_distance`,
/// skipping owners at the outgoing cap and targets at the incoming cap.
/// Returns the number of edges created.
pub fn connect_within_reach(bodies: &mut [Body], params: &Parameters) -> usize {
    let cap = params.max_connections_per_node;
    let reach = params.max_spring_distance;
    let n = bodies.len();
    let mut created = 0;

    for owner in 0..n {
        if bodies[owner].springs.len() >= cap {
            continue;
        }
        for target in 0..n {
            if owner == target {
                continue;
            }
            if bodies[owner].springs.len() >= cap {
                break;
            }
            if bodies[target].incoming_springs >= cap {
                continue;
            }
            if has_edge(bodies, owner, target) {
                continue;
            }
            if distance(&bodies[owner].x, &bodies[target].x) < reach {
                connect(bodies, owner, target);
                created += 1;
            }
        }
    }
    created
}

/// Apply the spring law for every edge and drop edges stretched past
/// `max_spring_distance`. A dropped edge exerts no force in the pass that drops it;
/// an edge between coincident bodies is skipped and kept.
/// Returns the number of edges pruned.
pub fn apply_springs(bodies: &mut [Body], params: &Parameters, delta: f64) -> usize {
    let mut pruned = 0;

    for owner in 0..bodies.len() {
        // back to front so removal keeps the remaining slots valid
        let mut slot = bodies[owner].springs.len();
        while slot > 0 {
            slot -= 1;
            let target = bodies[owner].springs[slot];
            let d = distance(&bodies[owner].x, &bodies[target].x);
            // Coincident: no direction to push along, keep the edge
            if d == 0.0 {
                continue;
            }
            // Overstretched: break it, no force this pass
            if d > params.max_spring_distance {
                disconnect(bodies, owner, slot);
                pruned += 1;
                continue;
            }
            if let Some(dv) = spring_velocity_delta(&bodies[owner], &bodies[target], params, delta) {
                bodies[owner].v += dv;
            }
        }
    }
    pruned
}

/// Creation pass followed by the force/prune pass
pub fn update(bodies: &mut [Body], params: &Parameters, delta: f64) -> SpringChurn {
    let created = connect_within_reach(bodies, params);
    let pruned = apply_springs(bodies, params, delta);
    if created > 0 || pruned > 0 {
        debug!(created, pruned, "spring network changed");
    }
    SpringChurn { created, pruned }
}

/// One-off scene setup pass: connect every ordered pair at most `threshold` apart.
///
/// No degree cap applies here; the per-step cap only limits edges formed later.
/// Existing edges are not duplicated and incoming counters stay in sync.
pub fn seed_initial_connections(bodies: &mut [Body], threshold: f64) -> usize {
    let n = bodies.len();
    let mut created = 0;
    for owner in 0..n {
        for target in 0..n {
            if owner == target || has_edge(bodies, owner, target) {
                continue;
            }
            if distance(&bodies[owner].x, &bodies[target].x) <= threshold {
                connect(bodies, owner, target);
                created += 1;
            }
        }
    }
    debug!(threshold, created, "seeded initial spring connections");
    created
}

/// Total number of directed edges
pub fn edge_count(bodies: &[Body]) -> usize {
    bodies.iter().map(|b| b.springs.len()).sum()
}

/// True when every body's incoming counter matches the edges that target it
pub fn incoming_counts_consistent(bodies: &[Body]) -> bool {
    let mut actual = vec![0usize; bodies.len()];
    for b in bodies {
        for &t in &b.springs {
            actual[t] += 1;
        }
    }
    bodies.iter().zip(actual).all(|(b, a)| b.incoming_springs == a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::NVec2;

    fn at(x: f64, y: f64) -> Body {
        Body::circle(NVec2::new(x, y), NVec2::zeros(), 1.0).unwrap()
    }

    fn spring_params(cap: usize) -> Parameters {
        Parameters {
            springs: true,
            max_connections_per_node: cap,
            ..Parameters::default()
        }
    }

    #[test]
    fn nearby_pairs_connect_both_ways() {
        let mut bodies = vec![at(0.0, 0.0), at(10.0, 0.0), at(100.0, 0.0)];
        let created = connect_within_reach(&mut bodies, &spring_params(10));
        assert_eq!(created, 2);
        assert_eq!(bodies[0].springs(), &[1]);
        assert_eq!(bodies[1].springs(), &[0]);
        assert!(bodies[2].springs().is_empty());
        assert!(incoming_counts_consistent(&bodies));
    }

    #[test]
    fn creation_never_duplicates() {
        let mut bodies = vec![at(0.0, 0.0), at(10.0, 0.0)];
        let p = spring_params(10);
        connect_within_reach(&mut bodies, &p);
        assert_eq!(connect_within_reach(&mut bodies, &p), 0);
        assert_eq!(edge_count(&bodies), 2);
    }

    #[test]
    fn caps_bind_in_body_order() {
        // four bodies all within reach of each other, cap of one
        let mut bodies = vec![at(0.0, 0.0), at(1.0, 0.0), at(2.0, 0.0), at(3.0, 0.0)];
        connect_within_reach(&mut bodies, &spring_params(1));
        assert_eq!(bodies[0].springs(), &[1]);
        assert_eq!(bodies[1].springs(), &[0]);
        assert_eq!(bodies[2].springs(), &[3]);
        assert_eq!(bodies[3].springs(), &[2]);
        for b in &bodies {
            assert!(b.incoming_springs() <= 1);
        }
    }

    #[test]
    fn overstretched_edge_is_pruned_without_force() {
        let mut bodies = vec![at(0.0, 0.0), at(10.0, 0.0)];
        let p = spring_params(10);
        connect_within_reach(&mut bodies, &p);
        bodies[1].x.x = 30.0;

        let pruned = apply_springs(&mut bodies, &p, 1.0);
        assert_eq!(pruned, 2);
        assert!(bodies[0].springs().is_empty());
        assert_eq!(bodies[0].incoming_springs(), 0);
        assert_eq!(bodies[1].incoming_springs(), 0);
        assert_eq!(bodies[0].v, NVec2::zeros());
    }

    #[test]
    fn pruning_keeps_other_edges_in_order() {
        let mut bodies = vec![at(0.0, 0.0), at(5.0, 0.0), at(10.0, 0.0), at(15.0, 0.0)];
        let p = spring_params(10);
        seed_initial_connections(&mut bodies, 20.0);
        assert_eq!(bodies[0].springs(), &[1, 2, 3]);
        bodies[2].x.y = 100.0;
        apply_springs(&mut bodies, &p, 0.0);
        assert_eq!(bodies[0].springs(), &[1, 3]);
        assert!(incoming_counts_consistent(&bodies));
    }

    #[test]
    fn coincident_edge_is_kept_and_skipped() {
        let mut bodies = vec![at(4.0, 4.0), at(4.0, 4.0)];
        let p = spring_params(10);
        connect_within_reach(&mut bodies, &p);
        assert_eq!(apply_springs(&mut bodies, &p, 1.0), 0);
        assert_eq!(edge_count(&bodies), 2);
        assert_eq!(bodies[0].v, NVec2::zeros());
    }

    #[test]
    fn seeding_ignores_cap_and_keeps_counters() {
        let mut bodies: Vec<Body> = (0..5).map(|i| at(i as f64, 0.0)).collect();
        let created = seed_initial_connections(&mut bodies, 10.0);
        assert_eq!(created, 20);
        // a cap of 1 would have allowed far fewer; the seed pass does not look at it
        assert!(bodies.iter().all(|b| b.springs().len() == 4));
        assert!(incoming_counts_consistent(&bodies));
        assert_eq!(seed_initial_connections(&mut bodies, 10.0), 0);
    }
}

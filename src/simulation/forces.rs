use crate::quadtree::{GravityAggregate, LeafRef, LeafSurvey, QuadTree};
use crate::simulation::scheduler::SharedParticles;

/// Evaluates near- and far-field forces for one worker's chunk of leaves.
///
/// Each leaf's member set is disjoint from every other leaf's, so this
/// only ever writes particles belonging to `leaves` and only reads shared
/// tree state.
pub(crate) fn evaluate_leaves(
    tree: &QuadTree,
    survey: &LeafSurvey,
    leaves: &[LeafRef],
    particles: &SharedParticles<'_>,
    big_g: f64,
    softening: f64,
) {
    let mut members: Vec<usize> = Vec::with_capacity(tree.node_capacity() * 2);
    for leaf in leaves {
        members.clear();
        members.extend(tree.leaf_members(leaf.node));

        near_field(&members, particles, big_g, softening);

        if let Some(aggregate) = tree.aggregate(leaf.node) {
            far_field(&members, aggregate, survey, particles, big_g, softening);
        }
    }
}

/// Exact pairwise interaction inside one leaf: overlapping pairs exchange
/// a 1D elastic impulse along the contact normal, everything else
/// accumulates Newtonian attraction on both members. O(k²) in the leaf's
/// occupancy.
fn near_field(members: &[usize], particles: &SharedParticles<'_>, big_g: f64, softening: f64) {
    for a in 0..members.len() {
        for b in (a + 1)..members.len() {
            // Distinct list positions hold distinct particle indices, so
            // these two references never alias.
            let (first, second) =
                unsafe { (particles.get_mut(members[a]), particles.get_mut(members[b])) };

            let dx = second.position.0 - first.position.0;
            let dy = second.position.1 - first.position.1;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq <= softening {
                // Coincident pair: no direction to push along.
                continue;
            }

            let contact = first.radius + second.radius;
            if dist_sq <= contact * contact {
                // Elastic collision along the contact normal; the single
                // square root of the frame.
                let inv_dist = 1.0 / dist_sq.sqrt();
                let nx = dx * inv_dist;
                let ny = dy * inv_dist;

                let a1 = first.velocity.0 * nx + first.velocity.1 * ny;
                let a2 = second.velocity.0 * nx + second.velocity.1 * ny;
                let impulse =
                    2.0 * first.mass * second.mass * (a1 - a2) / (first.mass + second.mass);

                first.velocity.0 -= impulse / first.mass * nx;
                first.velocity.1 -= impulse / first.mass * ny;
                second.velocity.0 += impulse / second.mass * nx;
                second.velocity.1 += impulse / second.mass * ny;
            } else {
                let scale = big_g / (dist_sq + softening);
                first.acceleration.0 += second.mass * scale * dx;
                first.acceleration.1 += second.mass * scale * dy;
                second.acceleration.0 -= first.mass * scale * dx;
                second.acceleration.1 -= first.mass * scale * dy;
            }
        }
    }
}

/// Single-level approximation of everything outside the leaf: subtract the
/// leaf's aggregate from the global one and treat the remainder as a point
/// mass. There is no recursive opening-angle traversal; the whole exterior
/// collapses into one attractor.
fn far_field(
    members: &[usize],
    leaf: &GravityAggregate,
    survey: &LeafSurvey,
    particles: &SharedParticles<'_>,
    big_g: f64,
    softening: f64,
) {
    let non_local_mass = survey.total_mass - leaf.total_mass;
    if non_local_mass <= 0.0 {
        return;
    }

    // The aggregate stores mass-weighted sums, so the rest-of-universe
    // centroid falls out of a plain subtraction.
    let rest_x = (survey.total_mass * survey.global_com.0 - leaf.com_x) / non_local_mass;
    let rest_y = (survey.total_mass * survey.global_com.1 - leaf.com_y) / non_local_mass;

    for &index in members {
        let particle = unsafe { particles.get_mut(index) };
        let dx = rest_x - particle.position.0;
        let dy = rest_y - particle.position.1;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq <= softening {
            continue;
        }
        let scale = big_g * non_local_mass / (dist_sq + softening);
        particle.acceleration.0 += scale * dx;
        particle.acceleration.1 += scale * dy;
    }
}

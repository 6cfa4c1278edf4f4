use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assert_float_eq;
use crate::simulation::Simulation;
use crate::utils::SimConfig;

/// A small world with unit gravity so expected values stay hand-checkable.
fn test_config(num_threads: usize) -> SimConfig {
    SimConfig {
        width: 1000.0,
        height: 1000.0,
        max_depth: 4,
        node_capacity: 4,
        num_threads,
        time_step: 0.002,
        big_g: 1.0,
        softening: 1e-12,
        particle_mass: 5.0,
    }
}

#[test]
fn test_two_body_step_matches_hand_integration() {
    let mut sim = Simulation::new(test_config(2)).unwrap();
    // Unit separation, light masses: contact distance (radius = mass) is
    // well below d, so this is pure gravity.
    sim.spawn_particle((100.0, 100.0), (0.0, 0.0), 0.3).unwrap();
    sim.spawn_particle((101.0, 100.0), (0.0, 0.0), 0.2).unwrap();

    sim.step();

    // At d = 1 the acceleration magnitude is G * m_other / d^2, so one
    // step adds exactly that times dt of velocity.
    let (_, velocity, _) = sim.particle_snapshot(0).unwrap();
    assert_float_eq(velocity.0, 0.2 * 0.002, 1e-9, None);
    assert_float_eq(velocity.1, 0.0, 1e-12, None);

    let (_, velocity, _) = sim.particle_snapshot(1).unwrap();
    assert_float_eq(velocity.0, -0.3 * 0.002, 1e-9, None);
}

#[test]
fn test_momentum_is_conserved_within_a_shared_leaf() {
    let mut sim = Simulation::new(test_config(3)).unwrap();
    // Four particles never exceed the node capacity, so every interaction
    // stays exact and pairwise for the whole run.
    sim.spawn_particle((480.0, 500.0), (2.0, 0.0), 5.0).unwrap();
    sim.spawn_particle((520.0, 500.0), (-2.0, 0.0), 5.0).unwrap();
    sim.spawn_particle((500.0, 480.0), (0.0, 1.0), 3.0).unwrap();
    sim.spawn_particle((500.0, 525.0), (0.0, -1.0), 7.0).unwrap();

    let momentum = |sim: &Simulation| {
        (0..sim.live_particle_count()).fold((0.0, 0.0), |acc, i| {
            let (_, v, m) = sim.particle_snapshot(i).unwrap();
            (acc.0 + m * v.0, acc.1 + m * v.1)
        })
    };
    let before = momentum(&sim);

    sim.simulate(50);

    assert_eq!(sim.live_particle_count(), 4);
    let after = momentum(&sim);
    assert_float_eq(before.0, after.0, 1e-9, Some("x momentum drifted"));
    assert_float_eq(before.1, after.1, 1e-9, Some("y momentum drifted"));
}

#[test]
fn test_single_particle_stays_put() {
    let mut sim = Simulation::new(test_config(4)).unwrap();
    sim.spawn_particle((500.0, 500.0), (0.0, 0.0), 5.0).unwrap();

    sim.simulate(100);

    let (position, velocity, _) = sim.particle_snapshot(0).unwrap();
    assert_eq!(position, (500.0, 500.0));
    assert_eq!(velocity, (0.0, 0.0));
}

#[test]
fn test_thread_count_does_not_change_results() {
    let mut single = Simulation::new(test_config(1)).unwrap();
    let mut pooled = Simulation::new(test_config(4)).unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    single.spawn_burst((500.0, 500.0), 30, 50.0, &mut rng).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    pooled.spawn_burst((500.0, 500.0), 30, 50.0, &mut rng).unwrap();

    single.simulate(20);
    pooled.simulate(20);

    assert_eq!(single.live_particle_count(), pooled.live_particle_count());
    for i in 0..single.live_particle_count() {
        let (p1, v1, _) = single.particle_snapshot(i).unwrap();
        let (p2, v2, _) = pooled.particle_snapshot(i).unwrap();
        // Leaf-disjoint writes and a fixed per-pair order make the frame
        // bit-identical regardless of how leaves are chunked.
        assert_eq!(p1, p2, "position diverged for particle {}", i);
        assert_eq!(v1, v2, "velocity diverged for particle {}", i);
    }
}

#[test]
fn test_external_force_applies_once_then_clears() {
    let mut sim = Simulation::new(test_config(2)).unwrap();
    sim.spawn_particle((500.0, 500.0), (0.0, 0.0), 5.0).unwrap();

    sim.set_external_force(0, (10.0, 0.0));
    sim.step();

    // a = f / m = 2, so one step adds 2 * dt of velocity.
    let (_, velocity, _) = sim.particle_snapshot(0).unwrap();
    assert_float_eq(velocity.0, 0.004, 1e-12, None);

    // The queue drained: a second step adds nothing.
    sim.step();
    let (_, velocity, _) = sim.particle_snapshot(0).unwrap();
    assert_float_eq(velocity.0, 0.004, 1e-12, None);
}

#[test]
fn test_external_force_with_stale_index_is_ignored() {
    let mut sim = Simulation::new(test_config(2)).unwrap();
    sim.set_external_force(5, (100.0, 100.0));
    sim.step();
    assert_eq!(sim.live_particle_count(), 0);
}

#[test]
fn test_step_evicts_side_and_bottom_leavers_but_keeps_overhead() {
    let mut sim = Simulation::new(test_config(2)).unwrap();
    sim.spawn_particle((500.0, 500.0), (0.0, 0.0), 5.0).unwrap();
    sim.spawn_particle((-5.0, 500.0), (0.0, 0.0), 5.0).unwrap();
    sim.spawn_particle((500.0, 1200.0), (0.0, 0.0), 5.0).unwrap();
    // Above the top edge: outside the tree for now, but not evicted.
    sim.spawn_particle((500.0, -50.0), (0.0, 0.0), 5.0).unwrap();

    sim.step();

    assert_eq!(sim.live_particle_count(), 2);
}

#[test]
fn test_overhead_particle_is_kept_but_absent_from_the_tree() {
    let mut sim = Simulation::new(test_config(2)).unwrap();
    sim.spawn_particle((500.0, 500.0), (0.0, 0.0), 5.0).unwrap();
    sim.spawn_particle((500.0, -50.0), (0.0, 0.0), 5.0).unwrap();

    sim.step();

    // The overhead particle survives eviction but contributes nothing to
    // the frame's aggregates or forces.
    assert_eq!(sim.live_particle_count(), 2);
    let (_, mass) = sim.global_aggregate();
    assert_eq!(mass, 5.0);

    let (_, velocity, _) = sim.particle_snapshot(0).unwrap();
    assert_eq!(velocity, (0.0, 0.0));
}

#[test]
fn test_queries_reflect_the_latest_survey() {
    let mut sim = Simulation::new(test_config(2)).unwrap();
    sim.spawn_particle((100.0, 100.0), (0.0, 0.0), 2.0).unwrap();
    sim.spawn_particle((900.0, 900.0), (0.0, 0.0), 6.0).unwrap();

    sim.step();

    // Two light particles fit a single root leaf.
    assert_eq!(sim.leaf_list().len(), 1);
    assert_eq!(sim.leaf_occupancy(), 1);

    let bounds = sim.leaf_bounds(0).unwrap();
    assert_eq!((bounds.w, bounds.h), (1000.0, 1000.0));

    let ((com_x, com_y), mass) = sim.global_aggregate();
    assert_eq!(mass, 8.0);
    // Both particles moved a little before the next survey, so only a
    // coarse check on the weighted centroid.
    assert_float_eq(com_x, (100.0 * 2.0 + 900.0 * 6.0) / 8.0, 1.0, None);
    assert_float_eq(com_y, (100.0 * 2.0 + 900.0 * 6.0) / 8.0, 1.0, None);

    let (centroid, leaf_mass) = sim.leaf_aggregate(0).unwrap();
    assert_eq!(leaf_mass, mass);
    assert_float_eq(centroid.0, com_x, 1e-12, None);
    assert_float_eq(centroid.1, com_y, 1e-12, None);

    assert!(sim.leaf_bounds(1).is_none());
    assert!(sim.leaf_aggregate(1).is_none());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SimConfig {
        time_step: 0.0,
        ..SimConfig::default()
    };
    assert!(Simulation::new(config).is_err());
}

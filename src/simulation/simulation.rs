//! The per-frame driver tying the store, the tree and the force engine
//! together.
//!
//! Every call to [`Simulation::step`] runs the same five stages:
//! out-of-bounds eviction, tree reset + re-insertion, leaf survey,
//! parallel force evaluation over leaf chunks, and a parallel integration
//! pass over particle slices. Tree construction is strictly
//! single-threaded; the two parallel phases are separated by a join
//! barrier because phase two reads the accelerations phase one writes.

use log::{debug, info, trace};
use rayon::prelude::*;

use crate::particles::ParticleStore;
use crate::quadtree::{LeafRef, LeafSurvey, QuadTree, Rect};
use crate::simulation::forces;
use crate::simulation::scheduler::{chunk_ranges, SharedParticles};
use crate::utils::{SimConfig, SimulationError};

/// A complete simulation instance: configuration, particle store, tree
/// arena and the most recent leaf survey.
///
/// The display layer never holds references into the simulation; it reads
/// leaves, aggregates and particle snapshots through the query methods
/// after each step.
///
/// # Examples
///
/// ```
/// use quadgrav::simulation::Simulation;
/// use quadgrav::utils::SimConfig;
///
/// let mut sim = Simulation::new(SimConfig::default())
///     .expect("Failed to configure simulation");
///
/// sim.spawn_particle((960.0, 540.0), (0.0, 10.0), 5.0).unwrap();
/// sim.spawn_particle((900.0, 540.0), (0.0, -10.0), 5.0).unwrap();
/// sim.simulate(10);
///
/// assert_eq!(sim.live_particle_count(), 2);
/// let (position, _velocity, mass) = sim.particle_snapshot(0).unwrap();
/// assert_eq!(mass, 5.0);
/// assert!(position.1 > 540.0);
/// ```
pub struct Simulation {
    config: SimConfig,
    store: ParticleStore,
    tree: QuadTree,
    survey: LeafSurvey,
    external_forces: Vec<(usize, (f64, f64))>,
}

impl Simulation {
    /// Validates `config` and allocates the tree arena sized from
    /// `(max_depth, node_capacity)`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for non-positive dimensions or time
    /// step, zero capacity or thread count, or an oversized tree depth.
    pub fn new(config: SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let tree = QuadTree::new(
            config.width,
            config.height,
            config.max_depth,
            config.node_capacity,
        );
        info!(
            "simulation configured: {}x{} world, depth {}, capacity {}, {} threads, dt {}",
            config.width,
            config.height,
            config.max_depth,
            config.node_capacity,
            config.num_threads,
            config.time_step
        );
        Ok(Self {
            config,
            store: ParticleStore::new(),
            tree,
            survey: LeafSurvey::default(),
            external_forces: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Adds a particle and returns its current index. Indices are only
    /// stable until the next [`step`](Simulation::step), which may evict
    /// and reorder.
    pub fn spawn_particle(
        &mut self,
        position: (f64, f64),
        velocity: (f64, f64),
        mass: f64,
    ) -> Result<usize, SimulationError> {
        self.store.spawn(position, velocity, mass)
    }

    /// Queues an external force (e.g. pointer attraction) for `index`,
    /// applied as `a += f / m` just before the next integration pass and
    /// cleared afterwards. Stale indices are ignored.
    pub fn set_external_force(&mut self, index: usize, force: (f64, f64)) {
        self.external_forces.push((index, force));
    }

    /// Runs one full frame: evict, rebuild the tree, evaluate forces in
    /// parallel over leaves, then integrate in parallel over particles.
    pub fn step(&mut self) {
        let evicted = self
            .store
            .evict_out_of_bounds(self.config.width, self.config.height);

        self.tree.reset();
        self.tree.insert(self.store.as_slice());
        self.survey = self.tree.leaf_survey();

        debug!(
            "step: {} particles, {} populated leaves ({} total), {} evicted",
            self.store.len(),
            self.survey.leaves.len(),
            self.survey.total_leaves,
            evicted
        );

        self.run_force_phase();
        self.apply_external_forces();
        self.integrate();
    }

    /// Runs the simulation for a specified number of steps.
    pub fn simulate(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Phase one: one short-lived task per contiguous leaf chunk, joined
    /// at scope exit. Leaves are handed out wholesale, so particle writes
    /// are disjoint and no locking is needed.
    fn run_force_phase(&mut self) {
        let ranges = chunk_ranges(self.survey.leaves.len(), self.config.num_threads);
        if ranges.is_empty() {
            return;
        }

        let tree = &self.tree;
        let survey = &self.survey;
        let big_g = self.config.big_g;
        let softening = self.config.softening;
        let shared = SharedParticles::new(self.store.as_mut_slice());
        let shared = &shared;

        rayon::scope(|scope| {
            for range in ranges {
                let leaves = &survey.leaves[range];
                scope.spawn(move |_| {
                    forces::evaluate_leaves(tree, survey, leaves, shared, big_g, softening);
                });
            }
        });
    }

    fn apply_external_forces(&mut self) {
        for (index, force) in self.external_forces.drain(..) {
            if let Some(particle) = self.store.get_mut(index) {
                particle.acceleration.0 += force.0 / particle.mass;
                particle.acceleration.1 += force.1 / particle.mass;
                trace!("external force {:?} applied to particle {}", force, index);
            }
        }
    }

    /// Phase two: Euler integration over disjoint contiguous particle
    /// slices. Never starts before every force task has joined.
    fn integrate(&mut self) {
        let dt = self.config.time_step;
        let workers = self.config.num_threads;
        let particles = self.store.as_mut_slice();
        if particles.is_empty() {
            return;
        }

        let chunk = particles.len().div_ceil(workers);
        particles.par_chunks_mut(chunk).for_each(|slice| {
            for particle in slice {
                particle.velocity.0 += particle.acceleration.0 * dt;
                particle.velocity.1 += particle.acceleration.1 * dt;
                particle.position.0 += particle.velocity.0 * dt;
                particle.position.1 += particle.velocity.1 * dt;
                particle.acceleration = (0.0, 0.0);
            }
        });
    }

    // ---- read-only queries for the display adapter ----

    /// Populated leaves of the most recent step.
    pub fn leaf_list(&self) -> &[LeafRef] {
        &self.survey.leaves
    }

    /// Bounds of the `leaf`-th entry of [`leaf_list`](Simulation::leaf_list).
    pub fn leaf_bounds(&self, leaf: usize) -> Option<Rect> {
        self.survey.leaves.get(leaf).map(|l| l.bounds)
    }

    /// Centroid and total mass of the `leaf`-th populated leaf.
    pub fn leaf_aggregate(&self, leaf: usize) -> Option<((f64, f64), f64)> {
        let leaf = self.survey.leaves.get(leaf)?;
        let aggregate = self.tree.aggregate(leaf.node)?;
        Some((aggregate.centroid(), aggregate.total_mass))
    }

    /// Every leaf of the most recent step, empty ones included.
    pub fn leaf_occupancy(&self) -> usize {
        self.survey.total_leaves
    }

    /// Global center of mass and total mass of the most recent step.
    pub fn global_aggregate(&self) -> ((f64, f64), f64) {
        (self.survey.global_com, self.survey.total_mass)
    }

    pub fn live_particle_count(&self) -> usize {
        self.store.len()
    }

    /// Position, velocity and mass of a live particle.
    pub fn particle_snapshot(&self, index: usize) -> Option<((f64, f64), (f64, f64), f64)> {
        self.store
            .get(index)
            .map(|p| (p.position, p.velocity, p.mass))
    }
}

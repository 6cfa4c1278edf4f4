use crate::utils::errors::SimulationError;

/// Deepest tree the arena will be sized for. Depth 10 is already ~1.4M
/// nodes; anything past that is a configuration mistake.
pub const MAX_TREE_DEPTH: usize = 10;

pub const DEFAULT_SIM_CONFIG: SimConfig = SimConfig {
    width: 1920.0,
    height: 1080.0,
    max_depth: 7,
    node_capacity: 4,
    num_threads: 4,
    time_step: 0.002,
    big_g: 6.674e-11,
    softening: 1e-12,
    particle_mass: 5.0,
};

/// Tunable constants for one simulation instance.
///
/// `width`/`height` define the root rectangle of the quadtree; particles
/// leaving it are evicted (or, above the top edge, simply skipped by the
/// tree until they fall back inside). `softening` bounds force magnitudes
/// as squared distances approach zero.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    pub width: f64,
    pub height: f64,
    pub max_depth: usize,
    pub node_capacity: usize,
    pub num_threads: usize,
    pub time_step: f64,
    pub big_g: f64,
    pub softening: f64,
    /// Mass given to particles created by the spawn-pattern helpers.
    pub particle_mass: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        DEFAULT_SIM_CONFIG
    }
}

impl SimConfig {
    /// Builds a config from the main tuning knobs, falling back to
    /// [`DEFAULT_SIM_CONFIG`] for anything not provided.
    pub fn new(
        width: Option<f64>,
        height: Option<f64>,
        max_depth: Option<usize>,
        node_capacity: Option<usize>,
        num_threads: Option<usize>,
        time_step: Option<f64>,
    ) -> Self {
        let default = DEFAULT_SIM_CONFIG;
        Self {
            width: width.unwrap_or(default.width),
            height: height.unwrap_or(default.height),
            max_depth: max_depth.unwrap_or(default.max_depth),
            node_capacity: node_capacity.unwrap_or(default.node_capacity),
            num_threads: num_threads.unwrap_or(default.num_threads),
            time_step: time_step.unwrap_or(default.time_step),
            ..default
        }
    }

    /// Rejects configurations the engine cannot run with. Called once at
    /// construction time; nothing is re-validated mid-run.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(SimulationError::InvalidDimensions);
        }
        if self.max_depth > MAX_TREE_DEPTH {
            return Err(SimulationError::InvalidDepth);
        }
        if self.node_capacity == 0 {
            return Err(SimulationError::InvalidCapacity);
        }
        if self.num_threads == 0 {
            return Err(SimulationError::InvalidThreadCount);
        }
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(SimulationError::InvalidTimeStep);
        }
        Ok(())
    }
}

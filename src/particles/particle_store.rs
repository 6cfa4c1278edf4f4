use crate::particles::Particle;
use crate::utils::SimulationError;

/// Contiguous list of live particles.
///
/// The quadtree never owns particles; it stores indices into this list, so
/// any removal must happen before a frame's tree insertion. Eviction uses
/// swap-remove, which is O(1) per removal but does not preserve ordering —
/// indices are only meaningful within a single frame.
#[derive(Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self { particles: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { particles: Vec::with_capacity(capacity) }
    }

    /// Appends a new particle and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if `mass` is non-positive.
    pub fn spawn(
        &mut self,
        position: (f64, f64),
        velocity: (f64, f64),
        mass: f64,
    ) -> Result<usize, SimulationError> {
        let particle = Particle::new(position, velocity, mass)?;
        Ok(self.push(particle))
    }

    /// Appends an already-built particle and returns its index.
    pub fn push(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    /// Removes every particle that has left the world through the side or
    /// bottom edges, returning how many were dropped.
    ///
    /// Particles above the top edge (`y < 0`) are kept: they are outside
    /// the tree's root rectangle for the moment but fall back into view.
    pub fn evict_out_of_bounds(&mut self, width: f64, height: f64) -> usize {
        let mut evicted = 0;
        let mut i = 0;
        while i < self.particles.len() {
            let (x, y) = self.particles[i].position;
            if x < 0.0 || x > width || y > height {
                self.particles.swap_remove(i);
                evicted += 1;
            } else {
                i += 1;
            }
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }
}

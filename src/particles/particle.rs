use crate::utils::SimulationError;

/// A point mass tracked by the simulation.
///
/// The acceleration accumulator collects every force contribution of the
/// current frame and is zeroed by the integration pass. The collision
/// radius defaults to the mass value, matching how the display layer sizes
/// particle circles.
///
/// # Examples
///
/// ```
/// use quadgrav::particles::Particle;
///
/// let particle = Particle::new((10.0, 20.0), (1.0, 0.0), 5.0)
///     .expect("Failed to create particle");
/// assert_eq!(particle.radius, 5.0);
/// assert_eq!(particle.acceleration, (0.0, 0.0));
///
/// // Non-positive mass is rejected.
/// assert!(Particle::new((0.0, 0.0), (0.0, 0.0), 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    /// Position represented as (x, y).
    pub position: (f64, f64),
    /// Velocity represented as (x, y).
    pub velocity: (f64, f64),
    /// Per-frame acceleration accumulator, reset to zero every step.
    pub acceleration: (f64, f64),
    /// Particle's mass.
    pub mass: f64,
    /// Collision radius.
    pub radius: f64,
}

impl Particle {
    /// Creates a new particle with its collision radius derived from mass.
    ///
    /// # Errors
    ///
    /// Returns an error if `mass` is non-positive.
    pub fn new(
        position: (f64, f64),
        velocity: (f64, f64),
        mass: f64,
    ) -> Result<Self, SimulationError> {
        Self::with_radius(position, velocity, mass, mass)
    }

    /// Creates a new particle with an explicit collision radius.
    ///
    /// # Errors
    ///
    /// Returns an error if `mass` or `radius` is non-positive.
    pub fn with_radius(
        position: (f64, f64),
        velocity: (f64, f64),
        mass: f64,
        radius: f64,
    ) -> Result<Self, SimulationError> {
        if mass <= 0.0 {
            return Err(SimulationError::InvalidMass);
        }
        if radius <= 0.0 {
            return Err(SimulationError::CalculationError(
                "Collision radius must be positive".to_string(),
            ));
        }
        Ok(Particle {
            position,
            velocity,
            acceleration: (0.0, 0.0),
            mass,
            radius,
        })
    }
}

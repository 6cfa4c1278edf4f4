use std::fmt;
use std::error::Error;

/// Represents errors that can occur while configuring or running a simulation.
#[derive(Debug, Clone)]
pub enum SimulationError {
    /// Indicates an invalid mass value (e.g., negative or zero mass).
    InvalidMass,
    /// Indicates non-positive world dimensions.
    InvalidDimensions,
    /// Indicates a tree depth outside the supported range.
    InvalidDepth,
    /// Indicates a zero leaf capacity.
    InvalidCapacity,
    /// Indicates a zero worker thread count.
    InvalidThreadCount,
    /// Indicates a non-positive or non-finite time step.
    InvalidTimeStep,
    /// A general error for calculations that produce invalid results.
    CalculationError(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::InvalidMass => write!(f, "Invalid mass value"),
            SimulationError::InvalidDimensions => write!(f, "Invalid world dimensions"),
            SimulationError::InvalidDepth => write!(f, "Invalid tree depth"),
            SimulationError::InvalidCapacity => write!(f, "Invalid leaf capacity"),
            SimulationError::InvalidThreadCount => write!(f, "Invalid thread count"),
            SimulationError::InvalidTimeStep => write!(f, "Invalid time step"),
            SimulationError::CalculationError(msg) => write!(f, "Calculation error: {}", msg),
        }
    }
}

impl Error for SimulationError {}

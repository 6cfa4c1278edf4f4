mod scheduler;
mod forces;
mod simulation;
mod spawners;

pub use simulation::*;

#[cfg(test)]
mod simulation_tests;

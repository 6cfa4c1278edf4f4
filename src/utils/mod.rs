mod errors;
mod config;
mod free_list;

pub use errors::SimulationError;
pub use config::{SimConfig, DEFAULT_SIM_CONFIG, MAX_TREE_DEPTH};
pub use free_list::FreeList;

#[cfg(test)]
mod free_list_tests;
#[cfg(test)]
mod config_tests;

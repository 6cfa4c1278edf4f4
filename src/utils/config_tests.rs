use crate::utils::{SimConfig, SimulationError, DEFAULT_SIM_CONFIG, MAX_TREE_DEPTH};

#[test]
fn test_default_config_is_valid() {
    assert!(DEFAULT_SIM_CONFIG.validate().is_ok());
}

#[test]
fn test_new_falls_back_to_defaults() {
    let config = SimConfig::new(Some(800.0), None, None, Some(8), None, None);
    assert_eq!(config.width, 800.0);
    assert_eq!(config.height, DEFAULT_SIM_CONFIG.height);
    assert_eq!(config.node_capacity, 8);
    assert_eq!(config.time_step, DEFAULT_SIM_CONFIG.time_step);
}

#[test]
fn test_rejects_bad_dimensions() {
    let config = SimConfig { width: 0.0, ..Default::default() };
    assert!(matches!(config.validate(), Err(SimulationError::InvalidDimensions)));
    let config = SimConfig { height: -10.0, ..Default::default() };
    assert!(matches!(config.validate(), Err(SimulationError::InvalidDimensions)));
}

#[test]
fn test_rejects_zero_capacity_and_threads() {
    let config = SimConfig { node_capacity: 0, ..Default::default() };
    assert!(matches!(config.validate(), Err(SimulationError::InvalidCapacity)));
    let config = SimConfig { num_threads: 0, ..Default::default() };
    assert!(matches!(config.validate(), Err(SimulationError::InvalidThreadCount)));
}

#[test]
fn test_rejects_bad_time_step() {
    let config = SimConfig { time_step: 0.0, ..Default::default() };
    assert!(matches!(config.validate(), Err(SimulationError::InvalidTimeStep)));
    let config = SimConfig { time_step: f64::NAN, ..Default::default() };
    assert!(matches!(config.validate(), Err(SimulationError::InvalidTimeStep)));
}

#[test]
fn test_rejects_excessive_depth() {
    let config = SimConfig { max_depth: MAX_TREE_DEPTH + 1, ..Default::default() };
    assert!(matches!(config.validate(), Err(SimulationError::InvalidDepth)));
    // Depth zero is legal: the whole world is one leaf.
    let config = SimConfig { max_depth: 0, ..Default::default() };
    assert!(config.validate().is_ok());
}

pub mod simulator;

pub use simulator::{PositionSimulator, SimulationResult};

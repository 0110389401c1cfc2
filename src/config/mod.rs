pub mod labeling;
pub mod manager;
pub mod simulation;

pub use labeling::{
    FixedHorizonConfig, InterpolationKind, LabelMethod, LabelingSettings, PredictionDelayConfig,
    TripleBarrierConfig, TurningPointConfig,
};
pub use manager::AppConfig;
pub use simulation::{ReportConfig, SimulationConfig};

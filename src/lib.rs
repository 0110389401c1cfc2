//! siglab: labeling and backtest statistics for binary trading signals.
//!
//! The crate turns an OHLC price history into two things:
//!
//! 1. Supervised-learning labels, via five competing strategies
//!    ([`labeling`]): triple-barrier, absolute and relative turning points,
//!    prediction delay, and fixed time horizon.
//! 2. A position-based trade simulation of a predicted binary signal
//!    ([`simulation`]), with drawdown analysis and summary performance
//!    statistics ([`metrics`]).
//!
//! Feature engineering, model training, and visualization live outside this
//! crate; the contracts at those boundaries are index-aligned arrays.

pub mod config;
pub mod data;
pub mod error;
pub mod labeling;
pub mod metrics;
pub mod simulation;
pub mod types;

pub use config::AppConfig;
pub use data::PriceSeries;
pub use error::{Result, SiglabError};
pub use labeling::{generate_labels, LabelStrategy};
pub use metrics::PerformanceReport;
pub use simulation::{PositionSimulator, SimulationResult};
pub use types::{Label, SignedLabel, Trade};

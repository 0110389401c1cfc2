use crate::error::SiglabError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_cash: f64,
    /// Proportional commission charged once per completed round trip.
    pub fee: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_cash: 1000.0,
            fee: 0.002,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SiglabError> {
        if self.initial_cash <= 0.0 {
            return Err(SiglabError::Configuration(
                "Initial cash must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.fee) {
            return Err(SiglabError::Configuration(format!(
                "Fee {} must lie in [0, 1)",
                self.fee
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Subtracted from the annualized return in the Sharpe numerator.
    pub risk_free_adjustment: f64,
    /// Annualization factor; 252 trading days for daily bars.
    pub periods_per_year: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            risk_free_adjustment: 0.01,
            periods_per_year: 252.0,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), SiglabError> {
        if self.periods_per_year <= 0.0 {
            return Err(SiglabError::Configuration(
                "periods_per_year must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

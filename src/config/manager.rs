use super::labeling::LabelingSettings;
use super::simulation::{ReportConfig, SimulationConfig};
use crate::error::SiglabError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub labeling: LabelingSettings,
    pub simulation: SimulationConfig,
    pub report: ReportConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SiglabError> {
        self.labeling.validate()?;
        self.simulation.validate()?;
        self.report.validate()?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SiglabError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SiglabError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| SiglabError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SiglabError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| SiglabError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| SiglabError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}

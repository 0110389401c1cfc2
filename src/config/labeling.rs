use crate::error::SiglabError;
use serde::{Deserialize, Serialize};

/// Which labeling strategy the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelMethod {
    TripleBarrier,
    AbsoluteTurningPoint,
    RelativeTurningPoint,
    PredictionDelay,
    FixedHorizon,
}

/// Interpolant used to smooth the close series before the relative
/// turning-point scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpolationKind {
    Linear,
    Cubic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TripleBarrierConfig {
    /// Profit-taking bound as a price ratio, e.g. 1.07 = +7%.
    pub upper_bound: f64,
    /// Stop-loss bound as a price ratio, e.g. 0.97 = -3%.
    pub lower_bound: f64,
    /// Maximum bars to hold before the vertical barrier exits.
    pub max_period: usize,
    /// Collapse the signed labels into {0, 1}.
    pub two_class: bool,
}

impl Default for TripleBarrierConfig {
    fn default() -> Self {
        Self {
            upper_bound: 1.07,
            lower_bound: 0.97,
            max_period: 20,
            two_class: true,
        }
    }
}

impl TripleBarrierConfig {
    pub fn validate(&self) -> Result<(), SiglabError> {
        if self.upper_bound <= 0.0 || self.lower_bound <= 0.0 {
            return Err(SiglabError::Configuration(
                "Barrier bounds must be positive price ratios".to_string(),
            ));
        }
        if self.lower_bound >= self.upper_bound {
            return Err(SiglabError::Configuration(format!(
                "Lower bound {} must be below upper bound {}",
                self.lower_bound, self.upper_bound
            )));
        }
        if self.max_period < 2 {
            return Err(SiglabError::Configuration(
                "max_period must be at least 2 bars".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TurningPointConfig {
    /// Downsampling stride for the smoothed curve.
    pub step_size: usize,
    pub interpolation: InterpolationKind,
}

impl Default for TurningPointConfig {
    fn default() -> Self {
        Self {
            step_size: 10,
            interpolation: InterpolationKind::Cubic,
        }
    }
}

impl TurningPointConfig {
    pub fn validate(&self) -> Result<(), SiglabError> {
        if self.step_size == 0 {
            return Err(SiglabError::Configuration(
                "step_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionDelayConfig {
    /// Bars ahead to compare the close against.
    pub delay: usize,
}

impl Default for PredictionDelayConfig {
    fn default() -> Self {
        Self { delay: 5 }
    }
}

impl PredictionDelayConfig {
    pub fn validate(&self) -> Result<(), SiglabError> {
        if self.delay == 0 {
            return Err(SiglabError::Configuration(
                "delay must be at least 1 bar".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedHorizonConfig {
    /// Band half-width: forward returns above it label Up, below the
    /// negated value label Down, in between stays undefined.
    pub threshold: f64,
    pub look_forward: usize,
    /// Scale forward returns by a trailing rolling mean and standard
    /// deviation before thresholding.
    pub standardized: bool,
    /// Rolling window length; required when `standardized` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<usize>,
}

impl Default for FixedHorizonConfig {
    fn default() -> Self {
        Self {
            threshold: 0.04,
            look_forward: 1,
            standardized: false,
            window: None,
        }
    }
}

impl FixedHorizonConfig {
    pub fn validate(&self) -> Result<(), SiglabError> {
        if self.look_forward == 0 {
            return Err(SiglabError::Configuration(
                "look_forward must be at least 1 bar".to_string(),
            ));
        }
        if self.standardized {
            match self.window {
                None => {
                    return Err(SiglabError::Configuration(
                        "standardized labeling requires a rolling window".to_string(),
                    ))
                }
                Some(w) if w < 2 => {
                    return Err(SiglabError::Configuration(
                        "rolling window must be at least 2 bars".to_string(),
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// All labeling knobs in one section, mirroring the single entry point the
/// pipeline exposes: pick a method, the matching sub-section applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingSettings {
    pub method: LabelMethod,
    pub triple_barrier: TripleBarrierConfig,
    pub turning_point: TurningPointConfig,
    pub prediction_delay: PredictionDelayConfig,
    pub fixed_horizon: FixedHorizonConfig,
}

impl Default for LabelingSettings {
    fn default() -> Self {
        Self {
            method: LabelMethod::TripleBarrier,
            triple_barrier: TripleBarrierConfig::default(),
            turning_point: TurningPointConfig::default(),
            prediction_delay: PredictionDelayConfig::default(),
            fixed_horizon: FixedHorizonConfig::default(),
        }
    }
}

impl LabelingSettings {
    pub fn validate(&self) -> Result<(), SiglabError> {
        self.triple_barrier.validate()?;
        self.turning_point.validate()?;
        self.prediction_delay.validate()?;
        self.fixed_horizon.validate()?;
        Ok(())
    }
}

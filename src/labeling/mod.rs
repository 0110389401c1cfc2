//! Label generation strategies.
//!
//! Each strategy is a pure function of a price series; none of them mutate
//! the input or keep state between calls. `generate_labels` is the unified
//! entry point producing dense two-class labels ready for model training:
//! signed outputs are collapsed (`Up` becomes One, everything else Zero) and
//! sentinels are forward-filled.

pub mod fixed_horizon;
pub mod prediction_delay;
pub mod spline;
pub mod triple_barrier;
pub mod turning_point;

pub use triple_barrier::{BarrierHit, BarrierOutcome};
pub use turning_point::TurningPoints;

use crate::config::{
    FixedHorizonConfig, LabelMethod, LabelingSettings, PredictionDelayConfig, TripleBarrierConfig,
    TurningPointConfig,
};
use crate::data::PriceSeries;
use crate::error::Result;
use crate::types::{Label, SignedLabel};

/// Default when filling before the first determinable label: hold.
pub const DEFAULT_HOLD: Label = Label::One;

/// Replace sentinels with the last known value, `default` before the first
/// known value.
pub fn fill_forward(labels: &[Label], default: Label) -> Vec<Label> {
    let mut last = default;
    labels
        .iter()
        .map(|label| {
            if label.is_undefined() {
                last
            } else {
                last = *label;
                *label
            }
        })
        .collect()
}

/// Collapse signed labels to two classes, then forward-fill the sentinels.
pub fn collapse_and_fill(signed: &[SignedLabel], default: Label) -> Vec<Label> {
    let collapsed: Vec<Label> = signed.iter().map(SignedLabel::collapse).collect();
    fill_forward(&collapsed, default)
}

/// Numeric view for handing labels to a model; sentinels become NaN. Callers
/// masking trailing undefined labels must apply the same mask to their
/// feature matrix to keep the two index-aligned.
pub fn labels_to_signal(labels: &[Label]) -> Vec<f64> {
    labels.iter().map(Label::as_f64).collect()
}

/// A labeling strategy with its parameters.
#[derive(Debug, Clone)]
pub enum LabelStrategy {
    TripleBarrier(TripleBarrierConfig),
    AbsoluteTurningPoint,
    RelativeTurningPoint(TurningPointConfig),
    PredictionDelay(PredictionDelayConfig),
    FixedHorizon(FixedHorizonConfig),
}

impl LabelStrategy {
    pub fn from_settings(settings: &LabelingSettings) -> Self {
        match settings.method {
            LabelMethod::TripleBarrier => {
                LabelStrategy::TripleBarrier(settings.triple_barrier.clone())
            }
            LabelMethod::AbsoluteTurningPoint => LabelStrategy::AbsoluteTurningPoint,
            LabelMethod::RelativeTurningPoint => {
                LabelStrategy::RelativeTurningPoint(settings.turning_point.clone())
            }
            LabelMethod::PredictionDelay => {
                LabelStrategy::PredictionDelay(settings.prediction_delay.clone())
            }
            LabelMethod::FixedHorizon => {
                LabelStrategy::FixedHorizon(settings.fixed_horizon.clone())
            }
        }
    }
}

/// Run one labeling strategy and return dense two-class labels.
pub fn generate_labels(series: &PriceSeries, strategy: &LabelStrategy) -> Result<Vec<Label>> {
    match strategy {
        LabelStrategy::TripleBarrier(config) => {
            if config.two_class {
                triple_barrier::labels(series, config)
            } else {
                let signed = triple_barrier::signed_labels(series, config)?;
                Ok(signed.iter().map(SignedLabel::collapse).collect())
            }
        }
        LabelStrategy::AbsoluteTurningPoint => {
            let points = turning_point::absolute_turning_points(series);
            Ok(turning_point::to_labels(&points, series.len()))
        }
        LabelStrategy::RelativeTurningPoint(config) => {
            let points = turning_point::relative_turning_points(series, config)?;
            Ok(turning_point::to_labels(&points, series.len()))
        }
        LabelStrategy::PredictionDelay(config) => prediction_delay::labels(series, config),
        LabelStrategy::FixedHorizon(config) => {
            let signed = fixed_horizon::signed_labels(series, config)?;
            Ok(collapse_and_fill(&signed, DEFAULT_HOLD))
        }
    }
}

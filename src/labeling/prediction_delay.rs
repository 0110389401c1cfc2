//! Prediction-delay labeling: One where the close is higher `delay` bars
//! ahead, Zero otherwise.

use crate::config::PredictionDelayConfig;
use crate::data::PriceSeries;
use crate::error::Result;
use crate::labeling::fill_forward;
use crate::types::Label;

/// Labels with the trailing `delay` bars left as the sentinel.
pub fn raw_labels(series: &PriceSeries, config: &PredictionDelayConfig) -> Result<Vec<Label>> {
    config.validate()?;

    let close = series.close();
    let n = close.len();
    if config.delay >= n {
        log::warn!(
            "delay {} covers the whole series of {} bars; all labels undefined",
            config.delay,
            n
        );
        return Ok(vec![Label::Undefined; n]);
    }

    let mut labels = Vec::with_capacity(n);
    for t in 0..n {
        if t + config.delay < n {
            // NaN on either side compares false and lands on Zero.
            if close[t + config.delay] > close[t] {
                labels.push(Label::One);
            } else {
                labels.push(Label::Zero);
            }
        } else {
            labels.push(Label::Undefined);
        }
    }
    Ok(labels)
}

/// Dense labels: the undefined tail carries the last determinable label
/// forward, Zero when nothing was determinable.
pub fn labels(series: &PriceSeries, config: &PredictionDelayConfig) -> Result<Vec<Label>> {
    let raw = raw_labels(series, config)?;
    if raw.iter().all(|l| l.is_undefined()) {
        return Ok(raw);
    }
    Ok(fill_forward(&raw, Label::Zero))
}

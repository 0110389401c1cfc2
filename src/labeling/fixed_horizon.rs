//! Fixed-time-horizon labeling.
//!
//! The forward return over `look_forward` bars is compared against a
//! symmetric threshold band. Returns inside the band are the sentinel, not
//! Neutral: a small move is "no label", and callers forward-fill rather than
//! read it as a hold signal. Optionally the return is standardized by a
//! trailing rolling mean and standard deviation first.

use crate::config::FixedHorizonConfig;
use crate::data::PriceSeries;
use crate::error::{Result, SiglabError};
use crate::types::SignedLabel;

/// Forward percentage return `close[t + look_forward] / close[t] - 1`, NaN
/// for the trailing bars without forward data.
pub fn forward_returns(close: &[f64], look_forward: usize) -> Vec<f64> {
    let n = close.len();
    let mut returns = vec![f64::NAN; n];
    for t in 0..n.saturating_sub(look_forward) {
        returns[t] = close[t + look_forward] / close[t] - 1.0;
    }
    returns
}

/// Trailing rolling mean; NaN until a full window of non-NaN values exists.
fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    for t in 0..n {
        if t + 1 < window {
            continue;
        }
        let slice = &values[t + 1 - window..=t];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[t] = slice.iter().sum::<f64>() / window as f64;
    }
    out
}

/// Trailing rolling sample standard deviation; NaN until a full window of
/// non-NaN values exists.
fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    for t in 0..n {
        if t + 1 < window {
            continue;
        }
        let slice = &values[t + 1 - window..=t];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance =
            slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window as f64 - 1.0);
        out[t] = variance.sqrt();
    }
    out
}

/// Signed labels: Up above the threshold, Down below its negation, sentinel
/// in between or wherever the (standardized) return is NaN.
pub fn signed_labels(
    series: &PriceSeries,
    config: &FixedHorizonConfig,
) -> Result<Vec<SignedLabel>> {
    config.validate()?;

    let close = series.close();
    let n = close.len();
    if config.look_forward >= n {
        log::warn!(
            "look_forward {} is not shorter than the series of {} bars; all labels undefined",
            config.look_forward,
            n
        );
        return Ok(vec![SignedLabel::Undefined; n]);
    }

    let mut returns = forward_returns(close, config.look_forward);

    if config.standardized {
        let window = config.window.ok_or_else(|| {
            SiglabError::Configuration(
                "standardized labeling requires a rolling window".to_string(),
            )
        })?;
        if window >= n {
            log::warn!(
                "rolling window {} is not shorter than the series of {} bars; all labels undefined",
                window,
                n
            );
        }
        let mean = rolling_mean(&returns, window);
        let std = rolling_std(&returns, window);
        for t in 0..n {
            returns[t] = (returns[t] - mean[t]) / std[t];
        }
    }

    Ok(returns
        .iter()
        .map(|&r| {
            if r > config.threshold {
                SignedLabel::Up
            } else if r < -config.threshold {
                SignedLabel::Down
            } else {
                SignedLabel::Undefined
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(close: &[f64]) -> PriceSeries {
        let dates = (0..close.len())
            .map(|i| {
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
            })
            .collect();
        PriceSeries::from_close(dates, close.to_vec()).unwrap()
    }

    #[test]
    fn forward_return_values() {
        let returns = forward_returns(&[100.0, 106.0, 100.0], 1);
        assert_relative_eq!(returns[0], 0.06, epsilon = 1e-12);
        assert_relative_eq!(returns[1], 100.0 / 106.0 - 1.0, epsilon = 1e-12);
        assert!(returns[2].is_nan());
    }

    #[test]
    fn threshold_band_labels() {
        let s = series(&[100.0, 106.0, 100.0]);
        let config = FixedHorizonConfig {
            threshold: 0.05,
            look_forward: 1,
            ..Default::default()
        };
        let labels = signed_labels(&s, &config).unwrap();
        assert_eq!(labels[0], SignedLabel::Up); // +6% clears the 5% band
        assert_eq!(labels[1], SignedLabel::Down); // -5.7% breaks the band
        assert_eq!(labels[2], SignedLabel::Undefined); // no forward data
    }

    #[test]
    fn small_moves_are_the_sentinel_not_neutral() {
        let s = series(&[100.0, 101.0, 102.0, 103.0]);
        let config = FixedHorizonConfig {
            threshold: 0.05,
            look_forward: 1,
            ..Default::default()
        };
        let labels = signed_labels(&s, &config).unwrap();
        assert_eq!(labels[0], SignedLabel::Undefined);
        assert_eq!(labels[1], SignedLabel::Undefined);
        assert!(!labels.contains(&SignedLabel::Neutral));
    }

    #[test]
    fn negative_threshold_reverses_directionality() {
        let s = series(&[100.0, 101.0, 100.0]);
        let config = FixedHorizonConfig {
            threshold: -0.005,
            look_forward: 1,
            ..Default::default()
        };
        let labels = signed_labels(&s, &config).unwrap();
        // +1% clears the negated band immediately.
        assert_eq!(labels[0], SignedLabel::Up);
    }

    #[test]
    fn look_forward_beyond_series_warns_into_undefined() {
        let s = series(&[100.0, 101.0, 102.0]);
        let config = FixedHorizonConfig {
            look_forward: 3,
            ..Default::default()
        };
        let labels = signed_labels(&s, &config).unwrap();
        assert!(labels.iter().all(|l| l.is_undefined()));
    }

    #[test]
    fn standardized_without_window_is_a_config_error() {
        let s = series(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let config = FixedHorizonConfig {
            standardized: true,
            window: None,
            ..Default::default()
        };
        assert!(matches!(
            signed_labels(&s, &config),
            Err(SiglabError::Configuration(_))
        ));
    }

    #[test]
    fn standardized_head_is_undefined_until_window_fills() {
        let close: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
        let s = series(&close);
        let config = FixedHorizonConfig {
            threshold: 0.0001,
            look_forward: 1,
            standardized: true,
            window: Some(4),
        };
        let labels = signed_labels(&s, &config).unwrap();
        assert!(labels[0].is_undefined());
        assert!(labels[1].is_undefined());
        assert!(labels[2].is_undefined());
    }

    #[test]
    fn constant_returns_standardize_to_undefined() {
        // Zero dispersion: 0/0 is NaN, never a phantom label. Doubling keeps
        // every bar-to-bar return exactly 1.0 in floating point.
        let close: Vec<f64> = (0..10).map(|i| 100.0 * 2.0f64.powi(i)).collect();
        let s = series(&close);
        let config = FixedHorizonConfig {
            threshold: 0.5,
            look_forward: 1,
            standardized: true,
            window: Some(3),
        };
        let labels = signed_labels(&s, &config).unwrap();
        assert!(labels.iter().all(|l| l.is_undefined()));
    }

    #[test]
    fn rolling_helpers_match_hand_computation() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let mean = rolling_mean(&values, 2);
        assert!(mean[0].is_nan());
        assert_relative_eq!(mean[1], 1.5, epsilon = 1e-12);
        assert_relative_eq!(mean[3], 3.5, epsilon = 1e-12);

        let std = rolling_std(&values, 2);
        // Sample std of two values one apart is sqrt(0.5).
        assert_relative_eq!(std[1], 0.5f64.sqrt(), epsilon = 1e-12);
    }
}

//! Turning-point detection on close prices.
//!
//! Two detectors share one event vocabulary: minima are buy events, maxima
//! are sell events. The absolute detector walks the raw closes with a small
//! trend state machine; the relative detector smooths the series first and
//! looks for derivative sign flips, which filters out minor wiggles.

use crate::config::{InterpolationKind, TurningPointConfig};
use crate::data::PriceSeries;
use crate::error::{Result, SiglabError};
use crate::labeling::spline::{linear_interpolate, CubicSpline};
use crate::labeling::{collapse_and_fill, DEFAULT_HOLD};
use crate::types::{Label, SignedLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrendState {
    Neutral,
    Rising,
    Falling,
}

fn trend_between(a: f64, b: f64) -> TrendState {
    // NaN compares false both ways and lands on Neutral.
    if a < b {
        TrendState::Rising
    } else if a > b {
        TrendState::Falling
    } else {
        TrendState::Neutral
    }
}

/// Indices of detected local extrema, each list sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurningPoints {
    pub minima: Vec<usize>,
    pub maxima: Vec<usize>,
}

impl TurningPoints {
    pub fn is_empty(&self) -> bool {
        self.minima.is_empty() && self.maxima.is_empty()
    }
}

/// Scan adjacent closes for trend reversals.
///
/// A reversal is recorded at the midpoint of the plateau between the last
/// trend change and the bar that flipped, so flat stretches attribute the
/// extremum to their center. Fewer than 3 bars cannot reverse and produce no
/// events.
pub fn absolute_turning_points(series: &PriceSeries) -> TurningPoints {
    let close = series.close();
    let mut points = TurningPoints::default();
    if close.len() < 3 {
        return points;
    }

    let mut prev_state = trend_between(close[0], close[1]);
    let mut begin = 1usize;

    for i in 2..close.len() {
        let state = trend_between(close[i - 1], close[i]);
        if state != TrendState::Neutral {
            if prev_state != TrendState::Neutral && prev_state != state {
                let midpoint = (begin + i - 1) / 2;
                if state == TrendState::Falling {
                    points.maxima.push(midpoint);
                } else {
                    points.minima.push(midpoint);
                }
            }
            begin = i;
            prev_state = state;
        }
    }

    points
}

/// Smooth the closes with an interpolant over every `step_size`-th bar, then
/// flag sign flips of the forward first difference: negative-to-positive is
/// a bottom, positive-to-negative a top.
pub fn relative_turning_points(
    series: &PriceSeries,
    config: &TurningPointConfig,
) -> Result<TurningPoints> {
    config.validate()?;

    let close = series.close();
    let n = close.len();
    if n < 2 {
        return Err(SiglabError::InsufficientData(
            "Need at least 2 bars to smooth".to_string(),
        ));
    }

    let knot_xs: Vec<f64> = (0..n).step_by(config.step_size).map(|i| i as f64).collect();
    let knot_ys: Vec<f64> = (0..n).step_by(config.step_size).map(|i| close[i]).collect();

    let smoothed: Vec<f64> = match config.interpolation {
        InterpolationKind::Cubic => {
            if knot_xs.len() < 4 {
                return Err(SiglabError::InsufficientData(format!(
                    "Cubic smoothing needs at least 4 knots, got {} (series of {} bars at step {})",
                    knot_xs.len(),
                    n,
                    config.step_size
                )));
            }
            let spline = CubicSpline::fit(&knot_xs, &knot_ys)?;
            (0..n).map(|i| spline.evaluate(i as f64)).collect()
        }
        InterpolationKind::Linear => {
            if knot_xs.len() < 2 {
                return Err(SiglabError::InsufficientData(format!(
                    "Linear smoothing needs at least 2 knots, got {} (series of {} bars at step {})",
                    knot_xs.len(),
                    n,
                    config.step_size
                )));
            }
            (0..n)
                .map(|i| linear_interpolate(&knot_xs, &knot_ys, i as f64))
                .collect()
        }
    };

    // Forward first difference as the derivative proxy. The last point takes
    // the backward difference. Bars past the final knot are NaN and can
    // never flip the sign.
    let mut derivative = vec![0.0; n];
    for i in 0..n - 1 {
        derivative[i] = smoothed[i + 1] - smoothed[i];
    }
    derivative[n - 1] = smoothed[n - 1] - smoothed[n - 2];

    let mut points = TurningPoints::default();
    let mut prev = derivative[0];
    for (i, &dy) in derivative.iter().enumerate().skip(1) {
        if prev < 0.0 && dy > 0.0 {
            points.minima.push(i);
        } else if prev > 0.0 && dy < 0.0 {
            points.maxima.push(i);
        }
        prev = dy;
    }

    Ok(points)
}

/// Densify sparse extrema into per-bar labels: hold (One) from each minimum,
/// flat (Zero) from each maximum, hold before the first event.
pub fn to_labels(points: &TurningPoints, len: usize) -> Vec<Label> {
    let mut sparse = vec![SignedLabel::Undefined; len];
    for &i in &points.maxima {
        sparse[i] = SignedLabel::Down;
    }
    for &i in &points.minima {
        sparse[i] = SignedLabel::Up;
    }
    collapse_and_fill(&sparse, DEFAULT_HOLD)
}

//! Triple-barrier labeling.
//!
//! For each start bar, the close-ratio path is scanned forward until it
//! breaches the profit-taking bound, breaches the stop-loss bound, or runs
//! out the clock at the vertical barrier. Barriers are expressed as ratios of
//! the starting close, so 1.07/0.97 means +7% take-profit and -3% stop.

use crate::config::TripleBarrierConfig;
use crate::data::PriceSeries;
use crate::error::{Result, SiglabError};
use crate::types::{Label, SignedLabel};

/// Which barrier ended the forward scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierHit {
    Upper,
    Lower,
    Vertical,
}

/// Scan result for one start bar.
#[derive(Debug, Clone)]
pub struct BarrierOutcome {
    /// close[t + exit_offset] / close[t]; NaN when the path is unreadable.
    pub exit_ratio: f64,
    /// Bars between the start and the exit.
    pub exit_offset: usize,
    pub hit: BarrierHit,
}

impl BarrierOutcome {
    /// Signed label from the exit ratio alone. NaN comparisons are false, so
    /// a NaN ratio lands on Neutral rather than a spurious barrier hit.
    pub fn signal(&self, config: &TripleBarrierConfig) -> SignedLabel {
        if self.exit_ratio > config.upper_bound {
            SignedLabel::Up
        } else if self.exit_ratio < config.lower_bound {
            SignedLabel::Down
        } else {
            SignedLabel::Neutral
        }
    }
}

/// Run the barrier scan for every bar that has a full window ahead of it.
///
/// The trailing `max_period - 1` bars cannot form a window and come back as
/// `None`.
pub fn scan(
    series: &PriceSeries,
    config: &TripleBarrierConfig,
) -> Result<Vec<Option<BarrierOutcome>>> {
    config.validate()?;

    let close = series.close();
    let n = close.len();
    if n < config.max_period {
        return Err(SiglabError::InsufficientData(format!(
            "{} bars, triple-barrier window needs at least {}",
            n, config.max_period
        )));
    }

    let mut outcomes = Vec::with_capacity(n);
    for t in 0..n {
        if t + config.max_period > n {
            outcomes.push(None);
            continue;
        }
        outcomes.push(Some(scan_window(
            &close[t..t + config.max_period],
            config,
        )));
    }
    Ok(outcomes)
}

fn scan_window(window: &[f64], config: &TripleBarrierConfig) -> BarrierOutcome {
    let start = window[0];
    for (k, &price) in window.iter().enumerate() {
        let ratio = price / start;
        if ratio > config.upper_bound {
            return BarrierOutcome {
                exit_ratio: ratio,
                exit_offset: k,
                hit: BarrierHit::Upper,
            };
        }
        if ratio < config.lower_bound {
            return BarrierOutcome {
                exit_ratio: ratio,
                exit_offset: k,
                hit: BarrierHit::Lower,
            };
        }
    }
    BarrierOutcome {
        exit_ratio: window[window.len() - 1] / start,
        exit_offset: window.len() - 1,
        hit: BarrierHit::Vertical,
    }
}

/// Signed labels: Up/Down on barrier hits, Neutral on vertical exits and on
/// the trailing bars with no window.
pub fn signed_labels(
    series: &PriceSeries,
    config: &TripleBarrierConfig,
) -> Result<Vec<SignedLabel>> {
    let outcomes = scan(series, config)?;
    Ok(outcomes
        .iter()
        .map(|outcome| match outcome {
            Some(o) => o.signal(config),
            None => SignedLabel::Neutral,
        })
        .collect())
}

/// Two-class labels.
///
/// Vertical exits take the sign of the window return instead of staying
/// neutral (a flat window counts as up), then everything collapses to
/// One/Zero. Downside barrier hits and no-signal bars are indistinguishable
/// after the fold; that loss is intentional.
pub fn labels(series: &PriceSeries, config: &TripleBarrierConfig) -> Result<Vec<Label>> {
    let outcomes = scan(series, config)?;
    Ok(outcomes
        .iter()
        .map(|outcome| match outcome {
            Some(o) => match o.signal(config) {
                SignedLabel::Up => Label::One,
                SignedLabel::Down => Label::Zero,
                _ => {
                    if o.exit_ratio >= 1.0 {
                        Label::One
                    } else {
                        Label::Zero
                    }
                }
            },
            None => Label::Zero,
        })
        .collect())
}

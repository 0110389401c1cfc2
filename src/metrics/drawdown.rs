//! Wealth, running peak, and drawdown analysis for a return series.

use crate::error::{Result, SiglabError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wealth index, running peak, and drawdown, all parallel to the input
/// returns. Drawdown is `(wealth - peak) / peak`, so it is 0 at every peak
/// and lies in [-1, 0] for any return series bounded below by -100%.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownCurves {
    pub wealth: Vec<f64>,
    pub peaks: Vec<f64>,
    pub drawdown: Vec<f64>,
}

/// A maximal contiguous span spent below the running peak, bounded by the
/// at-peak bars on either side (or the end of the data while still under
/// water).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownEpisode {
    pub start_bar: usize,
    pub end_bar: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,
    /// Minimum drawdown inside the span (the deepest loss, as a negative
    /// fraction).
    pub depth: f64,
}

impl DrawdownCurves {
    /// Compound `cash` through the returns and derive peak and drawdown.
    pub fn from_returns(returns: &[f64], cash: f64) -> Self {
        let n = returns.len();
        let mut wealth = Vec::with_capacity(n);
        let mut peaks = Vec::with_capacity(n);
        let mut drawdown = Vec::with_capacity(n);

        let mut value = cash;
        let mut peak = f64::MIN;
        for r in returns {
            value *= 1.0 + r;
            // f64::max ignores NaN, so a missing bar cannot erase the peak.
            peak = peak.max(value);
            wealth.push(value);
            peaks.push(peak);
            drawdown.push((value - peak) / peak);
        }

        Self {
            wealth,
            peaks,
            drawdown,
        }
    }

    pub fn len(&self) -> usize {
        self.wealth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wealth.is_empty()
    }

    /// The deepest drawdown, 0 when the series never leaves its peak.
    pub fn max_drawdown(&self) -> f64 {
        self.drawdown
            .iter()
            .copied()
            .filter(|d| !d.is_nan())
            .fold(0.0, f64::min)
    }

    /// Index of the deepest drawdown; None when no drawdown ever occurred.
    pub fn max_drawdown_index(&self) -> Option<usize> {
        let deepest = self.max_drawdown();
        if deepest >= 0.0 {
            return None;
        }
        self.drawdown.iter().position(|&d| d == deepest)
    }

    /// Extract contiguous below-peak episodes.
    ///
    /// At-peak bars (drawdown exactly 0) plus the final bar form the
    /// candidate boundaries; two consecutive boundaries more than one bar
    /// apart enclose an episode. A series that never leaves its peak yields
    /// no episodes.
    pub fn episodes(&self, dates: &[NaiveDate]) -> Result<Vec<DrawdownEpisode>> {
        if dates.len() != self.len() {
            return Err(SiglabError::Alignment(format!(
                "{} dates vs {} drawdown bars",
                dates.len(),
                self.len()
            )));
        }
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let mut boundaries: Vec<usize> = self
            .drawdown
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0.0)
            .map(|(i, _)| i)
            .collect();
        let last = self.len() - 1;
        if boundaries.last() != Some(&last) {
            boundaries.push(last);
        }

        let mut episodes = Vec::new();
        for pair in boundaries.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if end > start + 1 {
                let depth = self.drawdown[start..=end]
                    .iter()
                    .copied()
                    .filter(|d| !d.is_nan())
                    .fold(0.0, f64::min);
                episodes.push(DrawdownEpisode {
                    start_bar: start,
                    end_bar: end,
                    start_date: dates[start],
                    end_date: dates[end],
                    duration_days: (dates[end] - dates[start]).num_days(),
                    depth,
                });
            }
        }

        Ok(episodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64))
            .collect()
    }

    #[test]
    fn curves_track_wealth_and_peak() {
        let returns = [0.0, 0.1, -0.5, 1.0];
        let curves = DrawdownCurves::from_returns(&returns, 1000.0);

        assert_relative_eq!(curves.wealth[1], 1100.0, epsilon = 1e-9);
        assert_relative_eq!(curves.wealth[2], 550.0, epsilon = 1e-9);
        assert_relative_eq!(curves.peaks[2], 1100.0, epsilon = 1e-9);
        assert_relative_eq!(curves.drawdown[2], -0.5, epsilon = 1e-12);
        // Back at the peak after doubling.
        assert_eq!(curves.drawdown[3], 0.0);
    }

    #[test]
    fn drawdown_stays_in_unit_interval() {
        let returns = [0.05, -0.2, 0.1, -0.3, 0.4, -0.99];
        let curves = DrawdownCurves::from_returns(&returns, 1.0);
        for &d in &curves.drawdown {
            assert!((-1.0..=0.0).contains(&d), "drawdown {} out of range", d);
        }
    }

    #[test]
    fn wealth_reconstructs_from_peak_and_drawdown() {
        let returns = [0.02, -0.05, 0.01, 0.08, -0.1, 0.03];
        let curves = DrawdownCurves::from_returns(&returns, 1000.0);
        for i in 0..curves.len() {
            let rebuilt = curves.peaks[i] * (1.0 + curves.drawdown[i]);
            assert_relative_eq!(rebuilt, curves.wealth[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn monotone_growth_has_no_drawdown() {
        let returns = [0.01, 0.02, 0.005, 0.03];
        let curves = DrawdownCurves::from_returns(&returns, 1.0);
        assert!(curves.drawdown.iter().all(|&d| d == 0.0));
        assert_eq!(curves.max_drawdown(), 0.0);
        assert!(curves.max_drawdown_index().is_none());
        assert!(curves.episodes(&dates(4)).unwrap().is_empty());
    }

    #[test]
    fn two_episodes_with_durations_and_depths() {
        // Wealth: 1000, 1100, 550, 1100, 1031.25, 1031.25
        // The halving and doubling keep the recovery exactly at the old peak.
        let returns = [0.0, 0.1, -0.5, 1.0, -0.0625, 0.0];
        let curves = DrawdownCurves::from_returns(&returns, 1000.0);
        let episodes = curves.episodes(&dates(6)).unwrap();

        assert_eq!(episodes.len(), 2);

        assert_eq!(episodes[0].start_bar, 1);
        assert_eq!(episodes[0].end_bar, 3);
        assert_eq!(episodes[0].duration_days, 2);
        assert_relative_eq!(episodes[0].depth, -0.5, epsilon = 1e-12);

        // Still under water at the end: the final bar closes the episode.
        assert_eq!(episodes[1].start_bar, 3);
        assert_eq!(episodes[1].end_bar, 5);
        assert_eq!(episodes[1].duration_days, 2);
        assert_relative_eq!(episodes[1].depth, -0.0625, epsilon = 1e-12);
    }

    #[test]
    fn single_bar_dip_at_the_end_is_not_an_episode() {
        // Below the peak only on the final bar: the boundary gap is exactly
        // one, which does not qualify.
        let returns = [0.0, 0.1, -0.05];
        let curves = DrawdownCurves::from_returns(&returns, 1000.0);
        let episodes = curves.episodes(&dates(3)).unwrap();
        assert!(episodes.is_empty());
    }

    #[test]
    fn empty_returns_produce_empty_curves() {
        let curves = DrawdownCurves::from_returns(&[], 1000.0);
        assert!(curves.is_empty());
        assert!(curves.episodes(&[]).unwrap().is_empty());
        assert_eq!(curves.max_drawdown(), 0.0);
    }

    #[test]
    fn misaligned_dates_are_an_error() {
        let curves = DrawdownCurves::from_returns(&[0.0, 0.1], 1.0);
        assert!(matches!(
            curves.episodes(&dates(3)),
            Err(SiglabError::Alignment(_))
        ));
    }

    #[test]
    fn deepest_point_is_located() {
        let returns = [0.0, 0.1, -0.2, -0.1, 0.5];
        let curves = DrawdownCurves::from_returns(&returns, 1.0);
        let idx = curves.max_drawdown_index().unwrap();
        assert_eq!(idx, 3);
        assert!(curves.max_drawdown() < -0.2);
    }
}

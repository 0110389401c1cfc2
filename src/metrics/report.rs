//! Summary statistics over a simulation run.
//!
//! Pure aggregation: everything here is arithmetic over the simulator's
//! per-bar arrays, the trade list, and the drawdown analysis. Ratios whose
//! denominator degenerates (no trades, zero volatility, no drawdown) are
//! reported as `None` and logged, never crashed on and never coerced to 0.

use crate::config::ReportConfig;
use crate::data::PriceSeries;
use crate::error::{Result, SiglabError};
use crate::metrics::drawdown::{DrawdownCurves, DrawdownEpisode};
use crate::metrics::risk;
use crate::simulation::SimulationResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub duration_days: i64,

    pub final_equity: f64,
    pub peak_equity: f64,
    /// Total return of the gross strategy track.
    pub gross_return: f64,
    /// Total return of the fee-adjusted track.
    pub net_return: f64,
    pub buy_hold_return: f64,

    /// Geometric per-bar mean of the completed trades' gross returns,
    /// spread over the whole span.
    pub mean_daily_return: f64,
    /// Geometric per-bar mean of the net strategy returns.
    pub mean_daily_net_return: f64,
    pub annualized_return: f64,
    /// Population std of per-trade net returns, annualized. None without
    /// trades.
    pub annualized_volatility: Option<f64>,

    pub trade_count: usize,
    pub trades_per_year: f64,
    /// Fraction of trades with positive net return. None without trades.
    pub win_rate: Option<f64>,
    pub best_bar_return: f64,
    pub worst_bar_return: f64,

    /// Deepest drawdown of the net track, as a negative fraction.
    pub max_drawdown: f64,
    pub max_drawdown_date: Option<NaiveDate>,
    /// Mean episode depth. None when no episode ever formed.
    pub avg_drawdown: Option<f64>,
    pub max_drawdown_duration_days: Option<i64>,
    pub avg_drawdown_duration_days: Option<f64>,

    pub sharpe_ratio: Option<f64>,
    pub calmar_ratio: Option<f64>,
}

impl PerformanceReport {
    pub fn compute(
        series: &PriceSeries,
        result: &SimulationResult,
        config: &ReportConfig,
    ) -> Result<Self> {
        config.validate()?;

        let n = series.len();
        if n == 0 {
            return Err(SiglabError::InsufficientData(
                "Cannot report on an empty series".to_string(),
            ));
        }
        if result.strategy_net_returns.len() != n {
            return Err(SiglabError::Alignment(format!(
                "Simulation of {} bars does not match a series of {} bars",
                result.strategy_net_returns.len(),
                n
            )));
        }

        let dates = series.dates();
        let start = dates[0];
        let end = dates[n - 1];

        let final_equity = result.equity.strategy_net.last().copied().ok_or_else(|| {
            SiglabError::Alignment("Simulation result carries no equity curve".to_string())
        })?;
        let peak_equity = result
            .equity
            .strategy_net
            .iter()
            .copied()
            .filter(|e| !e.is_nan())
            .fold(f64::MIN, f64::max);

        let gross_return = total_return(&result.equity.strategy);
        let net_return = total_return(&result.equity.strategy_net);
        let buy_hold_return = total_return(&result.equity.buy_and_hold);

        let bars = n as f64;
        let trade_growth: f64 = result
            .trades
            .iter()
            .map(|t| 1.0 + t.gross_return)
            .product();
        let mean_daily_return = trade_growth.powf(1.0 / bars) - 1.0;

        let net_growth: f64 = result
            .strategy_net_returns
            .iter()
            .map(|r| 1.0 + r)
            .product();
        let mean_daily_net_return = net_growth.powf(1.0 / bars) - 1.0;
        let annualized_return =
            (1.0 + mean_daily_net_return).powf(config.periods_per_year) - 1.0;

        let net_trade_returns: Vec<f64> =
            result.trades.iter().map(|t| t.net_return).collect();
        let annualized_volatility = risk::std_population(&net_trade_returns)
            .map(|s| s * config.periods_per_year.sqrt());

        let trade_count = result.trades.len();
        let trades_per_year = trade_count as f64 / (bars / config.periods_per_year);
        let win_rate = if trade_count > 0 {
            let winners = result.trades.iter().filter(|t| t.is_winner()).count();
            Some(winners as f64 / trade_count as f64)
        } else {
            log::warn!("No completed trades; win rate is undefined");
            None
        };

        let best_bar_return = result
            .strategy_net_returns
            .iter()
            .copied()
            .filter(|r| !r.is_nan())
            .fold(f64::MIN, f64::max);
        let worst_bar_return = result
            .strategy_net_returns
            .iter()
            .copied()
            .filter(|r| !r.is_nan())
            .fold(f64::MAX, f64::min);

        let curves = DrawdownCurves::from_returns(&result.strategy_net_returns, 1.0);
        let max_drawdown = curves.max_drawdown();
        let max_drawdown_date = curves.max_drawdown_index().map(|i| dates[i]);
        let episodes = curves.episodes(dates)?;
        let (avg_drawdown, max_dd_duration, avg_dd_duration) = episode_stats(&episodes);

        let sharpe_ratio = match annualized_volatility {
            Some(vol) if vol > f64::EPSILON => {
                Some((annualized_return - config.risk_free_adjustment) / vol)
            }
            _ => {
                log::warn!("Volatility is zero or undefined; Sharpe ratio is undefined");
                None
            }
        };

        let calmar_ratio = if max_drawdown < 0.0 {
            Some(annualized_return / -max_drawdown)
        } else {
            log::warn!("No drawdown occurred; Calmar ratio is undefined");
            None
        };

        Ok(Self {
            start,
            end,
            duration_days: (end - start).num_days(),
            final_equity,
            peak_equity,
            gross_return,
            net_return,
            buy_hold_return,
            mean_daily_return,
            mean_daily_net_return,
            annualized_return,
            annualized_volatility,
            trade_count,
            trades_per_year,
            win_rate,
            best_bar_return,
            worst_bar_return,
            max_drawdown,
            max_drawdown_date,
            avg_drawdown,
            max_drawdown_duration_days: max_dd_duration,
            avg_drawdown_duration_days: avg_dd_duration,
            sharpe_ratio,
            calmar_ratio,
        })
    }
}

fn total_return(equity: &[f64]) -> f64 {
    match (equity.first(), equity.last()) {
        (Some(&first), Some(&last)) if first != 0.0 => (last - first) / first,
        _ => 0.0,
    }
}

fn episode_stats(episodes: &[DrawdownEpisode]) -> (Option<f64>, Option<i64>, Option<f64>) {
    if episodes.is_empty() {
        return (None, None, None);
    }
    let count = episodes.len() as f64;
    let avg_depth = episodes.iter().map(|e| e.depth).sum::<f64>() / count;
    let max_duration = episodes.iter().map(|e| e.duration_days).max();
    let avg_duration =
        episodes.iter().map(|e| e.duration_days as f64).sum::<f64>() / count;
    (Some(avg_depth), max_duration, Some(avg_duration))
}

fn fmt_pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn fmt_opt<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "undefined".to_string(),
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<28}{}", "Start", self.start)?;
        writeln!(f, "{:<28}{}", "End", self.end)?;
        writeln!(f, "{:<28}{} days", "Duration", self.duration_days)?;
        writeln!(f, "{:<28}{:.2}", "Equity Final", self.final_equity)?;
        writeln!(f, "{:<28}{:.2}", "Equity Peak", self.peak_equity)?;
        writeln!(f, "{:<28}{}", "Return", fmt_pct(self.gross_return))?;
        writeln!(f, "{:<28}{}", "Net Return", fmt_pct(self.net_return))?;
        writeln!(
            f,
            "{:<28}{}",
            "Buy & Hold Return",
            fmt_pct(self.buy_hold_return)
        )?;
        writeln!(
            f,
            "{:<28}{}",
            "Annualized Return",
            fmt_pct(self.annualized_return)
        )?;
        writeln!(
            f,
            "{:<28}{}",
            "Annualized Volatility",
            fmt_opt(&self.annualized_volatility.map(|v| format!("{:.4}", v)))
        )?;
        writeln!(f, "{:<28}{}", "# Trades", self.trade_count)?;
        writeln!(
            f,
            "{:<28}{:.2}",
            "# Trades Per Year", self.trades_per_year
        )?;
        writeln!(
            f,
            "{:<28}{}",
            "Win Rate",
            fmt_opt(&self.win_rate.map(fmt_pct))
        )?;
        writeln!(f, "{:<28}{}", "Best Bar", fmt_pct(self.best_bar_return))?;
        writeln!(f, "{:<28}{}", "Worst Bar", fmt_pct(self.worst_bar_return))?;
        writeln!(f, "{:<28}{}", "Max Drawdown", fmt_pct(self.max_drawdown))?;
        writeln!(
            f,
            "{:<28}{}",
            "Max Drawdown Date",
            fmt_opt(&self.max_drawdown_date)
        )?;
        writeln!(
            f,
            "{:<28}{}",
            "Avg Drawdown",
            fmt_opt(&self.avg_drawdown.map(fmt_pct))
        )?;
        writeln!(
            f,
            "{:<28}{}",
            "Max Drawdown Duration",
            fmt_opt(
                &self
                    .max_drawdown_duration_days
                    .map(|d| format!("{} days", d))
            )
        )?;
        writeln!(
            f,
            "{:<28}{}",
            "Avg Drawdown Duration",
            fmt_opt(
                &self
                    .avg_drawdown_duration_days
                    .map(|d| format!("{:.1} days", d))
            )
        )?;
        writeln!(
            f,
            "{:<28}{}",
            "Sharpe Ratio",
            fmt_opt(&self.sharpe_ratio.map(|v| format!("{:.3}", v)))
        )?;
        writeln!(
            f,
            "{:<28}{}",
            "Calmar Ratio",
            fmt_opt(&self.calmar_ratio.map(|v| format!("{:.3}", v)))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::simulation::PositionSimulator;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(open: &[f64]) -> PriceSeries {
        let dates = (0..open.len())
            .map(|i| {
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
            })
            .collect();
        PriceSeries::new(
            dates,
            open.to_vec(),
            open.to_vec(),
            open.to_vec(),
            open.to_vec(),
            None,
        )
        .unwrap()
    }

    fn run(
        open: &[f64],
        prediction: &[f64],
        fee: f64,
    ) -> (PriceSeries, crate::simulation::SimulationResult) {
        let s = series(open);
        let config = SimulationConfig {
            initial_cash: 1000.0,
            fee,
        };
        let result = PositionSimulator::run(&s, prediction, &config).unwrap();
        (s, result)
    }

    #[test]
    fn zero_signal_report_has_undefined_ratios() {
        let (s, result) = run(
            &[100.0, 102.0, 101.0, 105.0, 107.0],
            &[0.0, 0.0, 0.0, 0.0, 0.0],
            0.002,
        );
        let report = PerformanceReport::compute(&s, &result, &ReportConfig::default()).unwrap();

        assert_eq!(report.trade_count, 0);
        assert!(report.win_rate.is_none());
        assert!(report.annualized_volatility.is_none());
        assert!(report.sharpe_ratio.is_none());
        assert!(report.calmar_ratio.is_none());
        assert_relative_eq!(report.net_return, 0.0, epsilon = 1e-12);
        assert_relative_eq!(report.final_equity, 1000.0, epsilon = 1e-12);
    }

    #[test]
    fn single_trade_report() {
        let (s, result) = run(
            &[100.0, 102.0, 101.0, 105.0, 107.0],
            &[1.0, 1.0, 0.0, 0.0, 0.0],
            0.0,
        );
        let report = PerformanceReport::compute(&s, &result, &ReportConfig::default()).unwrap();

        assert_eq!(report.trade_count, 1);
        assert_eq!(report.win_rate, Some(1.0));
        assert_eq!(report.duration_days, 4);
        assert_relative_eq!(
            report.gross_return,
            105.0 / 102.0 - 1.0,
            epsilon = 1e-9
        );
        // One trade: population std is zero, so Sharpe degenerates.
        assert_eq!(report.annualized_volatility, Some(0.0));
        assert!(report.sharpe_ratio.is_none());
    }

    #[test]
    fn losing_stretch_defines_drawdown_fields() {
        // In position while the market slides, then recovery out of position.
        let open = [100.0, 100.0, 90.0, 80.0, 80.0, 80.0];
        let prediction = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        let (s, result) = run(&open, &prediction, 0.0);
        let report = PerformanceReport::compute(&s, &result, &ReportConfig::default()).unwrap();

        assert!(report.max_drawdown < 0.0);
        assert!(report.max_drawdown_date.is_some());
        assert!(report.calmar_ratio.is_some());
        assert!(report.avg_drawdown.is_some());
        assert!(report.max_drawdown_duration_days.is_some());
        assert!(report.worst_bar_return < 0.0);
    }

    #[test]
    fn annualization_follows_the_daily_mean() {
        let (s, result) = run(
            &[100.0, 102.0, 101.0, 105.0, 107.0],
            &[1.0, 1.0, 0.0, 0.0, 0.0],
            0.0,
        );
        let report = PerformanceReport::compute(&s, &result, &ReportConfig::default()).unwrap();
        let expected =
            (1.0 + report.mean_daily_net_return).powf(252.0) - 1.0;
        assert_relative_eq!(report.annualized_return, expected, epsilon = 1e-12);
    }

    #[test]
    fn display_renders_undefined_fields() {
        let (s, result) = run(&[100.0, 101.0, 102.0], &[0.0, 0.0, 0.0], 0.0);
        let report = PerformanceReport::compute(&s, &result, &ReportConfig::default()).unwrap();
        let text = report.to_string();
        assert!(text.contains("Sharpe Ratio"));
        assert!(text.contains("undefined"));
    }

    #[test]
    fn report_serializes_to_json() {
        let (s, result) = run(
            &[100.0, 102.0, 101.0, 105.0, 107.0],
            &[1.0, 1.0, 0.0, 0.0, 0.0],
            0.002,
        );
        let report = PerformanceReport::compute(&s, &result, &ReportConfig::default()).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"trade_count\":1"));
    }
}

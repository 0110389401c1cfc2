//! Signal-driven position simulation.
//!
//! A prediction observed at bar `t` takes effect at bar `t+1`'s open: decide
//! today, act tomorrow. The position schedule is therefore the signal shifted
//! by one bar, entries and exits fill at the open of the bar where the
//! position flips, and per-bar strategy returns are open-to-open market moves
//! gated by the previous bar's position.

use crate::config::SimulationConfig;
use crate::data::PriceSeries;
use crate::error::{Result, SiglabError};
use crate::types::{EquityCurves, Trade};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// In-position flag per bar (the shifted signal).
    pub position: Vec<bool>,
    /// Open-to-open market return per bar; zero at the first bar.
    pub market_returns: Vec<f64>,
    /// Market return gated by the prior bar's position.
    pub strategy_returns: Vec<f64>,
    /// Strategy returns with the fee charged on exit bars.
    pub strategy_net_returns: Vec<f64>,
    pub equity: EquityCurves,
    /// Completed round trips, ordered by entry. An entry still open at the
    /// end of the data is not a trade.
    pub trades: Vec<Trade>,
}

pub struct PositionSimulator;

impl PositionSimulator {
    pub fn run(
        series: &PriceSeries,
        prediction: &[f64],
        config: &SimulationConfig,
    ) -> Result<SimulationResult> {
        config.validate()?;

        let n = series.len();
        if n == 0 {
            return Err(SiglabError::InsufficientData(
                "Cannot simulate an empty series".to_string(),
            ));
        }
        if prediction.len() != n {
            return Err(SiglabError::Alignment(format!(
                "Prediction length {} does not match {} bars",
                prediction.len(),
                n
            )));
        }

        // Anything but an exact 1.0 vote is flat.
        let signal: Vec<bool> = prediction.iter().map(|&p| p == 1.0).collect();

        let mut position = vec![false; n];
        for t in 1..n {
            position[t] = signal[t - 1];
        }

        let open = series.open();
        let dates = series.dates();

        let mut trades = Vec::new();
        let mut open_entry: Option<usize> = None;
        for t in 1..n {
            if position[t] && !position[t - 1] {
                open_entry = Some(t);
            } else if !position[t] && position[t - 1] {
                if let Some(entry) = open_entry.take() {
                    let gross_return = open[t] / open[entry] - 1.0;
                    trades.push(Trade {
                        entry_bar: entry,
                        exit_bar: t,
                        entry_date: dates[entry],
                        exit_date: dates[t],
                        entry_price: open[entry],
                        exit_price: open[t],
                        gross_return,
                        net_return: gross_return - config.fee,
                    });
                }
            }
        }
        if let Some(entry) = open_entry {
            log::debug!(
                "Position opened at bar {} is still open at the end of the data; not counted",
                entry
            );
        }

        let mut market_returns = vec![0.0; n];
        for t in 1..n {
            market_returns[t] = open[t] / open[t - 1] - 1.0;
        }

        let mut strategy_returns = vec![0.0; n];
        for t in 1..n {
            if position[t - 1] {
                strategy_returns[t] = market_returns[t];
            }
        }

        let mut strategy_net_returns = strategy_returns.clone();
        for trade in &trades {
            strategy_net_returns[trade.exit_bar] -= config.fee;
        }

        let equity = EquityCurves {
            buy_and_hold: compound(&market_returns, config.initial_cash),
            strategy: compound(&strategy_returns, config.initial_cash),
            strategy_net: compound(&strategy_net_returns, config.initial_cash),
        };

        Ok(SimulationResult {
            position,
            market_returns,
            strategy_returns,
            strategy_net_returns,
            equity,
            trades,
        })
    }
}

fn compound(returns: &[f64], cash: f64) -> Vec<f64> {
    let mut wealth = Vec::with_capacity(returns.len());
    let mut value = cash;
    for r in returns {
        value *= 1.0 + r;
        wealth.push(value);
    }
    wealth
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(open: &[f64]) -> PriceSeries {
        let dates = (0..open.len())
            .map(|i| {
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
            })
            .collect();
        let close = open.to_vec();
        PriceSeries::new(
            dates,
            open.to_vec(),
            open.to_vec(),
            open.to_vec(),
            close,
            None,
        )
        .unwrap()
    }

    fn no_fee() -> SimulationConfig {
        SimulationConfig {
            initial_cash: 1000.0,
            fee: 0.0,
        }
    }

    #[test]
    fn one_round_trip() {
        let s = series(&[100.0, 102.0, 101.0, 105.0, 107.0]);
        let prediction = [1.0, 1.0, 0.0, 0.0, 0.0];
        let result = PositionSimulator::run(&s, &prediction, &no_fee()).unwrap();

        assert_eq!(result.position, vec![false, true, true, false, false]);
        assert_eq!(result.trades.len(), 1);

        let trade = &result.trades[0];
        assert_eq!(trade.entry_bar, 1);
        assert_eq!(trade.exit_bar, 3);
        assert_eq!(trade.entry_price, 102.0);
        assert_eq!(trade.exit_price, 105.0);
        assert_relative_eq!(trade.gross_return, 105.0 / 102.0 - 1.0, epsilon = 1e-12);

        // Compounded strategy equity ends at the same ratio as the trade.
        let final_equity = *result.equity.strategy.last().unwrap();
        assert_relative_eq!(final_equity, 1000.0 * (105.0 / 102.0), epsilon = 1e-9);
    }

    #[test]
    fn all_zero_signal_is_flat() {
        let s = series(&[100.0, 102.0, 101.0, 105.0, 107.0]);
        let prediction = [0.0; 5];
        let result = PositionSimulator::run(&s, &prediction, &no_fee()).unwrap();

        assert!(result.trades.is_empty());
        assert!(result.position.iter().all(|p| !p));
        assert!(result
            .equity
            .strategy_net
            .iter()
            .all(|&e| (e - 1000.0).abs() < 1e-12));
    }

    #[test]
    fn dangling_entry_is_not_a_trade() {
        let s = series(&[100.0, 102.0, 104.0, 106.0]);
        let prediction = [1.0, 1.0, 1.0, 1.0];
        let result = PositionSimulator::run(&s, &prediction, &no_fee()).unwrap();

        assert!(result.trades.is_empty());
        // Still earns per-bar returns while holding.
        assert!(result.strategy_returns[2] > 0.0);
    }

    #[test]
    fn fee_charged_once_per_round_trip() {
        let s = series(&[100.0, 102.0, 101.0, 105.0, 107.0]);
        let prediction = [1.0, 1.0, 0.0, 0.0, 0.0];
        let config = SimulationConfig {
            initial_cash: 1000.0,
            fee: 0.002,
        };
        let result = PositionSimulator::run(&s, &prediction, &config).unwrap();

        let trade = &result.trades[0];
        assert_relative_eq!(
            trade.net_return,
            trade.gross_return - 0.002,
            epsilon = 1e-12
        );

        // Net bar return differs from gross only on the exit bar.
        for t in 0..s.len() {
            let expected = if t == trade.exit_bar {
                result.strategy_returns[t] - 0.002
            } else {
                result.strategy_returns[t]
            };
            assert_relative_eq!(result.strategy_net_returns[t], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn trade_count_matches_exit_count() {
        let s = series(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0, 107.0]);
        let prediction = [1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        let result = PositionSimulator::run(&s, &prediction, &no_fee()).unwrap();

        let exits = (1..s.len())
            .filter(|&t| !result.position[t] && result.position[t - 1])
            .count();
        assert_eq!(result.trades.len(), exits);
        for trade in &result.trades {
            assert!(trade.exit_bar > trade.entry_bar);
            assert!(trade.exit_date > trade.entry_date);
        }
    }

    #[test]
    fn non_unit_votes_stay_flat() {
        let s = series(&[100.0, 102.0, 104.0, 106.0]);
        let prediction = [0.7, 0.9, 0.7, 0.9];
        let result = PositionSimulator::run(&s, &prediction, &no_fee()).unwrap();
        assert!(result.position.iter().all(|p| !p));
        assert!(result.trades.is_empty());
    }

    #[test]
    fn misaligned_prediction_is_an_error() {
        let s = series(&[100.0, 102.0, 104.0]);
        let prediction = [1.0, 0.0];
        assert!(matches!(
            PositionSimulator::run(&s, &prediction, &no_fee()),
            Err(SiglabError::Alignment(_))
        ));
    }

    #[test]
    fn runs_are_idempotent() {
        let s = series(&[100.0, 102.0, 101.0, 105.0, 107.0, 103.0]);
        let prediction = [1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let a = PositionSimulator::run(&s, &prediction, &no_fee()).unwrap();
        let b = PositionSimulator::run(&s, &prediction, &no_fee()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn buy_and_hold_tracks_the_market() {
        let s = series(&[100.0, 110.0, 99.0]);
        let prediction = [0.0, 0.0, 0.0];
        let result = PositionSimulator::run(&s, &prediction, &no_fee()).unwrap();
        assert_relative_eq!(result.equity.buy_and_hold[0], 1000.0, epsilon = 1e-12);
        assert_relative_eq!(result.equity.buy_and_hold[1], 1100.0, epsilon = 1e-9);
        assert_relative_eq!(result.equity.buy_and_hold[2], 990.0, epsilon = 1e-9);
    }
}

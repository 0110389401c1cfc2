//! Seeded random-walk OHLC generator.
//!
//! Lets the demo binary and tests run without external market data. The walk
//! is deterministic for a given seed.

use crate::data::PriceSeries;
use crate::error::Result;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct RandomWalkConfig {
    pub start_date: NaiveDate,
    pub bars: usize,
    pub initial_price: f64,
    /// Mean daily return, e.g. 0.0005 for roughly 12% a year.
    pub drift: f64,
    /// Daily return noise amplitude.
    pub volatility: f64,
    pub seed: u64,
}

impl Default for RandomWalkConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(),
            bars: 500,
            initial_price: 100.0,
            drift: 0.0005,
            volatility: 0.015,
            seed: 42,
        }
    }
}

pub fn random_walk(config: &RandomWalkConfig) -> Result<PriceSeries> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut dates = Vec::with_capacity(config.bars);
    let mut open = Vec::with_capacity(config.bars);
    let mut high = Vec::with_capacity(config.bars);
    let mut low = Vec::with_capacity(config.bars);
    let mut close = Vec::with_capacity(config.bars);
    let mut volume = Vec::with_capacity(config.bars);

    let mut price = config.initial_price;
    for i in 0..config.bars {
        let noise: f64 = rng.gen_range(-1.0..1.0);
        let daily_return = config.drift + config.volatility * noise;

        let bar_open = price;
        let bar_close = (price * (1.0 + daily_return)).max(config.initial_price * 0.01);
        let span: f64 = rng.gen_range(0.0..config.volatility / 2.0);
        let bar_high = bar_open.max(bar_close) * (1.0 + span);
        let bar_low = bar_open.min(bar_close) * (1.0 - span);

        dates.push(config.start_date + Duration::days(i as i64));
        open.push(bar_open);
        high.push(bar_high);
        low.push(bar_low);
        close.push(bar_close);
        volume.push(rng.gen_range(10_000.0..100_000.0_f64).round());

        price = bar_close;
    }

    PriceSeries::new(dates, open, high, low, close, Some(volume))
}

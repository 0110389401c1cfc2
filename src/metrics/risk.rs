//! Return-series risk statistics.
//!
//! Everything operates on a plain slice of per-period returns and hands back
//! `None` for degenerate inputs (empty series, zero dispersion) instead of
//! NaN or a silent zero.

/// Population standard deviation.
pub fn std_population(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Sample standard deviation.
pub fn std_sample(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Population standard deviation of the negative returns only.
pub fn semi_deviation(returns: &[f64]) -> Option<f64> {
    let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    std_population(&negative)
}

/// Historic value-at-risk: the loss threshold exceeded in the worst `level`
/// percent of periods. Returned as a positive magnitude.
pub fn var_historic(returns: &[f64], level: f64) -> Option<f64> {
    percentile(returns, level).map(|p| -p)
}

/// Conditional VaR: the mean loss across the periods at or beyond the VaR
/// threshold, as a positive magnitude.
pub fn cvar_historic(returns: &[f64], level: f64) -> Option<f64> {
    let var = var_historic(returns, level)?;
    let tail: Vec<f64> = returns
        .iter()
        .copied()
        .filter(|r| *r <= -var)
        .collect();
    if tail.is_empty() {
        return None;
    }
    Some(-(tail.iter().sum::<f64>() / tail.len() as f64))
}

/// Third standardized moment, population flavor.
pub fn skewness(returns: &[f64]) -> Option<f64> {
    standardized_moment(returns, 3)
}

/// Fourth standardized moment, population flavor. Normal returns score 3.
pub fn kurtosis(returns: &[f64]) -> Option<f64> {
    standardized_moment(returns, 4)
}

fn standardized_moment(returns: &[f64], power: i32) -> Option<f64> {
    if returns.is_empty() {
        return None;
    }
    let sigma = std_population(returns)?;
    if sigma == 0.0 {
        return None;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let moment = returns.iter().map(|r| (r - mean).powi(power)).sum::<f64>() / n;
    Some(moment / sigma.powi(power))
}

/// Compounded growth scaled to a yearly rate.
pub fn annualize_returns(returns: &[f64], periods_per_year: f64) -> Option<f64> {
    if returns.is_empty() {
        return None;
    }
    let growth: f64 = returns.iter().map(|r| 1.0 + r).product();
    let n = returns.len() as f64;
    Some(growth.powf(periods_per_year / n) - 1.0)
}

/// Sample volatility scaled to a yearly rate.
pub fn annualize_volatility(returns: &[f64], periods_per_year: f64) -> Option<f64> {
    std_sample(returns).map(|s| s * periods_per_year.sqrt())
}

/// Annualized excess return over annualized volatility. The annual risk-free
/// rate is compounded down to one period before subtracting.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> Option<f64> {
    let rf_per_period = (1.0 + risk_free_rate).powf(1.0 / periods_per_year) - 1.0;
    let excess: Vec<f64> = returns.iter().map(|r| r - rf_per_period).collect();
    let annual_excess = annualize_returns(&excess, periods_per_year)?;
    let annual_vol = annualize_volatility(returns, periods_per_year)?;
    if annual_vol <= f64::EPSILON {
        return None;
    }
    Some(annual_excess / annual_vol)
}

/// Percentile with linear interpolation between order statistics.
fn percentile(values: &[f64], level: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=100.0).contains(&level) {
        return None;
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = level / 100.0 * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    if below == above {
        return Some(sorted[below]);
    }
    let weight = rank - below as f64;
    Some(sorted[below] * (1.0 - weight) + sorted[above] * weight)
}

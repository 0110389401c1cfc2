//! Interpolants over downsampled close prices.
//!
//! Evaluation outside the knot range yields NaN, so the un-smoothable tail of
//! a series can never produce turning-point events.

use crate::error::{Result, SiglabError};

/// Natural cubic spline over strictly increasing knots.
///
/// Second derivatives at the end knots are pinned to zero; the interior ones
/// come from the standard tridiagonal system solved with the Thomas
/// algorithm.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second_derivs: Vec<f64>,
}

impl CubicSpline {
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        let n = xs.len();
        if n != ys.len() {
            return Err(SiglabError::Alignment(format!(
                "{} knot positions vs {} values",
                n,
                ys.len()
            )));
        }
        if n < 2 {
            return Err(SiglabError::InsufficientData(
                "Spline needs at least 2 knots".to_string(),
            ));
        }
        for pair in xs.windows(2) {
            if pair[1] <= pair[0] {
                return Err(SiglabError::DataLoading(
                    "Spline knots must be strictly increasing".to_string(),
                ));
            }
        }

        let mut second_derivs = vec![0.0; n];
        if n > 2 {
            // Tridiagonal system for the n-2 interior second derivatives.
            let m = n - 2;
            let mut diag = vec![0.0; m];
            let mut upper = vec![0.0; m];
            let mut lower = vec![0.0; m];
            let mut rhs = vec![0.0; m];

            for i in 0..m {
                let h_left = xs[i + 1] - xs[i];
                let h_right = xs[i + 2] - xs[i + 1];
                lower[i] = h_left;
                diag[i] = 2.0 * (h_left + h_right);
                upper[i] = h_right;
                rhs[i] = 6.0
                    * ((ys[i + 2] - ys[i + 1]) / h_right - (ys[i + 1] - ys[i]) / h_left);
            }

            // Thomas forward sweep
            for i in 1..m {
                let factor = lower[i] / diag[i - 1];
                diag[i] -= factor * upper[i - 1];
                rhs[i] -= factor * rhs[i - 1];
            }
            // Back substitution
            second_derivs[m] = rhs[m - 1] / diag[m - 1];
            for i in (0..m - 1).rev() {
                second_derivs[i + 1] = (rhs[i] - upper[i] * second_derivs[i + 2]) / diag[i];
            }
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            second_derivs,
        })
    }

    /// Evaluate at `x`; NaN outside the knot range.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if x.is_nan() || x < self.xs[0] || x > self.xs[n - 1] {
            return f64::NAN;
        }

        let segment = match self.xs.partition_point(|&knot| knot <= x) {
            0 => 0,
            p => (p - 1).min(n - 2),
        };

        let h = self.xs[segment + 1] - self.xs[segment];
        let t = x - self.xs[segment];
        let m0 = self.second_derivs[segment];
        let m1 = self.second_derivs[segment + 1];
        let y0 = self.ys[segment];
        let y1 = self.ys[segment + 1];

        let b = (y1 - y0) / h - h * (2.0 * m0 + m1) / 6.0;
        let c = m0 / 2.0;
        let d = (m1 - m0) / (6.0 * h);

        y0 + b * t + c * t * t + d * t * t * t
    }
}

/// Piecewise-linear interpolation over strictly increasing knots; NaN outside
/// the knot range.
pub fn linear_interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let n = xs.len();
    if n < 2 || x.is_nan() || x < xs[0] || x > xs[n - 1] {
        return f64::NAN;
    }
    let segment = match xs.partition_point(|&knot| knot <= x) {
        0 => 0,
        p => (p - 1).min(n - 2),
    };
    let t = (x - xs[segment]) / (xs[segment + 1] - xs[segment]);
    ys[segment] + t * (ys[segment + 1] - ys[segment])
}

//! Ordinary least squares over a selection

use thiserror::Error;

use crate::record::{FieldId, RecordSet, RecordStore};

/// Fitted line `y = slope·x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionModel {
    pub slope: f64,
    pub intercept: f64,
    /// Number of (x, y) pairs used
    pub count: usize,
}

impl RegressionModel {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Why no line is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NoFit {
    #[error("need at least two points, got {count}")]
    TooFewPoints { count: usize },

    #[error("every x value is identical")]
    DegenerateX,
}

/// Single-pass accumulator for the closed-form fit
#[derive(Debug, Clone, Copy)]
pub struct LeastSquares {
    n: usize,
    sum_x: f64,
    sum_y: f64,
    sum_xy: f64,
    sum_x2: f64,
    min_x: f64,
    max_x: f64,
}

impl Default for LeastSquares {
    fn default() -> Self {
        Self {
            n: 0,
            sum_x: 0.0,
            sum_y: 0.0,
            sum_xy: 0.0,
            sum_x2: 0.0,
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
        }
    }
}

impl LeastSquares {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair; pairs with a NaN coordinate are ignored
    pub fn push(&mut self, x: f64, y: f64) {
        if x.is_nan() || y.is_nan() {
            return;
        }
        self.n += 1;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xy += x * y;
        self.sum_x2 += x * x;
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
    }

    pub fn count(&self) -> usize {
        self.n
    }

    pub fn solve(&self) -> Result<RegressionModel, NoFit> {
        if self.n < 2 {
            return Err(NoFit::TooFewPoints { count: self.n });
        }

        let n = self.n as f64;
        let denom = n * self.sum_x2 - self.sum_x * self.sum_x;
        // Rounding can leave a tiny non-zero denominator for identical x values
        if denom == 0.0 || self.min_x == self.max_x {
            return Err(NoFit::DegenerateX);
        }

        let slope = (n * self.sum_xy - self.sum_x * self.sum_y) / denom;
        let intercept = (self.sum_y - slope * self.sum_x) / n;

        Ok(RegressionModel {
            slope,
            intercept,
            count: self.n,
        })
    }
}

/// Fit `y` against `x` over `records`
pub fn fit(
    store: &RecordStore,
    records: &RecordSet,
    x: FieldId,
    y: FieldId,
) -> Result<RegressionModel, NoFit> {
    let mut acc = LeastSquares::new();
    for record in store.resolve(records) {
        acc.push(record.value(x), record.value(y));
    }
    acc.solve()
}

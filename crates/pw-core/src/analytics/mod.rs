//! Stateless analytics over an arbitrary record subset

mod aggregate;
mod regression;

pub use aggregate::{quantile_sorted, summarize, Aggregate, AggregateSnapshot};
pub use regression::{fit, LeastSquares, NoFit, RegressionModel};

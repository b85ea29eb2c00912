//! Moving-average engine.
//!
//! Four smoothing families implement the `MovingAverage` trait. Each one can be fed
//! sample by sample (`next`) or recomputed over a whole history (`compute`), and the
//! two paths must agree at every index. A strategy owns two `MovingAverageSeries`
//! (fast and slow) built from a `MaFamily` selector.
//!
//! Unlike warmup-NaN indicators, every family produces a value from the first
//! sample onward: partial windows average what exists.

pub mod ema;
pub mod hull;
pub mod sma;
pub mod wma;
pub mod zlema;

pub use ema::{ema_of_series, Ema};
pub use hull::Hull;
pub use sma::Sma;
pub use wma::{wma_of_series, Wma};
pub use zlema::Zlema;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// A smoothing function over an append-only sample stream.
///
/// # Causality
/// The value at index i may depend only on samples 0..=i (and on earlier outputs).
/// `compute(&samples[..=i])[i]` must equal the i-th value returned by `next`.
pub trait MovingAverage: Send + Sync {
    /// Human-readable name (e.g., "sma_9", "hull_21").
    fn name(&self) -> &str;

    /// Configured period.
    fn period(&self) -> usize;

    /// Consume the next sample and return the new average.
    fn next(&mut self, sample: f64) -> f64;

    /// Recompute the average over a full history, ignoring streaming state.
    fn compute(&self, samples: &[f64]) -> Vec<f64>;

    /// Drop all streaming state.
    fn reset(&mut self);
}

/// Moving-average family selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaFamily {
    #[default]
    #[serde(rename = "sma")]
    Simple,
    #[serde(rename = "ema")]
    Exponential,
    #[serde(rename = "zlema")]
    ZeroLagExponential,
    #[serde(rename = "hull")]
    Hull,
}

impl MaFamily {
    pub const ALL: [MaFamily; 4] = [
        MaFamily::Simple,
        MaFamily::Exponential,
        MaFamily::ZeroLagExponential,
        MaFamily::Hull,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            MaFamily::Simple => "sma",
            MaFamily::Exponential => "ema",
            MaFamily::ZeroLagExponential => "zlema",
            MaFamily::Hull => "hull",
        }
    }

    /// Build a fresh moving average of this family.
    ///
    /// A period below 1 is a configuration error.
    pub fn build(&self, period: usize) -> Result<Smoother, ConfigError> {
        if period < 1 {
            return Err(ConfigError::InvalidPeriod {
                series: self.prefix().to_string(),
                period,
            });
        }
        Ok(match self {
            MaFamily::Simple => Smoother::Sma(Sma::new(period)),
            MaFamily::Exponential => Smoother::Ema(Ema::new(period)),
            MaFamily::ZeroLagExponential => Smoother::Zlema(Zlema::new(period)),
            MaFamily::Hull => Smoother::Hull(Hull::new(period)),
        })
    }
}

impl std::fmt::Display for MaFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// One concrete moving average, dispatched by family.
///
/// Kept as an enum rather than a boxed trait object so a series can be cloned to
/// evaluate a provisional (unclosed) bar without touching the real state.
#[derive(Debug, Clone)]
pub enum Smoother {
    Sma(Sma),
    Ema(Ema),
    Zlema(Zlema),
    Hull(Hull),
}

impl Smoother {
    fn inner(&self) -> &dyn MovingAverage {
        match self {
            Smoother::Sma(ma) => ma,
            Smoother::Ema(ma) => ma,
            Smoother::Zlema(ma) => ma,
            Smoother::Hull(ma) => ma,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn MovingAverage {
        match self {
            Smoother::Sma(ma) => ma,
            Smoother::Ema(ma) => ma,
            Smoother::Zlema(ma) => ma,
            Smoother::Hull(ma) => ma,
        }
    }

    pub fn family(&self) -> MaFamily {
        match self {
            Smoother::Sma(_) => MaFamily::Simple,
            Smoother::Ema(_) => MaFamily::Exponential,
            Smoother::Zlema(_) => MaFamily::ZeroLagExponential,
            Smoother::Hull(_) => MaFamily::Hull,
        }
    }
}

impl MovingAverage for Smoother {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn period(&self) -> usize {
        self.inner().period()
    }

    fn next(&mut self, sample: f64) -> f64 {
        self.inner_mut().next(sample)
    }

    fn compute(&self, samples: &[f64]) -> Vec<f64> {
        self.inner().compute(samples)
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }
}

/// Append-only output series of one moving average.
///
/// `len()` always equals the number of samples pushed; index i is written once,
/// when sample i arrives, and never revisited.
#[derive(Debug, Clone)]
pub struct MovingAverageSeries {
    ma: Smoother,
    values: Vec<f64>,
}

impl MovingAverageSeries {
    pub fn new(family: MaFamily, period: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            ma: family.build(period)?,
            values: Vec::new(),
        })
    }

    /// Append one closed-bar sample and return the new value.
    pub fn push(&mut self, sample: f64) -> f64 {
        let value = self.ma.next(sample);
        self.values.push(value);
        value
    }

    /// Value the series would take if `sample` closed the next bar.
    /// Leaves the series untouched.
    pub fn provisional(&self, sample: f64) -> f64 {
        self.ma.clone().next(sample)
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn name(&self) -> &str {
        self.ma.name()
    }

    pub fn family(&self) -> MaFamily {
        self.ma.family()
    }

    pub fn period(&self) -> usize {
        self.ma.period()
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

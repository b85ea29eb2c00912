//! Linearly Weighted Moving Average (WMA).
//!
//! Weights 1..n over the last n samples, newest weighted highest. A partial
//! window of k < n samples uses weights 1..k.

use std::collections::VecDeque;

use super::MovingAverage;

#[derive(Debug, Clone)]
pub struct Wma {
    period: usize,
    name: String,
    window: VecDeque<f64>,
}

impl Wma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "WMA period must be >= 1");
        Self {
            period,
            name: format!("wma_{period}"),
            window: VecDeque::with_capacity(period + 1),
        }
    }
}

/// Weighted mean of `window` with weights 1..=len, oldest first.
fn weighted_mean<'a>(window: impl ExactSizeIterator<Item = &'a f64>) -> f64 {
    let len = window.len();
    let mut numerator = 0.0;
    for (k, &v) in window.enumerate() {
        numerator += (k + 1) as f64 * v;
    }
    let denominator = (len * (len + 1)) as f64 / 2.0;
    numerator / denominator
}

impl MovingAverage for Wma {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.period
    }

    fn next(&mut self, sample: f64) -> f64 {
        self.window.push_back(sample);
        if self.window.len() > self.period {
            self.window.pop_front();
        }
        weighted_mean(self.window.iter())
    }

    fn compute(&self, samples: &[f64]) -> Vec<f64> {
        wma_of_series(samples, self.period)
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}

/// Compute WMA values over a pre-extracted f64 slice.
/// Used by the Hull average, which weights two derived series.
pub fn wma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(period);
            weighted_mean(values[start..=i].iter())
        })
        .collect()
}

//! Simple Moving Average (SMA).
//!
//! Arithmetic mean of the last `period` samples. Before `period` samples exist the
//! mean covers whatever has arrived, so index 0 equals the first sample.

use std::collections::VecDeque;

use super::MovingAverage;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
    window: VecDeque<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
            window: VecDeque::with_capacity(period + 1),
        }
    }
}

impl MovingAverage for Sma {
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
        // Summed oldest first, the same order `compute` uses.
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }

    fn compute(&self, samples: &[f64]) -> Vec<f64> {
        (0..samples.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(self.period);
                let window = &samples[start..=i];
                window.iter().sum::<f64>() / window.len() as f64
            })
            .collect()
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}

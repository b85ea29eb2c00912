//! Zero-Lag Exponential Moving Average (ZLEMA).
//!
//! EMA of a lag-compensated input: x[t] + (x[t] - x[t - lag]), lag = (period - 1) / 2.
//! While t < lag the raw sample is used. Same alpha and seed as `Ema`.

use std::collections::VecDeque;

use super::ema::{ema_of_series, Ema};
use super::MovingAverage;

#[derive(Debug, Clone)]
pub struct Zlema {
    period: usize,
    lag: usize,
    name: String,
    /// The last `lag` raw samples, oldest first.
    history: VecDeque<f64>,
    ema: Ema,
}

impl Zlema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ZLEMA period must be >= 1");
        let lag = (period - 1) / 2;
        Self {
            period,
            lag,
            name: format!("zlema_{period}"),
            history: VecDeque::with_capacity(lag + 1),
            ema: Ema::new(period),
        }
    }

    pub fn lag(&self) -> usize {
        self.lag
    }
}

impl MovingAverage for Zlema {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.period
    }

    fn next(&mut self, sample: f64) -> f64 {
        let input = match self.history.front() {
            Some(&lagged) if self.lag > 0 && self.history.len() == self.lag => {
                sample + (sample - lagged)
            }
            _ => sample,
        };

        if self.lag > 0 {
            self.history.push_back(sample);
            if self.history.len() > self.lag {
                self.history.pop_front();
            }
        }

        self.ema.next(input)
    }

    fn compute(&self, samples: &[f64]) -> Vec<f64> {
        let compensated: Vec<f64> = samples
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                if self.lag > 0 && i >= self.lag {
                    x + (x - samples[i - self.lag])
                } else {
                    x
                }
            })
            .collect();
        ema_of_series(&compensated, self.period)
    }

    fn reset(&mut self) {
        self.history.clear();
        self.ema.reset();
    }
}

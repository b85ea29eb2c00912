//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: EMA[0] = x[0].

use super::MovingAverage;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    name: String,
    prev: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            alpha: smoothing_factor(period),
            name: format!("ema_{period}"),
            prev: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// alpha = 2 / (period + 1)
pub(crate) fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

impl MovingAverage for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.period
    }

    fn next(&mut self, sample: f64) -> f64 {
        let value = match self.prev {
            None => sample,
            Some(prev) => self.alpha * sample + (1.0 - self.alpha) * prev,
        };
        self.prev = Some(value);
        value
    }

    fn compute(&self, samples: &[f64]) -> Vec<f64> {
        ema_of_series(samples, self.period)
    }

    fn reset(&mut self) {
        self.prev = None;
    }
}

/// Compute EMA values over a pre-extracted f64 slice, seeded with the first value.
/// Used by composed averages (ZLEMA) that smooth a derived series.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    if period == 0 {
        return result;
    }
    let alpha = smoothing_factor(period);

    let mut prev: Option<f64> = None;
    for &v in values {
        let ema = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        result.push(ema);
        prev = Some(ema);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_sample() {
        let ema = Ema::new(1);
        let result = ema.compute(&[100.0, 200.0, 300.0]);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 0.5, seed = 10
        // 0.5*11 + 0.5*10 = 10.5
        // 0.5*12 + 0.5*10.5 = 11.25
        // 0.5*13 + 0.5*11.25 = 12.125
        // 0.5*14 + 0.5*12.125 = 13.0625
        let mut ema = Ema::new(3);
        assert_approx(ema.alpha(), 0.5, DEFAULT_EPSILON);
        let values: Vec<f64> = [10.0, 11.0, 12.0, 13.0, 14.0]
            .iter()
            .map(|&s| ema.next(s))
            .collect();
        assert_approx(values[0], 10.0, DEFAULT_EPSILON);
        assert_approx(values[1], 10.5, DEFAULT_EPSILON);
        assert_approx(values[2], 11.25, DEFAULT_EPSILON);
        assert_approx(values[3], 12.125, DEFAULT_EPSILON);
        assert_approx(values[4], 13.0625, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_9_alpha() {
        assert_approx(Ema::new(9).alpha(), 0.2, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_reset_reseeds() {
        let mut ema = Ema::new(3);
        ema.next(10.0);
        ema.next(20.0);
        ema.reset();
        assert_approx(ema.next(7.0), 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_of_series_matches_indicator() {
        let samples = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let mut ema = Ema::new(4);
        let streamed: Vec<f64> = samples.iter().map(|&s| ema.next(s)).collect();
        let series = ema_of_series(&samples, 4);
        for i in 0..samples.len() {
            assert_approx(streamed[i], series[i], DEFAULT_EPSILON);
        }
    }
}

//! Hull Moving Average (HMA).
//!
//! HMA = WMA(2 * WMA(x, round(n/2)) - WMA(x, n), round(sqrt(n))).
//! Every period argument is rounded to the nearest integer and clamped to >= 1.

use super::wma::{wma_of_series, Wma};
use super::MovingAverage;

#[derive(Debug, Clone)]
pub struct Hull {
    period: usize,
    name: String,
    half: Wma,
    full: Wma,
    smooth: Wma,
    half_period: usize,
    sqrt_period: usize,
}

impl Hull {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Hull period must be >= 1");
        let half_period = round_period(period as f64 / 2.0);
        let sqrt_period = round_period((period as f64).sqrt());
        Self {
            period,
            name: format!("hull_{period}"),
            half: Wma::new(half_period),
            full: Wma::new(period),
            smooth: Wma::new(sqrt_period),
            half_period,
            sqrt_period,
        }
    }

    pub fn half_period(&self) -> usize {
        self.half_period
    }

    pub fn sqrt_period(&self) -> usize {
        self.sqrt_period
    }
}

fn round_period(raw: f64) -> usize {
    (raw.round() as usize).max(1)
}

impl MovingAverage for Hull {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.period
    }

    fn next(&mut self, sample: f64) -> f64 {
        let raw = 2.0 * self.half.next(sample) - self.full.next(sample);
        self.smooth.next(raw)
    }

    fn compute(&self, samples: &[f64]) -> Vec<f64> {
        let half = wma_of_series(samples, self.half_period);
        let full = wma_of_series(samples, self.period);
        let raw: Vec<f64> = half
            .iter()
            .zip(full.iter())
            .map(|(h, f)| 2.0 * h - f)
            .collect();
        wma_of_series(&raw, self.sqrt_period)
    }

    fn reset(&mut self) {
        self.half.reset();
        self.full.reset();
        self.smooth.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn derived_periods() {
        let h = Hull::new(9);
        assert_eq!(h.half_period(), 5); // 4.5 rounds away from zero
        assert_eq!(h.sqrt_period(), 3);

        let h = Hull::new(1);
        assert_eq!(h.half_period(), 1);
        assert_eq!(h.sqrt_period(), 1);

        let h = Hull::new(16);
        assert_eq!(h.half_period(), 8);
        assert_eq!(h.sqrt_period(), 4);
    }

    #[test]
    fn hull_1_is_sample() {
        let mut hull = Hull::new(1);
        assert_approx(hull.next(10.0), 10.0, DEFAULT_EPSILON);
        assert_approx(hull.next(12.5), 12.5, DEFAULT_EPSILON);
    }

    #[test]
    fn hull_4_known_values() {
        // half = 2, sqrt = 2
        // wma2:  1, 5/3, 8/3, 11/3
        // wma4:  1, 5/3, 7/3, 3
        // raw:   1, 5/3, 3, 13/3
        // hull:  1, 13/9, 23/9, 35/9
        let hull = Hull::new(4);
        let result = hull.compute(&[1.0, 2.0, 3.0, 4.0]);
        assert_approx(result[0], 1.0, DEFAULT_EPSILON);
        assert_approx(result[1], 13.0 / 9.0, DEFAULT_EPSILON);
        assert_approx(result[2], 23.0 / 9.0, DEFAULT_EPSILON);
        assert_approx(result[3], 35.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn hull_has_no_lag_on_a_linear_trend_once_warm() {
        let samples: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let result = Hull::new(4).compute(&samples);
        for i in 4..samples.len() {
            assert_approx(result[i], samples[i], 1e-9);
        }
    }

    #[test]
    fn hull_streaming_matches_compute() {
        let samples = [5.0, 7.0, 6.0, 9.0, 11.0, 10.0, 8.0, 12.0, 13.0, 12.5];
        let mut hull = Hull::new(6);
        let full = hull.compute(&samples);
        for (i, &s) in samples.iter().enumerate() {
            assert_approx(hull.next(s), full[i], DEFAULT_EPSILON);
        }
    }
}

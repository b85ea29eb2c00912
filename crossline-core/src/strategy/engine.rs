//! Per-bar-close driver.
//!
//! On each closed bar the engine reads the configured source field for both trend
//! lines, extends them, classifies the newest transition, asks the host for its
//! position once, and sends at most one request sequence:
//! `[cancel_all_orders, flatten_position,] submit_entry`.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::StrategyConfig;
use crate::crossover::{classify, classify_at, CrossoverState};
use crate::domain::{Bar, Instrument, PositionSnapshot};
use crate::host::{ExecutionHost, SubmitOutcome};
use crate::indicators::MovingAverageSeries;
use crate::orders::{build_order_intent, OrderIntent};

use super::decision::{decide, Decision};
use super::StrategyError;

/// Everything one evaluation saw and did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationOutcome {
    pub bar_index: usize,
    pub fast: f64,
    pub slow: f64,
    pub crossover: CrossoverState,
    pub position: PositionSnapshot,
    pub decision: Decision,
    /// The intent handed to the host, if any.
    pub intent: Option<OrderIntent>,
    pub submit: Option<SubmitOutcome>,
}

impl EvaluationOutcome {
    pub fn submitted(&self) -> bool {
        self.intent.is_some()
    }
}

/// Would-be trend-line values for a bar that has not closed yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Provisional {
    pub fast: f64,
    pub slow: f64,
    pub crossover: CrossoverState,
}

/// Crossover strategy bound to one instrument.
///
/// Only the two series and the last evaluated bar index persist between calls. The
/// position is read from the host every time and never cached.
#[derive(Debug, Clone)]
pub struct CrossoverStrategy {
    config: StrategyConfig,
    instrument: Instrument,
    fast: MovingAverageSeries,
    slow: MovingAverageSeries,
    last_bar_index: Option<usize>,
    fingerprint: String,
}

impl CrossoverStrategy {
    pub fn new(config: StrategyConfig, instrument: Instrument) -> Result<Self, StrategyError> {
        config.validate()?;
        instrument.validate()?;
        let fast = MovingAverageSeries::new(config.fast.family, config.fast.period)?;
        let slow = MovingAverageSeries::new(config.slow.family, config.slow.period)?;
        let fingerprint = config.short_fingerprint();
        debug!(
            symbol = %instrument.symbol,
            fast = fast.name(),
            slow = slow.name(),
            config = %fingerprint,
            "strategy ready"
        );
        Ok(Self {
            config,
            instrument,
            fast,
            slow,
            last_bar_index: None,
            fingerprint,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn fast(&self) -> &MovingAverageSeries {
        &self.fast
    }

    pub fn slow(&self) -> &MovingAverageSeries {
        &self.slow
    }

    /// Number of closed bars consumed. Equals the length of both series.
    pub fn bars_processed(&self) -> usize {
        self.fast.len()
    }

    pub fn last_bar_index(&self) -> Option<usize> {
        self.last_bar_index
    }

    fn samples(&self, bar_index: usize, bar: &Bar) -> Result<(f64, f64), StrategyError> {
        let fast = bar.price(self.config.fast.source);
        let slow = bar.price(self.config.slow.source);
        for value in [fast, slow] {
            if !value.is_finite() {
                return Err(StrategyError::InvalidSample { bar_index, value });
            }
        }
        Ok((fast, slow))
    }

    /// Evaluate a closed bar and drive `host` with the resulting action.
    ///
    /// A rejected bar (out of order, or with a non-finite source sample) leaves the
    /// strategy untouched and sends nothing.
    pub fn on_bar_close<H: ExecutionHost>(
        &mut self,
        bar_index: usize,
        bar: &Bar,
        host: &mut H,
    ) -> Result<EvaluationOutcome, StrategyError> {
        if let Some(last) = self.last_bar_index {
            if bar_index <= last {
                return Err(StrategyError::NonMonotonicBar {
                    last,
                    received: bar_index,
                });
            }
        }
        let (fast_sample, slow_sample) = self.samples(bar_index, bar)?;

        let fast = self.fast.push(fast_sample);
        let slow = self.slow.push(slow_sample);
        self.last_bar_index = Some(bar_index);

        let newest = self.fast.len() - 1;
        let crossover = classify_at(self.fast.values(), self.slow.values(), newest);
        let position = host.position();
        debug!(
            bar_index,
            fast,
            slow,
            %crossover,
            state = %position.state(),
            "bar evaluated"
        );

        let decision = decide(crossover, &position, &self.config);
        let mut outcome = EvaluationOutcome {
            bar_index,
            fast,
            slow,
            crossover,
            position,
            decision,
            intent: None,
            submit: None,
        };

        match decision {
            Decision::Hold => {}
            Decision::Suppressed { side, reason } => {
                warn!(
                    bar_index,
                    %side,
                    %reason,
                    position = position.quantity,
                    "entry suppressed"
                );
            }
            Decision::Enter {
                side,
                flatten_first,
            } => {
                if flatten_first {
                    info!(bar_index, position = position.quantity, "cancel all and flatten");
                    host.cancel_all_orders();
                    host.flatten_position();
                }
                let intent = build_order_intent(
                    side,
                    &self.config,
                    &self.instrument,
                    bar_index,
                    flatten_first,
                );
                let submit = host.submit_entry(&intent);
                match &submit {
                    SubmitOutcome::Accepted => info!(
                        bar_index,
                        %side,
                        quantity = intent.quantity,
                        stop_offset = intent.stop_offset,
                        target_offset = intent.target_offset,
                        config = %self.fingerprint,
                        "entry submitted"
                    ),
                    SubmitOutcome::Rejected { reason } => warn!(
                        bar_index,
                        %side,
                        %reason,
                        "entry rejected by host"
                    ),
                }
                outcome.intent = Some(intent);
                outcome.submit = Some(submit);
            }
        }

        Ok(outcome)
    }

    /// Preview the trend lines as if `bar` closed now. Mutates nothing, sends nothing.
    pub fn provisional(&self, bar: &Bar) -> Result<Provisional, StrategyError> {
        let next_index = self.last_bar_index.map_or(0, |last| last + 1);
        let (fast_sample, slow_sample) = self.samples(next_index, bar)?;
        let fast = self.fast.provisional(fast_sample);
        let slow = self.slow.provisional(slow_sample);
        let crossover = match (self.fast.last(), self.slow.last()) {
            (Some(fast_prev), Some(slow_prev)) => classify(fast_prev, slow_prev, fast, slow),
            _ => CrossoverState::NoCross,
        };
        Ok(Provisional {
            fast,
            slow,
            crossover,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderSide, PriceField};
    use crate::host::{HostCall, RecordingHost};
    use crate::indicators::MaFamily;
    use chrono::NaiveDate;

    fn bar(i: usize, close: f64) -> Bar {
        let timestamp = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            + chrono::Duration::minutes(i as i64);
        Bar {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: 100.0,
        }
    }

    fn strategy(fast: usize, slow: usize) -> CrossoverStrategy {
        CrossoverStrategy::new(
            StrategyConfig::crossover(MaFamily::Exponential, fast, slow),
            Instrument::new("ES", 0.25),
        )
        .unwrap()
    }

    #[test]
    fn rejects_invalid_config_and_instrument() {
        let bad_period = StrategyConfig::crossover(MaFamily::Simple, 0, 9);
        assert!(matches!(
            CrossoverStrategy::new(bad_period, Instrument::new("ES", 0.25)),
            Err(StrategyError::Config(_))
        ));
        assert!(matches!(
            CrossoverStrategy::new(StrategyConfig::default(), Instrument::new("ES", 0.0)),
            Err(StrategyError::Config(_))
        ));
    }

    #[test]
    fn first_bar_never_crosses() {
        let mut s = strategy(1, 3);
        let mut host = RecordingHost::new();
        let outcome = s.on_bar_close(0, &bar(0, 100.0), &mut host).unwrap();
        assert_eq!(outcome.crossover, CrossoverState::NoCross);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn cross_up_from_short_flattens_then_buys() {
        let mut s = strategy(1, 3);
        let mut host = RecordingHost::with_position(-1);
        s.on_bar_close(0, &bar(0, 100.0), &mut host).unwrap();
        // Death cross while already short: suppressed, nothing sent.
        let outcome = s.on_bar_close(1, &bar(1, 98.0), &mut host).unwrap();
        assert_eq!(outcome.crossover, CrossoverState::CrossFromAbove);
        assert!(host.calls().is_empty());

        let outcome = s.on_bar_close(2, &bar(2, 110.0), &mut host).unwrap();
        assert_eq!(outcome.crossover, CrossoverState::CrossFromBelow);
        let calls = host.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], HostCall::CancelAllOrders);
        assert_eq!(calls[1], HostCall::FlattenPosition);
        match &calls[2] {
            HostCall::SubmitEntry(intent) => {
                assert_eq!(intent.side, OrderSide::Buy);
                assert!(intent.preceding_flatten);
                assert_eq!(intent.bar_index, 2);
            }
            other => panic!("expected entry, got {other:?}"),
        }
    }

    #[test]
    fn out_of_order_bar_changes_nothing() {
        let mut s = strategy(1, 3);
        let mut host = RecordingHost::new();
        s.on_bar_close(5, &bar(5, 100.0), &mut host).unwrap();
        let err = s.on_bar_close(5, &bar(5, 101.0), &mut host).unwrap_err();
        assert!(matches!(
            err,
            StrategyError::NonMonotonicBar {
                last: 5,
                received: 5
            }
        ));
        assert!(s.on_bar_close(4, &bar(4, 101.0), &mut host).is_err());
        assert_eq!(s.bars_processed(), 1);
        assert_eq!(s.last_bar_index(), Some(5));
    }

    #[test]
    fn repeated_bar_never_extends_the_series() {
        let mut s = CrossoverStrategy::new(
            StrategyConfig::crossover(MaFamily::Simple, 2, 3),
            Instrument::new("ES", 0.25),
        )
        .unwrap();
        let mut host = RecordingHost::new();
        s.on_bar_close(0, &bar(0, 100.0), &mut host).unwrap();
        s.on_bar_close(1, &bar(1, 110.0), &mut host).unwrap();
        let err = s.on_bar_close(1, &bar(1, 120.0), &mut host).unwrap_err();
        assert!(matches!(
            err,
            StrategyError::NonMonotonicBar {
                last: 1,
                received: 1
            }
        ));
        s.on_bar_close(2, &bar(2, 90.0), &mut host).unwrap();

        assert_eq!(s.bars_processed(), 3);
        assert_eq!(s.fast().values(), &[100.0, 105.0, 100.0]);
        assert_eq!(s.last_bar_index(), Some(2));
    }

    #[test]
    fn non_finite_sample_is_not_consumed() {
        let mut s = strategy(1, 3);
        let mut host = RecordingHost::new();
        s.on_bar_close(0, &bar(0, 100.0), &mut host).unwrap();
        let err = s.on_bar_close(1, &bar(1, f64::NAN), &mut host).unwrap_err();
        assert!(matches!(err, StrategyError::InvalidSample { bar_index: 1, .. }));
        assert_eq!(s.bars_processed(), 1);
        // The same index can be retried with a good bar.
        assert!(s.on_bar_close(1, &bar(1, 101.0), &mut host).is_ok());
    }

    #[test]
    fn provisional_previews_without_mutating() {
        let mut s = strategy(1, 3);
        let mut host = RecordingHost::new();
        s.on_bar_close(0, &bar(0, 100.0), &mut host).unwrap();
        s.on_bar_close(1, &bar(1, 99.0), &mut host).unwrap();
        let sent = host.calls().len();

        let preview = s.provisional(&bar(2, 120.0)).unwrap();
        assert_eq!(preview.crossover, CrossoverState::CrossFromBelow);
        assert_eq!(s.bars_processed(), 2);
        assert_eq!(host.calls().len(), sent);

        let closed = s.on_bar_close(2, &bar(2, 120.0), &mut host).unwrap();
        assert_eq!(closed.fast, preview.fast);
        assert_eq!(closed.slow, preview.slow);
    }

    #[test]
    fn each_series_reads_its_own_source() {
        let mut config = StrategyConfig::crossover(MaFamily::Simple, 1, 1);
        config.fast = config.fast.with_source(PriceField::High);
        config.slow = config.slow.with_source(PriceField::Low);
        let mut s = CrossoverStrategy::new(config, Instrument::new("ES", 0.25)).unwrap();
        let mut host = RecordingHost::new();
        let mut b = bar(0, 100.0);
        b.high = 101.0;
        b.low = 99.0;
        let outcome = s.on_bar_close(0, &b, &mut host).unwrap();
        assert_eq!(outcome.fast, 101.0);
        assert_eq!(outcome.slow, 99.0);
    }

    #[test]
    fn provisional_before_any_bar_is_no_cross() {
        let s = strategy(1, 3);
        let preview = s.provisional(&bar(0, 100.0)).unwrap();
        assert_eq!(preview.crossover, CrossoverState::NoCross);
        assert_eq!(preview.fast, 100.0);
    }
}

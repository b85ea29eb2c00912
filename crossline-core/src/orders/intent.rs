use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::domain::{Instrument, OrderKind, OrderSide, StopKind, TargetKind, TimeInForce};

/// A request to enter the market with an attached exit bracket.
///
/// Offsets are price distances from the eventual fill, always non-negative. The host
/// places the stop on the losing side of the fill and the target on the winning side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub side: OrderSide,
    pub quantity: u32,
    pub order_kind: OrderKind,
    pub time_in_force: TimeInForce,
    pub stop_offset: f64,
    pub target_offset: f64,
    pub stop_kind: StopKind,
    pub target_kind: TargetKind,
    /// The host was asked to cancel all orders and flatten before this entry.
    pub preceding_flatten: bool,
    /// Bar index of the crossover that produced this intent.
    pub bar_index: usize,
}

impl OrderIntent {
    /// Initial protective stop price for an entry filled at `fill`.
    pub fn stop_price(&self, fill: f64) -> f64 {
        fill - self.side.sign() as f64 * self.stop_offset
    }

    /// Profit target price for an entry filled at `fill`.
    pub fn target_price(&self, fill: f64) -> f64 {
        fill + self.side.sign() as f64 * self.target_offset
    }

    /// Signed quantity this entry adds to the net position.
    pub fn signed_quantity(&self) -> i64 {
        self.side.sign() * i64::from(self.quantity)
    }
}

/// Builds an `OrderIntent` from the strategy's bracket settings.
pub struct OrderIntentBuilder<'a> {
    config: &'a StrategyConfig,
    instrument: &'a Instrument,
    preceding_flatten: bool,
    bar_index: usize,
}

impl<'a> OrderIntentBuilder<'a> {
    pub fn new(config: &'a StrategyConfig, instrument: &'a Instrument) -> Self {
        Self {
            config,
            instrument,
            preceding_flatten: false,
            bar_index: 0,
        }
    }

    pub fn with_preceding_flatten(mut self, flatten: bool) -> Self {
        self.preceding_flatten = flatten;
        self
    }

    pub fn at_bar(mut self, bar_index: usize) -> Self {
        self.bar_index = bar_index;
        self
    }

    pub fn build(self, side: OrderSide) -> OrderIntent {
        OrderIntent {
            side,
            quantity: self.config.order_quantity,
            order_kind: OrderKind::Market,
            time_in_force: TimeInForce::GoodTillCanceled,
            stop_offset: self.instrument.ticks_to_price(self.config.stop_ticks),
            target_offset: self.instrument.ticks_to_price(self.config.target_ticks),
            stop_kind: self.config.stop_kind,
            target_kind: TargetKind::Limit,
            preceding_flatten: self.preceding_flatten,
            bar_index: self.bar_index,
        }
    }
}

/// Pure constructor: same inputs always give the same intent.
pub fn build_order_intent(
    side: OrderSide,
    config: &StrategyConfig,
    instrument: &Instrument,
    bar_index: usize,
    preceding_flatten: bool,
) -> OrderIntent {
    OrderIntentBuilder::new(config, instrument)
        .with_preceding_flatten(preceding_flatten)
        .at_bar(bar_index)
        .build(side)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn es() -> Instrument {
        Instrument::new("ES", 0.25)
    }

    #[test]
    fn default_bracket_is_80_ticks_each_side() {
        let config = StrategyConfig::default();
        let intent = build_order_intent(OrderSide::Buy, &config, &es(), 12, false);
        assert_eq!(intent.quantity, 1);
        assert_eq!(intent.order_kind, OrderKind::Market);
        assert_eq!(intent.time_in_force, TimeInForce::GoodTillCanceled);
        assert_eq!(intent.stop_offset, 20.0);
        assert_eq!(intent.target_offset, 20.0);
        assert_eq!(intent.stop_kind, StopKind::Trailing);
        assert_eq!(intent.target_kind, TargetKind::Limit);
        assert_eq!(intent.bar_index, 12);
        assert!(!intent.preceding_flatten);
    }

    #[test]
    fn bracket_prices_follow_side() {
        let config = StrategyConfig {
            stop_ticks: 8,
            target_ticks: 16,
            ..StrategyConfig::default()
        };
        let long = build_order_intent(OrderSide::Buy, &config, &es(), 0, false);
        assert_eq!(long.stop_price(4500.0), 4498.0);
        assert_eq!(long.target_price(4500.0), 4504.0);

        let short = build_order_intent(OrderSide::Sell, &config, &es(), 0, true);
        assert_eq!(short.stop_price(4500.0), 4502.0);
        assert_eq!(short.target_price(4500.0), 4496.0);
        assert!(short.preceding_flatten);
    }

    #[test]
    fn quantity_and_stop_kind_come_from_config() {
        let config = StrategyConfig {
            order_quantity: 3,
            stop_kind: StopKind::Fixed,
            ..StrategyConfig::default()
        };
        let intent = OrderIntentBuilder::new(&config, &es()).build(OrderSide::Sell);
        assert_eq!(intent.quantity, 3);
        assert_eq!(intent.signed_quantity(), -3);
        assert_eq!(intent.stop_kind, StopKind::Fixed);
    }

    #[test]
    fn build_is_deterministic() {
        let config = StrategyConfig::default();
        let a = build_order_intent(OrderSide::Buy, &config, &es(), 5, true);
        let b = build_order_intent(OrderSide::Buy, &config, &es(), 5, true);
        assert_eq!(a, b);
    }
}

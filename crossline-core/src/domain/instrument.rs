use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Instrument metadata supplied by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    pub symbol: String,
    pub tick_size: f64,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, tick_size: f64) -> Self {
        Self {
            symbol: symbol.into(),
            tick_size,
        }
    }

    /// Tick size must be a positive, finite real.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_size.is_finite() && self.tick_size > 0.0) {
            return Err(ConfigError::InvalidTickSize(self.tick_size));
        }
        Ok(())
    }

    /// Price distance covered by `ticks` ticks.
    pub fn ticks_to_price(&self, ticks: u32) -> f64 {
        f64::from(ticks) * self.tick_size
    }

    /// Round a price to the nearest tick.
    pub fn round_to_tick(&self, price: f64) -> f64 {
        (price / self.tick_size).round() * self.tick_size
    }
}

//! Bar: one closed unit of market data, and the field selector the series read from it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLCV bar delivered by the host once the bar has closed.
///
/// For a closed bar the last traded price is the close, so `PriceField::Last`
/// and `PriceField::Close` select the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Basic OHLC sanity check: high >= low and both bound open and close.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }

    /// Select the sample a moving average consumes from this bar.
    pub fn price(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close | PriceField::Last => self.close,
            PriceField::Hl2 => (self.high + self.low) / 2.0,
            PriceField::Hlc3 => (self.high + self.low + self.close) / 3.0,
            PriceField::Ohlc4 => (self.open + self.high + self.low + self.close) / 4.0,
        }
    }
}

/// Which bar field feeds a moving-average series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    #[default]
    Last,
    /// (high + low) / 2
    Hl2,
    /// (high + low + close) / 3
    Hlc3,
    /// (open + high + low + close) / 4
    Ohlc4,
}

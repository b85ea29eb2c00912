//! Strategy configuration: per-series smoothing settings, bracket distances and the
//! entry gates.
//!
//! Every field defaults to the stock crossover study inputs (period 9 on `last`, 80-tick
//! stop and target, one contract, one open position). Configs load
//! from TOML, are validated once, and are immutable afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PriceField, StopKind};
use crate::indicators::MaFamily;

// ─── Error type ──────────────────────────────────────────────────────

/// Errors raised while building or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{series} period must be >= 1 (got {period})")]
    InvalidPeriod { series: String, period: usize },

    #[error("tick size must be positive and finite (got {0})")]
    InvalidTickSize(f64),

    #[error("order quantity must be >= 1")]
    InvalidQuantity,

    #[error("max position must be >= 1")]
    InvalidMaxPosition,

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Series config ───────────────────────────────────────────────────

fn default_period() -> usize {
    9
}

/// Smoothing settings of one trend line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    #[serde(default = "default_period")]
    pub period: usize,
    #[serde(default)]
    pub source: PriceField,
    #[serde(default)]
    pub family: MaFamily,
}

impl SeriesConfig {
    pub fn new(family: MaFamily, period: usize) -> Self {
        Self {
            period,
            source: PriceField::Last,
            family,
        }
    }

    pub fn with_source(mut self, source: PriceField) -> Self {
        self.source = source;
        self
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self::new(MaFamily::Simple, default_period())
    }
}

// ─── Strategy config ─────────────────────────────────────────────────

fn default_ticks() -> u32 {
    80
}

fn default_one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(default)]
    pub fast: SeriesConfig,
    #[serde(default)]
    pub slow: SeriesConfig,
    #[serde(default = "default_ticks")]
    pub target_ticks: u32,
    #[serde(default = "default_ticks")]
    pub stop_ticks: u32,
    #[serde(default = "default_one")]
    pub order_quantity: u32,
    #[serde(default = "default_one")]
    pub max_position: u32,
    #[serde(default)]
    pub allow_multiple_entries_same_direction: bool,
    #[serde(default)]
    pub stop_kind: StopKind,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            fast: SeriesConfig::default(),
            slow: SeriesConfig::default(),
            target_ticks: default_ticks(),
            stop_ticks: default_ticks(),
            order_quantity: 1,
            max_position: 1,
            allow_multiple_entries_same_direction: false,
            stop_kind: StopKind::Trailing,
        }
    }
}

impl StrategyConfig {
    /// Both series use `family` with the given periods; everything else defaulted.
    pub fn crossover(family: MaFamily, fast_period: usize, slow_period: usize) -> Self {
        Self {
            fast: SeriesConfig::new(family, fast_period),
            slow: SeriesConfig::new(family, slow_period),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fast.period < 1 {
            return Err(ConfigError::InvalidPeriod {
                series: "fast".into(),
                period: self.fast.period,
            });
        }
        if self.slow.period < 1 {
            return Err(ConfigError::InvalidPeriod {
                series: "slow".into(),
                period: self.slow.period,
            });
        }
        if self.order_quantity < 1 {
            return Err(ConfigError::InvalidQuantity);
        }
        if self.max_position < 1 {
            return Err(ConfigError::InvalidMaxPosition);
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: StrategyConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// blake3 hash of the canonical JSON form, hex encoded.
    ///
    /// Struct fields serialize in declaration order, so equal configs always hash equal.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("StrategyConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// First 12 hex characters of `fingerprint()`, for log lines.
    pub fn short_fingerprint(&self) -> String {
        let mut fp = self.fingerprint();
        fp.truncate(12);
        fp
    }
}

// ─── StrategyPreset ─────────────────────────────────────────────────

/// The four stock crossover studies, one per smoothing family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyPreset {
    SmaCrossover,
    EmaCrossover,
    ZlemaCrossover,
    HullCrossover,
}

impl StrategyPreset {
    pub fn family(self) -> MaFamily {
        match self {
            Self::SmaCrossover => MaFamily::Simple,
            Self::EmaCrossover => MaFamily::Exponential,
            Self::ZlemaCrossover => MaFamily::ZeroLagExponential,
            Self::HullCrossover => MaFamily::Hull,
        }
    }

    /// Study defaults: both periods 9 on `last`, 80/80 tick bracket, trailing stop.
    pub fn to_config(self) -> StrategyConfig {
        StrategyConfig::crossover(self.family(), default_period(), default_period())
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SmaCrossover => "sma_crossover",
            Self::EmaCrossover => "ema_crossover",
            Self::ZlemaCrossover => "zlema_crossover",
            Self::HullCrossover => "hull_crossover",
        }
    }

    /// All presets as a slice.
    pub fn all() -> &'static [StrategyPreset] {
        &[
            Self::SmaCrossover,
            Self::EmaCrossover,
            Self::ZlemaCrossover,
            Self::HullCrossover,
        ]
    }

    /// Look up a preset by its family prefix (`sma`, `ema`, `zlema`, `hull`).
    pub fn from_family_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.family().prefix() == name)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

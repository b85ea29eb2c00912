//! Crossline Core: moving-average crossover decision core.
//!
//! This crate turns a stream of closed bars into trading requests:
//! - Domain types (bars, price fields, instruments, positions, order enums)
//! - Moving-average engine (SMA, EMA, zero-lag EMA, Hull), streaming and recompute
//! - Crossover detector over two aligned trend lines
//! - Decision engine mapping crossover and position to one entry, with gates
//! - Order intents with a tick-based stop/target bracket
//! - `ExecutionHost` seam plus recording and paper hosts
//! - TOML configuration, presets and fingerprints

pub mod config;
pub mod crossover;
pub mod domain;
pub mod host;
pub mod indicators;
pub mod orders;
pub mod strategy;

pub use config::{ConfigError, SeriesConfig, StrategyConfig, StrategyPreset};
pub use crossover::{classify, classify_at, CrossoverState};
pub use host::{ExecutionHost, HostCall, PaperHost, RecordingHost, SubmitOutcome};
pub use indicators::{MaFamily, MovingAverage, MovingAverageSeries};
pub use orders::{build_order_intent, OrderIntent};
pub use strategy::{CrossoverStrategy, Decision, EvaluationOutcome, StrategyError};

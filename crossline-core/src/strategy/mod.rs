//! Strategy decision engine.
//!
//! `decision` holds the pure position-by-crossover table with its entry gates;
//! `engine` owns the two trend lines and drives a host once per closed bar.

pub mod decision;
pub mod engine;

pub use decision::{decide, Decision, SuppressReason};
pub use engine::{CrossoverStrategy, EvaluationOutcome, Provisional};

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("bar {received} is not after the last evaluated bar {last}")]
    NonMonotonicBar { last: usize, received: usize },

    #[error("bar {bar_index}: source sample {value} is not finite")]
    InvalidSample { bar_index: usize, value: f64 },
}

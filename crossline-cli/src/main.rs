//! Crossline CLI: replay closed bars through the crossover core.
//!
//! Commands:
//! - `replay`: drive a strategy bar by bar from a CSV against a paper host
//! - `presets`: list the built-in crossover presets and their fingerprints

mod bars;
mod logging;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossline_core::domain::{Bar, Instrument};
use crossline_core::host::{PaperHost, SubmitOutcome};
use crossline_core::strategy::Decision;
use crossline_core::{CrossoverStrategy, StrategyConfig, StrategyError, StrategyPreset};
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "crossline",
    about = "Crossline CLI: moving-average crossover decision replay"
)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a CSV of closed bars (timestamp,open,high,low,close,volume).
    Replay {
        /// Path to the bar CSV.
        #[arg(long)]
        bars: PathBuf,

        /// Path to a TOML strategy config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Named preset: sma, ema, zlema, hull. Defaults to sma.
        #[arg(long)]
        preset: Option<String>,

        /// Override the fast period.
        #[arg(long)]
        fast_period: Option<usize>,

        /// Override the slow period.
        #[arg(long)]
        slow_period: Option<usize>,

        /// Instrument symbol.
        #[arg(long, default_value = "ES")]
        symbol: String,

        /// Minimum price increment of the instrument.
        #[arg(long, default_value_t = 0.25)]
        tick_size: f64,
    },
    /// List built-in presets.
    Presets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.json);

    match cli.command {
        Commands::Replay {
            bars,
            config,
            preset,
            fast_period,
            slow_period,
            symbol,
            tick_size,
        } => {
            let config = resolve_config(config, preset, fast_period, slow_period)?;
            let instrument = Instrument::new(symbol, tick_size);
            let bars = bars::read_bars(&bars)?;
            let summary = replay(&bars, config, instrument, |line| println!("{line}"))?;
            print_summary(&summary);
            Ok(())
        }
        Commands::Presets => {
            for preset in StrategyPreset::all() {
                let config = preset.to_config();
                println!(
                    "{:<16} {:<6} fast={} slow={} stop={}t target={}t  {}",
                    preset.name(),
                    preset.family(),
                    config.fast.period,
                    config.slow.period,
                    config.stop_ticks,
                    config.target_ticks,
                    config.short_fingerprint()
                );
            }
            Ok(())
        }
    }
}

fn resolve_config(
    config_path: Option<PathBuf>,
    preset_name: Option<String>,
    fast_period: Option<usize>,
    slow_period: Option<usize>,
) -> Result<StrategyConfig> {
    if config_path.is_some() && preset_name.is_some() {
        bail!("--config and --preset are mutually exclusive");
    }

    let mut config = match (config_path, preset_name) {
        (Some(path), _) => StrategyConfig::load_toml(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        (None, Some(name)) => match StrategyPreset::from_family_name(&name) {
            Some(preset) => preset.to_config(),
            None => bail!("unknown preset '{name}' (expected sma, ema, zlema or hull)"),
        },
        (None, None) => StrategyPreset::SmaCrossover.to_config(),
    };

    if let Some(period) = fast_period {
        config.fast.period = period;
    }
    if let Some(period) = slow_period {
        config.slow.period = period;
    }
    config.validate()?;
    Ok(config)
}

/// Totals of one replay.
#[derive(Debug, Default, Clone, PartialEq)]
struct ReplaySummary {
    fingerprint: String,
    bars: usize,
    skipped: usize,
    crossovers: usize,
    accepted: usize,
    rejected: usize,
    suppressed: usize,
    final_position: i64,
}

/// Drive `bars` through a fresh strategy and paper host, reporting each action to `emit`.
fn replay(
    bars: &[Bar],
    config: StrategyConfig,
    instrument: Instrument,
    mut emit: impl FnMut(String),
) -> Result<ReplaySummary> {
    let mut host = PaperHost::from_config(&config);
    let mut summary = ReplaySummary {
        fingerprint: config.short_fingerprint(),
        ..ReplaySummary::default()
    };
    let mut strategy = CrossoverStrategy::new(config, instrument)?;
    info!(
        bars = bars.len(),
        fast = strategy.fast().name(),
        slow = strategy.slow().name(),
        config = %summary.fingerprint,
        "replay started"
    );

    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_void() && !bar.is_sane() {
            warn!(
                bar_index = i,
                timestamp = %bar.timestamp,
                "bar high/low do not bound open/close"
            );
        }
        let outcome = match strategy.on_bar_close(i, bar, &mut host) {
            Ok(outcome) => outcome,
            Err(StrategyError::InvalidSample { bar_index, value }) => {
                warn!(bar_index, value, "skipping bar with unusable sample");
                summary.skipped += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        summary.bars += 1;
        if outcome.crossover.is_cross() {
            summary.crossovers += 1;
        }

        match (&outcome.decision, &outcome.intent, &outcome.submit) {
            (Decision::Enter { .. }, Some(intent), Some(submit)) => {
                let status = match submit {
                    SubmitOutcome::Accepted => {
                        summary.accepted += 1;
                        "accepted".to_string()
                    }
                    SubmitOutcome::Rejected { reason } => {
                        summary.rejected += 1;
                        format!("rejected ({reason})")
                    }
                };
                emit(format!(
                    "{} bar={} {} {} qty={} stop={} target={}{} {}",
                    bar.timestamp,
                    outcome.bar_index,
                    outcome.crossover,
                    intent.side,
                    intent.quantity,
                    strategy.instrument().round_to_tick(intent.stop_price(bar.close)),
                    strategy.instrument().round_to_tick(intent.target_price(bar.close)),
                    if intent.preceding_flatten { " after flatten" } else { "" },
                    status
                ));
            }
            (Decision::Suppressed { side, reason }, _, _) => {
                summary.suppressed += 1;
                emit(format!(
                    "{} bar={} {} {} suppressed ({})",
                    bar.timestamp, outcome.bar_index, outcome.crossover, side, reason
                ));
            }
            _ => {}
        }
    }

    summary.final_position = host.quantity();
    Ok(summary)
}

fn print_summary(summary: &ReplaySummary) {
    println!();
    println!("=== Replay Summary ===");
    println!("Config:          {}", summary.fingerprint);
    println!("Bars evaluated:  {}", summary.bars);
    if summary.skipped > 0 {
        println!("Bars skipped:    {}", summary.skipped);
    }
    println!("Crossovers:      {}", summary.crossovers);
    println!("Entries sent:    {}", summary.accepted);
    println!("Rejected:        {}", summary.rejected);
    println!("Suppressed:      {}", summary.suppressed);
    println!("Final position:  {}", summary.final_position);
}

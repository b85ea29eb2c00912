//! CSV bar loading: `timestamp,open,high,low,close,volume`, one closed bar per row.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use crossline_core::domain::Bar;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BarRecord {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Accepts `YYYY-MM-DD HH:MM[:SS]`, the RFC 3339-style `T` separator, or a bare date
/// (midnight).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }
    bail!("unrecognised timestamp '{raw}'")
}

pub fn read_bars(path: &Path) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut bars = Vec::new();
    for (row, record) in reader.deserialize::<BarRecord>().enumerate() {
        let record = record.with_context(|| format!("row {} of {}", row + 1, path.display()))?;
        let timestamp = parse_timestamp(&record.timestamp)
            .with_context(|| format!("row {} of {}", row + 1, path.display()))?;
        bars.push(Bar {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        });
    }

    for pair in bars.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            bail!(
                "bars out of order in {}: {} follows {}",
                path.display(),
                pair[1].timestamp,
                pair[0].timestamp
            );
        }
    }
    Ok(bars)
}

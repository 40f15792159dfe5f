//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<symbol>.csv`, with header
//! `timestamp,open,high,low,close,volume`. Columns are located by header
//! name, so their order is free and extra columns are ignored.

use crate::domain::error::IchimokuError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

const COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or a bare date (midnight).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, IchimokuError> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| IchimokuError::Data {
            reason: format!("invalid timestamp '{}'", raw),
        })
}

/// Positions of [`COLUMNS`] within the header row.
fn column_indices(headers: &csv::StringRecord) -> Result<[usize; 6], IchimokuError> {
    let mut indices = [0usize; 6];
    for (slot, name) in indices.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| IchimokuError::Data {
                reason: format!("missing {} column in header", name),
            })?;
    }
    Ok(indices)
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'r str, IchimokuError> {
    record.get(index).ok_or_else(|| IchimokuError::Data {
        reason: format!("missing {} value", name),
    })
}

fn parse_field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<f64, IchimokuError> {
    field(record, index, name)?
        .trim()
        .parse()
        .map_err(|e| IchimokuError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(&self, symbol: &str) -> Result<Vec<OhlcvBar>, IchimokuError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| IchimokuError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| IchimokuError::Data {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let [ts, open, high, low, close, volume] = column_indices(headers)?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| IchimokuError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            bars.push(OhlcvBar {
                timestamp: parse_timestamp(field(&record, ts, "timestamp")?)?,
                open: parse_field(&record, open, "open")?,
                high: parse_field(&record, high, "high")?,
                low: parse_field(&record, low, "low")?,
                close: parse_field(&record, close, "close")?,
                volume: parse_field(&record, volume, "volume")?,
            });
        }

        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, IchimokuError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| IchimokuError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| IchimokuError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

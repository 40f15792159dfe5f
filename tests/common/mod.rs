#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use ichimoku::domain::error::IchimokuError;
use ichimoku::domain::indicator::ichimoku::IchimokuConfig;
pub use ichimoku::domain::ohlcv::OhlcvBar;
use ichimoku::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(&self, symbol: &str) -> Result<Vec<OhlcvBar>, IchimokuError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(IchimokuError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, IchimokuError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn hours(n: i64) -> NaiveDateTime {
    start() + Duration::hours(n)
}

/// Hourly bars with close = base + slope * i and a one point range either side.
pub fn trend_bars(count: usize, base: f64, slope: f64) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let close = base + slope * i as f64;
            OhlcvBar {
                timestamp: hours(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

pub fn gated_config() -> IchimokuConfig {
    IchimokuConfig {
        hot_threshold: Some(0.5),
        cold_threshold: Some(0.5),
        ..IchimokuConfig::default()
    }
}

pub fn render_config() -> IchimokuConfig {
    IchimokuConfig {
        render: true,
        ..gated_config()
    }
}

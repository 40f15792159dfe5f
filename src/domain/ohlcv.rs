//! OHLCV bar representation and series validation.

use chrono::{Duration, NaiveDateTime};

use crate::domain::error::IchimokuError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// Rejects series that are not strictly increasing in time or carry
/// non-finite prices. Short series are accepted.
pub fn validate_series(bars: &[OhlcvBar]) -> Result<(), IchimokuError> {
    for (index, bar) in bars.iter().enumerate() {
        if let Some(field) = bar.first_non_finite() {
            return Err(IchimokuError::NonFinite { index, field });
        }
        if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
            return Err(IchimokuError::NonMonotonic {
                index,
                previous: bars[index - 1].timestamp,
                current: bar.timestamp,
            });
        }
    }
    Ok(())
}

/// Spacing between the first two bars.
pub fn time_step(bars: &[OhlcvBar]) -> Result<Duration, IchimokuError> {
    match bars {
        [first, second, ..] => Ok(second.timestamp - first.timestamp),
        _ => Err(IchimokuError::UndeterminedStep { bars: bars.len() }),
    }
}

/// Binary search for the bar stamped exactly `timestamp`.
pub fn find_bar(bars: &[OhlcvBar], timestamp: NaiveDateTime) -> Option<&OhlcvBar> {
    bars.binary_search_by_key(&timestamp, |b| b.timestamp)
        .ok()
        .map(|i| &bars[i])
}

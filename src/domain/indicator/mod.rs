//! Ichimoku Cloud indicator types.
//!
//! - `IchimokuPoint`: one row of the output table
//! - `IchimokuSeries`: the full output, input timestamps plus the projected cloud
//! - `SignalField`: identity of one of the four Ichimoku lines
//! - `Diagnostic`: recoverable conditions met while computing a series

pub mod ichimoku;
pub mod rolling;

use chrono::{Duration, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

use crate::domain::indicator::ichimoku::IchimokuParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalField {
    Tenkan,
    Kijun,
    SpanA,
    SpanB,
}

impl SignalField {
    pub const ALL: [SignalField; 4] = [
        SignalField::Tenkan,
        SignalField::Kijun,
        SignalField::SpanA,
        SignalField::SpanB,
    ];

    /// Column header used in the output table.
    pub fn column_name(self) -> &'static str {
        match self {
            SignalField::Tenkan => "tenkansen",
            SignalField::Kijun => "kijunsen",
            SignalField::SpanA => "leading_span_a",
            SignalField::SpanB => "leading_span_b",
        }
    }

    /// The lines hot/cold are read against unless the caller says otherwise.
    pub fn default_signal() -> Vec<SignalField> {
        vec![SignalField::SpanA, SignalField::SpanB]
    }

    /// Parses a comma separated list such as `leading_span_a,leading_span_b`.
    pub fn parse_list(input: &str) -> Result<Vec<SignalField>, String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for SignalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for SignalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tenkansen" | "tenkan" => Ok(SignalField::Tenkan),
            "kijunsen" | "kijun" => Ok(SignalField::Kijun),
            "leading_span_a" | "span_a" => Ok(SignalField::SpanA),
            "leading_span_b" | "span_b" => Ok(SignalField::SpanB),
            other => Err(format!("unknown signal field '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IchimokuPoint {
    pub timestamp: NaiveDateTime,
    pub tenkan: Option<f64>,
    pub kijun: Option<f64>,
    pub span_a: Option<f64>,
    pub span_b: Option<f64>,
    pub is_hot: bool,
    pub is_cold: bool,
}

impl IchimokuPoint {
    pub fn value(&self, field: SignalField) -> Option<f64> {
        match field {
            SignalField::Tenkan => self.tenkan,
            SignalField::Kijun => self.kijun,
            SignalField::SpanA => self.span_a,
            SignalField::SpanB => self.span_b,
        }
    }

    /// All four lines are defined.
    pub fn is_complete(&self) -> bool {
        SignalField::ALL.iter().all(|&f| self.value(f).is_some())
    }
}

/// Recoverable conditions met while building a series. Each is also logged.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An output row had no matching input bar during classification.
    MissingTimestamp { timestamp: NaiveDateTime },
    /// Spacing between bars `index - 1` and `index` differs from the first step.
    IrregularStep {
        index: usize,
        expected: Duration,
        actual: Duration,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingTimestamp { timestamp } => {
                write!(f, "no input bar at {timestamp}, flags left unset")
            }
            Diagnostic::IrregularStep {
                index,
                expected,
                actual,
            } => write!(
                f,
                "bar {index} is {}s after its predecessor, expected {}s",
                actual.num_seconds(),
                expected.num_seconds()
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IchimokuSeries {
    pub params: IchimokuParams,
    pub signal: Vec<SignalField>,
    /// Last timestamp of the input; rows after it hold only the projected cloud.
    pub last_input: NaiveDateTime,
    pub points: Vec<IchimokuPoint>,
    pub diagnostics: Vec<Diagnostic>,
}

impl IchimokuSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent row that falls inside the input range.
    pub fn latest_classified(&self) -> Option<&IchimokuPoint> {
        self.points
            .iter()
            .rev()
            .find(|p| p.timestamp <= self.last_input)
    }

    /// Rows past the end of the input.
    pub fn projected(&self) -> impl Iterator<Item = &IchimokuPoint> {
        self.points
            .iter()
            .filter(move |p| p.timestamp > self.last_input)
    }
}

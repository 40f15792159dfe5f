//! Domain error types.

use chrono::NaiveDateTime;

/// Top-level error type for the analyzer.
#[derive(Debug, thiserror::Error)]
pub enum IchimokuError {
    #[error("timestamps must be strictly increasing: bar {index} at {current} follows {previous}")]
    NonMonotonic {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error("bar {index} has a non-finite {field} value")]
    NonFinite { index: usize, field: &'static str },

    #[error("cannot infer the time step from {bars} bar(s), need at least 2")]
    UndeterminedStep { bars: usize },

    #[error("cannot extend the timeline past {last}")]
    TimestampOverflow { last: NaiveDateTime },

    #[error("invalid ichimoku parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IchimokuError {
    /// True for errors caused by the shape of the bar series itself.
    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            IchimokuError::NonMonotonic { .. }
                | IchimokuError::NonFinite { .. }
                | IchimokuError::UndeterminedStep { .. }
                | IchimokuError::TimestampOverflow { .. }
        )
    }
}

impl From<&IchimokuError> for std::process::ExitCode {
    fn from(err: &IchimokuError) -> Self {
        let code: u8 = match err {
            _ if err.is_input_validation() => 4,
            IchimokuError::Io(_) => 1,
            IchimokuError::Data { .. } => 3,
            _ => 2,
        };
        std::process::ExitCode::from(code)
    }
}

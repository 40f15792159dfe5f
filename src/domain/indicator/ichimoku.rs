//! Ichimoku Cloud engine.
//!
//! Lines over the input bars:
//! - Tenkan-sen (conversion): midpoint of the 9-bar high/low range
//! - Kijun-sen (base): midpoint of the 26-bar range
//! - Senkou span A: (tenkan + kijun) / 2, projected `displacement` bars ahead
//! - Senkou span B: midpoint of the 52-bar range, projected likewise
//!
//! The output covers the input timestamps plus `displacement` extrapolated
//! ones holding the projected cloud. Rows inside the input range are
//! classified hot (close above a rising cloud) or cold (close below a
//! falling cloud). A classification is only evaluated when its threshold is
//! present; the threshold's value takes no part in the comparison.
//!
//! Spans are shifted by row count, so irregular spacing never misaligns the
//! cloud; only the extrapolated timestamps depend on the first step.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, warn};

use crate::domain::error::IchimokuError;
use crate::domain::indicator::rolling::{pairwise_mean, rolling_midpoint};
use crate::domain::indicator::{Diagnostic, IchimokuPoint, IchimokuSeries, SignalField};
use crate::domain::ohlcv::{find_bar, time_step, validate_series, OhlcvBar};

pub const DEFAULT_TENKAN_PERIOD: usize = 9;
pub const DEFAULT_KIJUN_PERIOD: usize = 26;
pub const DEFAULT_SENKOU_B_PERIOD: usize = 52;
pub const DEFAULT_DISPLACEMENT: usize = 26;

/// Upper bound for every period and for the displacement.
pub const MAX_PERIOD: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IchimokuParams {
    pub tenkan_period: usize,
    pub kijun_period: usize,
    pub senkou_b_period: usize,
    pub displacement: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            tenkan_period: DEFAULT_TENKAN_PERIOD,
            kijun_period: DEFAULT_KIJUN_PERIOD,
            senkou_b_period: DEFAULT_SENKOU_B_PERIOD,
            displacement: DEFAULT_DISPLACEMENT,
        }
    }
}

impl IchimokuParams {
    pub fn validate(&self) -> Result<(), IchimokuError> {
        for (name, value) in [
            ("tenkan_period", self.tenkan_period),
            ("kijun_period", self.kijun_period),
            ("senkou_b_period", self.senkou_b_period),
        ] {
            if value == 0 {
                return Err(IchimokuError::InvalidParams {
                    reason: format!("{name} must be at least 1"),
                });
            }
            if value > MAX_PERIOD {
                return Err(IchimokuError::InvalidParams {
                    reason: format!("{name} must be at most {MAX_PERIOD}"),
                });
            }
        }
        if self.displacement > MAX_PERIOD {
            return Err(IchimokuError::InvalidParams {
                reason: format!("displacement must be at most {MAX_PERIOD}"),
            });
        }
        Ok(())
    }

    /// Bars needed before the first row survives trimming.
    ///
    /// Span A inherits the slower of tenkan and kijun, so the longest of the
    /// three windows sets the warmup before the shift.
    pub fn min_bars_for_cloud(&self) -> usize {
        self.tenkan_period
            .max(self.kijun_period)
            .max(self.senkou_b_period)
            + self.displacement
    }
}

/// Everything one analysis request carries besides the bars.
#[derive(Debug, Clone)]
pub struct IchimokuConfig {
    pub params: IchimokuParams,
    /// Lines hot/cold are nominally read against. Informational only.
    pub signal: Vec<SignalField>,
    pub hot_threshold: Option<f64>,
    pub cold_threshold: Option<f64>,
    /// Keep rows with undefined lines (needed to plot a continuous chart).
    pub render: bool,
}

impl Default for IchimokuConfig {
    fn default() -> Self {
        Self {
            params: IchimokuParams::default(),
            signal: SignalField::default_signal(),
            hot_threshold: None,
            cold_threshold: None,
            render: false,
        }
    }
}

/// Which classifications are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThresholdGates {
    pub hot: bool,
    pub cold: bool,
}

impl ThresholdGates {
    pub fn from_thresholds(hot: Option<f64>, cold: Option<f64>) -> Self {
        Self {
            hot: hot.is_some(),
            cold: cold.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalFlags {
    pub is_hot: bool,
    pub is_cold: bool,
}

/// Un-shifted lines aligned with the input bars.
#[derive(Debug, Clone)]
pub struct IchimokuLines {
    pub tenkan: Vec<Option<f64>>,
    pub kijun: Vec<Option<f64>>,
    pub span_a_raw: Vec<Option<f64>>,
    pub span_b_raw: Vec<Option<f64>>,
}

pub fn compute_lines(bars: &[OhlcvBar], params: &IchimokuParams) -> IchimokuLines {
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();

    let tenkan = rolling_midpoint(&lows, &highs, params.tenkan_period);
    let kijun = rolling_midpoint(&lows, &highs, params.kijun_period);
    let span_a_raw = pairwise_mean(&tenkan, &kijun);
    let span_b_raw = rolling_midpoint(&lows, &highs, params.senkou_b_period);

    IchimokuLines {
        tenkan,
        kijun,
        span_a_raw,
        span_b_raw,
    }
}

/// Input timestamps followed by `displacement` more, each `step` apart.
pub fn extend_timeline(
    bars: &[OhlcvBar],
    displacement: usize,
    step: Duration,
) -> Result<Vec<NaiveDateTime>, IchimokuError> {
    let mut timeline: Vec<NaiveDateTime> = bars.iter().map(|b| b.timestamp).collect();
    let Some(&last) = timeline.last() else {
        return Ok(timeline);
    };

    // Checked up front so an oversized displacement never reaches the allocator.
    i32::try_from(displacement)
        .ok()
        .and_then(|n| step.checked_mul(n))
        .and_then(|span| last.checked_add_signed(span))
        .ok_or(IchimokuError::TimestampOverflow { last })?;

    timeline.reserve(displacement);
    let mut next = last;
    for _ in 0..displacement {
        next = next
            .checked_add_signed(step)
            .ok_or(IchimokuError::TimestampOverflow { last })?;
        timeline.push(next);
    }
    Ok(timeline)
}

/// Shifts `raw` forward by `displacement` rows, growing it by the same amount.
pub fn project_cloud(raw: &[Option<f64>], displacement: usize) -> Vec<Option<f64>> {
    let mut projected = vec![None; displacement];
    projected.extend_from_slice(raw);
    projected
}

/// One diagnostic per spacing that differs from `step`.
pub fn irregular_steps(bars: &[OhlcvBar], step: Duration) -> Vec<Diagnostic> {
    bars.windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let actual = pair[1].timestamp - pair[0].timestamp;
            (actual != step).then(|| {
                warn!(
                    index = i + 1,
                    expected_secs = step.num_seconds(),
                    actual_secs = actual.num_seconds(),
                    "irregular bar spacing"
                );
                Diagnostic::IrregularStep {
                    index: i + 1,
                    expected: step,
                    actual,
                }
            })
        })
        .collect()
}

/// Hot/cold for a single row. Undefined spans never classify.
pub fn evaluate(
    close: f64,
    span_a: Option<f64>,
    span_b: Option<f64>,
    gates: ThresholdGates,
) -> SignalFlags {
    let (Some(a), Some(b)) = (span_a, span_b) else {
        return SignalFlags::default();
    };
    SignalFlags {
        is_hot: gates.hot && a > b && close > a,
        is_cold: gates.cold && a < b && close < a,
    }
}

/// Flags for every row of `timeline`. Rows after the last bar stay unset.
///
/// Closes are looked up by timestamp in `bars`; a row with no matching bar
/// is logged, reported as a diagnostic and left unset.
pub fn classify(
    timeline: &[NaiveDateTime],
    span_a: &[Option<f64>],
    span_b: &[Option<f64>],
    bars: &[OhlcvBar],
    gates: ThresholdGates,
) -> (Vec<SignalFlags>, Vec<Diagnostic>) {
    let mut flags = vec![SignalFlags::default(); timeline.len()];
    let mut diagnostics = Vec::new();
    let Some(last_input) = bars.last().map(|b| b.timestamp) else {
        return (flags, diagnostics);
    };

    for (i, &timestamp) in timeline.iter().enumerate() {
        if timestamp > last_input {
            continue;
        }
        let Some(bar) = find_bar(bars, timestamp) else {
            warn!(%timestamp, "no bar for timestamp during classification");
            diagnostics.push(Diagnostic::MissingTimestamp { timestamp });
            continue;
        };
        let a = span_a.get(i).copied().flatten();
        let b = span_b.get(i).copied().flatten();
        flags[i] = evaluate(bar.close, a, b, gates);
    }

    (flags, diagnostics)
}

/// Drops rows with any undefined line unless `render` is set.
pub fn trim(points: Vec<IchimokuPoint>, render: bool) -> Vec<IchimokuPoint> {
    if render {
        return points;
    }
    points.into_iter().filter(IchimokuPoint::is_complete).collect()
}

pub fn analyze(
    bars: &[OhlcvBar],
    config: &IchimokuConfig,
) -> Result<IchimokuSeries, IchimokuError> {
    let params = &config.params;
    params.validate()?;
    validate_series(bars)?;
    let step = time_step(bars)?;
    let Some(last_input) = bars.last().map(|b| b.timestamp) else {
        return Err(IchimokuError::UndeterminedStep { bars: 0 });
    };

    let mut diagnostics = irregular_steps(bars, step);

    let lines = compute_lines(bars, params);
    let timeline = extend_timeline(bars, params.displacement, step)?;
    let span_a = project_cloud(&lines.span_a_raw, params.displacement);
    let span_b = project_cloud(&lines.span_b_raw, params.displacement);

    let gates = ThresholdGates::from_thresholds(config.hot_threshold, config.cold_threshold);
    let (flags, missing) = classify(&timeline, &span_a, &span_b, bars, gates);
    diagnostics.extend(missing);

    let points: Vec<IchimokuPoint> = timeline
        .iter()
        .enumerate()
        .map(|(i, &timestamp)| IchimokuPoint {
            timestamp,
            tenkan: lines.tenkan.get(i).copied().flatten(),
            kijun: lines.kijun.get(i).copied().flatten(),
            span_a: span_a[i],
            span_b: span_b[i],
            is_hot: flags[i].is_hot,
            is_cold: flags[i].is_cold,
        })
        .collect();
    let full_len = points.len();
    let points = trim(points, config.render);

    debug!(
        bars = bars.len(),
        rows = full_len,
        kept = points.len(),
        diagnostics = diagnostics.len(),
        "ichimoku analysis complete"
    );

    Ok(IchimokuSeries {
        params: *params,
        signal: config.signal.clone(),
        last_input,
        points,
        diagnostics,
    })
}

//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{read_threshold, validate_ichimoku_config, SECTION};
use crate::domain::error::IchimokuError;
use crate::domain::indicator::ichimoku::{self, IchimokuConfig, IchimokuParams};
use crate::domain::indicator::{IchimokuSeries, SignalField};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "ichimoku", about = "Ichimoku Cloud hot/cold analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the cloud for one symbol and print it as CSV
    Analyze {
        /// Directory holding <symbol>.csv files
        #[arg(short, long)]
        data_dir: PathBuf,
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        hot_threshold: Option<f64>,
        #[arg(long)]
        cold_threshold: Option<f64>,
        /// Comma separated line names, e.g. leading_span_a,leading_span_b
        #[arg(long)]
        signal: Option<String>,
        /// Keep rows with undefined lines
        #[arg(long)]
        render: bool,
    },
    /// List symbols available in a data directory
    ListSymbols {
        #[arg(short, long)]
        data_dir: PathBuf,
    },
    /// Validate the [ichimoku] section of a config file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub hot_threshold: Option<f64>,
    pub cold_threshold: Option<f64>,
    pub signal: Option<String>,
    pub render: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            data_dir,
            symbol,
            config,
            hot_threshold,
            cold_threshold,
            signal,
            render,
        } => {
            let overrides = Overrides {
                hot_threshold,
                cold_threshold,
                signal,
                render,
            };
            run_analyze(&data_dir, &symbol, config.as_deref(), &overrides)
        }
        Command::ListSymbols { data_dir } => run_list_symbols(&data_dir),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, IchimokuError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Reads the `[ichimoku]` section into an engine config. Absent keys keep the defaults.
pub fn build_ichimoku_config(adapter: &dyn ConfigPort) -> Result<IchimokuConfig, IchimokuError> {
    validate_ichimoku_config(adapter)?;

    let defaults = IchimokuParams::default();
    let period = |key: &str, default: usize| -> usize {
        usize::try_from(adapter.get_int(SECTION, key, default as i64)).unwrap_or(default)
    };
    let params = IchimokuParams {
        tenkan_period: period("tenkan_period", defaults.tenkan_period),
        kijun_period: period("kijun_period", defaults.kijun_period),
        senkou_b_period: period("senkou_b_period", defaults.senkou_b_period),
        displacement: period("displacement", defaults.displacement),
    };

    let signal = match adapter.get_string(SECTION, "signal") {
        Some(raw) => SignalField::parse_list(&raw).map_err(|reason| IchimokuError::ConfigInvalid {
            section: SECTION.into(),
            key: "signal".into(),
            reason,
        })?,
        None => SignalField::default_signal(),
    };

    Ok(IchimokuConfig {
        params,
        signal,
        hot_threshold: read_threshold(adapter, "hot_threshold")?,
        cold_threshold: read_threshold(adapter, "cold_threshold")?,
        render: adapter.get_bool(SECTION, "render", false),
    })
}

pub fn apply_overrides(
    mut config: IchimokuConfig,
    overrides: &Overrides,
) -> Result<IchimokuConfig, IchimokuError> {
    if overrides.hot_threshold.is_some() {
        config.hot_threshold = overrides.hot_threshold;
    }
    if overrides.cold_threshold.is_some() {
        config.cold_threshold = overrides.cold_threshold;
    }
    if let Some(raw) = &overrides.signal {
        config.signal = SignalField::parse_list(raw).map_err(|reason| {
            IchimokuError::ConfigInvalid {
                section: "command line".into(),
                key: "signal".into(),
                reason,
            }
        })?;
    }
    config.render |= overrides.render;
    Ok(config)
}

/// Fetch, analyze and write one symbol.
pub fn run_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    symbol: &str,
    config: &IchimokuConfig,
    out: &mut dyn Write,
) -> Result<IchimokuSeries, IchimokuError> {
    let bars = data_port.fetch_ohlcv(symbol)?;
    info!(symbol, bars = bars.len(), "analyzing");

    if bars.len() < config.params.min_bars_for_cloud() && !config.render {
        warn!(
            symbol,
            bars = bars.len(),
            needed = config.params.min_bars_for_cloud(),
            "too few bars for a complete cloud row, output will be empty"
        );
    }

    let series = ichimoku::analyze(&bars, config)?;
    report_port.write(&series, out)?;

    if let Some(latest) = series.latest_classified() {
        info!(
            symbol,
            timestamp = %latest.timestamp,
            is_hot = latest.is_hot,
            is_cold = latest.is_cold,
            "latest classified bar"
        );
    }
    if !series.diagnostics.is_empty() {
        warn!(symbol, count = series.diagnostics.len(), "analysis produced diagnostics");
    }
    Ok(series)
}

fn run_analyze(
    data_dir: &Path,
    symbol: &str,
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> Result<(), IchimokuError> {
    let config = match config_path {
        Some(path) => build_ichimoku_config(&load_config(path)?)?,
        None => IchimokuConfig::default(),
    };
    let config = apply_overrides(config, overrides)?;

    let data_port = CsvAdapter::new(data_dir.to_path_buf());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_pipeline(&data_port, &CsvReportAdapter, symbol, &config, &mut out)?;
    Ok(())
}

fn run_list_symbols(data_dir: &Path) -> Result<(), IchimokuError> {
    let data_port = CsvAdapter::new(data_dir.to_path_buf());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for symbol in data_port.list_symbols()? {
        writeln!(out, "{symbol}")?;
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), IchimokuError> {
    let adapter = load_config(config_path)?;
    let config = build_ichimoku_config(&adapter)?;
    eprintln!(
        "Config OK: signal={}, hot_threshold={}, cold_threshold={}, render={}",
        config
            .signal
            .iter()
            .map(SignalField::to_string)
            .collect::<Vec<_>>()
            .join(","),
        describe(config.hot_threshold),
        describe(config.cold_threshold),
        config.render
    );
    Ok(())
}

fn describe(threshold: Option<f64>) -> String {
    threshold.map_or_else(|| "unset".to_string(), |v| v.to_string())
}

//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_export::CsvExporter;
use crate::adapters::csv_source::CsvPriceSource;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::retrying_source::RetryingSource;
use crate::domain::config_validation::{validate_config, POLICY_RSI_SPLIT, POLICY_TREND_CONFIRMED};
use crate::domain::error::TradeAssistError;
use crate::domain::evaluation::{
    evaluate_symbols, Evaluation, EvaluationConfig, SymbolOutcome, DEFAULT_CAPITAL,
    DEFAULT_LOOKBACK_DAYS,
};
use crate::domain::indicator::{atr, bollinger, ema, macd, rsi, sma, IndicatorConfig};
use crate::domain::indicator_frame::IndicatorFrame;
use crate::domain::signal::{
    ClassificationPolicy, DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD, DEFAULT_SPLIT_THRESHOLD,
};
use crate::domain::sizing::{PositionSizer, DEFAULT_ALLOCATION_FRACTION};
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::ExportPort;
use crate::ports::price_source::PriceSource;

const DEFAULT_MAX_ATTEMPTS: i64 = 3;
const DEFAULT_RETRY_BACKOFF_MS: i64 = 500;

#[derive(Parser, Debug)]
#[command(
    name = "tradeassist",
    about = "Indicator-driven buy/sell/hold signals for stocks and coins"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate every configured symbol and print its signal
    Evaluate {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma separated symbols, replacing [universe] symbols
        #[arg(long)]
        symbols: Option<String>,
        #[arg(long)]
        capital: Option<f64>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Write the full indicator columns of one symbol to CSV
    Export {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Validate a configuration file and print the resolved settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Where prices come from and how hard to try.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub dir: PathBuf,
    pub lookback_days: u32,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Evaluate {
            config,
            symbols,
            capital,
            data_dir,
        } => run_evaluate(&config, symbols.as_deref(), capital, data_dir),
        Command::Export {
            config,
            symbol,
            output,
            data_dir,
        } => run_export(&config, &symbol, &output, data_dir),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradeAssistError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Loads and validates a config file.
fn load_validated(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    eprintln!("Loading config from {}", path.display());
    let adapter = load_config(path)?;
    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }
    Ok(adapter)
}

fn missing(section: &str, key: &str) -> TradeAssistError {
    TradeAssistError::ConfigMissing {
        section: section.into(),
        key: key.into(),
    }
}

fn period(adapter: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, TradeAssistError> {
    let value = adapter.get_int("indicators", key, default as i64);
    usize::try_from(value)
        .ok()
        .filter(|&v| v >= 1)
        .ok_or_else(|| TradeAssistError::ConfigInvalid {
            section: "indicators".into(),
            key: key.into(),
            reason: format!("{key} must be at least 1"),
        })
}

pub fn build_indicator_config(
    adapter: &dyn ConfigPort,
) -> Result<IndicatorConfig, TradeAssistError> {
    let stddev = adapter.get_double(
        "indicators",
        "bollinger_stddev",
        bollinger::DEFAULT_STDDEV_MULT_X100 as f64 / 100.0,
    );

    Ok(IndicatorConfig {
        rsi_period: period(adapter, "rsi_period", rsi::DEFAULT_PERIOD)?,
        sma_period: period(adapter, "sma_period", sma::DEFAULT_PERIOD)?,
        ema_period: period(adapter, "ema_period", ema::DEFAULT_PERIOD)?,
        macd_fast: period(adapter, "macd_fast", macd::DEFAULT_FAST)?,
        macd_slow: period(adapter, "macd_slow", macd::DEFAULT_SLOW)?,
        macd_signal: period(adapter, "macd_signal", macd::DEFAULT_SIGNAL)?,
        atr_period: period(adapter, "atr_period", atr::DEFAULT_PERIOD)?,
        bollinger_period: period(adapter, "bollinger_period", bollinger::DEFAULT_PERIOD)?,
        bollinger_stddev_mult_x100: (stddev * 100.0).round().max(0.0) as u32,
    })
}

pub fn build_policy(adapter: &dyn ConfigPort) -> Result<ClassificationPolicy, TradeAssistError> {
    let name = adapter
        .get_string("signal", "policy")
        .unwrap_or_else(|| POLICY_TREND_CONFIRMED.to_string());

    match name.trim().to_lowercase().as_str() {
        POLICY_TREND_CONFIRMED => Ok(ClassificationPolicy::TrendConfirmed {
            oversold: adapter.get_double("signal", "oversold", DEFAULT_OVERSOLD),
            overbought: adapter.get_double("signal", "overbought", DEFAULT_OVERBOUGHT),
        }),
        POLICY_RSI_SPLIT => Ok(ClassificationPolicy::RsiSplit {
            threshold: adapter.get_double("signal", "split_threshold", DEFAULT_SPLIT_THRESHOLD),
        }),
        other => Err(TradeAssistError::ConfigInvalid {
            section: "signal".into(),
            key: "policy".into(),
            reason: format!("unknown policy '{other}'"),
        }),
    }
}

pub fn build_evaluation_config(
    adapter: &dyn ConfigPort,
) -> Result<EvaluationConfig, TradeAssistError> {
    Ok(EvaluationConfig {
        indicators: build_indicator_config(adapter)?,
        policy: build_policy(adapter)?,
        sizer: PositionSizer::new(adapter.get_double(
            "sizing",
            "allocation_fraction",
            DEFAULT_ALLOCATION_FRACTION,
        )),
        capital: adapter.get_double("sizing", "capital", DEFAULT_CAPITAL),
    })
}

pub fn build_data_settings(
    adapter: &dyn ConfigPort,
    dir_override: Option<PathBuf>,
) -> Result<DataSettings, TradeAssistError> {
    let dir = match dir_override {
        Some(dir) => dir,
        None => adapter
            .get_string("data", "dir")
            .filter(|d| !d.trim().is_empty())
            .map(|d| PathBuf::from(d.trim()))
            .ok_or_else(|| missing("data", "dir"))?,
    };

    let invalid = |key: &str, reason: &str| TradeAssistError::ConfigInvalid {
        section: "data".into(),
        key: key.into(),
        reason: reason.into(),
    };

    let lookback_days = u32::try_from(adapter.get_int(
        "data",
        "lookback_days",
        DEFAULT_LOOKBACK_DAYS as i64,
    ))
    .map_err(|_| invalid("lookback_days", "lookback_days must be at least 1"))?;
    let max_attempts = u32::try_from(adapter.get_int("data", "max_attempts", DEFAULT_MAX_ATTEMPTS))
        .map_err(|_| invalid("max_attempts", "max_attempts must be at least 1"))?;
    let backoff_ms = u64::try_from(adapter.get_int(
        "data",
        "retry_backoff_ms",
        DEFAULT_RETRY_BACKOFF_MS,
    ))
    .map_err(|_| invalid("retry_backoff_ms", "retry_backoff_ms must be non-negative"))?;

    Ok(DataSettings {
        dir,
        lookback_days,
        max_attempts,
        retry_backoff: Duration::from_millis(backoff_ms),
    })
}

/// Symbols from `--symbols` when given, otherwise from `[universe] symbols`.
pub fn resolve_symbols(
    symbols_override: Option<&str>,
    adapter: &dyn ConfigPort,
) -> Result<Vec<String>, TradeAssistError> {
    match symbols_override {
        Some(list) => parse_symbols(list)
            .map_err(|e| TradeAssistError::invalid_input(format!("--symbols: {e}"))),
        None => {
            let list = adapter
                .get_string("universe", "symbols")
                .ok_or_else(|| missing("universe", "symbols"))?;
            parse_symbols(&list).map_err(|e| TradeAssistError::ConfigInvalid {
                section: "universe".into(),
                key: "symbols".into(),
                reason: e.to_string(),
            })
        }
    }
}

pub fn open_source(settings: &DataSettings) -> RetryingSource<CsvPriceSource> {
    RetryingSource::new(
        CsvPriceSource::new(settings.dir.clone()),
        settings.max_attempts,
        settings.retry_backoff,
    )
}

fn run_evaluate(
    config_path: &Path,
    symbols_override: Option<&str>,
    capital_override: Option<f64>,
    dir_override: Option<PathBuf>,
) -> ExitCode {
    let adapter = match load_validated(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let prepared = build_evaluation_config(&adapter).and_then(|mut config| {
        if let Some(capital) = capital_override {
            config.capital = capital;
        }
        let settings = build_data_settings(&adapter, dir_override)?;
        let symbols = resolve_symbols(symbols_override, &adapter)?;
        Ok((config, settings, symbols))
    });
    let (config, settings, symbols) = match prepared {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Evaluating {} symbols from {} ({} day lookback, policy {})",
        symbols.len(),
        settings.dir.display(),
        settings.lookback_days,
        config.policy,
    );

    let source = open_source(&settings);
    run_evaluation_pipeline(&source, &symbols, settings.lookback_days, &config)
}

/// Evaluates `symbols` against any price source and prints one block per
/// symbol to stdout.
pub fn run_evaluation_pipeline(
    source: &dyn PriceSource,
    symbols: &[String],
    lookback_days: u32,
    config: &EvaluationConfig,
) -> ExitCode {
    let outcomes = match evaluate_symbols(source, symbols, lookback_days, config) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut evaluated = 0;
    for outcome in &outcomes {
        match outcome {
            SymbolOutcome::Evaluated(evaluation) => {
                print!("{}", format_evaluation(evaluation));
                evaluated += 1;
            }
            SymbolOutcome::Unavailable { symbol, reason }
            | SymbolOutcome::Rejected { symbol, reason } => {
                eprintln!("warning: skipping {} ({})", symbol, reason);
            }
        }
    }

    if evaluated == 0 {
        eprintln!("error: no symbols could be evaluated");
        return ExitCode::from(5);
    }
    ExitCode::SUCCESS
}

fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

/// Plain-text block for one evaluation.
pub fn format_evaluation(evaluation: &Evaluation) -> String {
    let s = &evaluation.snapshot;
    let date = s
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "no data".to_string());

    let mut out = format!(
        "{} ({}, {} bars)\n",
        evaluation.symbol, date, evaluation.bars
    );
    for (label, value) in [
        ("Close", s.close),
        ("RSI", s.rsi),
        ("SMA", s.sma),
        ("EMA", s.ema),
        ("MACD", s.macd),
        ("MACD signal", s.macd_signal),
        ("ATR", s.atr),
    ] {
        out.push_str(&format!("  {:<13}{}\n", label, fmt_value(value)));
    }
    out.push_str(&format!(
        "  {:<13}{}\n",
        "BB width",
        s.bollinger_width
            .map(|w| format!("{:.4}", w))
            .unwrap_or_else(|| "n/a".to_string())
    ));
    out.push_str(&format!("  {:<13}{}\n", "Signal", evaluation.signal));
    if let Some(suggestion) = &evaluation.suggestion {
        out.push_str(&format!(
            "  {:<13}${:.2} ({:.6} units)\n",
            "Suggested", suggestion.notional, suggestion.quantity
        ));
    }
    out.push('\n');
    out
}

fn run_export(
    config_path: &Path,
    symbol: &str,
    output_path: &Path,
    dir_override: Option<PathBuf>,
) -> ExitCode {
    let adapter = match load_validated(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = build_indicator_config(&adapter).and_then(|indicators| {
        let settings = build_data_settings(&adapter, dir_override)?;
        let source = open_source(&settings);
        export_symbol(
            &source,
            &CsvExporter,
            symbol,
            settings.lookback_days,
            &indicators,
            output_path,
        )
    });

    match result {
        Ok(rows) => {
            eprintln!("Wrote {} rows to {}", rows, output_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Fetches one symbol, computes its indicator frame and hands it to the
/// exporter. Returns the number of rows written. A series shorter than
/// `required_bars()` is refused before anything is written.
pub fn export_symbol(
    source: &dyn PriceSource,
    exporter: &dyn ExportPort,
    symbol: &str,
    lookback_days: u32,
    indicators: &IndicatorConfig,
    output_path: &Path,
) -> Result<usize, TradeAssistError> {
    let series = source.fetch(symbol, lookback_days)?;
    series.require_bars(indicators.required_bars())?;
    let frame = IndicatorFrame::compute(&series, indicators);
    exporter.write(&frame, output_path)?;
    Ok(frame.len())
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_validated(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let resolved = build_evaluation_config(&adapter).and_then(|config| {
        let settings = build_data_settings(&adapter, None)?;
        let symbols = resolve_symbols(None, &adapter)?;
        Ok((config, settings, symbols))
    });
    let (config, settings, symbols) = match resolved {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let ind = &config.indicators;
    println!("Data:");
    println!("  dir:            {}", settings.dir.display());
    println!("  lookback_days:  {}", settings.lookback_days);
    println!(
        "  retries:        {} attempts, {} ms base backoff",
        settings.max_attempts,
        settings.retry_backoff.as_millis()
    );
    println!("Universe:");
    println!("  symbols:        {}", symbols.join(", "));
    println!("Indicators:");
    println!("  RSI({}) SMA({}) EMA({})", ind.rsi_period, ind.sma_period, ind.ema_period);
    println!(
        "  MACD({},{},{}) ATR({}) BB({},{})",
        ind.macd_fast,
        ind.macd_slow,
        ind.macd_signal,
        ind.atr_period,
        ind.bollinger_period,
        ind.bollinger_stddev_mult_x100 as f64 / 100.0
    );
    println!("  required bars:  {}", ind.required_bars());
    println!("Signal:");
    println!("  policy:         {}", config.policy);
    println!("Sizing:");
    println!("  capital:        {}", config.capital);
    println!("  allocation:     {}", config.sizer.allocation_fraction);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

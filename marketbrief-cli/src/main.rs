//! MarketBrief CLI: analyze, brief, and export commands.
//!
//! Commands:
//! - `analyze`: signal summary, trend and levels for one instrument
//! - `brief`: analyse every configured instrument and write the daily report
//! - `export`: write one instrument's enriched series as Parquet

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use polars::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use marketbrief_core::analysis::compute_all_indicators_with;
use marketbrief_core::data::{CsvProvider, MarketDataProvider, SyntheticProvider};
use marketbrief_runner::brief::fetch_series;
use marketbrief_runner::{
    analyze_instrument, format_number, format_percent, render_and_write, run_brief,
    AnalysisStatus, BriefConfig, DataSourceKind, InstrumentAnalysis, InstrumentConfig,
    MarkdownRenderer,
};

const DEFAULT_CONFIG: &str = "marketbrief.toml";

#[derive(Parser)]
#[command(
    name = "marketbrief",
    about = "MarketBrief: technical-indicator daily market brief"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the signal summary, trend and support/resistance for one instrument.
    Analyze {
        /// Instrument symbol (e.g., SPY).
        symbol: String,

        /// Directory holding {SYMBOL}.csv files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Calendar days of history to analyse.
        #[arg(long, default_value_t = 120)]
        days: u32,

        /// Use seeded synthetic data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Print the analysis as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Analyse every configured instrument and write the Markdown report plus JSON data.
    Brief {
        /// Path to a TOML brief config. Defaults to ./marketbrief.toml when present.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Use seeded synthetic data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Override the configured data directory.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Override the configured output directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Write one instrument's enriched series (bars plus every indicator) as Parquet.
    Export {
        /// Instrument symbol (e.g., SPY).
        symbol: String,

        /// Output Parquet file.
        #[arg(long)]
        out: PathBuf,

        /// Directory holding {SYMBOL}.csv files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Calendar days of history to export.
        #[arg(long, default_value_t = 120)]
        days: u32,

        /// Use seeded synthetic data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            symbol,
            data_dir,
            days,
            synthetic,
            json,
        } => run_analyze(&symbol, data_dir, days, synthetic, json),
        Commands::Brief {
            config,
            date,
            synthetic,
            data_dir,
            output_dir,
        } => run_brief_cmd(config, date, synthetic, data_dir, output_dir),
        Commands::Export {
            symbol,
            out,
            data_dir,
            days,
            synthetic,
        } => run_export(&symbol, &out, data_dir, days, synthetic),
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn make_provider(config: &BriefConfig, end: NaiveDate) -> Box<dyn MarketDataProvider> {
    match config.source {
        DataSourceKind::Csv => Box::new(CsvProvider::new(&config.data_dir)),
        DataSourceKind::Synthetic => Box::new(SyntheticProvider::new(config.synthetic_seed, end)),
    }
}

/// Config for the single-instrument commands.
fn single_config(symbol: &str, data_dir: PathBuf, days: u32, synthetic: bool) -> Result<BriefConfig> {
    let config = BriefConfig {
        data_dir,
        lookback_days: days,
        source: if synthetic {
            DataSourceKind::Synthetic
        } else {
            DataSourceKind::Csv
        },
        instruments: vec![InstrumentConfig::new(symbol, symbol)],
        ..BriefConfig::default()
    };
    config.validate()?;
    Ok(config)
}

fn run_analyze(symbol: &str, data_dir: PathBuf, days: u32, synthetic: bool, json: bool) -> Result<()> {
    let config = single_config(symbol, data_dir, days, synthetic)?;
    let provider = make_provider(&config, today());
    let analysis = analyze_instrument(provider.as_ref(), &config.instruments[0], &config);

    if let AnalysisStatus::Unavailable { reason } = &analysis.status {
        bail!("{symbol}: {reason}");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis);
    }
    Ok(())
}

fn print_analysis(a: &InstrumentAnalysis) {
    println!();
    println!("=== {} ===", a.symbol);
    if let Some(date) = a.as_of {
        println!("As of:          {date}");
    }
    println!("Bars:           {}", a.bars);
    println!("Close:          {}", format_number(a.last_close, 2));
    println!("Change:         {}", format_percent(a.change_pct));
    println!("Trend:          {}", a.trend);
    if let Some(levels) = &a.levels {
        println!("Support:        {}", format_number(Some(levels.support), 2));
        println!("Resistance:     {}", format_number(Some(levels.resistance), 2));
    }
    println!();
    println!("--- Signals ---");
    if a.signals.is_empty() {
        println!("(not enough history)");
    }
    for (name, label) in a.signals.entries() {
        println!("{name:<15} {label}");
    }
    println!();
    println!("--- Indicators ---");
    for v in &a.indicators {
        println!("{:<15} {}", v.name, format_number(v.value, 2));
    }
}

fn load_brief_config(path: Option<PathBuf>) -> Result<BriefConfig> {
    match path {
        Some(path) => Ok(BriefConfig::from_file(&path)?),
        None if Path::new(DEFAULT_CONFIG).exists() => Ok(BriefConfig::from_file(DEFAULT_CONFIG)?),
        None => {
            warn!("no {DEFAULT_CONFIG} found, using the default instrument list");
            Ok(BriefConfig::default())
        }
    }
}

fn run_brief_cmd(
    config_path: Option<PathBuf>,
    date: Option<String>,
    synthetic: bool,
    data_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_brief_config(config_path)?;
    if synthetic {
        config.source = DataSourceKind::Synthetic;
    }
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    let date = date
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--date must be YYYY-MM-DD")?
        .unwrap_or_else(today);

    let provider = make_provider(&config, date);
    let brief = run_brief(provider.as_ref(), &config, date);
    let paths = render_and_write(&MarkdownRenderer::default(), &config.output_dir, &brief)?;

    println!(
        "Brief for {}: {}/{} instruments analysed",
        brief.date,
        brief.available_count(),
        brief.instruments.len()
    );
    println!("Report: {}", paths.report.display());
    println!("Data:   {}", paths.data.display());
    Ok(())
}

fn run_export(symbol: &str, out: &Path, data_dir: PathBuf, days: u32, synthetic: bool) -> Result<()> {
    let config = single_config(symbol, data_dir, days, synthetic)?;
    let provider = make_provider(&config, today());
    let series = fetch_series(provider.as_ref(), &config.instruments[0], &config, None)
        .with_context(|| format!("failed to load {symbol}"))?;
    if series.is_empty() {
        bail!("{symbol}: no bars in the last {days} days");
    }

    let enriched = compute_all_indicators_with(&series, &config.indicators);
    let mut df = enriched.to_frame()?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(out).with_context(|| format!("Failed to create {}", out.display()))?;
    ParquetWriter::new(file).finish(&mut df)?;

    info!(symbol, rows = df.height(), columns = df.width(), "exported enriched series");
    println!("Wrote {} rows x {} columns to {}", df.height(), df.width(), out.display());
    Ok(())
}

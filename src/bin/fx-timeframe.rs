//! fx-timeframe CLI - download historical FX rates and export them to Excel
//!
//! ## Example Usage
//!
//! ```bash
//! # Last month's GBP table for EUR, USD and CHF
//! fx-timeframe fetch --base GBP --targets EUR,USD,CHF --period last-month
//!
//! # Custom range, with quick stats and a CSV copy
//! fx-timeframe fetch --base EUR --targets USD,JPY --period custom \
//!     --start 2024-01-01 --end 2024-03-31 --stats --csv rates.csv
//!
//! # Normalize a saved provider response offline
//! fx-timeframe convert --input timeframe.json --base GBP --targets EUR,USD
//! ```

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use fx_timeframe::calendar::{parse_date, Period};
use fx_timeframe::config::{Config, API_KEY_ENV};
use fx_timeframe::currency::{CurrencyCode, COMMON_CURRENCIES};
use fx_timeframe::data::fx::{assemble, AssemblyReport, FxQuery, QueryMeta, RateSeries, RawPayload};
use fx_timeframe::data::sources::{CachedSource, ExchangeRateHostSource, RateSource, ResponseCache};
use fx_timeframe::export::{to_xlsx_bytes, write_csv};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

const MAX_THROTTLE_SECS: f64 = 60.0;

/// fx-timeframe: historical FX rates in any base currency
#[derive(Parser)]
#[command(name = "fx-timeframe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query historical FX rates and export them to Excel", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch rates from exchangerate.host and export them
    Fetch(FetchArgs),

    /// Normalize a saved provider response and export it
    Convert(ConvertArgs),

    /// List common currency codes
    Currencies,
}

#[derive(Args)]
struct FetchArgs {
    /// Base currency (default from config, else GBP)
    #[arg(short = 'b', long)]
    base: Option<String>,

    /// Target currencies, comma separated
    #[arg(short = 't', long, value_delimiter = ',')]
    targets: Vec<String>,

    /// Period preset
    #[arg(short = 'p', long, value_enum, default_value_t = PeriodArg::LastMonth)]
    period: PeriodArg,

    /// Start date for a custom period (YYYY-MM-DD)
    #[arg(short = 's', long)]
    start: Option<String>,

    /// End date for a custom period (YYYY-MM-DD)
    #[arg(short = 'e', long)]
    end: Option<String>,

    /// Pause before sending the request, in seconds
    #[arg(long)]
    throttle: Option<f64>,

    /// API key (overrides EXCHANGERATE_API_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct ConvertArgs {
    /// Saved provider response (JSON)
    #[arg(short = 'i', long, value_name = "FILE")]
    input: PathBuf,

    /// Base currency (default from config, else GBP)
    #[arg(short = 'b', long)]
    base: Option<String>,

    /// Target currencies to keep, comma separated (default: all)
    #[arg(short = 't', long, value_delimiter = ',')]
    targets: Vec<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct OutputArgs {
    /// Output .xlsx file (default: fx_timeseries_<BASE>_<start>_<end>.xlsx)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Also write the Rates table as CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Print min / max / mean per currency
    #[arg(long)]
    stats: bool,

    /// Number of rows to preview
    #[arg(long, default_value = "10")]
    preview: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PeriodArg {
    ThisMonth,
    LastMonth,
    Custom,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match Config::load(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Fetch(args) => run_fetch(args, &config).await,
            Commands::Convert(args) => run_convert(args, &config),
            Commands::Currencies => {
                list_currencies();
                Ok(())
            }
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run_fetch(args: FetchArgs, config: &Config) -> anyhow::Result<()> {
    let base = resolve_base(args.base.as_deref(), config)?;
    let targets = resolve_targets(&args.targets, config)?;
    let period = resolve_period(args.period, args.start.as_deref(), args.end.as_deref())?;
    let (start, end) = period.resolve(chrono::Local::now().date_naive())?;
    let query = FxQuery::new(base, targets, start, end)?;

    let throttle_secs = args.throttle.unwrap_or(config.throttle_secs);
    if !(0.0..=MAX_THROTTLE_SECS).contains(&throttle_secs) {
        bail!("throttle must be between 0 and {} seconds", MAX_THROTTLE_SECS);
    }

    let access_key = match args.api_key.or_else(|| config.access_key()) {
        Some(key) => key,
        None => bail!(
            "Please provide your API key (set {} or pass --api-key)",
            API_KEY_ENV
        ),
    };

    let http = ExchangeRateHostSource::with_base_url(access_key, config.base_url.clone())?
        .with_throttle(Duration::from_secs_f64(throttle_secs));
    let source = CachedSource::new(http, ResponseCache::new(config.cache_ttl()));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Calling exchangerate.host /timeframe...");
    let fetched = source.fetch_timeframe(&query).await;
    spinner.finish_and_clear();

    let payload = fetched.context("Could not retrieve data")?;
    let meta = query.meta(source.endpoint());
    present(&payload, &query, meta, &args.output, config)
}

fn run_convert(args: ConvertArgs, config: &Config) -> anyhow::Result<()> {
    let base = resolve_base(args.base.as_deref(), config)?;
    let bytes = fs::read(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;
    let payload = RawPayload::from_slice(&bytes).context("Could not retrieve data")?;

    let requested = CurrencyCode::parse_list(&args.targets)?;
    let (start, end) = payload_date_range(&payload).unwrap_or_else(|| {
        let today = chrono::Local::now().date_naive();
        (today, today)
    });

    // Without explicit targets every currency in the payload is kept.
    let targets = if requested.is_empty() {
        let series = assemble(&payload, base).series;
        series.columns().iter().copied().filter(|c| *c != base).collect()
    } else {
        requested
    };

    let query = FxQuery {
        base,
        targets,
        start,
        end,
    };
    let endpoint = format!("file:{}", args.input.display());
    let meta = QueryMeta::new(base, query.targets.clone(), start, end, &endpoint);
    present(&payload, &query, meta, &args.output, config)
}

/// Assemble, report, preview and export one payload.
fn present(
    payload: &RawPayload,
    query: &FxQuery,
    meta: QueryMeta,
    output: &OutputArgs,
    config: &Config,
) -> anyhow::Result<()> {
    let assembly = assemble(payload, query.base);
    report_skips(&assembly.report);

    if assembly.series.is_empty() {
        println!(
            "{}",
            "No data returned (or base not present in API response). Try a different period or currencies."
                .yellow()
        );
        return Ok(());
    }

    let series = assembly.series.project(&query.targets);

    println!("{}", "Preview".bold());
    print_preview(&series, output.preview)?;
    println!(
        "Rows: {} · Columns: {}   ({} → {})",
        series.len(),
        series.columns().len(),
        query.start,
        query.end
    );

    if output.stats {
        print_stats(&series);
    }

    let xlsx_path = output
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.join(query.export_file_name("xlsx")));
    let bytes = to_xlsx_bytes(&series, &meta)?;
    fs::write(&xlsx_path, bytes)
        .with_context(|| format!("Cannot write {}", xlsx_path.display()))?;
    println!("{} {}", "Saved".green().bold(), xlsx_path.display());

    if let Some(csv_path) = &output.csv {
        write_csv_file(&series, csv_path)?;
        println!("{} {}", "Saved".green().bold(), csv_path.display());
    }

    Ok(())
}

fn write_csv_file(series: &RateSeries, path: &Path) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    write_csv(series, BufWriter::new(file))?;
    Ok(())
}

fn resolve_base(arg: Option<&str>, config: &Config) -> anyhow::Result<CurrencyCode> {
    Ok(match arg {
        Some(code) => CurrencyCode::parse(code)?,
        None => config.default_base,
    })
}

fn resolve_targets(args: &[String], config: &Config) -> anyhow::Result<Vec<CurrencyCode>> {
    if args.is_empty() {
        return Ok(config.default_targets.clone());
    }
    Ok(CurrencyCode::parse_list(args)?)
}

fn resolve_period(
    period: PeriodArg,
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<Period> {
    Ok(match period {
        PeriodArg::ThisMonth => Period::ThisMonth,
        PeriodArg::LastMonth => Period::LastMonth,
        PeriodArg::Custom => match (start, end) {
            (Some(start), Some(end)) => Period::Custom {
                start: parse_date(start)?,
                end: parse_date(end)?,
            },
            _ => bail!("--period custom needs both --start and --end"),
        },
    })
}

fn payload_date_range(payload: &RawPayload) -> Option<(NaiveDate, NaiveDate)> {
    let dates: Vec<NaiveDate> = payload
        .days()
        .iter()
        .filter_map(|day| parse_date(&day.date).ok())
        .collect();
    let start = dates.iter().min()?;
    let end = dates.iter().max()?;
    Some((*start, *end))
}

fn report_skips(report: &AssemblyReport) {
    if !report.has_warnings() {
        return;
    }
    let mut notes = Vec::new();
    if report.days_missing_base > 0 {
        notes.push(format!("{} day(s) without the base currency", report.days_missing_base));
    }
    if report.days_invalid_date > 0 {
        notes.push(format!("{} block(s) with an invalid date", report.days_invalid_date));
    }
    if report.entries_skipped > 0 {
        notes.push(format!("{} unusable value(s)", report.entries_skipped));
    }
    if !report.duplicate_dates.is_empty() {
        notes.push(format!("{} duplicated date(s)", report.duplicate_dates.len()));
    }
    println!("{} skipped {}", "Note:".yellow().bold(), notes.join(", "));
}

fn print_preview(series: &RateSeries, limit: usize) -> anyhow::Result<()> {
    let frame = series.to_dataframe()?;
    println!("{}", frame.head(Some(limit)));
    if series.len() > limit {
        println!("... {} more rows", series.len() - limit);
    }
    Ok(())
}

fn print_stats(series: &RateSeries) {
    println!("{}", "Quick stats (min / max / mean)".bold());
    for stats in series.describe() {
        println!(
            "  {:<4} {:>14.6} {:>14.6} {:>14.6}",
            stats.currency.as_str(),
            stats.min,
            stats.max,
            stats.mean
        );
    }
}

fn list_currencies() {
    println!("{}", "Common currencies".bold());
    let mut codes = COMMON_CURRENCIES.to_vec();
    codes.sort_unstable();
    println!("  {}", codes.join(" "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let args = vec!["fx-timeframe", "currencies"];
        let _cli = Cli::try_parse_from(args).unwrap();
    }

    #[test]
    fn test_fetch_command() {
        let args = vec![
            "fx-timeframe",
            "fetch",
            "--base",
            "GBP",
            "--targets",
            "EUR,USD,CHF",
            "--period",
            "custom",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "--stats",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Fetch(fetch) => {
                assert_eq!(fetch.targets, vec!["EUR", "USD", "CHF"]);
                assert!(fetch.period == PeriodArg::Custom);
                assert!(fetch.output.stats);
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_unknown_period_rejected() {
        let args = vec!["fx-timeframe", "fetch", "--period", "next-week"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_custom_period_needs_both_dates() {
        assert!(resolve_period(PeriodArg::Custom, Some("2024-01-01"), None).is_err());
        assert!(resolve_period(PeriodArg::Custom, Some("2024-01-01"), Some("2024-01-31")).is_ok());
    }

    #[test]
    fn test_convert_writes_workbook_and_csv() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("timeframe.json");
        fs::write(
            &input,
            r#"{"quotes": {"2024-01-02": {"USDEUR": 0.91, "USDGBP": 0.79}, "2024-01-01": {"USDEUR": 0.90, "USDGBP": 0.78}}}"#,
        )
        .unwrap();
        let xlsx = dir.path().join("out.xlsx");
        let csv = dir.path().join("out.csv");

        let args = ConvertArgs {
            input,
            base: Some("GBP".to_string()),
            targets: vec!["EUR".to_string(), "USD".to_string()],
            output: OutputArgs {
                output: Some(xlsx.clone()),
                csv: Some(csv.clone()),
                stats: true,
                preview: 5,
            },
        };
        run_convert(args, &Config::default()).unwrap();

        assert!(xlsx.exists());
        let text = fs::read_to_string(&csv).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("date,GBP,EUR,USD"));
        assert!(lines.next().unwrap().starts_with("2024-01-01,1,"));
    }

    #[test]
    fn test_convert_rejects_unknown_shape() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.json");
        fs::write(&input, r#"{"base": "USD"}"#).unwrap();

        let args = ConvertArgs {
            input,
            base: None,
            targets: vec![],
            output: OutputArgs {
                output: Some(dir.path().join("never.xlsx")),
                csv: None,
                stats: false,
                preview: 5,
            },
        };
        let err = run_convert(args, &Config::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("Could not retrieve data"));
    }
}

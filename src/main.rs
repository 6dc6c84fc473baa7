use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use portfolio_lab::{
    AppConfig, CachedPriceProvider, ConfigManager, CsvDirectoryProvider, Metric, MetricsReport,
    PortfolioAnalyzer, PortfolioRequest,
};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portfolio-lab")]
#[command(about = "Risk and return metrics for weighted portfolios")]
struct Cli {
    /// TOML or JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding <TICKER>_historical.csv files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single portfolio
    Analyze {
        /// Comma separated tickers
        #[arg(long, value_delimiter = ',', required = true)]
        tickers: Vec<String>,

        /// Comma separated integer weights, summing to 100
        #[arg(long, value_delimiter = ',', required = true)]
        weights: Vec<i64>,

        /// First month, YYYY-MM
        #[arg(long)]
        start: String,

        /// Last month, YYYY-MM
        #[arg(long)]
        end: String,

        #[arg(long)]
        benchmark: Option<String>,

        /// Annual risk-free rate, overrides the configuration
        #[arg(long)]
        risk_free: Option<f64>,
    },

    /// Analyze every request in a JSON file, in parallel
    Batch {
        #[arg(long)]
        requests: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let provider = CachedPriceProvider::from_config(
        CsvDirectoryProvider::from_config(&config.data),
        &config.data,
    );
    let analyzer = PortfolioAnalyzer::new(provider, config.analysis.clone());

    match cli.command {
        Commands::Analyze {
            tickers,
            weights,
            start,
            end,
            benchmark,
            risk_free,
        } => {
            let request = PortfolioRequest {
                name: None,
                tickers,
                allocations: weights,
                start,
                end,
                benchmark_ticker: benchmark,
                risk_free_annual: risk_free,
            };

            let report = analyzer
                .analyze(&request)
                .map_err(|e| anyhow::anyhow!("{} ({})", e, e.kind()))?;
            print_report(&report, cli.format)?;
        }
        Commands::Batch { requests: path } => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let requests: Vec<PortfolioRequest> = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?;

            let results = analyzer.analyze_batch(&requests);
            let failures = results.iter().filter(|r| r.is_err()).count();

            match cli.format {
                OutputFormat::Json => {
                    let entries: Vec<_> = requests
                        .iter()
                        .zip(&results)
                        .map(|(request, result)| match result {
                            Ok(report) => json!({ "name": request.name, "report": report }),
                            Err(e) => json!({
                                "name": request.name,
                                "error": { "kind": e.kind(), "message": e.to_string() },
                            }),
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
                OutputFormat::Table => {
                    for (i, (request, result)) in requests.iter().zip(&results).enumerate() {
                        let name = request.name.clone().unwrap_or_else(|| format!("#{}", i + 1));
                        println!("== {} ==", name);
                        match result {
                            Ok(report) => print_report(report, OutputFormat::Table)?,
                            Err(e) => println!("error ({}): {}\n", e.kind(), e),
                        }
                    }
                }
            }

            if failures > 0 {
                bail!("{} of {} requests failed", failures, results.len());
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let manager = ConfigManager::new();
    manager
        .load(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(dir) = &cli.data_dir {
        let dir = dir.clone();
        manager
            .update(|c| c.data.data_dir = dir)
            .context("Invalid data directory")?;
    }

    let config = manager.get();
    log::debug!(
        "Using data directory {}, risk-free rate {}",
        config.data.data_dir.display(),
        config.analysis.risk_free_annual
    );
    Ok(config)
}

fn print_report(report: &MetricsReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => print_table(report),
    }
    Ok(())
}

fn print_table(report: &MetricsReport) {
    println!(
        "Periods: {} ({} to {})",
        report.periods, report.start_period, report.end_period
    );
    if let Some(benchmark) = &report.benchmark {
        println!("Benchmark: {}", benchmark);
    }
    println!();

    for metric in Metric::all() {
        if let Some(value) = report.get(metric.key()) {
            println!("{:<32} {:>14.6}", metric.label(), value);
        }
    }

    if let Some(matrix) = report.correlation_matrix() {
        println!("\nCorrelation");
        let ids: Vec<&String> = matrix.keys().collect();
        print!("{:<10}", "");
        for id in &ids {
            print!("{:>10}", id);
        }
        println!();
        for (row_id, row) in matrix {
            print!("{:<10}", row_id);
            for id in &ids {
                match row.get(*id) {
                    Some(value) => print!("{:>10.4}", value),
                    None => print!("{:>10}", "-"),
                }
            }
            println!();
        }
    }
    println!();
}

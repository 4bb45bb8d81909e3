//! Clinic-Probe main entry point
//!
//! This is the command-line interface for the clinic equipment classifier.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use clinic_probe::config::{load_config_with_hash, Config};
use clinic_probe::crawler::{BatchScheduler, HttpFetcher, SiteCrawler};
use clinic_probe::input::{read_input, InputTable};
use clinic_probe::output::{
    default_output_path, print_summary, BatchReport, BatchSummary, CsvOutput, MarkdownOutput,
    OutputHandler,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Clinic-Probe: finds dental clinics that own intraoral 3D scanners
///
/// Clinic-Probe reads a CSV of clinics, crawls each clinic's own website
/// (prioritizing equipment and treatment pages), scores the keyword evidence
/// and writes the input back with classification columns appended.
#[derive(Parser, Debug)]
#[command(name = "clinic-probe")]
#[command(version = "1.0.0")]
#[command(about = "Classifies dental clinics by scanner ownership from their websites", long_about = None)]
struct Cli {
    /// Input CSV (name, website, email, ...); prompted for when omitted
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Result CSV path (default: <input>_3d_results.csv)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Load config and input, show what would be crawled, and exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_configuration(cli.config.as_deref())?;

    let input_path = match cli.input {
        Some(path) => path,
        None => prompt_for_input()?,
    };
    if !input_path.exists() {
        bail!("Input file not found: {}", input_path.display());
    }

    let table = read_input(&input_path, &config.input)
        .with_context(|| format!("Failed to load {}", input_path.display()))?;

    let output_path = cli
        .output
        .unwrap_or_else(|| default_output_path(&input_path, &config.output.suffix));

    if cli.dry_run {
        handle_dry_run(&config, &table, &output_path);
        return Ok(());
    }

    handle_batch(config, config_hash, table, &output_path).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("clinic_probe=info,warn"),
            1 => EnvFilter::new("clinic_probe=debug,info"),
            2 => EnvFilter::new("clinic_probe=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load_configuration(path: Option<&Path>) -> anyhow::Result<(Config, Option<String>)> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok((Config::default(), None));
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok((config, Some(hash)))
}

/// Asks for the input path on stdin
fn prompt_for_input() -> anyhow::Result<PathBuf> {
    print!("Input CSV path: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let path = line.trim().trim_matches('"');
    if path.is_empty() {
        bail!("No input file given");
    }
    Ok(PathBuf::from(path))
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, table: &InputTable, output_path: &Path) {
    let targets = table.targets(&config.input.placeholder);

    println!("=== Clinic-Probe Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages per site: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay_ms);
    println!("  Timeout limit: {}", config.crawler.max_timeout_retries);
    println!("  Request timeout: {}ms", config.crawler.request_timeout_ms);

    println!("\nScheduler:");
    println!("  Workers: {}", config.scheduler.workers);
    println!("  Deadline: {}s", config.scheduler.deadline_secs);

    println!("\nKeywords:");
    println!("  Scanner: {}", config.keywords.primary.len());
    println!("  Digital dentistry: {}", config.keywords.secondary.len());

    println!("\nInput:");
    println!("  Rows: {}", table.rows.len());
    println!("  Targets: {}", targets.len());
    println!(
        "  With website: {}",
        targets.iter().filter(|t| t.has_website()).count()
    );
    for target in targets.iter().take(20) {
        println!("  - {} ({})", target.name, target.website);
    }
    if targets.len() > 20 {
        println!("  ... and {} more", targets.len() - 20);
    }

    println!("\nOutput: {}", output_path.display());
    if let Some(summary) = &config.output.summary_path {
        println!("Report: {}", summary);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} targets", targets.len());
}

/// Handles the main batch: crawl, write outputs, print the summary
async fn handle_batch(
    config: Config,
    config_hash: Option<String>,
    table: InputTable,
    output_path: &Path,
) -> anyhow::Result<()> {
    let targets = table.targets(&config.input.placeholder);
    tracing::info!(
        "{} of {} rows selected for crawling",
        targets.len(),
        table.rows.len()
    );

    let fetcher = HttpFetcher::new(&config).context("Failed to build HTTP client")?;
    let config = Arc::new(config);
    let crawler = SiteCrawler::new(Arc::new(fetcher), config.clone());
    let scheduler = BatchScheduler::new(crawler, &config.scheduler);

    let started_at = Utc::now();
    let results = scheduler.run(targets).await;
    let finished_at = Utc::now();

    let mut summary = BatchSummary::from_results(&results, table.rows.len(), started_at, finished_at);
    if let Some(hash) = config_hash {
        summary = summary.with_config_hash(hash);
    }

    let report = BatchReport {
        table: &table,
        results: &results,
        summary: &summary,
        placeholder: &config.input.placeholder,
    };

    let mut handlers: Vec<Box<dyn OutputHandler>> = vec![Box::new(CsvOutput::new(output_path))];
    if let Some(summary_path) = &config.output.summary_path {
        handlers.push(Box::new(MarkdownOutput::new(summary_path)));
    }

    for handler in &handlers {
        handler
            .write_report(&report)
            .with_context(|| format!("Failed to write {} output", handler.name()))?;
    }
    tracing::info!("Results written to {}", output_path.display());

    print_summary(&summary);

    Ok(())
}

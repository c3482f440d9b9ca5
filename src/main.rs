//! Scroopy main entry point
//!
//! This is the command-line interface for the Scroopy page text scraper.

use anyhow::Context;
use clap::Parser;
use scroopy::config::{load_config_with_hash, Config};
use scroopy::crawler::Coordinator;
use scroopy::job::{run_job, JobReport, JobRequest, SeedRequest};
use scroopy::output::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Scroopy: scrape page text, optionally one link deep
///
/// Scroopy fetches each seed URL, extracts the visible text of the page and,
/// with --sub-links, of every page it links to. Results are written as JSON,
/// a SQLite archive and CSV, one file per seed and format.
#[derive(Parser, Debug)]
#[command(name = "scroopy")]
#[command(version)]
#[command(about = "Scrape page text, optionally one link deep", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL to scrape (repeatable); overrides the config's seeds
    #[arg(short, long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Also scrape the links found on each --url seed
    #[arg(short, long, requires = "urls")]
    sub_links: bool,

    /// Output directory (overrides the config)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Artifact format to write (repeatable: json, sqlite, csv)
    #[arg(short, long = "format", value_name = "FORMAT")]
    formats: Vec<String>,

    /// Write the job report as JSON to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scroopy=info,warn"),
            1 => EnvFilter::new("scroopy=debug,info"),
            2 => EnvFilter::new("scroopy=trace,debug"),
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

/// Resolves configuration and seeds, then runs the job
///
/// Returns `Ok(JobReport)` for a completed job (even with per-seed errors) and
/// `Err` only when the job could not start.
async fn run(cli: Cli) -> anyhow::Result<JobReport> {
    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    let request = build_request(&cli, &config, config_hash)?;
    if request.seeds.is_empty() {
        anyhow::bail!("no seed URLs: pass --url or add [[seed]] entries to the config");
    }

    if cli.dry_run {
        print_dry_run(&config, &request);
        return Ok(empty_report(&request));
    }

    let coordinator = Coordinator::new(&config).context("failed to set up the crawler")?;
    let report = run_job(&coordinator, &request).await;

    print_report(&report);

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(report)
}

/// Merges CLI overrides into the job request built from the configuration
fn build_request(
    cli: &Cli,
    config: &Config,
    config_hash: Option<String>,
) -> anyhow::Result<JobRequest> {
    let mut request = JobRequest::from_config(config, config_hash);

    if !cli.urls.is_empty() {
        request.seeds = cli
            .urls
            .iter()
            .map(|url| {
                scroopy::url::parse_seed_url(url)?;
                Ok(SeedRequest::new(url.trim(), cli.sub_links))
            })
            .collect::<Result<_, scroopy::ConfigError>>()?;
    }

    if let Some(output) = &cli.output {
        request.output_dir = output.clone();
    }

    if !cli.formats.is_empty() {
        let mut formats = Vec::new();
        for name in &cli.formats {
            let format = OutputFormat::from_name(name)
                .with_context(|| format!("unknown output format '{}'", name))?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        request.formats = formats;
    }

    Ok(request)
}

fn empty_report(request: &JobRequest) -> JobReport {
    let now = chrono::Utc::now();
    JobReport {
        started_at: now,
        finished_at: now,
        config_hash: request.config_hash.clone(),
        seeds: Vec::new(),
        artifacts: Vec::new(),
        errors: Vec::new(),
    }
}

/// Handles the --dry-run mode: shows what would be scraped
fn print_dry_run(config: &Config, request: &JobRequest) {
    println!("=== Scroopy Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    println!("  Max redirects: {}", config.crawler.max_redirects);
    println!(
        "  Container elements: {}",
        config.crawler.container_elements.join(", ")
    );

    println!("\nOutput:");
    println!("  Directory: {}", request.output_dir.display());
    let formats: Vec<&str> = request.formats.iter().map(|f| f.name()).collect();
    println!("  Formats: {}", formats.join(", "));

    println!("\nSeeds ({}):", request.seeds.len());
    for seed in &request.seeds {
        let mode = if seed.sub_links { "with sub-links" } else { "page only" };
        println!("  - {} ({})", seed.url, mode);
    }
}

fn print_report(report: &JobReport) {
    println!("\n=== {} ===", report.status_message());

    for seed in &report.seeds {
        if seed.sub_links {
            println!(
                "  {}: {} pages ({} links found, {} failed)",
                seed.url,
                seed.pages,
                seed.link_count,
                seed.link_failures.len()
            );
        } else {
            println!("  {}: page only", seed.url);
        }
    }

    if !report.artifacts.is_empty() {
        println!("\nArtifacts:");
        for path in &report.artifacts {
            println!("  {}", path.display());
        }
    }

    for error in &report.errors {
        println!("  ⚠️ {}", error);
    }
}

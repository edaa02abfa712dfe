//! Sift-Crawl main entry point
//!
//! This is the command-line interface for the Sift-Crawl topic crawler.

use anyhow::{Context, Result};
use clap::Parser;
use sift_crawl::config::{load_config_with_hash, validate, Config};
use sift_crawl::output::{print_statistics, write_reports, AnalysisReport};
use sift_crawl::Analyzer;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sift-Crawl: a topic-driven, budgeted web crawler
///
/// Sift-Crawl starts at a URL, scores every page it fetches for relevance to
/// your instructions, and stops as soon as it has collected enough relevant
/// content. The collected pages are then summarized into one report.
#[derive(Parser, Debug)]
#[command(name = "sift-crawl")]
#[command(version)]
#[command(about = "A topic-driven, budgeted web crawler", long_about = None)]
struct Cli {
    /// Starting URL
    #[arg(value_name = "URL")]
    url: String,

    /// What you want to learn from the site
    #[arg(value_name = "INSTRUCTIONS")]
    instructions: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum link depth from the starting page
    #[arg(long)]
    max_depth: Option<u32>,

    /// Minimum relevance score for a page to be collected
    #[arg(long)]
    min_score: Option<f64>,

    /// Cumulative score at which the crawl stops
    #[arg(long)]
    threshold: Option<f64>,

    /// Number of concurrent fetches
    #[arg(long)]
    workers: Option<u32>,

    /// Use the deterministic keyword extractor and summarizer
    #[arg(long)]
    no_llm: bool,

    /// Write the JSON report to this path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate config and show the extracted keywords without crawling
    #[arg(long)]
    dry_run: bool,

    /// Print crawl statistics after the run
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration after command-line overrides")?;

    let mut analyzer = Analyzer::from_config(&config).context("Failed to build crawler")?;
    if let Some(hash) = config_hash {
        analyzer = analyzer.with_config_hash(hash);
    }

    if cli.dry_run {
        handle_dry_run(&config, &analyzer, &cli).await;
        return Ok(());
    }

    let report = analyzer
        .analyze(&cli.url, &cli.instructions)
        .await
        .with_context(|| format!("Crawl of {} failed", cli.url))?;

    emit_report(&config, &report)?;

    if cli.stats {
        println!();
        print_statistics(&report.statistics);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the JSON report on stdout stays machine-readable.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sift_crawl=info,warn"),
            1 => EnvFilter::new("sift_crawl=debug,info"),
            2 => EnvFilter::new("sift_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line flags on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(score) = cli.min_score {
        config.crawler.min_score = score;
    }
    if let Some(threshold) = cli.threshold {
        config.crawler.cumulative_score_threshold = threshold;
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if cli.no_llm {
        config.llm = None;
    }
    if let Some(path) = &cli.output {
        config.output.report_path = Some(path.to_string_lossy().into_owned());
    }
}

/// Handles the --dry-run mode: shows the settings and the extracted keywords
async fn handle_dry_run<F, S>(config: &Config, analyzer: &Analyzer<F, S>, cli: &Cli)
where
    F: sift_crawl::PageFetcher,
    S: sift_crawl::Scorer,
{
    println!("=== Sift-Crawl Dry Run ===\n");

    println!("Target:");
    println!("  URL: {}", cli.url);
    println!("  Instructions: {}", cli.instructions);

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Min score: {}", config.crawler.min_score);
    println!(
        "  Cumulative score threshold: {}",
        config.crawler.cumulative_score_threshold
    );
    println!("  Workers: {}", config.crawler.workers);

    println!("\nScoring:");
    println!("  Bonus policy: {:?}", config.scoring.bonus_policy);
    println!("  Title bonus factor: {}", config.scoring.title_bonus_factor);
    println!("  Intro bonus factor: {}", config.scoring.intro_bonus_factor);

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Respect robots.txt: {}", config.fetcher.respect_robots);

    match &config.llm {
        Some(llm) => println!("\nLLM: {} at {}", llm.model, llm.api_base),
        None => println!("\nLLM: disabled"),
    }

    let keywords = analyzer.extract_keywords(&cli.instructions).await;
    println!("\nKeywords ({}):", keywords.len());
    for keyword in &keywords {
        println!("  - {} ({:.1})", keyword.term, keyword.weight);
    }

    println!("\n✓ Configuration is valid");
}

/// Prints the report to stdout and writes every configured output file
fn emit_report(config: &Config, report: &AnalysisReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{}", json);

    write_reports(&config.output, report).context("Failed to write report outputs")?;
    Ok(())
}

//! Zomato Prep CLI - turn restaurant listings into a modeling feature table

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use zomato_prep::{PipelineConfig, Preprocessor, RunSummary, Stage, Threshold};

/// Default input dataset (relative to project root)
const DEFAULT_INPUT: &str = "data/zomato.csv";
const DEFAULT_OUTPUT: &str = "processed_data.csv";

#[derive(Parser)]
#[command(name = "zomato-prep")]
#[command(author, version, about = "Restaurant listing preprocessor", long_about = None)]
struct Cli {
    /// Path to the raw listings CSV
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Path of the feature table to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Minimum listings per name to count as a chain (count or "median")
    #[arg(long, default_value = "15")]
    chain_threshold: Threshold,

    /// Minimum listings per neighborhood to keep it (count or "median")
    #[arg(long, default_value = "167")]
    neighborhood_threshold: Threshold,

    /// Number of cuisines encoded individually
    #[arg(long, default_value = "30")]
    top_cuisines: usize,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = PipelineConfig::default()
        .with_chain_threshold(cli.chain_threshold)
        .with_neighborhood_threshold(cli.neighborhood_threshold)
        .with_top_cuisines(cli.top_cuisines);

    let summary = run_preprocess(&cli.input, &cli.output, config, cli.json)?;

    if cli.json {
        println!("{}", summary.to_json()?);
    } else {
        print_summary(&summary, &cli.output);
    }

    Ok(())
}

fn run_preprocess(
    input: &Path,
    output: &Path,
    config: PipelineConfig,
    json: bool,
) -> Result<RunSummary> {
    let preprocessor = Preprocessor::new(config);

    if !json {
        let config = preprocessor.config();
        println!(
            "{}: {} -> {}",
            "Preprocessing".green(),
            input.display(),
            output.display()
        );
        println!(
            "Thresholds: chain >= {}, neighborhood >= {}, top {} cuisines",
            config.chain_threshold, config.neighborhood_threshold, config.top_cuisines
        );
        println!();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid spinner template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let summary = preprocessor
        .process_file_with(input, output, |stage| match stage {
            Stage::Loading => pb.set_message("Loading listings..."),
            Stage::Loaded(rows) => {
                // stdout stays pure JSON with --json
                if json {
                    pb.suspend(|| eprintln!("Finished reading in {} rows", rows));
                } else {
                    pb.suspend(|| println!("Finished reading in {} rows", rows));
                }
            }
            Stage::Processing => pb.set_message("Deriving features..."),
            Stage::Writing => pb.set_message("Writing feature table..."),
            Stage::Written(_) => pb.finish_and_clear(),
        })
        .with_context(|| format!("Failed to preprocess {:?} into {:?}", input, output));

    pb.finish_and_clear();
    summary
}

fn print_summary(summary: &RunSummary, output: &Path) {
    println!("{:<32} {:>10}", "Stage", "Rows");
    println!("{}", "-".repeat(43));
    println!("{:<32} {:>10}", "Read", summary.rows_read);
    println!(
        "{:<32} {:>10}",
        "Casual Dining / Quick Bites", summary.rows_after_type_filter
    );
    println!("{:<32} {:>10}", "Rated", summary.rows_rated);
    println!("{:<32} {:>10}", "With cuisines", summary.rows_with_cuisines);
    println!("{:<32} {:>10}", "In frequent neighborhoods", summary.rows_written);
    println!();

    println!("Chains: {}", summary.chain_names.len());
    println!("Neighborhoods: {}", join_or_none(&summary.neighborhoods));
    println!(
        "Top cuisines: {} ({} more in other_bin)",
        join_or_none(&summary.top_cuisines),
        summary.other_cuisine_count
    );
    println!();

    if summary.rows_written == 0 {
        println!("{}", "No listings survived the filters.".yellow());
    }
    println!(
        "{} {} rows x {} columns to {}",
        "Successfully processed data:".green().bold(),
        summary.rows_written,
        summary.columns.len(),
        output.display()
    );
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

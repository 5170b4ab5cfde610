use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use metadata_extractor::{config, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "metadata-extractor",
    version,
    about = "Extract metadata from JPEG images into per-image JSON files",
    after_help = "Example: metadata-extractor CAM18839.jpg images/CAM18840.jpg other/"
)]
struct Cli {
    /// Image files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Number of worker threads (0 = one per CPU)
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }

    // Load config
    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(workers) = cli.workers {
        config.batch.workers = workers;
    }

    let inputs = pipeline::collect_inputs(&cli.paths, &config);
    if inputs.is_empty() {
        anyhow::bail!("No supported image files found in the specified paths.");
    }

    let result = pipeline::process_batch(&inputs, &config);

    for error in result.failures().filter_map(pipeline::FileOutcome::error) {
        if error.is_warning() {
            log::warn!("{error}, skipping");
        } else {
            log::error!("{error}");
        }
    }

    // JSON output
    if cli.json {
        let json_results: Vec<serde_json::Value> = result
            .outcomes()
            .iter()
            .map(|o| match o {
                pipeline::FileOutcome::Success { input, output } => serde_json::json!({
                    "path": input.display().to_string(),
                    "output": output.display().to_string(),
                }),
                pipeline::FileOutcome::Failure { input, stage, error } => serde_json::json!({
                    "path": input.display().to_string(),
                    "stage": stage.to_string(),
                    "error_type": error.kind(),
                    "error": error.to_string(),
                }),
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    // Summary; skipped inputs were already reported as warnings
    println!(
        "Successful: {} Failures: {}",
        result.success_count(),
        result.error_count()
    );
    for outcome in result.errors() {
        if let pipeline::FileOutcome::Failure { input, error, .. } = outcome {
            println!("{} - {} - {error}", input.display(), error.kind());
        }
    }

    Ok(if result.error_count() == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

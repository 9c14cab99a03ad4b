//! Leafguard CLI
//!
//! Command-line interface for the plant-disease classifier: predict on a
//! single image or a directory of images, or inspect the normalized class
//! label map.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use walkdir::WalkDir;

use leafguard::backend::{backend_name, default_device, DefaultBackend};
use leafguard::config::AppConfig;
use leafguard::inference::{load_predictor, PredictionOutcome};
use leafguard::labels::ClassLabelMap;
use leafguard::utils::logging::{init_logging, LogConfig};

/// Image extensions accepted when scanning a directory
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Leafguard plant disease classification
#[derive(Parser, Debug)]
#[command(name = "leafguard")]
#[command(version)]
#[command(about = "Plant disease classification with robust inference", long_about = None)]
struct Cli {
    /// Path to a JSON configuration file (defaults are used if omitted)
    #[arg(short, long, env = "LEAFGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Suppress everything except errors
    #[arg(short, long, default_value = "false", conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Predict on a single image or every image in a directory
    Predict {
        /// Path to an image file or a directory of images
        #[arg(short, long)]
        input: PathBuf,

        /// Override the model weights path
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Override the confidence threshold (0.0-1.0)
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Print raw JSON outcomes instead of formatted output
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print the normalized class label map
    Classes,

    /// Write a default configuration file to edit from
    InitConfig {
        /// Where to write the configuration JSON
        #[arg(short, long, default_value = "leafguard.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else if cli.quiet {
        LogConfig::quiet()
    } else {
        LogConfig::default()
    };
    init_logging(&log_config).map_err(|e| anyhow::anyhow!(e))?;

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load configuration from {:?}", path))?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Predict {
            input,
            model,
            threshold,
            json,
        } => {
            if let Some(model) = model {
                config.model_path = model;
            }
            if let Some(threshold) = threshold {
                config.confidence_threshold = threshold;
            }

            run_predict(&config, &input, json)
        }
        Commands::Classes => run_classes(&config),
        Commands::InitConfig { output } => {
            config
                .save(&output)
                .with_context(|| format!("failed to write configuration to {:?}", output))?;
            println!("Wrote configuration to {:?}", output);
            Ok(())
        }
    }
}

fn run_predict(config: &AppConfig, input: &Path, json: bool) -> Result<()> {
    info!("Backend: {}", backend_name());

    let device = default_device();
    let predictor = load_predictor::<DefaultBackend>(config, &device)
        .context("failed to initialize the predictor")?;

    let images = collect_images(input)?;
    if images.is_empty() {
        anyhow::bail!("no images found at {:?}", input);
    }

    for path in &images {
        let outcome = predictor
            .predict_path(path)
            .with_context(|| format!("prediction failed for {:?}", path))?;

        if json {
            println!("{}", serde_json::to_string(&outcome)?);
        } else {
            print_outcome(path, &outcome);
        }
    }

    Ok(())
}

fn run_classes(config: &AppConfig) -> Result<()> {
    let labels = ClassLabelMap::load(&config.class_indices_path)
        .context("failed to load the class index file")?;

    println!("{} classes:", labels.num_classes());
    for (index, name) in labels.names().enumerate() {
        println!("  {:>3}  {}", index, name);
    }

    Ok(())
}

/// Resolve the input path to a list of image files
fn collect_images(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut images: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();

    images.sort();
    Ok(images)
}

fn print_outcome(path: &Path, outcome: &PredictionOutcome) {
    println!();
    println!("{} {:?}", "Image:".bold(), path);

    match outcome {
        PredictionOutcome::Success { report, .. } => {
            println!(
                "  {} {} ({})",
                "Diagnosis:".green().bold(),
                report.prediction,
                report.scientific_name
            );
            println!("  Severity: {}", report.severity);
            println!("  Confidence: {}", outcome.confidence_percent());

            if !report.symptoms.is_empty() {
                println!("  Symptoms:");
                for symptom in &report.symptoms {
                    println!("    - {}", symptom);
                }
            }

            if !report.treatment_plan.is_empty() {
                println!("  Treatment plan:");
                for step in &report.treatment_plan {
                    println!(
                        "    - [{}] {} ({}, {})",
                        step.category, step.action, step.frequency, step.duration
                    );
                }
            }

            if !report.prevention.is_empty() {
                println!("  Prevention:");
                for tip in &report.prevention {
                    println!("    - {}", tip);
                }
            }
        }
        PredictionOutcome::Unsure { message, .. } => {
            println!("  {} {}", "Unsure:".yellow().bold(), message);
        }
        PredictionOutcome::Invalid { message, .. } => {
            println!("  {} {}", "Invalid:".red().bold(), message);
        }
    }
}

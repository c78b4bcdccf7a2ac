//! No-Show Predictor - Main Entry Point
//!
//! Encodes patient details, runs the show-up classifier and prints the
//! overbooking recommendation.

use anyhow::Result;
use clap::Parser;
use noshow_predictor::{
    cli::{Cli, Commands},
    config::AppConfig,
    display::{render_json, render_text},
    feature_encoder::FEATURE_NAMES,
    form::run_form,
    logging::init_tracing,
    models::PredictorGateway,
    pipeline::NoShowPipeline,
};
use std::io::{self, Write};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };

    init_tracing(&config.logging, cli.verbose)?;
    info!(
        model_path = %config.model.path.display(),
        threshold = config.decision.threshold,
        "Configuration loaded"
    );

    // Build the model once; everything below borrows it
    let gateway = PredictorGateway::initialize(&config.model)?;
    let pipeline = NoShowPipeline::new(&gateway, config.decision.threshold);

    let stdout = io::stdout();
    match cli.command {
        Commands::Predict(args) => {
            let report = pipeline.assess(&args.to_input())?;
            let panel = if args.json {
                render_json(&report)?
            } else {
                render_text(&report)
            };
            let mut out = stdout.lock();
            writeln!(out, "{}", panel.trim_end())?;
        }
        Commands::Form { json } => {
            run_form(&pipeline, io::stdin().lock(), stdout.lock(), json)?;
        }
        Commands::ModelInfo => {
            let mut out = stdout.lock();
            writeln!(out, "Model kind:   {}", gateway.model_kind())?;
            writeln!(out, "Source:       {}", gateway.model_source())?;
            if let Some(reason) = gateway.fallback_reason() {
                writeln!(out, "Fallback:     {}", reason)?;
                writeln!(
                    out,
                    "              predictions from this model carry no signal"
                )?;
            }
            writeln!(out, "Threshold:    {:.2}", config.decision.threshold)?;
            writeln!(out, "Features:     {}", FEATURE_NAMES.join(", "))?;
        }
    }

    Ok(())
}

mod catalog;
mod config;
mod elements;
mod pipeline;
mod propagation;
mod scene;
mod scheduler;
mod source;
mod web;

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;

use crate::config::Config;
use crate::elements::parse_report;
use crate::pipeline::Pipeline;
use crate::scene::OrbitPathCache;

#[derive(Parser)]
#[command(name = "orbit-watch")]
#[command(about = "Live catalog of propagated orbital objects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an element-set file and report what was accepted
    Validate {
        file: String,
        #[arg(long, default_value = "UNSPECIFIED")]
        category: String,
    },
    /// Load the active categories once and print the catalog as JSON
    Snapshot {
        #[arg(long)]
        config: String,
    },
    /// Print one revolution of an object's orbit in scene coordinates
    Orbit {
        #[arg(long)]
        config: String,
        id: String,
    },
    /// Run the pipeline and serve the HTTP API
    Serve {
        #[arg(long)]
        config: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file, category } => validate(&file, &category),
        Commands::Snapshot { config } => snapshot(&config).await,
        Commands::Orbit { config, id } => orbit(&config, &id).await,
        Commands::Serve { config } => serve(&config).await,
    }
}

fn validate(path: &str, category: &str) -> ExitCode {
    let text = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = parse_report(&text, category);
    println!(
        "{} element sets accepted, {} skipped",
        report.elements.len(),
        report.skipped.len()
    );
    for set in &report.elements {
        println!(
            "  {} {:<24} epoch {} inc {:.4}°",
            set.catalog_number, set.name, set.epoch, set.inclination_deg
        );
    }
    for skipped in &report.skipped {
        println!("  skipped {} at line {}: {}", skipped.name, skipped.line, skipped.reason);
    }

    if report.elements.is_empty() && !report.skipped.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn load(path: &str) -> Result<(Config, Pipeline), ExitCode> {
    let config = Config::from_file(path).map_err(|e| {
        eprintln!("Config error: {}", e);
        ExitCode::FAILURE
    })?;
    let mut pipeline = Pipeline::from_config(&config).map_err(|e| {
        eprintln!("Config error: {}", e);
        ExitCode::FAILURE
    })?;
    if let Err(e) = pipeline.set_active_categories(config.active.clone()).await {
        eprintln!("Pipeline error: {}", e);
        return Err(ExitCode::FAILURE);
    }
    pipeline.settled().await;
    pipeline.shutdown().await;
    Ok((config, pipeline))
}

async fn snapshot(path: &str) -> ExitCode {
    let (_, pipeline) = match load(path).await {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    match serde_json::to_string_pretty(pipeline.catalog().snapshot().as_ref()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn orbit(path: &str, id: &str) -> ExitCode {
    let (config, pipeline) = match load(path).await {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let snapshot = pipeline.catalog().snapshot();
    let Some(object) = snapshot.objects.get(id) else {
        eprintln!("Object {} is not in the active categories", id);
        return ExitCode::FAILURE;
    };

    let bucket = match config.orbit_cache_bucket() {
        Ok(bucket) => bucket,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let cache = OrbitPathCache::new(bucket, config.scene.orbit_segments);
    let points = cache.get_or_sample(
        &object.elements,
        Utc::now(),
        pipeline.propagator().as_ref(),
        &config.scene_scale(),
    );

    println!("{} ({}): {} points", object.name, object.id, points.len());
    for p in points.iter() {
        println!("{:.5} {:.5} {:.5}", p.x, p.y, p.z);
    }
    ExitCode::SUCCESS
}

async fn serve(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

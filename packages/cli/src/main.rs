#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the quarter map toolchain.

use std::time::Instant;

use clap::{Parser, Subcommand};
use quarter_map_pipeline::stats::batch_stats;
use quarter_map_source::registry;
use quarter_map_source_models::QuarterSource;

#[derive(Parser)]
#[command(name = "quarter_map_cli", about = "Quarter map toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all configured quarter data sources
    Sources,
    /// Fetch and normalize a source, printing counts and statistics
    Ingest {
        /// Source identifier (e.g., "`yekaterinburg_quarters`")
        source: String,
        /// Maximum number of raw records to ingest
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Start the API server
    Serve,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sources => {
            let sources = registry::all_sources();
            println!("{:<28} {:<16} NAME", "ID", "CITY");
            println!("{}", "-".repeat(72));
            for source in &sources {
                println!("{:<28} {:<16} {}", source.id(), source.city, source.name());
            }
        }
        Commands::Ingest { source, limit } => {
            let sources = registry::all_sources();
            let src = sources
                .iter()
                .find(|s| s.id() == source)
                .ok_or_else(|| format!("Unknown source: {source}"))?;

            ingest(src, limit).await?;
        }
        Commands::Serve => {
            quarter_map_server::run_server().await?;
        }
    }

    Ok(())
}

/// Fetches, normalizes, and summarizes one source.
async fn ingest(
    source: &QuarterSource,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::builder()
        .user_agent("quarter-map/1.0")
        .build()?;

    let start = Instant::now();
    let batch = quarter_map_source::load_source(&client, source, limit).await?;
    let elapsed = start.elapsed();

    println!("Source:      {} ({})", source.id(), source.city);
    println!("Parsed:      {}", batch.counts.parsed);
    println!("Rejected:    {} without coordinates", batch.counts.no_coordinates);
    println!(
        "             {} with too few vertices",
        batch.counts.insufficient_vertices
    );

    if batch.is_empty() {
        log::warn!(
            "{}: no quarters survived normalization; check the source's coordinate format",
            source.id()
        );
    } else {
        let stats = batch_stats(&batch.features);
        println!("Population:  {}", stats.total_population);
        println!("Area:        {:.1} ha", stats.total_area);
        println!("Mean NDVI:   {:.2}", stats.mean_ndvi);
        if let Some(mean) = stats.mean_accessibility {
            println!("Mean access: {mean:.1}/5");
        }
    }

    log::info!(
        "Ingest complete: {} quarters in {:.1}s",
        batch.counts.parsed,
        elapsed.as_secs_f64()
    );

    Ok(())
}

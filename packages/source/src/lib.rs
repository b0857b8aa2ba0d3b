#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Quarter data acquisition.
//!
//! Downloads raw quarter records from city open data exports (CSV,
//! `GeoJSON`, per-node lookups), maps source-specific field names onto the
//! canonical pipeline keys, and hands the resulting batches to the
//! normalization pipeline. Sources are defined as TOML files embedded at
//! compile time.

pub mod fetchers;
pub mod registry;
pub mod retry;

use quarter_map_pipeline::NormalizedBatch;
use quarter_map_source_models::QuarterSource;
use thiserror::Error;

/// Errors that can occur while acquiring raw records.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `GeoJSON` structure was not usable.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Fetches a source and runs the batch through the pipeline.
///
/// `limit` caps the number of raw records (useful for testing). Upstream
/// unavailability that exhausts the retry policy surfaces here as an
/// error; partial data surfaces as a smaller batch, and the pipeline's
/// rejection counts tell the caller how much survived.
///
/// # Errors
///
/// Returns [`SourceError`] if fetching or decoding the upstream payload
/// fails.
pub async fn load_source(
    client: &reqwest::Client,
    source: &QuarterSource,
    limit: Option<usize>,
) -> Result<NormalizedBatch, SourceError> {
    log::info!("Fetching quarters for {} ({})", source.id, source.city);

    let mut records = fetchers::fetch_records(client, source).await?;
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    log::info!("{}: fetched {} raw records", source.id, records.len());

    let batch = quarter_map_pipeline::normalize_batch(&records, source.coord_format, source.scheme);
    log::info!(
        "{}: normalized {} quarters ({} without coordinates, {} with too few vertices)",
        source.id,
        batch.counts.parsed,
        batch.counts.no_coordinates,
        batch.counts.insufficient_vertices,
    );

    Ok(batch)
}

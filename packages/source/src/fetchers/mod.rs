//! Fetcher dispatch and implementations for the upstream representations.
//!
//! Each fetcher downloads raw quarter data in one representation and
//! produces [`RawRecord`]s keyed by the canonical pipeline property names.

pub mod csv_download;
pub mod geojson_url;
pub mod node_lookup;

use quarter_map_pipeline::RawRecord;
use quarter_map_source_models::{QuarterFetcherConfig, QuarterSource};

use crate::SourceError;

/// Fetches raw records from the source's upstream.
///
/// # Errors
///
/// Returns [`SourceError`] if the HTTP request or payload decoding
/// fails.
pub async fn fetch_records(
    client: &reqwest::Client,
    source: &QuarterSource,
) -> Result<Vec<RawRecord>, SourceError> {
    match &source.fetcher {
        QuarterFetcherConfig::CsvDownload { url, delimiter } => {
            csv_download::fetch(client, url, *delimiter, &source.fields).await
        }
        QuarterFetcherConfig::GeojsonUrl { url } => {
            geojson_url::fetch(client, url, &source.fields).await
        }
        QuarterFetcherConfig::NodeLookup {
            url_template,
            node_ids,
            concurrency,
        } => node_lookup::fetch(client, &source.id, url_template, node_ids, *concurrency).await,
    }
}

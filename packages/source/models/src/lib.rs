#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Quarter data source definition types.
//!
//! Defines the TOML schema for quarter data sources: how to fetch raw
//! records for a single city, which coordinate encoding and
//! classification scheme the source uses, and how its column/property
//! names map onto the canonical pipeline keys.

use std::collections::BTreeMap;

use quarter_map_pipeline::{ClassificationScheme, CoordFormat};
use serde::{Deserialize, Serialize};

/// A quarter data source, deserialized from TOML.
///
/// Each source defines how to obtain quarter polygons and metrics for a
/// single city from one upstream representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarterSource {
    /// Unique source identifier (e.g., `"yekaterinburg_quarters"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// City the quarters belong to.
    pub city: String,
    /// Initial map view hint for the frontend.
    pub map_view: MapView,
    /// Fetcher configuration.
    pub fetcher: QuarterFetcherConfig,
    /// Coordinate encoding of the boundary field. When absent, the
    /// pipeline auto-detects from delimiters.
    pub coord_format: Option<CoordFormat>,
    /// Which classification table applies to this source's metrics.
    pub scheme: ClassificationScheme,
    /// Field mapping from source columns/properties to canonical keys.
    pub fields: QuarterFieldMapping,
}

impl QuarterSource {
    /// Returns the source identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Initial map view hint passed through to the rendering consumer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MapView {
    /// View center latitude.
    pub center_lat: f64,
    /// View center longitude.
    pub center_lon: f64,
    /// Initial zoom level.
    pub zoom: u8,
}

/// How to fetch raw quarter records.
///
/// Each variant corresponds to a different upstream representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuarterFetcherConfig {
    /// CSV export with one quarter per row and a textual boundary column.
    CsvDownload {
        /// Full URL of the CSV file.
        url: String,
        /// Field delimiter (default: `,`).
        delimiter: Option<char>,
    },
    /// `GeoJSON` `FeatureCollection` of quarter polygons.
    GeojsonUrl {
        /// Full URL that returns a `FeatureCollection`.
        url: String,
    },
    /// Per-node coordinate lookup assembled into a single quarter
    /// boundary, for sources that only expose node ids.
    NodeLookup {
        /// URL template with a `{id}` placeholder, queried per node.
        url_template: String,
        /// Boundary node ids, in ring vertex order.
        node_ids: Vec<u64>,
        /// Maximum in-flight lookups (default: 8).
        concurrency: Option<usize>,
    },
}

/// Field mapping from source-specific names to the canonical property
/// keys the pipeline enricher recognizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarterFieldMapping {
    /// Column/property containing the record identifier.
    pub id: String,
    /// Column containing the boundary encoding. Unused by fetchers whose
    /// geometry is structural (`GeoJSON`, node lookup).
    pub coordinates: Option<String>,
    /// Canonical key → source column/property name. Keys not listed here
    /// are left out of the record's property bag.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

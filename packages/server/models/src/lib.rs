#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the quarter map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the pipeline types to allow independent evolution of the API
//! contract.

use quarter_map_pipeline::stats::BatchStats;
use quarter_map_pipeline::{BatchCounts, NormalizedBatch};
use quarter_map_quarter_models::QuarterFeature;
use quarter_map_source_models::QuarterSource;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is up.
    pub healthy: bool,
    /// Crate version.
    pub version: String,
}

/// A registered quarter data source as listed by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSourceInfo {
    /// Source identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// City the quarters belong to.
    pub city: String,
    /// Initial view center latitude.
    pub center_lat: f64,
    /// Initial view center longitude.
    pub center_lon: f64,
    /// Initial zoom level.
    pub zoom: u8,
}

impl From<&QuarterSource> for ApiSourceInfo {
    fn from(source: &QuarterSource) -> Self {
        Self {
            id: source.id.clone(),
            name: source.name.clone(),
            city: source.city.clone(),
            center_lat: source.map_view.center_lat,
            center_lon: source.map_view.center_lon,
            zoom: source.map_view.zoom,
        }
    }
}

/// Rejection accounting as returned by the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCounts {
    /// Records that became quarters.
    pub parsed: usize,
    /// Records rejected for having no coordinate data.
    pub no_coordinates: usize,
    /// Records rejected for having too few vertices.
    pub insufficient_vertices: usize,
}

impl From<BatchCounts> for ApiCounts {
    fn from(counts: BatchCounts) -> Self {
        Self {
            parsed: counts.parsed,
            no_coordinates: counts.no_coordinates,
            insufficient_vertices: counts.insufficient_vertices,
        }
    }
}

/// Batch aggregates as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    /// Number of quarters loaded.
    pub quarters: usize,
    /// Sum of quarter populations.
    pub total_population: u64,
    /// Sum of quarter areas in hectares.
    pub total_area: f64,
    /// Mean vegetation index.
    pub mean_ndvi: f64,
    /// Mean accessibility tier, when any quarter reported one.
    pub mean_accessibility: Option<f64>,
}

impl From<BatchStats> for ApiStats {
    fn from(stats: BatchStats) -> Self {
        Self {
            quarters: stats.quarters,
            total_population: stats.total_population,
            total_area: stats.total_area,
            mean_ndvi: stats.mean_ndvi,
            mean_accessibility: stats.mean_accessibility,
        }
    }
}

/// Response to a source load request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLoadResult {
    /// Which source was loaded.
    pub source_id: String,
    /// Rejection accounting.
    pub counts: ApiCounts,
    /// Aggregates over the surviving quarters.
    pub stats: ApiStats,
    /// Union bounding box as `[west, south, east, north]`, for viewport
    /// fitting.
    pub bbox: Option<[f64; 4]>,
    /// Present when zero quarters survived normalization.
    pub warning: Option<String>,
}

/// Query parameters for the load endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadQueryParams {
    /// Maximum number of raw records to ingest.
    pub limit: Option<usize>,
}

/// Body for the visibility toggle endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVisibility {
    /// Whether the quarters layer should be rendered.
    pub visible: bool,
}

/// The quarters layer payload: a `GeoJSON` `FeatureCollection` plus the
/// session's visibility flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQuarters {
    /// Whether the layer should currently be rendered.
    pub visible: bool,
    /// Union bounding box as `[west, south, east, north]`.
    pub bbox: Option<[f64; 4]>,
    /// The quarters as `GeoJSON` features.
    pub quarters: geojson::FeatureCollection,
}

/// Per-quarter properties embedded in each `GeoJSON` feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQuarterProperties {
    /// Source-supplied identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Polygon fill/stroke color token.
    pub fill_color: String,
    /// Greenery quality label.
    pub quality_label: String,
    /// Accessibility label, when the source reported either scale.
    pub accessibility_label: Option<String>,
    /// Accessibility badge color token.
    pub accessibility_color: String,
    /// Vegetation index.
    pub ndvi: f64,
    /// Resident population.
    pub population: u64,
    /// Area in hectares.
    pub area: f64,
    /// People per hectare.
    pub population_density: f64,
    /// Popup anchor longitude.
    pub center_lon: f64,
    /// Popup anchor latitude.
    pub center_lat: f64,
}

impl From<&QuarterFeature> for ApiQuarterProperties {
    fn from(feature: &QuarterFeature) -> Self {
        Self {
            id: feature.id.clone(),
            name: feature.name.clone(),
            fill_color: feature.classification.fill_color.clone(),
            quality_label: feature.classification.quality_label.clone(),
            accessibility_label: feature.classification.accessibility_label.clone(),
            accessibility_color: feature.classification.accessibility_color.clone(),
            ndvi: feature.metrics.ndvi,
            population: feature.metrics.population,
            area: feature.metrics.area,
            population_density: feature.metrics.population_density(),
            center_lon: feature.center.lon,
            center_lat: feature.center.lat,
        }
    }
}

/// Converts a normalized batch into a `GeoJSON` `FeatureCollection`
/// carrying the presentation properties each polygon needs.
#[must_use]
pub fn batch_to_feature_collection(batch: &NormalizedBatch) -> geojson::FeatureCollection {
    let features = batch
        .features
        .iter()
        .map(|quarter| {
            let positions: Vec<Vec<f64>> = quarter
                .ring
                .points()
                .iter()
                .map(|p| vec![p.lon, p.lat])
                .collect();
            let geometry = geojson::Geometry::new(geojson::Value::Polygon(vec![positions]));

            let properties = match serde_json::to_value(ApiQuarterProperties::from(quarter)) {
                Ok(serde_json::Value::Object(map)) => Some(map),
                _ => None,
            };

            geojson::Feature {
                bbox: None,
                geometry: Some(geometry),
                id: Some(geojson::feature::Id::String(quarter.id.clone())),
                properties,
                foreign_members: None,
            }
        })
        .collect();

    geojson::FeatureCollection {
        bbox: batch.bounding_rect().map(|b| b.to_vec()),
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarter_map_pipeline::{ClassificationScheme, RawRecord, normalize_batch};

    #[test]
    fn feature_collection_carries_geometry_and_properties() {
        let records = vec![RawRecord::from_text(
            "q1",
            "0,0;2,0;2,2;0,2",
            serde_json::Map::new(),
        )];
        let batch = normalize_batch(&records, None, ClassificationScheme::VegetationIndex);

        let collection = batch_to_feature_collection(&batch);
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.bbox, Some(vec![0.0, 0.0, 2.0, 2.0]));

        let feature = &collection.features[0];
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(
            properties.get("name").and_then(|v| v.as_str()),
            Some("Quarter q1")
        );
        assert!(properties.contains_key("fillColor"));

        let Some(geojson::Value::Polygon(rings)) = feature.geometry.as_ref().map(|g| g.value.clone())
        else {
            panic!("expected polygon geometry");
        };
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[0].first(), rings[0].last());
    }
}

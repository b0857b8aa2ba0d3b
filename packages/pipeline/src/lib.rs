#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Quarter feature normalization and classification pipeline.
//!
//! Turns raw records from any supplier into render-ready
//! [`QuarterFeature`]s: coordinate parsing, ring closure, property
//! enrichment, and threshold classification, with per-record rejection
//! counts instead of hard failures. The pipeline is pure and synchronous;
//! fetching raw data and serving the result live in the `source` and
//! `server` packages.

pub mod classify;
pub mod coords;
pub mod enrich;
pub mod ring;
pub mod stats;

use quarter_map_quarter_models::{GeoPoint, QuarterFeature};

pub use classify::ClassificationScheme;
pub use coords::CoordFormat;
pub use ring::RingError;

/// One raw input unit, as delivered by a supplier. Immutable once received.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Source-supplied identifier.
    pub id: String,
    /// Coordinate encoding.
    pub coordinates: CoordinateInput,
    /// Loosely-typed property bag keyed by the canonical names in
    /// [`enrich`].
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl RawRecord {
    /// Builds a record around a textual coordinate encoding.
    #[must_use]
    pub fn from_text(
        id: impl Into<String>,
        coordinates: impl Into<String>,
        properties: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            coordinates: CoordinateInput::Text(coordinates.into()),
            properties,
        }
    }

    /// Builds a record around an already-structured point list.
    #[must_use]
    pub fn from_points(
        id: impl Into<String>,
        points: Vec<GeoPoint>,
        properties: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            coordinates: CoordinateInput::Points(points),
            properties,
        }
    }
}

/// How a record's boundary arrived from upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateInput {
    /// A textual encoding in one of the [`CoordFormat`] strategies.
    Text(String),
    /// A pre-structured point list in canonical (lon, lat) order,
    /// passed through unchanged.
    Points(Vec<GeoPoint>),
}

/// Per-batch rejection accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BatchCounts {
    /// Records that became output features.
    pub parsed: usize,
    /// Records whose encoding yielded zero points.
    pub no_coordinates: usize,
    /// Records whose point sequence failed ring validation.
    pub insufficient_vertices: usize,
}

/// Output of one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    /// Surviving features, in input order.
    pub features: Vec<QuarterFeature>,
    /// Rejection accounting for the caller to act on.
    pub counts: BatchCounts,
}

impl NormalizedBatch {
    /// True when zero features survived, the condition callers must
    /// surface to their own callers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Union bounding rectangle of all features as
    /// (west, south, east, north), for viewport fitting downstream.
    #[must_use]
    pub fn bounding_rect(&self) -> Option<[f64; 4]> {
        self.features
            .iter()
            .filter_map(|f| f.ring.bounding_rect())
            .reduce(|a, b| {
                [
                    a[0].min(b[0]),
                    a[1].min(b[1]),
                    a[2].max(b[2]),
                    a[3].max(b[3]),
                ]
            })
    }
}

/// Normalizes and classifies a batch of raw records.
///
/// Output order matches input order. A record is dropped (and counted)
/// when its encoding yields zero points or its point sequence fails ring
/// validation; a single bad record never aborts the batch.
///
/// `format` overrides delimiter auto-detection for textual encodings;
/// sources that know their encoding should pass it explicitly.
#[must_use]
pub fn normalize_batch(
    records: &[RawRecord],
    format: Option<CoordFormat>,
    scheme: ClassificationScheme,
) -> NormalizedBatch {
    let mut features = Vec::with_capacity(records.len());
    let mut counts = BatchCounts::default();

    for (index, record) in records.iter().enumerate() {
        let points = match &record.coordinates {
            CoordinateInput::Points(points) => points.clone(),
            CoordinateInput::Text(raw) => {
                let format = format.unwrap_or_else(|| CoordFormat::detect(raw));
                coords::parse_coordinates(raw, format)
            }
        };

        if points.is_empty() {
            log::debug!("Skipping record {}: no coordinate data", record.id);
            counts.no_coordinates += 1;
            continue;
        }

        let ring = match ring::normalize_ring(points) {
            Ok(ring) => ring,
            Err(RingError::InsufficientVertices { count }) => {
                log::debug!(
                    "Skipping record {}: insufficient vertices ({count})",
                    record.id
                );
                counts.insufficient_vertices += 1;
                continue;
            }
        };

        let enriched = enrich::enrich_properties(&record.id, &record.properties, index);
        let center = enriched.center.unwrap_or_else(|| ring.centroid());
        let classification = classify::classify(&enriched.metrics, scheme);

        features.push(QuarterFeature {
            id: record.id.clone(),
            name: enriched.name,
            ring,
            center,
            metrics: enriched.metrics,
            classification,
        });
        counts.parsed += 1;
    }

    NormalizedBatch { features, counts }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Quarter domain model types.
//!
//! This crate defines the canonical types shared across the quarter-map
//! system: geographic points and closed polygon rings, the metrics attached
//! to each quarter, and the ordinal tiers used to classify greenery quality
//! and park accessibility. All data sources normalize their source-specific
//! schemas into these shared types.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Neutral fallback color for unknown or out-of-range tiers.
pub const NEUTRAL_GRAY: &str = "#666666";

/// A geographic point in (longitude, latitude) order, degrees.
///
/// Components are finite by construction when produced by the coordinate
/// parsers; no range validation is imposed beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl GeoPoint {
    /// Creates a new point from longitude and latitude.
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<GeoPoint> for geo::Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        Self { x: p.lon, y: p.lat }
    }
}

/// A closed polygon ring: an ordered sequence of at least 4 points where
/// the first and last are coordinate-equal and the sequence has at least
/// 3 distinct vertices absent the closing duplicate.
///
/// Only the polygon normalizer constructs values of this type, so the
/// closure invariant holds everywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonRing(Vec<GeoPoint>);

impl PolygonRing {
    /// Wraps an already-closed point sequence.
    ///
    /// The caller (the normalizer) is responsible for the closure
    /// invariant; this constructor does not re-validate it.
    #[must_use]
    pub const fn from_closed_points(points: Vec<GeoPoint>) -> Self {
        Self(points)
    }

    /// Returns the ring's points, closing duplicate included.
    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    /// Number of distinct vertices (closing duplicate excluded).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Converts the ring to a `geo` polygon for derived computations.
    #[must_use]
    pub fn to_polygon(&self) -> geo::Polygon<f64> {
        let exterior: Vec<geo::Coord<f64>> = self.0.iter().copied().map(Into::into).collect();
        geo::Polygon::new(geo::LineString::new(exterior), Vec::new())
    }

    /// Centroid of the ring, falling back to the first vertex for
    /// degenerate (zero-area) rings.
    #[must_use]
    pub fn centroid(&self) -> GeoPoint {
        use geo::Centroid;

        self.to_polygon().centroid().map_or_else(
            || self.0.first().copied().unwrap_or(GeoPoint::new(0.0, 0.0)),
            |p| GeoPoint::new(p.x(), p.y()),
        )
    }

    /// Axis-aligned bounding rectangle as (west, south, east, north).
    #[must_use]
    pub fn bounding_rect(&self) -> Option<[f64; 4]> {
        use geo::BoundingRect;

        self.to_polygon()
            .bounding_rect()
            .map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y])
    }
}

/// Park accessibility tier, from 1 (worst) to 5 (best).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessTier {
    /// Tier 1: parks effectively unreachable on foot
    VeryLow = 1,
    /// Tier 2: long walking distance to the nearest park
    Low = 2,
    /// Tier 3: average walking distance
    Moderate = 3,
    /// Tier 4: short walking distance
    High = 4,
    /// Tier 5: parks within immediate reach
    VeryHigh = 5,
}

impl AccessTier {
    /// Returns the numeric value of this tier.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a tier from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-5.
    pub const fn from_value(value: u8) -> Result<Self, InvalidTierError> {
        match value {
            1 => Ok(Self::VeryLow),
            2 => Ok(Self::Low),
            3 => Ok(Self::Moderate),
            4 => Ok(Self::High),
            5 => Ok(Self::VeryHigh),
            _ => Err(InvalidTierError {
                value,
                min: 1,
                max: 5,
            }),
        }
    }

    /// Fill color token for this tier, in increasing-quality order.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::VeryLow => "#d2222d",
            Self::Low => "#ff8c00",
            Self::Moderate => "#d6ce1f",
            Self::High => "#7bc242",
            Self::VeryHigh => "#238823",
        }
    }

    /// Human-readable `n/5` label.
    #[must_use]
    pub fn label(self) -> String {
        format!("{}/5", self.value())
    }
}

/// Discrete green-space quality tier reported by tier-based sources,
/// from 0 (unknown) to 3 (best). Distinct from the continuous NDVI score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityTier {
    /// Tier 0: quality not assessed
    Unknown = 0,
    /// Tier 1: sparse or degraded greenery
    Low = 1,
    /// Tier 2: adequate greenery
    Fair = 2,
    /// Tier 3: dense, well-maintained greenery
    Good = 3,
}

impl QualityTier {
    /// Returns the numeric value of this tier.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a tier from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 0-3.
    pub const fn from_value(value: u8) -> Result<Self, InvalidTierError> {
        match value {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Low),
            2 => Ok(Self::Fair),
            3 => Ok(Self::Good),
            _ => Err(InvalidTierError {
                value,
                min: 0,
                max: 3,
            }),
        }
    }

    /// Fill color token for this tier. Tier 0 maps to neutral gray.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Unknown => NEUTRAL_GRAY,
            Self::Low => "#d2222d",
            Self::Fair => "#d6ce1f",
            Self::Good => "#238823",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Not assessed",
            Self::Low => "Low",
            Self::Fair => "Fair",
            Self::Good => "Good",
        }
    }
}

/// Error returned when attempting to create a tier from an out-of-range
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTierError {
    /// The invalid tier value that was provided.
    pub value: u8,
    /// The minimum valid value for the tier.
    pub min: u8,
    /// The maximum valid value for the tier.
    pub max: u8,
}

impl std::fmt::Display for InvalidTierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid tier value {}: expected {}-{}",
            self.value, self.min, self.max
        )
    }
}

impl std::error::Error for InvalidTierError {}

/// Five-bucket greenery quality derived from the continuous NDVI score.
///
/// Buckets use strict greater-than thresholds evaluated top-down, so a
/// value exactly on a boundary falls into the bucket below it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GreenQuality {
    /// NDVI > 0.6
    Excellent,
    /// NDVI > 0.4
    Good,
    /// NDVI > 0.3
    Satisfactory,
    /// NDVI > 0.2
    Poor,
    /// Everything else
    VeryPoor,
}

impl GreenQuality {
    /// Buckets an NDVI value. First match wins, strict `>` at each step.
    #[must_use]
    pub fn from_ndvi(ndvi: f64) -> Self {
        if ndvi > 0.6 {
            Self::Excellent
        } else if ndvi > 0.4 {
            Self::Good
        } else if ndvi > 0.3 {
            Self::Satisfactory
        } else if ndvi > 0.2 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    /// Fill color token for this bucket.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#238823",
            Self::Good => "#7bc242",
            Self::Satisfactory => "#d6ce1f",
            Self::Poor => "#ff8c00",
            Self::VeryPoor => "#d2222d",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Satisfactory => "Satisfactory",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very poor",
        }
    }
}

/// Sub-metrics for the parks of one quality grade within a quarter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParkGradeStats {
    /// Number of parks of this grade.
    pub count: u64,
    /// Combined park area in hectares.
    pub area: f64,
    /// Mean NDVI across parks of this grade.
    pub ndvi: f64,
}

/// Park sub-metrics split across the three quality grades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParkBreakdown {
    /// High-grade parks.
    pub high: ParkGradeStats,
    /// Medium-grade parks.
    pub medium: ParkGradeStats,
    /// Low-grade parks.
    pub low: ParkGradeStats,
}

/// Canonical per-quarter metrics.
///
/// Every numeric field defaults to zero/absent when missing from the
/// source property bag; enrichment never fails on missing fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarterMetrics {
    /// Vegetation index, typically 0.0-1.0 but unclamped.
    pub ndvi: f64,
    /// Resident population.
    pub population: u64,
    /// Quarter area in hectares.
    pub area: f64,
    /// Ordinal 1-5 accessibility tier, for sources that report one.
    pub accessibility: Option<AccessTier>,
    /// Accessibility as a 0-100 percentage, for sources that report one.
    ///
    /// Deliberately kept separate from [`QuarterMetrics::accessibility`]:
    /// the two scales have no documented conversion.
    pub accessibility_pct: Option<f64>,
    /// Discrete quality tier, for tier-based sources.
    pub quality: Option<QualityTier>,
    /// Park sub-metrics, when the source reports them.
    pub parks: Option<ParkBreakdown>,
}

impl QuarterMetrics {
    /// Population density in people per hectare; 0 for zero-area quarters.
    #[must_use]
    pub fn population_density(&self) -> f64 {
        if self.area > 0.0 {
            #[allow(clippy::cast_precision_loss)]
            let population = self.population as f64;
            population / self.area
        } else {
            0.0
        }
    }
}

/// Derived presentation attributes for one quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Fill/stroke color token for the polygon.
    pub fill_color: String,
    /// Human-readable greenery quality label.
    pub quality_label: String,
    /// Human-readable accessibility label, when the source reported
    /// either accessibility scale.
    pub accessibility_label: Option<String>,
    /// Color token for the accessibility badge.
    pub accessibility_color: String,
}

/// A fully normalized, classified quarter ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterFeature {
    /// Source-supplied identifier.
    pub id: String,
    /// Display name (synthesized when the source omitted one).
    pub name: String,
    /// Closed boundary ring.
    pub ring: PolygonRing,
    /// Source-declared center, or the ring centroid when absent.
    pub center: GeoPoint,
    /// Canonical metrics.
    pub metrics: QuarterMetrics,
    /// Derived presentation attributes.
    pub classification: Classification,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> PolygonRing {
        PolygonRing::from_closed_points(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(2.0, 0.0),
            GeoPoint::new(2.0, 2.0),
            GeoPoint::new(0.0, 2.0),
            GeoPoint::new(0.0, 0.0),
        ])
    }

    #[test]
    fn access_tier_round_trips_values() {
        for value in 1..=5u8 {
            assert_eq!(AccessTier::from_value(value).unwrap().value(), value);
        }
        assert!(AccessTier::from_value(0).is_err());
        assert!(AccessTier::from_value(6).is_err());
    }

    #[test]
    fn quality_tier_accepts_zero_as_unknown() {
        assert_eq!(QualityTier::from_value(0).unwrap(), QualityTier::Unknown);
        assert_eq!(QualityTier::from_value(0).unwrap().color(), NEUTRAL_GRAY);
        assert!(QualityTier::from_value(4).is_err());
    }

    #[test]
    fn ndvi_boundaries_use_strict_comparison() {
        assert_eq!(GreenQuality::from_ndvi(0.6), GreenQuality::Good);
        assert_eq!(GreenQuality::from_ndvi(0.61), GreenQuality::Excellent);
        assert_eq!(GreenQuality::from_ndvi(0.3), GreenQuality::Poor);
        assert_eq!(GreenQuality::from_ndvi(0.2), GreenQuality::VeryPoor);
    }

    #[test]
    fn ring_centroid_of_square() {
        let center = square().centroid();
        assert!((center.lon - 1.0).abs() < f64::EPSILON);
        assert!((center.lat - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ring_bounding_rect_of_square() {
        let bbox = square().bounding_rect().unwrap();
        assert_eq!(bbox, [0.0, 0.0, 2.0, 2.0]);
    }

    #[test]
    fn density_guards_zero_area() {
        let metrics = QuarterMetrics {
            population: 1000,
            ..Default::default()
        };
        assert!((metrics.population_density() - 0.0).abs() < f64::EPSILON);

        let metrics = QuarterMetrics {
            population: 1000,
            area: 4.0,
            ..Default::default()
        };
        assert!((metrics.population_density() - 250.0).abs() < f64::EPSILON);
    }
}

//! Property bag enrichment.
//!
//! Maps an arbitrary source property bag onto the canonical
//! [`QuarterMetrics`] schema. Every field is coerced independently with a
//! documented default, so enrichment is total: a record can fail the
//! pipeline only on geometry, never on properties.

use quarter_map_quarter_models::{
    AccessTier, GeoPoint, ParkBreakdown, ParkGradeStats, QualityTier, QuarterMetrics,
};

/// Canonical property keys recognized by the enricher. Suppliers map
/// source-specific column/field names onto these before invoking the
/// pipeline; unknown keys are ignored.
pub const KEY_NAME: &str = "name";
/// Vegetation index key.
pub const KEY_NDVI: &str = "ndvi";
/// Population key.
pub const KEY_POPULATION: &str = "population";
/// Area (hectares) key.
pub const KEY_AREA: &str = "area";
/// Ordinal 1-5 accessibility tier key.
pub const KEY_ACCESSIBILITY: &str = "accessibility";
/// 0-100 accessibility percentage key.
pub const KEY_ACCESSIBILITY_PCT: &str = "accessibility_pct";
/// Discrete 0-3 quality tier key.
pub const KEY_QUALITY: &str = "quality";
/// Declared center latitude key.
pub const KEY_CENTER_LAT: &str = "center_lat";
/// Declared center longitude key.
pub const KEY_CENTER_LON: &str = "center_lon";

/// Park grade name fragments used in `parks_{grade}_{metric}` keys.
const PARK_GRADES: [&str; 3] = ["high", "medium", "low"];

/// Result of enriching one property bag.
#[derive(Debug, Clone, PartialEq)]
pub struct Enriched {
    /// Display name, synthesized when the source omitted one.
    pub name: String,
    /// Source-declared center, when both components were present.
    pub center: Option<GeoPoint>,
    /// Canonical metrics with per-field defaults applied.
    pub metrics: QuarterMetrics,
}

/// Coerces a raw property bag into canonical metrics and a display name.
///
/// `index` is the record's position in the batch, used only for the
/// placeholder name when the record has neither a name nor an id.
#[must_use]
pub fn enrich_properties(
    id: &str,
    properties: &serde_json::Map<String, serde_json::Value>,
    index: usize,
) -> Enriched {
    let name = get_str(properties, KEY_NAME).map_or_else(
        || {
            if id.trim().is_empty() {
                format!("Quarter #{}", index + 1)
            } else {
                format!("Quarter {id}")
            }
        },
        ToOwned::to_owned,
    );

    let center = match (
        get_f64(properties, KEY_CENTER_LON),
        get_f64(properties, KEY_CENTER_LAT),
    ) {
        (Some(lon), Some(lat)) => Some(GeoPoint::new(lon, lat)),
        _ => None,
    };

    let metrics = QuarterMetrics {
        ndvi: get_f64(properties, KEY_NDVI).unwrap_or(0.0),
        population: get_u64(properties, KEY_POPULATION).unwrap_or(0),
        area: get_f64(properties, KEY_AREA).unwrap_or(0.0),
        accessibility: get_u64(properties, KEY_ACCESSIBILITY)
            .and_then(|v| u8::try_from(v).ok())
            .and_then(|v| AccessTier::from_value(v).ok()),
        accessibility_pct: get_f64(properties, KEY_ACCESSIBILITY_PCT),
        quality: get_u64(properties, KEY_QUALITY)
            .and_then(|v| u8::try_from(v).ok())
            .and_then(|v| QualityTier::from_value(v).ok()),
        parks: park_breakdown(properties),
    };

    Enriched {
        name,
        center,
        metrics,
    }
}

/// Assembles the three-grade park breakdown when any `parks_*` key is
/// present; absent keys within a present breakdown default to zero.
fn park_breakdown(
    properties: &serde_json::Map<String, serde_json::Value>,
) -> Option<ParkBreakdown> {
    let any_park_key = properties.keys().any(|k| k.starts_with("parks_"));
    if !any_park_key {
        return None;
    }

    let grade = |name: &str| ParkGradeStats {
        count: get_u64(properties, &format!("parks_{name}_count")).unwrap_or(0),
        area: get_f64(properties, &format!("parks_{name}_area")).unwrap_or(0.0),
        ndvi: get_f64(properties, &format!("parks_{name}_ndvi")).unwrap_or(0.0),
    };

    let [high, medium, low] = PARK_GRADES.map(grade);
    Some(ParkBreakdown { high, medium, low })
}

/// Gets a non-empty trimmed string from the bag.
fn get_str<'a>(
    properties: &'a serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<&'a str> {
    properties
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Gets a finite float from the bag, accepting JSON numbers and numeric
/// strings (CSV suppliers deliver everything as strings).
fn get_f64(properties: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<f64> {
    let value = properties.get(key)?;
    let parsed = value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))?;
    parsed.is_finite().then_some(parsed)
}

/// Gets a non-negative integer from the bag, accepting JSON numbers and
/// numeric strings.
fn get_u64(properties: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<u64> {
    let value = properties.get(key)?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

//! `GeoJSON` `FeatureCollection` fetcher.
//!
//! For sources whose quarters already carry native polygon geometries.
//! The exterior ring is handed to the pipeline as a pre-structured point
//! list; `GeoJSON` positions are already in the canonical (lon, lat)
//! order.

use quarter_map_pipeline::RawRecord;
use quarter_map_quarter_models::GeoPoint;
use quarter_map_source_models::QuarterFieldMapping;

use crate::{SourceError, retry};

/// Fetches all quarter features from a `GeoJSON` URL.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails or the response is not
/// a `FeatureCollection`.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    fields: &QuarterFieldMapping,
) -> Result<Vec<RawRecord>, SourceError> {
    let json = retry::send_json(|| client.get(url)).await?;
    let records = records_from_geojson(json, fields)?;
    log::info!("Parsed {} features from GeoJSON at {url}", records.len());
    Ok(records)
}

/// Converts a `FeatureCollection` value into raw records.
///
/// Features without a polygon geometry become records with an empty
/// point list, so the pipeline counts them as coordinate-less rather
/// than this fetcher silently dropping them.
///
/// # Errors
///
/// Returns [`SourceError::Geojson`] for malformed `GeoJSON` and
/// [`SourceError::Conversion`] when the payload is not a
/// `FeatureCollection`.
pub fn records_from_geojson(
    json: serde_json::Value,
    fields: &QuarterFieldMapping,
) -> Result<Vec<RawRecord>, SourceError> {
    let geojson::GeoJson::FeatureCollection(collection) = geojson::GeoJson::from_json_value(json)?
    else {
        return Err(SourceError::Conversion {
            message: "expected a GeoJSON FeatureCollection".to_owned(),
        });
    };

    let records = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let source_properties = feature.properties.unwrap_or_default();

            let id = source_properties
                .get(&fields.id)
                .map(value_to_id)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("feature-{index}"));

            let mut properties = serde_json::Map::new();
            for (canonical, source_key) in &fields.properties {
                if let Some(value) = source_properties.get(source_key) {
                    properties.insert(canonical.clone(), value.clone());
                }
            }

            let points = feature
                .geometry
                .as_ref()
                .map_or_else(Vec::new, exterior_ring);

            RawRecord::from_points(id, points, properties)
        })
        .collect();

    Ok(records)
}

/// Extracts the exterior ring of a Polygon, or of the first polygon in
/// a `MultiPolygon`. Other geometry types yield no points.
fn exterior_ring(geometry: &geojson::Geometry) -> Vec<GeoPoint> {
    let ring = match &geometry.value {
        geojson::Value::Polygon(rings) => rings.first(),
        geojson::Value::MultiPolygon(polygons) => polygons.first().and_then(|rings| rings.first()),
        _ => None,
    };

    ring.map_or_else(Vec::new, |positions| {
        positions
            .iter()
            .filter_map(|position| match position.as_slice() {
                [lon, lat, ..] => Some(GeoPoint::new(*lon, *lat)),
                _ => None,
            })
            .collect()
    })
}

/// Renders a property value as a record id without JSON quoting.
fn value_to_id(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.trim().to_owned(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn mapping() -> QuarterFieldMapping {
        QuarterFieldMapping {
            id: "quarter_id".to_owned(),
            coordinates: None,
            properties: BTreeMap::from([("ndvi".to_owned(), "green_index".to_owned())]),
        }
    }

    fn collection() -> serde_json::Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"quarter_id": 17, "green_index": 0.55},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[60.0, 56.0], [60.1, 56.0], [60.1, 56.1], [60.0, 56.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": null
                }
            ]
        })
    }

    #[test]
    fn extracts_exterior_ring_and_mapped_properties() {
        let records = records_from_geojson(collection(), &mapping()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "17");
        assert_eq!(
            records[0].properties.get("ndvi"),
            Some(&json!(0.55))
        );
        let quarter_map_pipeline::CoordinateInput::Points(points) = &records[0].coordinates else {
            panic!("expected pre-structured points");
        };
        assert_eq!(points[0], GeoPoint::new(60.0, 56.0));
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn geometry_less_feature_becomes_empty_record() {
        let records = records_from_geojson(collection(), &mapping()).unwrap();
        assert_eq!(records[1].id, "feature-1");
        let quarter_map_pipeline::CoordinateInput::Points(points) = &records[1].coordinates else {
            panic!("expected pre-structured points");
        };
        assert!(points.is_empty());
    }

    #[test]
    fn non_collection_payload_is_an_error() {
        let result = records_from_geojson(json!({"type": "Point", "coordinates": [0, 0]}), &mapping());
        assert!(matches!(result, Err(SourceError::Conversion { .. })));
    }
}

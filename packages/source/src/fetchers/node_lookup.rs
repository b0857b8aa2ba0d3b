//! Per-node coordinate lookup fetcher.
//!
//! Some sources only expose a quarter boundary as a list of node ids,
//! each resolvable to coordinates through a per-id endpoint. Lookups run
//! with bounded concurrency; `buffered` yields results in input order,
//! so the assembled ring keeps the id-list vertex order regardless of
//! completion order. Nodes that fail to resolve are skipped; the
//! pipeline's vertex validation decides whether what remains is usable.

use futures::StreamExt as _;
use quarter_map_pipeline::RawRecord;
use quarter_map_quarter_models::GeoPoint;

use crate::{SourceError, retry};

/// Default maximum number of in-flight node lookups.
const DEFAULT_CONCURRENCY: usize = 8;

/// Resolves every node id and assembles one boundary record.
///
/// An upstream that resolves zero nodes yields an empty batch rather
/// than an error; the caller observes "produced zero raw records".
///
/// # Errors
///
/// Currently infallible at this layer (individual lookup failures are
/// skipped), but kept fallible to match the other fetchers' contract.
pub async fn fetch(
    client: &reqwest::Client,
    source_id: &str,
    url_template: &str,
    node_ids: &[u64],
    concurrency: Option<usize>,
) -> Result<Vec<RawRecord>, SourceError> {
    let concurrency = concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1);

    let points: Vec<GeoPoint> = futures::stream::iter(node_ids.iter().copied())
        .map(|node_id| {
            let url = url_template.replace("{id}", &node_id.to_string());
            let client = client.clone();
            async move {
                match retry::send_json(|| client.get(&url)).await {
                    Ok(json) => {
                        let point = extract_point(&json);
                        if point.is_none() {
                            log::warn!("Node {node_id}: response carried no coordinates");
                        }
                        point
                    }
                    Err(e) => {
                        log::warn!("Node {node_id}: lookup failed: {e}");
                        None
                    }
                }
            }
        })
        .buffered(concurrency)
        .collect::<Vec<Option<GeoPoint>>>()
        .await
        .into_iter()
        .flatten()
        .collect();

    log::info!(
        "{source_id}: resolved {}/{} boundary nodes",
        points.len(),
        node_ids.len()
    );

    if points.is_empty() {
        return Ok(Vec::new());
    }

    Ok(vec![RawRecord::from_points(
        source_id,
        points,
        serde_json::Map::new(),
    )])
}

/// Pulls a (lon, lat) pair out of a node lookup response.
///
/// Accepts both a bare `{"lat": .., "lon": ..}` object and the OSM API
/// shape `{"elements": [{"lat": .., "lon": ..}, ..]}`.
fn extract_point(json: &serde_json::Value) -> Option<GeoPoint> {
    let node = if let Some(elements) = json.get("elements").and_then(|e| e.as_array()) {
        elements.first()?
    } else {
        json
    };

    let lat = node.get("lat").and_then(serde_json::Value::as_f64)?;
    let lon = node.get("lon").and_then(serde_json::Value::as_f64)?;
    (lat.is_finite() && lon.is_finite()).then(|| GeoPoint::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_bare_node_object() {
        let point = extract_point(&json!({"lat": 56.84, "lon": 60.61})).unwrap();
        assert_eq!(point, GeoPoint::new(60.61, 56.84));
    }

    #[test]
    fn extracts_first_element_of_osm_response() {
        let json = json!({
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 56.8, "lon": 60.6},
                {"type": "node", "id": 2, "lat": 0.0, "lon": 0.0}
            ]
        });
        let point = extract_point(&json).unwrap();
        assert_eq!(point, GeoPoint::new(60.6, 56.8));
    }

    #[test]
    fn missing_coordinates_yield_none() {
        assert!(extract_point(&json!({"lat": 56.8})).is_none());
        assert!(extract_point(&json!({"elements": []})).is_none());
        assert!(extract_point(&json!({"lat": f64::NAN, "lon": 1.0})).is_none());
    }
}

//! Polygon ring validation and closure.

use quarter_map_quarter_models::{GeoPoint, PolygonRing};
use thiserror::Error;

/// Reasons a point sequence cannot become a valid ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// Fewer than 3 distinct vertices.
    #[error("insufficient vertices: {count} (a ring needs at least 3 distinct points)")]
    InsufficientVertices {
        /// Number of points in the offending sequence.
        count: usize,
    },
}

/// Validates a point sequence and closes it into a [`PolygonRing`].
///
/// An open sequence gets a copy of its first point appended; an
/// already-closed sequence is returned unchanged, so normalizing twice
/// equals normalizing once. No self-intersection or winding-order checks
/// are performed.
///
/// # Errors
///
/// Returns [`RingError::InsufficientVertices`] for sequences with fewer
/// than 3 distinct vertices.
pub fn normalize_ring(mut points: Vec<GeoPoint>) -> Result<PolygonRing, RingError> {
    if points.len() < 3 {
        return Err(RingError::InsufficientVertices {
            count: points.len(),
        });
    }

    let first = points[0];
    let last = points[points.len() - 1];

    if first == last {
        // Already closed. A closed sequence shorter than 4 points has
        // fewer than 3 distinct vertices and cannot bound an area.
        if points.len() < 4 {
            return Err(RingError::InsufficientVertices {
                count: points.len(),
            });
        }
        return Ok(PolygonRing::from_closed_points(points));
    }

    points.push(first);
    Ok(PolygonRing::from_closed_points(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(0.0, 1.0),
        ]
    }

    #[test]
    fn closes_open_ring() {
        let ring = normalize_ring(triangle()).unwrap();
        assert_eq!(ring.points().len(), 4);
        assert_eq!(ring.points()[0], ring.points()[3]);
        assert_eq!(ring.vertex_count(), 3);
    }

    #[test]
    fn closing_is_idempotent() {
        let once = normalize_ring(triangle()).unwrap();
        let twice = normalize_ring(once.points().to_vec()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_two_points() {
        let result = normalize_ring(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)]);
        assert_eq!(result, Err(RingError::InsufficientVertices { count: 2 }));
    }

    #[test]
    fn rejects_empty_sequence() {
        assert_eq!(
            normalize_ring(Vec::new()),
            Err(RingError::InsufficientVertices { count: 0 })
        );
    }

    #[test]
    fn rejects_pre_closed_degenerate_ring() {
        // [a, b, a] closes on itself but only has 2 distinct vertices.
        let result = normalize_ring(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ]);
        assert_eq!(result, Err(RingError::InsufficientVertices { count: 3 }));
    }
}

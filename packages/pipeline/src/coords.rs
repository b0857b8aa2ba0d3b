//! Coordinate encoding parsers.
//!
//! Each upstream representation gets its own parsing strategy, selected by
//! [`CoordFormat`] (declared on the source definition) or auto-detected from
//! delimiters. Parsing never fails: malformed tokens are skipped
//! individually and an unusable input yields an empty sequence, leaving
//! rejection to the ring validation step.

use quarter_map_quarter_models::GeoPoint;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Textual coordinate encoding, one parsing strategy per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordFormat {
    /// Points separated by `;`, each point as `lon,lat`.
    SemicolonPairs,
    /// Zero or more `(lat, lon)` groups, optionally wrapped in one layer
    /// of `[...]` and/or one layer of quoting.
    LatLonTuples,
}

impl CoordFormat {
    /// Guesses the encoding from its delimiters. Tuple groups are the only
    /// format that uses parentheses; everything else is treated as
    /// semicolon pairs.
    #[must_use]
    pub fn detect(raw: &str) -> Self {
        if raw.contains('(') {
            Self::LatLonTuples
        } else {
            Self::SemicolonPairs
        }
    }
}

/// Parses a raw coordinate encoding into an ordered point sequence.
///
/// Empty input, the literal string `null`, or input from which no valid
/// pair can be extracted all yield an empty sequence, never an error.
#[must_use]
pub fn parse_coordinates(raw: &str, format: CoordFormat) -> Vec<GeoPoint> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return Vec::new();
    }

    match format {
        CoordFormat::SemicolonPairs => parse_semicolon_pairs(trimmed),
        CoordFormat::LatLonTuples => parse_lat_lon_tuples(trimmed),
    }
}

/// `lon,lat;lon,lat;...` with whitespace tolerated around every token.
/// Malformed points are skipped without aborting the string.
fn parse_semicolon_pairs(raw: &str) -> Vec<GeoPoint> {
    raw.split(';')
        .filter_map(|point| {
            let mut components = point.split(',');
            let lon = parse_component(components.next()?)?;
            let lat = parse_component(components.next()?)?;
            // A third component means the token is not a bare pair.
            if components.next().is_some() {
                return None;
            }
            Some(GeoPoint::new(lon, lat))
        })
        .collect()
}

/// `(lat, lon), (lat, lon), ...`. Groups are located by their
/// parentheses rather than positional splitting, so a malformed group
/// never cascades into its neighbors. Axis order is swapped to the
/// canonical (lon, lat) on emit.
fn parse_lat_lon_tuples(raw: &str) -> Vec<GeoPoint> {
    let unwrapped = strip_wrapping(raw);

    let group_re = Regex::new(r"\(([^()]*)\)").unwrap_or_else(|_| unreachable!());

    group_re
        .captures_iter(unwrapped)
        .filter_map(|caps| {
            let body = caps.get(1)?.as_str();
            let mut components = body.split(',');
            let lat = parse_component(components.next()?)?;
            let lon = parse_component(components.next()?)?;
            if components.next().is_some() {
                return None;
            }
            Some(GeoPoint::new(lon, lat))
        })
        .collect()
}

/// Strips one layer of quoting and one layer of `[...]`, in either order.
fn strip_wrapping(raw: &str) -> &str {
    let mut s = raw.trim();
    for _ in 0..2 {
        if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
            || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
            || (s.starts_with('[') && s.ends_with(']'))
        {
            s = s[1..s.len() - 1].trim();
        }
    }
    s
}

/// Parses one numeric component, rejecting non-finite values.
fn parse_component(token: &str) -> Option<f64> {
    let value = token.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_semicolon_pairs_in_order() {
        let points = parse_coordinates("1.0,2.0;3.0,4.0", CoordFormat::SemicolonPairs);
        assert_eq!(
            points,
            vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]
        );
    }

    #[test]
    fn tuples_swap_axis_order() {
        let points = parse_coordinates("(2.0, 1.0), (4.0, 3.0)", CoordFormat::LatLonTuples);
        assert_eq!(
            points,
            vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]
        );
    }

    #[test]
    fn skips_malformed_pair_without_aborting() {
        let points = parse_coordinates("1,2;bad;3,4", CoordFormat::SemicolonPairs);
        assert_eq!(
            points,
            vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]
        );
    }

    #[test]
    fn skips_non_finite_components() {
        let points = parse_coordinates("1,2;inf,4;NaN,6;7,8", CoordFormat::SemicolonPairs);
        assert_eq!(
            points,
            vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(7.0, 8.0)]
        );
    }

    #[test]
    fn empty_and_null_yield_empty_sequence() {
        assert!(parse_coordinates("", CoordFormat::SemicolonPairs).is_empty());
        assert!(parse_coordinates("  ", CoordFormat::SemicolonPairs).is_empty());
        assert!(parse_coordinates("null", CoordFormat::SemicolonPairs).is_empty());
        assert!(parse_coordinates("NULL", CoordFormat::LatLonTuples).is_empty());
    }

    #[test]
    fn tuples_tolerate_wrapping_and_bad_groups() {
        let points = parse_coordinates(
            "\"[(2.0, 1.0), (not, a, point), (4.0, 3.0)]\"",
            CoordFormat::LatLonTuples,
        );
        assert_eq!(
            points,
            vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]
        );
    }

    #[test]
    fn detects_format_from_delimiters() {
        assert_eq!(CoordFormat::detect("(1, 2)"), CoordFormat::LatLonTuples);
        assert_eq!(CoordFormat::detect("1,2;3,4"), CoordFormat::SemicolonPairs);
        assert_eq!(CoordFormat::detect("1,2"), CoordFormat::SemicolonPairs);
    }

    #[test]
    fn extra_components_invalidate_only_that_token() {
        let points = parse_coordinates("1,2,3;4,5", CoordFormat::SemicolonPairs);
        assert_eq!(points, vec![GeoPoint::new(4.0, 5.0)]);
    }
}

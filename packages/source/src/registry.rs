//! Compile-time registry of quarter data sources.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new city or format generation requires creating a TOML file in
//! `sources/` and adding a corresponding entry here.

use quarter_map_source_models::QuarterSource;

/// Number of registered quarter sources. Updated when new sources are
/// added. Enforced by a test.
#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 4;

/// Embedded TOML source definitions.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    (
        "yekaterinburg_quarters",
        include_str!("../sources/yekaterinburg_quarters.toml"),
    ),
    (
        "yekaterinburg_green_audit",
        include_str!("../sources/yekaterinburg_green_audit.toml"),
    ),
    (
        "yekaterinburg_osm_quarters",
        include_str!("../sources/yekaterinburg_osm_quarters.toml"),
    ),
    (
        "akademichesky_block",
        include_str!("../sources/akademichesky_block.toml"),
    ),
];

/// Returns all registered quarter sources.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught during CI.
#[must_use]
pub fn all_sources() -> Vec<QuarterSource> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse quarter source '{name}': {e}"))
        })
        .collect()
}

/// Looks up a source by its TOML id.
#[must_use]
pub fn find_source(id: &str) -> Option<QuarterSource> {
    all_sources().into_iter().find(|s| s.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarter_map_source_models::QuarterFetcherConfig;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_sources() {
        let sources = all_sources();
        assert_eq!(
            sources.len(),
            EXPECTED_SOURCE_COUNT,
            "Expected {EXPECTED_SOURCE_COUNT} quarter sources, found {}. \
             Update EXPECTED_SOURCE_COUNT after adding/removing sources.",
            sources.len()
        );
    }

    #[test]
    fn source_ids_are_unique() {
        let sources = all_sources();
        let mut seen = BTreeSet::new();
        for source in &sources {
            assert!(
                seen.insert(&source.id),
                "Duplicate quarter source ID: {}",
                source.id
            );
        }
    }

    #[test]
    fn all_sources_have_required_fields() {
        for source in &all_sources() {
            assert!(!source.id.is_empty(), "Source has empty id");
            assert!(
                !source.name.is_empty(),
                "Source {} has empty name",
                source.id
            );
            assert!(
                !source.city.is_empty(),
                "Source {} has empty city",
                source.id
            );
            assert!(
                !source.fields.id.is_empty(),
                "Source {} has empty id field mapping",
                source.id
            );
        }
    }

    #[test]
    fn csv_sources_declare_a_coordinates_column() {
        for source in &all_sources() {
            if matches!(source.fetcher, QuarterFetcherConfig::CsvDownload { .. }) {
                assert!(
                    source.fields.coordinates.is_some(),
                    "CSV source {} is missing a coordinates column mapping",
                    source.id
                );
            }
        }
    }

    #[test]
    fn find_source_matches_by_id() {
        assert!(find_source("yekaterinburg_quarters").is_some());
        assert!(find_source("atlantis").is_none());
    }
}

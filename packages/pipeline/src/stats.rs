//! Aggregate statistics over a normalized batch.

use quarter_map_quarter_models::{AccessTier, QuarterFeature};
use serde::{Deserialize, Serialize};

/// Batch-level aggregates for the statistics panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Number of quarters in the batch.
    pub quarters: usize,
    /// Sum of quarter populations.
    pub total_population: u64,
    /// Sum of quarter areas in hectares.
    pub total_area: f64,
    /// Mean vegetation index across all quarters.
    pub mean_ndvi: f64,
    /// Mean accessibility tier across quarters that report one.
    pub mean_accessibility: Option<f64>,
}

/// Computes aggregates over a batch. An empty batch yields all-zero stats.
#[must_use]
pub fn batch_stats(features: &[QuarterFeature]) -> BatchStats {
    if features.is_empty() {
        return BatchStats::default();
    }

    let total_population = features.iter().map(|f| f.metrics.population).sum();
    let total_area = features.iter().map(|f| f.metrics.area).sum();

    #[allow(clippy::cast_precision_loss)]
    let mean_ndvi =
        features.iter().map(|f| f.metrics.ndvi).sum::<f64>() / features.len() as f64;

    let tiers: Vec<u8> = features
        .iter()
        .filter_map(|f| f.metrics.accessibility.map(AccessTier::value))
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let mean_accessibility = if tiers.is_empty() {
        None
    } else {
        Some(tiers.iter().map(|&v| f64::from(v)).sum::<f64>() / tiers.len() as f64)
    };

    BatchStats {
        quarters: features.len(),
        total_population,
        total_area,
        mean_ndvi,
        mean_accessibility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassificationScheme, classify};
    use quarter_map_quarter_models::{
        AccessTier, GeoPoint, PolygonRing, QuarterFeature, QuarterMetrics,
    };

    fn feature(population: u64, area: f64, ndvi: f64, tier: Option<AccessTier>) -> QuarterFeature {
        let metrics = QuarterMetrics {
            ndvi,
            population,
            area,
            accessibility: tier,
            ..Default::default()
        };
        let ring = PolygonRing::from_closed_points(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ]);
        QuarterFeature {
            id: "q".to_owned(),
            name: "Quarter q".to_owned(),
            center: ring.centroid(),
            classification: classify(&metrics, ClassificationScheme::VegetationIndex),
            ring,
            metrics,
        }
    }

    #[test]
    fn empty_batch_yields_zeroes() {
        assert_eq!(batch_stats(&[]), BatchStats::default());
    }

    #[test]
    fn aggregates_population_area_and_means() {
        let features = vec![
            feature(1000, 4.0, 0.2, Some(AccessTier::Low)),
            feature(3000, 6.0, 0.6, Some(AccessTier::High)),
        ];
        let stats = batch_stats(&features);
        assert_eq!(stats.quarters, 2);
        assert_eq!(stats.total_population, 4000);
        assert!((stats.total_area - 10.0).abs() < f64::EPSILON);
        assert!((stats.mean_ndvi - 0.4).abs() < f64::EPSILON);
        assert!((stats.mean_accessibility.unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn accessibility_mean_skips_absent_tiers() {
        let features = vec![
            feature(0, 0.0, 0.0, Some(AccessTier::VeryHigh)),
            feature(0, 0.0, 0.0, None),
        ];
        let stats = batch_stats(&features);
        assert!((stats.mean_accessibility.unwrap() - 5.0).abs() < f64::EPSILON);
    }
}

//! Metric classification.
//!
//! Maps canonical metrics to presentation attributes via fixed threshold
//! tables. The continuous-NDVI and discrete-tier tables evolved in
//! different source generations and stay independent: a record is
//! classified by exactly one [`ClassificationScheme`], declared on its
//! source definition.

use quarter_map_quarter_models::{
    AccessTier, Classification, GreenQuality, NEUTRAL_GRAY, QualityTier, QuarterMetrics,
};
use serde::{Deserialize, Serialize};

/// Which threshold table drives the fill color and quality label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationScheme {
    /// Five-bucket coloring from the continuous vegetation index.
    VegetationIndex,
    /// Three-bucket coloring from the discrete 0-3 quality tier.
    QualityTier,
}

/// Derives presentation attributes from metrics under the given scheme.
#[must_use]
pub fn classify(metrics: &QuarterMetrics, scheme: ClassificationScheme) -> Classification {
    let (fill_color, quality_label) = match scheme {
        ClassificationScheme::VegetationIndex => {
            let bucket = GreenQuality::from_ndvi(metrics.ndvi);
            (bucket.color(), bucket.label())
        }
        ClassificationScheme::QualityTier => {
            let tier = metrics.quality.unwrap_or(QualityTier::Unknown);
            (tier.color(), tier.label())
        }
    };

    let accessibility_label = metrics.accessibility.map(AccessTier::label).or_else(|| {
        metrics
            .accessibility_pct
            .map(|pct| format!("{}%", pct.round()))
    });

    let accessibility_color = metrics.accessibility.map_or(NEUTRAL_GRAY, AccessTier::color);

    Classification {
        fill_color: fill_color.to_owned(),
        quality_label: quality_label.to_owned(),
        accessibility_label,
        accessibility_color: accessibility_color.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarter_map_quarter_models::AccessTier;

    #[test]
    fn ndvi_boundary_is_exclusive() {
        let metrics = QuarterMetrics {
            ndvi: 0.6,
            ..Default::default()
        };
        let classification = classify(&metrics, ClassificationScheme::VegetationIndex);
        assert_eq!(classification.fill_color, "#7bc242");
        assert_eq!(classification.quality_label, "Good");

        let metrics = QuarterMetrics {
            ndvi: 0.61,
            ..Default::default()
        };
        let classification = classify(&metrics, ClassificationScheme::VegetationIndex);
        assert_eq!(classification.fill_color, "#238823");
        assert_eq!(classification.quality_label, "Excellent");
    }

    #[test]
    fn tier_scheme_ignores_ndvi() {
        let metrics = QuarterMetrics {
            ndvi: 0.9,
            quality: Some(QualityTier::Low),
            ..Default::default()
        };
        let classification = classify(&metrics, ClassificationScheme::QualityTier);
        assert_eq!(classification.fill_color, "#d2222d");
        assert_eq!(classification.quality_label, "Low");
    }

    #[test]
    fn missing_tier_maps_to_neutral_gray() {
        let metrics = QuarterMetrics::default();
        let classification = classify(&metrics, ClassificationScheme::QualityTier);
        assert_eq!(classification.fill_color, NEUTRAL_GRAY);
        assert_eq!(classification.accessibility_color, NEUTRAL_GRAY);
        assert_eq!(classification.accessibility_label, None);
    }

    #[test]
    fn accessibility_tier_beats_percentage() {
        let metrics = QuarterMetrics {
            accessibility: Some(AccessTier::Moderate),
            accessibility_pct: Some(64.0),
            ..Default::default()
        };
        let classification = classify(&metrics, ClassificationScheme::VegetationIndex);
        assert_eq!(classification.accessibility_label.as_deref(), Some("3/5"));
        assert_eq!(classification.accessibility_color, "#d6ce1f");
    }

    #[test]
    fn percentage_formats_rounded() {
        let metrics = QuarterMetrics {
            accessibility_pct: Some(63.7),
            ..Default::default()
        };
        let classification = classify(&metrics, ClassificationScheme::VegetationIndex);
        assert_eq!(classification.accessibility_label.as_deref(), Some("64%"));
    }
}

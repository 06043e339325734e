//! Per-value attribute counts for pie charts, and raw values for
//! histograms.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use citizen_map_dashboard_models::AttributeCount;
use citizen_map_geometry_models::{AttributeValue, Feature, FeatureCollection};

/// Category name for features without a value.
pub const NO_DATA_LABEL: &str = "pas de données";

/// Property holding the merged visit records of a site.
const MERGED_VISITS: &str = "merged_visits";

/// Counts how many features share each value of `key`.
///
/// `accessor` extracts the value from a feature; features where it returns
/// `None` are counted under [`NO_DATA_LABEL`]. Values are distinct when
/// their type or their text differs, so the number `3` and the string `"3"`
/// are counted apart. No normalization is applied.
///
/// The result is sorted by descending count. Equal counts keep the order in
/// which the values were first seen.
#[must_use]
pub fn count_by_key<F>(key: &str, collection: &FeatureCollection, accessor: F) -> Vec<AttributeCount>
where
    F: Fn(&Feature, &str) -> Option<AttributeValue>,
{
    let mut counts: Vec<AttributeCount> = Vec::new();
    let mut index: BTreeMap<(ValueType, String), usize> = BTreeMap::new();

    for feature in collection {
        let distinct = accessor(feature, key).map_or_else(
            || (ValueType::String, NO_DATA_LABEL.to_string()),
            |value| (ValueType::of(&value), value.to_string()),
        );

        if let Some(&i) = index.get(&distinct) {
            counts[i].count += 1;
        } else {
            let name = distinct.1.clone();
            index.insert(distinct, counts.len());
            counts.push(AttributeCount::new(name, 1));
        }
    }

    counts.sort_by_key(|c| Reverse(c.count));
    counts
}

/// Type of a counted value. A missing value counts as the
/// [`NO_DATA_LABEL`] string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ValueType {
    Null,
    Bool,
    Number,
    String,
    Json,
}

impl ValueType {
    const fn of(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Null => Self::Null,
            AttributeValue::Bool(_) => Self::Bool,
            AttributeValue::Number(_) => Self::Number,
            AttributeValue::String(_) => Self::String,
            AttributeValue::Json(_) => Self::Json,
        }
    }
}

/// Value of `key` in a site's merged visit records.
#[must_use]
pub fn visit_value(feature: &Feature, key: &str) -> Option<AttributeValue> {
    feature
        .attribute(MERGED_VISITS)
        .and_then(|visits| visits.get(key))
}

/// [`count_by_key`] over merged visit records.
#[must_use]
pub fn count_visits_by_key(key: &str, collection: &FeatureCollection) -> Vec<AttributeCount> {
    count_by_key(key, collection, visit_value)
}

/// Numeric visit values of `key`, one per feature.
///
/// Missing or non-numeric values are `None` so the renderer sees the same
/// number of samples as there are features.
#[must_use]
pub fn histogram_values(collection: &FeatureCollection, key: &str) -> Vec<Option<f64>> {
    collection
        .iter()
        .map(|feature| visit_value(feature, key).and_then(|v| v.as_f64()))
        .collect()
}

#[cfg(test)]
mod tests {
    use citizen_map_geometry_models::{Coordinate, Geometry};

    use super::*;

    fn site(id: usize, visits: serde_json::Value) -> Feature {
        Feature::new(id.to_string(), Geometry::Point(Coordinate::new(4.0, 50.0)))
            .with_attribute(MERGED_VISITS, AttributeValue::from(visits))
    }

    fn collection_of(values: &[&str]) -> FeatureCollection {
        FeatureCollection::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| site(i, serde_json::json!({ "species": v })))
                .collect(),
        )
    }

    #[test]
    fn counts_sorted_by_count_then_first_seen() {
        let collection = collection_of(&["a", "b", "a", "a", "c"]);

        assert_eq!(
            count_visits_by_key("species", &collection),
            vec![
                AttributeCount::new("a", 3),
                AttributeCount::new("b", 1),
                AttributeCount::new("c", 1),
            ]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let collection = collection_of(&["x", "y", "y", "x", "z"]);

        let names: Vec<String> = count_visits_by_key("species", &collection)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["x", "y", "z"]);
    }

    #[test]
    fn values_are_not_normalized() {
        let collection = collection_of(&["Frog", "frog", "frog "]);
        assert_eq!(count_visits_by_key("species", &collection).len(), 3);
    }

    #[test]
    fn numbers_and_strings_are_counted_apart() {
        let collection = FeatureCollection::new(vec![
            site(0, serde_json::json!({ "k": 3 })),
            site(1, serde_json::json!({ "k": "3" })),
            site(2, serde_json::json!({ "k": null })),
            site(3, serde_json::json!({ "k": "null" })),
            site(4, serde_json::json!({ "k": "3" })),
        ]);

        assert_eq!(
            count_visits_by_key("k", &collection),
            vec![
                AttributeCount::new("3", 2),
                AttributeCount::new("3", 1),
                AttributeCount::new("null", 1),
                AttributeCount::new("null", 1),
            ]
        );
    }

    #[test]
    fn missing_values_match_no_data_text() {
        let collection = FeatureCollection::new(vec![
            site(0, serde_json::json!({ "k": NO_DATA_LABEL })),
            site(1, serde_json::json!({})),
        ]);

        assert_eq!(
            count_visits_by_key("k", &collection),
            vec![AttributeCount::new(NO_DATA_LABEL, 2)]
        );
    }

    #[test]
    fn missing_values_count_as_no_data() {
        let collection = FeatureCollection::new(vec![
            site(0, serde_json::json!({ "species": "frog" })),
            site(1, serde_json::json!({ "other": 1 })),
            Feature::new("2", Geometry::Point(Coordinate::new(4.0, 50.0))),
        ]);

        assert_eq!(
            count_visits_by_key("species", &collection),
            vec![
                AttributeCount::new(NO_DATA_LABEL, 2),
                AttributeCount::new("frog", 1),
            ]
        );
    }

    #[test]
    fn custom_accessor() {
        let collection = FeatureCollection::new(vec![
            Feature::new("a", Geometry::Point(Coordinate::new(0.0, 0.0))).with_attribute("n", 2.0),
            Feature::new("b", Geometry::Point(Coordinate::new(0.0, 0.0))).with_attribute("n", 2.0),
        ]);

        let counts = count_by_key("n", &collection, |f, k| f.attribute(k).cloned());
        assert_eq!(counts, vec![AttributeCount::new("2", 2)]);
    }

    #[test]
    fn empty_collection_has_no_counts() {
        assert!(count_visits_by_key("species", &FeatureCollection::default()).is_empty());
    }

    #[test]
    fn histogram_keeps_one_sample_per_feature() {
        let collection = FeatureCollection::new(vec![
            site(0, serde_json::json!({ "count": 4 })),
            site(1, serde_json::json!({ "count": "many" })),
            site(2, serde_json::json!({})),
            site(3, serde_json::json!({ "count": 2.5 })),
        ]);

        assert_eq!(
            histogram_values(&collection, "count"),
            vec![Some(4.0), None, None, Some(2.5)]
        );
    }
}

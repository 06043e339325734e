//! Observations brought in from external sources rather than entered
//! by volunteers.

use citizen_map_geometry_models::{Feature, FeatureCollection};

/// `obs_txt` values marking an imported observation.
pub const IMPORT_SOURCES: [&str; 3] = ["import", "import osm", "géoportail wallon"];

#[must_use]
pub fn is_imported(feature: &Feature) -> bool {
    feature
        .attribute("obs_txt")
        .and_then(|v| v.as_str())
        .is_some_and(|source| IMPORT_SOURCES.contains(&source))
}

#[must_use]
pub fn count_imported(collection: &FeatureCollection) -> usize {
    collection.iter().filter(|f| is_imported(f)).count()
}

#[cfg(test)]
mod tests {
    use citizen_map_geometry_models::{Coordinate, Geometry};

    use super::*;

    fn observation(obs_txt: Option<&str>) -> Feature {
        let feature = Feature::new("1", Geometry::Point(Coordinate::new(4.0, 50.0)));
        match obs_txt {
            Some(text) => feature.with_attribute("obs_txt", text),
            None => feature,
        }
    }

    #[test]
    fn recognizes_import_sources() {
        assert!(is_imported(&observation(Some("import"))));
        assert!(is_imported(&observation(Some("import osm"))));
        assert!(is_imported(&observation(Some("géoportail wallon"))));
    }

    #[test]
    fn volunteer_observations_are_not_imported() {
        assert!(!is_imported(&observation(Some("Import"))));
        assert!(!is_imported(&observation(Some("jdupont"))));
        assert!(!is_imported(&observation(None)));
    }

    #[test]
    fn counts_imported() {
        let collection = FeatureCollection::new(vec![
            observation(Some("import")),
            observation(Some("anna")),
            observation(Some("import osm")),
            observation(None),
        ]);
        assert_eq!(count_imported(&collection), 2);
    }
}

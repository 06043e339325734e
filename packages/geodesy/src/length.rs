//! Line lengths built from [`crate::planar_distance_meters`].

use citizen_map_geometry_models::{Coordinate, FeatureCollection, Geometry};

use crate::{METERS_PER_KILOMETER, distance};

/// Length of a vertex sequence in metres.
///
/// Lines with fewer than three vertices report 0, so a two-point line
/// is not measured.
#[must_use]
pub fn line_length(coords: &[Coordinate]) -> f64 {
    if coords.len() <= 2 {
        return 0.0;
    }
    coords.windows(2).map(|pair| distance(pair[0], pair[1])).sum()
}

/// Length of a geometry in metres. Only line strings have a length.
#[must_use]
pub fn geometry_length(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::LineString(coords) => line_length(coords),
        Geometry::Point(_) | Geometry::Polygon(_) => 0.0,
    }
}

/// Summed line length of a collection, in kilometres.
#[must_use]
pub fn total_length_km(collection: &FeatureCollection) -> f64 {
    let meters: f64 = collection
        .iter()
        .map(|feature| geometry_length(&feature.geometry))
        .sum();
    log::trace!(
        "total_length_km: {} features, {meters:.1} m",
        collection.len()
    );
    meters / METERS_PER_KILOMETER
}

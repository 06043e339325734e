//! Ring and polygon areas on a spherical Earth.

use citizen_map_geometry_models::{Coordinate, FeatureCollection, Geometry};

use crate::{EARTH_RADIUS_SPHERE_M, SQUARE_METERS_PER_HECTARE, to_radians};

/// Signed area of a ring in square metres.
///
/// Positive when the ring is wound clockwise, negative otherwise. Works
/// whether or not the ring repeats its first vertex at the end. Rings with
/// fewer than three vertices have no area.
#[must_use]
pub fn ring_signed_area(ring: &[Coordinate]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        let (lower, middle, upper) = if i == n - 2 {
            (n - 2, n - 1, 0)
        } else if i == n - 1 {
            (n - 1, 0, 1)
        } else {
            (i, i + 1, i + 2)
        };

        let p1 = ring[lower];
        let p2 = ring[middle];
        let p3 = ring[upper];
        sum += (to_radians(p3.lon) - to_radians(p1.lon)) * to_radians(p2.lat).sin();
    }

    sum * EARTH_RADIUS_SPHERE_M * EARTH_RADIUS_SPHERE_M / 2.0
}

/// Area of a polygon in square metres.
///
/// The first ring is the outer boundary; every further ring is a hole whose
/// absolute area is subtracted. An empty ring list has no area.
#[must_use]
pub fn polygon_area(rings: &[Vec<Coordinate>]) -> f64 {
    let Some((outer, holes)) = rings.split_first() else {
        return 0.0;
    };

    holes
        .iter()
        .fold(ring_signed_area(outer).abs(), |area, hole| {
            area - ring_signed_area(hole).abs()
        })
}

/// Area of a geometry in square metres. Only polygons have an area.
#[must_use]
pub fn geometry_area(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Polygon(rings) => polygon_area(rings),
        Geometry::Point(_) | Geometry::LineString(_) => 0.0,
    }
}

/// Summed polygon area of a collection, in hectares.
#[must_use]
pub fn total_area_hectares(collection: &FeatureCollection) -> f64 {
    let square_meters: f64 = collection
        .iter()
        .map(|feature| geometry_area(&feature.geometry))
        .sum();
    log::trace!(
        "total_area_hectares: {} features, {square_meters:.1} m2",
        collection.len()
    );
    square_meters / SQUARE_METERS_PER_HECTARE
}

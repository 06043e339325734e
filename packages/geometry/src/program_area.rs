//! Bounds of a program's survey area.
//!
//! New point observations may only be placed inside the program area. As
//! on the map, the check is against the bounding rectangle of the area,
//! not its outline: a point in the cavity of a concave area is accepted.

use citizen_map_geometry_models::{Coordinate, FeatureCollection, Geometry, GeometryKind};
use geo::BoundingRect;

/// The survey area of a program.
#[derive(Debug, Clone)]
pub struct ProgramArea {
    program_id: Option<i64>,
    geometry_kind: GeometryKind,
    bounds: Option<geo::Rect<f64>>,
}

impl ProgramArea {
    /// Builds the area from a program's `FeatureCollection`.
    ///
    /// The capture kind comes from the program's `geometry_type`, defaulting
    /// to [`GeometryKind::Point`] as the map does.
    #[must_use]
    pub fn from_collection(program: &FeatureCollection) -> Self {
        let shapes: geo::GeometryCollection<f64> = program
            .iter()
            .map(|feature| to_geo(&feature.geometry))
            .collect();
        let bounds = shapes.bounding_rect();

        if bounds.is_none() {
            log::warn!(
                "Program {:?} has no usable area geometry",
                program.metadata.program_id
            );
        } else {
            log::debug!(
                "Program {:?} area spans {} shapes",
                program.metadata.program_id,
                shapes.0.len()
            );
        }

        Self {
            program_id: program.metadata.program_id,
            geometry_kind: program
                .metadata
                .geometry_kind
                .unwrap_or(GeometryKind::Point),
            bounds,
        }
    }

    /// Program identifier, if known.
    #[must_use]
    pub const fn program_id(&self) -> Option<i64> {
        self.program_id
    }

    /// Kind of geometry observations in this program are drawn as.
    #[must_use]
    pub const fn geometry_kind(&self) -> GeometryKind {
        self.geometry_kind
    }

    /// South-west and north-east corners of the area.
    #[must_use]
    pub fn bounds(&self) -> Option<(Coordinate, Coordinate)> {
        self.bounds.map(|rect| {
            (
                Coordinate::new(rect.min().x, rect.min().y),
                Coordinate::new(rect.max().x, rect.max().y),
            )
        })
    }

    /// Whether `coord` lies within the area bounds, edges included.
    ///
    /// An area without geometry contains nothing.
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.bounds.is_some_and(|rect| {
            rect.min().x <= coord.lon
                && coord.lon <= rect.max().x
                && rect.min().y <= coord.lat
                && coord.lat <= rect.max().y
        })
    }
}

fn to_geo(geometry: &Geometry) -> geo::Geometry<f64> {
    match geometry {
        Geometry::Point(coord) => geo::Point::new(coord.lon, coord.lat).into(),
        Geometry::LineString(coords) => line(coords).into(),
        Geometry::Polygon(rings) => {
            let mut rings = rings.iter().map(|ring| line(ring));
            let exterior = rings.next().unwrap_or_else(|| geo::LineString(Vec::new()));
            geo::Polygon::new(exterior, rings.collect()).into()
        }
    }
}

fn line(coords: &[Coordinate]) -> geo::LineString<f64> {
    coords
        .iter()
        .map(|c| geo::Coord { x: c.lon, y: c.lat })
        .collect()
}

#[cfg(test)]
mod tests {
    use citizen_map_geometry_models::{CollectionMetadata, Feature};

    use super::*;

    fn l_shaped_program() -> FeatureCollection {
        FeatureCollection {
            features: vec![Feature::new(
                "area",
                Geometry::Polygon(vec![vec![
                    Coordinate::new(0.0, 0.0),
                    Coordinate::new(0.0, 2.0),
                    Coordinate::new(1.0, 2.0),
                    Coordinate::new(1.0, 1.0),
                    Coordinate::new(2.0, 1.0),
                    Coordinate::new(2.0, 0.0),
                ]]),
            )],
            metadata: CollectionMetadata {
                program_id: Some(7),
                geometry_kind: Some(GeometryKind::Polygon),
                ..CollectionMetadata::default()
            },
        }
    }

    #[test]
    fn computes_bounds() {
        let area = ProgramArea::from_collection(&l_shaped_program());
        assert_eq!(area.program_id(), Some(7));
        assert_eq!(area.geometry_kind(), GeometryKind::Polygon);
        assert_eq!(
            area.bounds(),
            Some((Coordinate::new(0.0, 0.0), Coordinate::new(2.0, 2.0)))
        );
    }

    #[test]
    fn contains_uses_inclusive_bounds() {
        let area = ProgramArea::from_collection(&l_shaped_program());
        assert!(area.contains(Coordinate::new(0.5, 0.5)));
        assert!(area.contains(Coordinate::new(2.0, 2.0)));
        // Cavity of the L: outside the outline but inside the bounds.
        assert!(area.contains(Coordinate::new(1.5, 1.5)));
        assert!(!area.contains(Coordinate::new(2.1, 0.5)));
        assert!(!area.contains(Coordinate::new(0.5, -0.1)));
    }

    #[test]
    fn bounds_cover_every_shape() {
        let mut program = l_shaped_program();
        program.features.push(Feature::new(
            "outpost",
            Geometry::LineString(vec![Coordinate::new(2.5, 2.5), Coordinate::new(3.0, 3.0)]),
        ));

        let area = ProgramArea::from_collection(&program);
        assert_eq!(
            area.bounds(),
            Some((Coordinate::new(0.0, 0.0), Coordinate::new(3.0, 3.0)))
        );
        assert!(area.contains(Coordinate::new(2.8, 0.2)));
    }

    #[test]
    fn empty_program_contains_nothing() {
        let area = ProgramArea::from_collection(&FeatureCollection::default());
        assert_eq!(area.bounds(), None);
        assert_eq!(area.geometry_kind(), GeometryKind::Point);
        assert!(!area.contains(Coordinate::new(0.0, 0.0)));
    }
}

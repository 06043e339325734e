#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `GeoJSON` interchange and program-area helpers for observation geometries.
//!
//! The API layer hands out programs and observations as `GeoJSON`; this
//! crate turns them into the typed model from
//! [`citizen_map_geometry_models`], computes the bounds of a program area
//! for placement checks, and shapes new observations for submission.

pub mod convert;
pub mod observation;
pub mod program_area;

use citizen_map_geometry_models::{Coordinate, Geometry};

pub use observation::ObservationDraft;
pub use program_area::ProgramArea;

/// Errors that can occur while reading or writing geometries.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// The input was not valid `GeoJSON`.
    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document parsed but was not a `FeatureCollection`.
    #[error("expected a GeoJSON FeatureCollection, found a {found}")]
    NotAFeatureCollection {
        /// Kind of `GeoJSON` object that was found instead.
        found: &'static str,
    },
}

/// Representative point used to place a marker for a geometry.
///
/// Line and polygon observations are clustered on the map by their first
/// vertex (the first vertex of the outer ring for polygons). Empty
/// geometries have no anchor.
#[must_use]
pub fn marker_anchor(geometry: &Geometry) -> Option<Coordinate> {
    match geometry {
        Geometry::Point(coord) => Some(*coord),
        Geometry::LineString(coords) => coords.first().copied(),
        Geometry::Polygon(rings) => rings.first().and_then(|ring| ring.first()).copied(),
    }
}

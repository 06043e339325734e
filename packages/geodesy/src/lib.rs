#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Distance, length and area measurements on a spherical Earth.
//!
//! All inputs are `(longitude, latitude)` pairs in degrees. The formulas
//! are simple approximations suited to observation-sized
//! geometries (a few metres to a few kilometres):
//!
//! * [`planar_distance_meters`] uses the equirectangular projection. Its
//!   error grows with distance and with latitude spread; at 10 km it stays
//!   well under 0.1%, beyond a few hundred kilometres it is no longer
//!   meaningful. Segments crossing the antimeridian are not unwrapped and
//!   come out roughly one Earth circumference too long.
//! * [`area::ring_signed_area`] projects each ring onto a sphere of radius
//!   [`EARTH_RADIUS_SPHERE_M`] (Chamberlain & Duquette, JPL 07-03).

pub mod area;
pub mod length;

pub use area::{geometry_area, polygon_area, ring_signed_area, total_area_hectares};
pub use length::{geometry_length, line_length, total_length_km};

use citizen_map_geometry_models::Coordinate;

/// Mean Earth radius used for distances, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS84 equatorial radius used for ring areas, in metres.
pub const EARTH_RADIUS_SPHERE_M: f64 = 6_378_137.0;

/// Square metres per hectare.
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Metres per kilometre.
pub const METERS_PER_KILOMETER: f64 = 1_000.0;

/// Converts degrees to radians as `degrees * π / 180`.
#[must_use]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Approximate distance in metres between two `(lon, lat)` positions.
///
/// Equirectangular approximation: `Δλ · cos(φm)` and `Δφ` are treated as
/// planar offsets on a sphere of radius [`EARTH_RADIUS_M`]. No antimeridian
/// handling is done.
#[must_use]
pub fn planar_distance_meters(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let delta_lon = to_radians(lon2 - lon1);
    let phi1 = to_radians(lat1);
    let phi2 = to_radians(lat2);
    let x = delta_lon * ((phi1 + phi2) / 2.0).cos();
    let y = phi2 - phi1;
    EARTH_RADIUS_M * x.hypot(y)
}

/// [`planar_distance_meters`] between two [`Coordinate`]s.
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    planar_distance_meters(a.lon, a.lat, b.lon, b.lat)
}

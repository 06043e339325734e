//! Snap-to-close detection between two screen points.

use citizen_map_geometry_models::ScreenPoint;

/// Default snap tolerance, in pixels.
pub const SNAP_DISTANCE_PX: f64 = 6.0;

/// Snap metric between two screen points: `sqrt(|dx² - dy²|)`.
///
/// This is not the Euclidean distance. Points whose offsets have equal
/// magnitude on both axes measure zero however far apart they are.
#[must_use]
pub fn snap_metric(a: ScreenPoint, b: ScreenPoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx.mul_add(dx, -(dy * dy)).abs().sqrt()
}

/// Whether `b` snaps onto `a` with the default tolerance.
#[must_use]
pub fn is_snapped(a: ScreenPoint, b: ScreenPoint) -> bool {
    is_snapped_within(a, b, SNAP_DISTANCE_PX)
}

/// Whether `b` snaps onto `a`, i.e. the snap metric is strictly below
/// `tolerance`.
#[must_use]
pub fn is_snapped_within(a: ScreenPoint, b: ScreenPoint, tolerance: f64) -> bool {
    snap_metric(a, b) < tolerance
}

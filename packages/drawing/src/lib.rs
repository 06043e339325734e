#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive capture of observation geometries on the map.
//!
//! A [`DrawingSession`] turns pointer clicks and moves into a point, a
//! line or a polygon. Lines and polygons are closed by clicking again on
//! the previous (line) or first (polygon) vertex, as decided by
//! [`snap::is_snapped`]. Clicks below the configured zoom level are
//! rejected with a short-lived [`ZoomWarning`].

pub mod config;
pub mod session;
pub mod snap;
pub mod warning;

pub use config::{ConfigError, MapConfig};
pub use session::{
    AreaBounds, DrawingOutput, DrawingSession, DrawingState, MapView, PointerEvent, Transition,
    TransitionContext, Unbounded, transition,
};
pub use warning::ZoomWarning;

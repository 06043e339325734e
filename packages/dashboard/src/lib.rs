#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard aggregation over program observations.
//!
//! Turns a program's [`FeatureCollection`](citizen_map_geometry_models::FeatureCollection)
//! into a [`ProgramSummary`]: imported observation count, total line length
//! and area, and per-value counts of every categorical visit attribute.

pub mod count;
pub mod imported;
pub mod summary;

pub use citizen_map_dashboard_models::{AttributeCount, Chart, ChartKind, Program, ProgramSummary};
pub use count::{NO_DATA_LABEL, count_by_key, count_visits_by_key, histogram_values, visit_value};
pub use imported::{count_imported, is_imported};
pub use summary::{chart_plan, summarize_program, summarize_programs};

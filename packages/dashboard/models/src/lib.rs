#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for the program dashboard.
//!
//! A [`ProgramSummary`] holds everything the dashboard shows for one
//! observation program: headline totals and the per-attribute counts fed
//! to its charts.

use std::collections::BTreeMap;

use citizen_map_geometry_models::{CollectionMetadata, GeometryKind};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of features sharing one attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeCount {
    /// The attribute value as displayed.
    pub name: String,
    pub count: u64,
}

impl AttributeCount {
    #[must_use]
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// How an attribute is charted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    /// Share of each distinct value, from [`AttributeCount`]s.
    Pie,
    /// Distribution of raw numeric values. Binning is left to the renderer.
    Histogram,
}

/// One chart to draw on a program's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    /// Attribute key the chart is built from.
    pub key: String,
    /// Human-readable title, falling back to the key.
    pub title: String,
    pub kind: ChartKind,
    /// DOM id of the element the chart is drawn into.
    pub element_id: String,
}

/// An observation program as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: i64,
    pub title: String,
    pub geometry_kind: GeometryKind,
}

impl Program {
    /// Describes the program a collection belongs to.
    ///
    /// Returns `None` when the collection does not name its program.
    #[must_use]
    pub fn from_metadata(metadata: &CollectionMetadata) -> Option<Self> {
        let id = metadata.program_id?;
        Some(Self {
            id,
            title: metadata
                .title
                .clone()
                .unwrap_or_else(|| format!("Program {id}")),
            geometry_kind: metadata.geometry_kind.unwrap_or(GeometryKind::Point),
        })
    }
}

/// Dashboard summary of one program's observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSummary {
    pub title: String,
    pub program_id: i64,
    pub geometry_kind: GeometryKind,
    /// Number of observations brought in from an external source.
    pub imported_count: u64,
    /// Total length of line observations, in kilometers.
    pub line_length_km: f64,
    /// Total area of polygon observations, in hectares.
    pub area_hectares: f64,
    /// Every attribute key of the program's form.
    pub keys: Vec<String>,
    /// Counts per value for each categorical attribute.
    pub count_by_key: BTreeMap<String, Vec<AttributeCount>>,
    /// Charts to draw, one per charted attribute.
    pub charts: Vec<Chart>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_camel_case() {
        let summary = ProgramSummary {
            title: "Mares".to_string(),
            program_id: 3,
            geometry_kind: GeometryKind::Polygon,
            imported_count: 1,
            line_length_km: 0.0,
            area_hectares: 2.5,
            keys: vec!["type".to_string()],
            count_by_key: BTreeMap::from([(
                "type".to_string(),
                vec![AttributeCount::new("mare", 2)],
            )]),
            charts: vec![Chart {
                key: "type".to_string(),
                title: "Type".to_string(),
                kind: ChartKind::Pie,
                element_id: "site3-graph-type".to_string(),
            }],
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["programId"], 3);
        assert_eq!(json["geometryKind"], "POLYGON");
        assert_eq!(json["importedCount"], 1);
        assert_eq!(json["countByKey"]["type"][0]["name"], "mare");
        assert_eq!(json["charts"][0]["elementId"], "site3-graph-type");
        assert_eq!(json["charts"][0]["kind"], "pie");
    }

    #[test]
    fn program_from_metadata() {
        let metadata = CollectionMetadata {
            program_id: Some(9),
            geometry_kind: Some(GeometryKind::LineString),
            ..CollectionMetadata::default()
        };

        let program = Program::from_metadata(&metadata).unwrap();
        assert_eq!(program.title, "Program 9");
        assert_eq!(program.geometry_kind, GeometryKind::LineString);

        assert_eq!(Program::from_metadata(&CollectionMetadata::default()), None);
    }

    #[test]
    fn chart_kind_names() {
        assert_eq!(ChartKind::Histogram.to_string(), "histogram");
        assert_eq!("pie".parse::<ChartKind>().unwrap(), ChartKind::Pie);
    }
}

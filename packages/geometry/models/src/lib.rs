#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate, geometry and feature types for citizen-science observations.
//!
//! These types describe what a program's observations look like once they
//! have been fetched from the API: a [`FeatureCollection`] of [`Feature`]s,
//! each carrying a [`Geometry`] and a bag of [`AttributeValue`]s described by
//! an [`AttributeSchema`]. Geometries serialize to the same JSON shape as a
//! `GeoJSON` geometry object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A geographic position in degrees, stored as `(longitude, latitude)`.
///
/// Serializes as a two-element `[lon, lat]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate from a longitude and a latitude in degrees.
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coord: Coordinate) -> Self {
        [coord.lon, coord.lat]
    }
}

/// A position in device pixel space. Only used for snap comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ScreenPoint {
    /// Horizontal pixel offset.
    pub x: f64,
    /// Vertical pixel offset.
    pub y: f64,
}

impl ScreenPoint {
    /// Creates a screen point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for ScreenPoint {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<ScreenPoint> for [f64; 2] {
    fn from(point: ScreenPoint) -> Self {
        [point.x, point.y]
    }
}

/// The kind of geometry a program collects.
///
/// Programs advertise this as `geometry_type` (`POINT`, `LINESTRING` or
/// `POLYGON`). Parsing is case-insensitive so `GeoJSON` type names such as
/// `"LineString"` are accepted as well.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum GeometryKind {
    /// A single marker.
    #[serde(rename = "POINT", alias = "Point")]
    #[strum(serialize = "POINT")]
    Point,
    /// An open polyline.
    #[serde(rename = "LINESTRING", alias = "LineString")]
    #[strum(serialize = "LINESTRING")]
    LineString,
    /// A closed area with optional holes.
    #[serde(rename = "POLYGON", alias = "Polygon")]
    #[strum(serialize = "POLYGON")]
    Polygon,
}

impl GeometryKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Point, Self::LineString, Self::Polygon]
    }
}

/// A finished observation geometry.
///
/// Polygon rings are stored without requiring an explicit closing vertex;
/// `rings[0]` is the outer boundary and any further rings are holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// A single position.
    Point(Coordinate),
    /// An ordered vertex sequence.
    LineString(Vec<Coordinate>),
    /// An ordered sequence of rings.
    Polygon(Vec<Vec<Coordinate>>),
}

impl Geometry {
    /// Returns the [`GeometryKind`] of this geometry.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::LineString(_) => GeometryKind::LineString,
            Self::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Number of vertices across all parts of the geometry.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Point(_) => 1,
            Self::LineString(coords) => coords.len(),
            Self::Polygon(rings) => rings.iter().map(Vec::len).sum(),
        }
    }
}

/// A single attribute value attached to a feature.
///
/// Mirrors the JSON value space: objects and arrays are kept verbatim under
/// [`AttributeValue::Json`] so nested records such as `merged_visits` survive
/// a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum AttributeValue {
    /// Explicit `null`.
    Null,
    /// A boolean flag.
    Bool(bool),
    /// Any numeric value.
    Number(f64),
    /// A text value.
    String(String),
    /// A nested object or array.
    Json(serde_json::Value),
}

impl AttributeValue {
    /// Returns the text if this is a [`AttributeValue::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a [`AttributeValue::Number`].
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Looks up `key` when this value is a nested JSON object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Self> {
        match self {
            Self::Json(serde_json::Value::Object(map)) => map.get(key).cloned().map(Self::from),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Json(serde_json::Value::Number(n)),
            },
            serde_json::Value::String(s) => Self::String(s),
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Self::Json(other)
            }
        }
    }
}

impl From<AttributeValue> for serde_json::Value {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Null => Self::Null,
            AttributeValue::Bool(b) => Self::Bool(b),
            // Integral numbers go back out as integers so `3` does not turn into `3.0`.
            AttributeValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                Self::from(n as i64)
            }
            AttributeValue::Number(n) => {
                serde_json::Number::from_f64(n).map_or(Self::Null, Self::Number)
            }
            AttributeValue::String(s) => Self::String(s),
            AttributeValue::Json(json) => json,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Json(json) => write!(f, "{json}"),
        }
    }
}

/// Declared type of a form field in a program's custom form schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// Free or enumerated text (rendered as a pie chart).
    String,
    /// Whole numbers (rendered as a histogram).
    Integer,
    /// Decimal numbers.
    Number,
    /// Yes/no flags.
    Boolean,
    /// Anything the dashboard does not chart.
    #[serde(other)]
    Other,
}

/// One field of a program's attribute schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeField {
    /// Property key in the feature attributes.
    pub key: String,
    /// Human-readable title shown on charts.
    pub title: Option<String>,
    /// Declared value type.
    pub attribute_type: AttributeType,
}

impl AttributeField {
    /// Returns the title, falling back to the key.
    #[must_use]
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.key)
    }
}

/// Attribute schema of a program, derived from its custom form JSON schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSchema {
    /// Fields in the order the form declares them.
    pub fields: Vec<AttributeField>,
}

impl AttributeSchema {
    /// Builds a schema from a JSON schema object with a `properties` member.
    ///
    /// Each property contributes its `type` and optional `title`. Anything
    /// that is not an object yields an empty schema.
    #[must_use]
    pub fn from_json_schema(schema: &serde_json::Value) -> Self {
        let Some(properties) = schema.get("properties").and_then(serde_json::Value::as_object)
        else {
            return Self::default();
        };

        let fields = properties
            .iter()
            .map(|(key, property)| AttributeField {
                key: key.clone(),
                title: property
                    .get("title")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string),
                attribute_type: property
                    .get("type")
                    .cloned()
                    .and_then(|t| serde_json::from_value(t).ok())
                    .unwrap_or(AttributeType::Other),
            })
            .collect();

        Self { fields }
    }

    /// All field keys in declaration order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.key.as_str()).collect()
    }

    /// Fields declared with the given type.
    pub fn fields_of_type(
        &self,
        attribute_type: AttributeType,
    ) -> impl Iterator<Item = &AttributeField> {
        self.fields
            .iter()
            .filter(move |f| f.attribute_type == attribute_type)
    }

    /// Returns `true` if the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single observation: geometry, attributes and a stable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Stable identifier (site or observation id).
    pub id: String,
    /// Observation geometry.
    pub geometry: Geometry,
    /// Named attributes.
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Feature {
    /// Creates a feature with no attributes.
    #[must_use]
    pub fn new(id: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            geometry,
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute, returning the feature.
    #[must_use]
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Looks up an attribute by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}

/// Collection-level metadata attached by the API layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMetadata {
    /// Program the features belong to.
    pub program_id: Option<i64>,
    /// Program title.
    pub title: Option<String>,
    /// Geometry kind the program collects.
    pub geometry_kind: Option<GeometryKind>,
    /// Schema of the program's custom form.
    pub schema: AttributeSchema,
}

/// An ordered set of features plus program metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCollection {
    /// Features in API order.
    pub features: Vec<Feature>,
    /// Program metadata.
    pub metadata: CollectionMetadata,
}

impl FeatureCollection {
    /// Creates a collection with default metadata.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            metadata: CollectionMetadata::default(),
        }
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if the collection has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates over the features.
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_serializes_as_lon_lat_pair() {
        let json = serde_json::to_value(Coordinate::new(4.35, 50.85)).unwrap();
        assert_eq!(json, serde_json::json!([4.35, 50.85]));
    }

    #[test]
    fn geometry_matches_geojson_shape() {
        let line = Geometry::LineString(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 2.0),
        ]);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 2.0]]})
        );

        let parsed: Geometry = serde_json::from_value(serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]
        }))
        .unwrap();
        assert_eq!(parsed.kind(), GeometryKind::Polygon);
        assert_eq!(parsed.vertex_count(), 3);
    }

    #[test]
    fn geometry_kind_parses_program_and_geojson_names() {
        assert_eq!(
            "LINESTRING".parse::<GeometryKind>().unwrap(),
            GeometryKind::LineString
        );
        assert_eq!(
            "LineString".parse::<GeometryKind>().unwrap(),
            GeometryKind::LineString
        );
        assert_eq!("point".parse::<GeometryKind>().unwrap(), GeometryKind::Point);
        assert!("MULTIPOLYGON".parse::<GeometryKind>().is_err());
        assert_eq!(GeometryKind::Polygon.to_string(), "POLYGON");

        let kind: GeometryKind = serde_json::from_value(serde_json::json!("LINESTRING")).unwrap();
        assert_eq!(kind, GeometryKind::LineString);
    }

    #[test]
    fn attribute_values_follow_json() {
        assert_eq!(AttributeValue::from(serde_json::json!(null)), AttributeValue::Null);
        assert_eq!(AttributeValue::from(serde_json::json!(3)), AttributeValue::Number(3.0));
        assert_eq!(AttributeValue::from(serde_json::json!("oak")), AttributeValue::from("oak"));

        let visits = AttributeValue::from(serde_json::json!({"species": "oak"}));
        assert_eq!(visits.get("species"), Some(AttributeValue::from("oak")));
        assert_eq!(visits.get("missing"), None);

        assert_eq!(serde_json::Value::from(AttributeValue::Number(3.0)), serde_json::json!(3));
        assert_eq!(serde_json::Value::from(AttributeValue::Number(2.5)), serde_json::json!(2.5));
    }

    #[test]
    fn attribute_display_renders_plain_text() {
        assert_eq!(AttributeValue::Number(12.0).to_string(), "12");
        assert_eq!(AttributeValue::Number(1.5).to_string(), "1.5");
        assert_eq!(AttributeValue::from("a").to_string(), "a");
        assert_eq!(AttributeValue::Null.to_string(), "null");
    }

    #[test]
    fn schema_reads_json_schema_properties() {
        let schema = AttributeSchema::from_json_schema(&serde_json::json!({
            "type": "object",
            "properties": {
                "count": {"type": "integer", "title": "Count"},
                "habitat": {"type": "string"},
                "photo": {"type": "file"}
            }
        }));

        assert_eq!(schema.keys(), vec!["count", "habitat", "photo"]);
        let strings: Vec<&str> = schema
            .fields_of_type(AttributeType::String)
            .map(AttributeField::label)
            .collect();
        assert_eq!(strings, vec!["habitat"]);
        assert_eq!(schema.fields[0].label(), "Count");
        assert_eq!(schema.fields[2].attribute_type, AttributeType::Other);

        assert!(AttributeSchema::from_json_schema(&serde_json::json!("nope")).is_empty());
    }

    #[test]
    fn schema_keeps_declaration_order() {
        let form: serde_json::Value = serde_json::from_str(
            r#"{"properties": {
                "species": {"type": "string"},
                "count": {"type": "integer"},
                "area": {"type": "string"}
            }}"#,
        )
        .unwrap();

        let schema = AttributeSchema::from_json_schema(&form);
        assert_eq!(schema.keys(), vec!["species", "count", "area"]);
    }
}

//! Conversion between `GeoJSON` documents and the typed observation model.
//!
//! Programs and observations arrive as `GeoJSON` `FeatureCollection`s. Only
//! `Point`, `LineString` and `Polygon` geometries are observation shapes;
//! anything else is skipped with a warning rather than failing the whole
//! collection.

use std::path::Path;

use citizen_map_geometry_models::{
    AttributeSchema, AttributeValue, CollectionMetadata, Coordinate, Feature, FeatureCollection,
    Geometry,
};
use geojson::{GeoJson, JsonObject, feature::Id};

use crate::GeometryError;

/// Options controlling how features are read.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Property holding the feature id when the `GeoJSON` `id` member is
    /// absent (e.g. `"id_site"` or `"id_observation"`). Features with
    /// neither fall back to their index in the collection.
    pub id_property: Option<String>,
}

impl ImportOptions {
    /// Reads ids from the given property.
    #[must_use]
    pub fn with_id_property(key: impl Into<String>) -> Self {
        Self {
            id_property: Some(key.into()),
        }
    }
}

/// Parses a `GeoJSON` `FeatureCollection` document.
///
/// # Errors
///
/// Returns [`GeometryError::GeoJson`] if the input is not valid `GeoJSON`,
/// or [`GeometryError::NotAFeatureCollection`] if it is a single feature or
/// geometry.
pub fn parse_feature_collection(
    input: &str,
    options: &ImportOptions,
) -> Result<FeatureCollection, GeometryError> {
    match input.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(from_geojson_collection(collection, options)),
        GeoJson::Feature(_) => Err(GeometryError::NotAFeatureCollection { found: "Feature" }),
        GeoJson::Geometry(_) => Err(GeometryError::NotAFeatureCollection { found: "Geometry" }),
    }
}

/// Reads and parses a `GeoJSON` `FeatureCollection` file.
///
/// # Errors
///
/// Returns [`GeometryError::Io`] if the file cannot be read, otherwise the
/// same errors as [`parse_feature_collection`].
pub fn read_feature_collection(
    path: &Path,
    options: &ImportOptions,
) -> Result<FeatureCollection, GeometryError> {
    let input = std::fs::read_to_string(path)?;
    let collection = parse_feature_collection(&input, options)?;
    log::debug!(
        "Read {} features from {}",
        collection.len(),
        path.display()
    );
    Ok(collection)
}

/// Converts a parsed `GeoJSON` collection into the typed model.
#[must_use]
pub fn from_geojson_collection(
    collection: geojson::FeatureCollection,
    options: &ImportOptions,
) -> FeatureCollection {
    let metadata = collection
        .features
        .first()
        .map(collection_metadata)
        .unwrap_or_default();

    let features = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(index, feature)| from_geojson_feature(feature, index, options))
        .collect();

    FeatureCollection { features, metadata }
}

/// Converts one `GeoJSON` feature, or `None` if its geometry is missing or
/// not an observation shape.
#[must_use]
pub fn from_geojson_feature(
    feature: geojson::Feature,
    index: usize,
    options: &ImportOptions,
) -> Option<Feature> {
    let Some(geometry) = feature
        .geometry
        .as_ref()
        .and_then(|g| geometry_from_geojson(&g.value))
    else {
        log::warn!("Skipping feature #{index}: missing or unsupported geometry");
        return None;
    };

    let properties = feature.properties.unwrap_or_default();

    let id = feature
        .id
        .map(|id| match id {
            Id::String(s) => s,
            Id::Number(n) => n.to_string(),
        })
        .or_else(|| {
            options
                .id_property
                .as_deref()
                .and_then(|key| properties.get(key))
                .and_then(id_from_json)
        })
        .unwrap_or_else(|| index.to_string());

    let attributes = properties
        .into_iter()
        .map(|(key, value)| (key, AttributeValue::from(value)))
        .collect();

    Some(Feature {
        id,
        geometry,
        attributes,
    })
}

/// Converts a `GeoJSON` geometry value. Positions need at least two
/// ordinates; any altitude is dropped.
#[must_use]
pub fn geometry_from_geojson(value: &geojson::Value) -> Option<Geometry> {
    match value {
        geojson::Value::Point(position) => position_to_coordinate(position).map(Geometry::Point),
        geojson::Value::LineString(line) => line_to_coordinates(line).map(Geometry::LineString),
        geojson::Value::Polygon(rings) => rings
            .iter()
            .map(|ring| line_to_coordinates(ring))
            .collect::<Option<Vec<_>>>()
            .map(Geometry::Polygon),
        geojson::Value::MultiPoint(_)
        | geojson::Value::MultiLineString(_)
        | geojson::Value::MultiPolygon(_)
        | geojson::Value::GeometryCollection(_) => None,
    }
}

/// Converts a geometry to a `GeoJSON` geometry.
///
/// Polygon rings are closed on the way out since `GeoJSON` requires the
/// last position of a ring to repeat the first.
#[must_use]
pub fn geometry_to_geojson(geometry: &Geometry) -> geojson::Geometry {
    let value = match geometry {
        Geometry::Point(coord) => geojson::Value::Point(coordinate_to_position(*coord)),
        Geometry::LineString(coords) => {
            geojson::Value::LineString(coords.iter().copied().map(coordinate_to_position).collect())
        }
        Geometry::Polygon(rings) => geojson::Value::Polygon(
            rings
                .iter()
                .map(|ring| {
                    let mut positions: Vec<Vec<f64>> =
                        ring.iter().copied().map(coordinate_to_position).collect();
                    if let (Some(first), Some(last)) = (ring.first(), ring.last())
                        && first != last
                    {
                        positions.push(coordinate_to_position(*first));
                    }
                    positions
                })
                .collect(),
        ),
    };
    geojson::Geometry::new(value)
}

/// Converts a feature to a `GeoJSON` feature with a string id.
#[must_use]
pub fn feature_to_geojson(feature: &Feature) -> geojson::Feature {
    let properties: JsonObject = feature
        .attributes
        .iter()
        .map(|(key, value)| (key.clone(), serde_json::Value::from(value.clone())))
        .collect();

    geojson::Feature {
        bbox: None,
        geometry: Some(geometry_to_geojson(&feature.geometry)),
        id: Some(Id::String(feature.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Converts a collection to a `GeoJSON` collection. Metadata is not
/// written back.
#[must_use]
pub fn collection_to_geojson(collection: &FeatureCollection) -> geojson::FeatureCollection {
    geojson::FeatureCollection {
        bbox: None,
        features: collection.iter().map(feature_to_geojson).collect(),
        foreign_members: None,
    }
}

/// Reads program metadata from the first feature of a collection.
///
/// Observation and site features embed their program under a `program`
/// property; program-area features carry the same fields at the top level.
fn collection_metadata(first: &geojson::Feature) -> CollectionMetadata {
    let Some(properties) = first.properties.as_ref() else {
        return CollectionMetadata::default();
    };

    let program = properties
        .get("program")
        .and_then(serde_json::Value::as_object)
        .unwrap_or(properties);

    let program_id = program.get("id_program").and_then(serde_json::Value::as_i64);
    let title = program
        .get("title")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);

    let geometry_kind = program
        .get("geometry_type")
        .and_then(serde_json::Value::as_str)
        .and_then(|kind| kind.parse().ok())
        .or_else(|| {
            first
                .geometry
                .as_ref()
                .and_then(|g| geometry_from_geojson(&g.value))
                .map(|g| g.kind())
        });

    let schema = program
        .get("custom_form")
        .and_then(|form| form.pointer("/json_schema/schema"))
        .map_or_else(AttributeSchema::default, AttributeSchema::from_json_schema);

    CollectionMetadata {
        program_id,
        title,
        geometry_kind,
        schema,
    }
}

fn id_from_json(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn position_to_coordinate(position: &[f64]) -> Option<Coordinate> {
    match position {
        [lon, lat, ..] => Some(Coordinate::new(*lon, *lat)),
        _ => None,
    }
}

fn line_to_coordinates(line: &[Vec<f64>]) -> Option<Vec<Coordinate>> {
    line.iter().map(|p| position_to_coordinate(p)).collect()
}

fn coordinate_to_position(coord: Coordinate) -> Vec<f64> {
    vec![coord.lon, coord.lat]
}

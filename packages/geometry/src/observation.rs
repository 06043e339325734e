//! Payload for submitting a new observation.
//!
//! The submission endpoint takes a multipart form: the geometry as a JSON
//! string, the program id, and one field per attribute. Sending it is the
//! API client's job; this module only shapes the fields.

use std::collections::BTreeMap;

use citizen_map_geometry_models::{AttributeValue, Geometry};
use serde::Serialize;

/// A new observation waiting to be submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationDraft {
    /// Program the observation belongs to.
    pub id_program: i64,
    /// Drawn geometry, serialized as a `GeoJSON` geometry object.
    pub geometry: Geometry,
    /// Form values keyed by field name.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl ObservationDraft {
    /// Creates a draft with no form values.
    #[must_use]
    pub const fn new(id_program: i64, geometry: Geometry) -> Self {
        Self {
            id_program,
            geometry,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets a form value, returning the draft.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Multipart form fields in submission order: `geometry`, then the
    /// attributes, then `id_program`.
    ///
    /// Text values are sent verbatim; everything else uses its JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the geometry cannot be serialized to JSON.
    pub fn form_fields(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let mut fields = Vec::with_capacity(self.attributes.len() + 2);
        fields.push(("geometry".to_string(), serde_json::to_string(&self.geometry)?));

        for (key, value) in &self.attributes {
            let text = match value {
                AttributeValue::String(s) => s.clone(),
                other => serde_json::Value::from(other.clone()).to_string(),
            };
            fields.push((key.clone(), text));
        }

        fields.push(("id_program".to_string(), self.id_program.to_string()));
        Ok(fields)
    }
}

//! Per-program dashboard summaries.

use std::collections::BTreeMap;

use citizen_map_dashboard_models::{Chart, ChartKind, Program, ProgramSummary};
use citizen_map_geodesy::{total_area_hectares, total_length_km};
use citizen_map_geometry_models::{AttributeSchema, AttributeType, FeatureCollection};

use crate::count::count_visits_by_key;
use crate::imported::count_imported;

/// Charts for a program's form: a pie chart per text attribute and a
/// histogram per integer attribute. Other attributes are not charted.
#[must_use]
pub fn chart_plan(program_id: i64, schema: &AttributeSchema) -> Vec<Chart> {
    schema
        .fields
        .iter()
        .filter_map(|field| {
            let kind = match field.attribute_type {
                AttributeType::String => ChartKind::Pie,
                AttributeType::Integer => ChartKind::Histogram,
                AttributeType::Number | AttributeType::Boolean | AttributeType::Other => {
                    return None;
                }
            };
            Some(Chart {
                key: field.key.clone(),
                title: field.label().to_string(),
                kind,
                element_id: format!("site{program_id}-graph-{}", field.key),
            })
        })
        .collect()
}

/// Summarizes one program's sites.
///
/// Returns `None` for a program without sites, which the dashboard does
/// not list.
#[must_use]
pub fn summarize_program(program: &Program, sites: &FeatureCollection) -> Option<ProgramSummary> {
    if sites.is_empty() {
        log::debug!("Program {} has no sites, skipping", program.id);
        return None;
    }

    let schema = &sites.metadata.schema;
    let count_by_key: BTreeMap<_, _> = schema
        .fields_of_type(AttributeType::String)
        .map(|field| (field.key.clone(), count_visits_by_key(&field.key, sites)))
        .collect();

    let summary = ProgramSummary {
        title: program.title.clone(),
        program_id: program.id,
        geometry_kind: program.geometry_kind,
        imported_count: count_imported(sites) as u64,
        line_length_km: total_length_km(sites),
        area_hectares: total_area_hectares(sites),
        keys: schema.keys().into_iter().map(str::to_string).collect(),
        count_by_key,
        charts: chart_plan(program.id, schema),
    };

    log::debug!(
        "Program {} ({}): {} sites, {} imported",
        summary.program_id,
        summary.title,
        sites.len(),
        summary.imported_count
    );

    Some(summary)
}

/// Summarizes every program with sites, ordered by program id.
#[must_use]
pub fn summarize_programs<'a, I>(programs: I) -> Vec<ProgramSummary>
where
    I: IntoIterator<Item = (&'a Program, &'a FeatureCollection)>,
{
    let mut summaries: Vec<ProgramSummary> = programs
        .into_iter()
        .filter_map(|(program, sites)| summarize_program(program, sites))
        .collect();
    summaries.sort_by_key(|s| s.program_id);
    summaries
}

#[cfg(test)]
mod tests {
    use citizen_map_dashboard_models::AttributeCount;
    use citizen_map_geometry_models::{
        AttributeField, AttributeValue, CollectionMetadata, Coordinate, Feature, Geometry,
        GeometryKind,
    };

    use super::*;

    fn schema() -> AttributeSchema {
        AttributeSchema::from_json_schema(&serde_json::json!({
            "properties": {
                "hedge_type": {"type": "string", "title": "Hedge type"},
                "height": {"type": "integer"},
                "notes": {"type": "object"}
            }
        }))
    }

    fn hedge(id: &str, hedge_type: &str, obs_txt: &str) -> Feature {
        Feature::new(
            id,
            Geometry::LineString(vec![
                Coordinate::new(4.0, 50.0),
                Coordinate::new(4.001, 50.0),
                Coordinate::new(4.002, 50.0),
            ]),
        )
        .with_attribute("obs_txt", obs_txt)
        .with_attribute(
            "merged_visits",
            AttributeValue::from(serde_json::json!({ "hedge_type": hedge_type, "height": 2 })),
        )
    }

    fn hedges() -> FeatureCollection {
        FeatureCollection {
            features: vec![
                hedge("1", "mixed", "import"),
                hedge("2", "hawthorn", "anna"),
                hedge("3", "mixed", "anna"),
            ],
            metadata: CollectionMetadata {
                program_id: Some(5),
                title: Some("Hedges".to_string()),
                geometry_kind: Some(GeometryKind::LineString),
                schema: schema(),
            },
        }
    }

    fn program(id: i64) -> Program {
        Program {
            id,
            title: format!("Program {id}"),
            geometry_kind: GeometryKind::LineString,
        }
    }

    #[test]
    fn plans_pie_and_histogram_charts() {
        let charts = chart_plan(5, &schema());

        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].key, "hedge_type");
        assert_eq!(charts[0].title, "Hedge type");
        assert_eq!(charts[0].kind, ChartKind::Pie);
        assert_eq!(charts[0].element_id, "site5-graph-hedge_type");
        assert_eq!(charts[1].kind, ChartKind::Histogram);
        assert_eq!(charts[1].title, "height");
    }

    #[test]
    fn summarizes_program() {
        let sites = hedges();
        let program = Program::from_metadata(&sites.metadata).unwrap();
        let summary = summarize_program(&program, &sites).unwrap();

        assert_eq!(summary.title, "Hedges");
        assert_eq!(summary.program_id, 5);
        assert_eq!(summary.imported_count, 1);
        assert_eq!(summary.keys, vec!["hedge_type", "height", "notes"]);
        assert_eq!(
            summary.count_by_key.get("hedge_type"),
            Some(&vec![
                AttributeCount::new("mixed", 2),
                AttributeCount::new("hawthorn", 1),
            ])
        );
        assert!(!summary.count_by_key.contains_key("height"));

        // Three hedges of ~143 m each at this latitude.
        assert!((summary.line_length_km - 0.429).abs() < 0.01);
        assert!(summary.area_hectares.abs() < f64::EPSILON);
    }

    #[test]
    fn skips_programs_without_sites() {
        assert_eq!(summarize_program(&program(1), &FeatureCollection::default()), None);
    }

    #[test]
    fn orders_summaries_by_program_id() {
        let sites = hedges();
        let empty = FeatureCollection::default();
        let (p9, p2, p4) = (program(9), program(2), program(4));

        let summaries = summarize_programs([(&p9, &sites), (&p2, &sites), (&p4, &empty)]);

        let ids: Vec<i64> = summaries.iter().map(|s| s.program_id).collect();
        assert_eq!(ids, vec![2, 9]);
    }

    #[test]
    fn charts_follow_form_order() {
        let form: serde_json::Value = serde_json::from_str(
            r#"{"properties": {"zone": {"type": "string"}, "age": {"type": "integer"}}}"#,
        )
        .unwrap();

        let keys: Vec<String> = chart_plan(2, &AttributeSchema::from_json_schema(&form))
            .into_iter()
            .map(|chart| chart.key)
            .collect();
        assert_eq!(keys, vec!["zone", "age"]);
    }

    #[test]
    fn unlabelled_fields_use_key_as_title() {
        let schema = AttributeSchema {
            fields: vec![AttributeField {
                key: "species".to_string(),
                title: None,
                attribute_type: AttributeType::String,
            }],
        };
        assert_eq!(chart_plan(1, &schema)[0].title, "species");
    }
}

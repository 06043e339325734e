#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tools for the observation map.
//!
//! ```text
//! citizen_map summary <sites.geojson>... [--id-property id_site]
//! citizen_map draw <script.json> [--kind polygon] [--program area.geojson] [--config map.toml]
//! citizen_map config [--config map.toml]
//! ```
//!
//! Set `RUST_LOG=debug` to follow drawing state transitions.

mod replay;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use citizen_map_dashboard::{Program, summarize_programs};
use citizen_map_drawing::{AreaBounds, DrawingSession, MapConfig, Unbounded};
use citizen_map_geodesy::{geometry_area, geometry_length};
use citizen_map_geometry::convert::{ImportOptions, collection_to_geojson, read_feature_collection};
use citizen_map_geometry::{ObservationDraft, ProgramArea, marker_anchor};
use citizen_map_geometry_models::{Feature, FeatureCollection, Geometry, GeometryKind};

use crate::replay::{Script, replay};

#[derive(Parser)]
#[command(name = "citizen_map", about = "Observation map tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print dashboard summaries of program site collections as JSON
    Summary {
        /// `GeoJSON` `FeatureCollection` files, one per program
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Property holding the feature id when `GeoJSON` ids are absent
        #[arg(long, default_value = "id_site")]
        id_property: String,
    },
    /// Replay a pointer script and print the committed geometries
    Draw {
        /// JSON pointer script
        script: PathBuf,
        /// Geometry kind to draw (defaults to the program's kind, else point)
        #[arg(long)]
        kind: Option<GeometryKind>,
        /// Program area `GeoJSON`; new points must fall inside its bounds
        #[arg(long)]
        program: Option<PathBuf>,
        /// Map configuration TOML
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Geojson)]
        format: OutputFormat,
    },
    /// Print the effective map configuration as TOML
    Config {
        /// Map configuration TOML to validate and print
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// A `GeoJSON` `FeatureCollection`
    Geojson,
    /// Observation submission payloads
    Observation,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { paths, id_property } => summary(&paths, &id_property)?,
        Commands::Draw {
            script,
            kind,
            program,
            config,
            format,
        } => {
            let config = load_config(config.as_deref())?;
            let script = Script::load(&script)?;

            let (program_id, committed) = if let Some(path) = program {
                let sites = read_feature_collection(&path, &ImportOptions::default())?;
                let area = ProgramArea::from_collection(&sites);
                let kind = kind.unwrap_or_else(|| area.geometry_kind());
                let program_id = area.program_id();
                let session = DrawingSession::new(kind, config, area);
                (program_id, draw(session, &script))
            } else {
                let kind = kind.unwrap_or(GeometryKind::Point);
                (None, draw(DrawingSession::new(kind, config, Unbounded), &script))
            };

            print_committed(program_id, committed, format)?;
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", toml::to_string(&config)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<MapConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    })
}

fn summary(paths: &[PathBuf], id_property: &str) -> Result<(), Box<dyn std::error::Error>> {
    let options = ImportOptions::with_id_property(id_property);
    let mut programs: Vec<(Program, FeatureCollection)> = Vec::with_capacity(paths.len());

    for path in paths {
        let sites = read_feature_collection(path, &options)?;
        let Some(program) = Program::from_metadata(&sites.metadata) else {
            log::warn!("{} does not name its program, skipping", path.display());
            continue;
        };
        log::info!(
            "Loaded {} sites for program {} from {}",
            sites.len(),
            program.id,
            path.display()
        );
        programs.push((program, sites));
    }

    let summaries = summarize_programs(programs.iter().map(|(p, s)| (p, s)));
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}

fn draw<B: AreaBounds>(mut session: DrawingSession<B>, script: &Script) -> Vec<Geometry> {
    log::info!(
        "Replaying {} steps drawing {}",
        script.steps.len(),
        session.kind()
    );

    let result = replay(&mut session, script);

    for geometry in &result.committed {
        log::info!(
            "Committed {} anchored at {:?}: {:.1} m long, {:.1} m2",
            geometry.kind(),
            marker_anchor(geometry),
            geometry_length(geometry),
            geometry_area(geometry)
        );
    }
    if result.rejected_clicks > 0 {
        log::info!("{} clicks rejected at low zoom", result.rejected_clicks);
    }

    result.committed
}

fn print_committed(
    program_id: Option<i64>,
    committed: Vec<Geometry>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = match format {
        OutputFormat::Geojson => {
            let features = committed
                .into_iter()
                .enumerate()
                .map(|(i, geometry)| Feature::new(format!("drawn-{i}"), geometry))
                .collect();
            serde_json::to_string_pretty(&collection_to_geojson(&FeatureCollection::new(features)))?
        }
        OutputFormat::Observation => {
            let program_id = program_id.ok_or("observation output needs a --program with an id")?;
            let drafts: Vec<ObservationDraft> = committed
                .into_iter()
                .map(|geometry| ObservationDraft::new(program_id, geometry))
                .collect();
            serde_json::to_string_pretty(&drafts)?
        }
    };

    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_draw_kind_case_insensitively() {
        let cli = Cli::try_parse_from(["citizen_map", "draw", "gesture.json", "--kind", "POLYGON"])
            .unwrap();

        let Commands::Draw { kind, format, .. } = cli.command else {
            panic!("expected the draw command");
        };
        assert_eq!(kind, Some(GeometryKind::Polygon));
        assert!(matches!(format, OutputFormat::Geojson));
    }

    #[test]
    fn rejects_unknown_draw_kind() {
        assert!(
            Cli::try_parse_from(["citizen_map", "draw", "gesture.json", "--kind", "circle"])
                .is_err()
        );
    }
}

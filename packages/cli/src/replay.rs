//! Replays a recorded pointer script through a [`DrawingSession`].
//!
//! A script is a JSON document:
//!
//! ```json
//! {
//!   "zoom": 17,
//!   "steps": [
//!     {"action": "click", "screen": [100, 100], "coord": [5.0, 50.0]},
//!     {"action": "move", "screen": [150, 120], "coord": [5.05, 50.02]},
//!     {"action": "wait", "ms": 250},
//!     {"action": "zoom", "level": 12},
//!     {"action": "finish"}
//!   ]
//! }
//! ```

use std::path::Path;

use citizen_map_drawing::{AreaBounds, DrawingOutput, DrawingSession, MapView, PointerEvent};
use citizen_map_geometry_models::{Coordinate, Geometry, ScreenPoint};
use serde::Deserialize;

const fn default_zoom() -> f64 {
    18.0
}

/// A recorded drawing gesture.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Zoom level at the start of the replay.
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    pub steps: Vec<Step>,
}

impl Script {
    /// Reads a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid script.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Move {
        screen: ScreenPoint,
        coord: Coordinate,
    },
    Click {
        screen: ScreenPoint,
        coord: Coordinate,
    },
    /// Changes the map zoom level.
    Zoom { level: f64 },
    /// Advances the clock.
    Wait { ms: u64 },
    /// Submits the working point.
    Finish,
}

/// Outcome of a replay.
#[derive(Debug, Default)]
pub struct Replay {
    /// Geometries committed, in order.
    pub committed: Vec<Geometry>,
    /// Clicks rejected for being zoomed out too far.
    pub rejected_clicks: usize,
}

/// Feeds every step of `script` to `session`.
pub fn replay<B: AreaBounds>(session: &mut DrawingSession<B>, script: &Script) -> Replay {
    let mut view = MapView {
        zoom: script.zoom,
        now_ms: 0,
    };
    let mut result = Replay::default();

    for step in &script.steps {
        let event = match *step {
            Step::Move { screen, coord } => PointerEvent::Move { screen, coord },
            Step::Click { screen, coord } => PointerEvent::Click { screen, coord },
            Step::Zoom { level } => {
                view.zoom = level;
                continue;
            }
            Step::Wait { ms } => {
                view.now_ms = view.now_ms.saturating_add(ms);
                continue;
            }
            Step::Finish => {
                if session.finish().is_some()
                    && let Some(geometry) = session.take_committed()
                {
                    result.committed.push(geometry);
                }
                continue;
            }
        };

        for output in session.handle(event, view) {
            match output {
                DrawingOutput::Committed(geometry) => result.committed.push(geometry),
                DrawingOutput::ZoomWarning { until_ms } => {
                    log::warn!("Zoom in to draw (warning shown until {until_ms} ms)");
                    result.rejected_clicks += 1;
                }
                other => log::trace!("{other:?}"),
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use citizen_map_drawing::{MapConfig, Unbounded};
    use citizen_map_geometry_models::GeometryKind;

    use super::*;

    fn script(json: serde_json::Value) -> Script {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn replays_polygon_with_rejected_click() {
        let script = script(serde_json::json!({
            "zoom": 12,
            "steps": [
                {"action": "click", "screen": [100, 100], "coord": [5.0, 50.0]},
                {"action": "zoom", "level": 17},
                {"action": "click", "screen": [100, 100], "coord": [5.0, 50.0]},
                {"action": "move", "screen": [150, 100], "coord": [5.05, 50.0]},
                {"action": "click", "screen": [200, 100], "coord": [5.1, 50.0]},
                {"action": "click", "screen": [150, 250], "coord": [5.05, 49.9]},
                {"action": "wait", "ms": 100},
                {"action": "click", "screen": [101, 100], "coord": [5.0, 50.0]}
            ]
        }));
        let mut session = DrawingSession::new(GeometryKind::Polygon, MapConfig::default(), Unbounded);

        let result = replay(&mut session, &script);

        assert_eq!(result.rejected_clicks, 1);
        assert_eq!(result.committed.len(), 1);
        assert_eq!(result.committed[0].vertex_count(), 3);
    }

    #[test]
    fn finish_submits_point() {
        let script = script(serde_json::json!({
            "steps": [
                {"action": "click", "screen": [0, 0], "coord": [5.0, 50.0]},
                {"action": "click", "screen": [9, 9], "coord": [5.2, 50.2]},
                {"action": "finish"}
            ]
        }));
        let mut session = DrawingSession::new(GeometryKind::Point, MapConfig::default(), Unbounded);

        let result = replay(&mut session, &script);

        assert_eq!(
            result.committed,
            vec![Geometry::Point(Coordinate::new(5.2, 50.2))]
        );
    }

    #[test]
    fn rejects_unknown_actions() {
        let parsed: Result<Script, _> =
            serde_json::from_value(serde_json::json!({"steps": [{"action": "jump"}]}));
        assert!(parsed.is_err());
    }
}

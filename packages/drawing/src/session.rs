//! Capture of a single geometry from map pointer events.
//!
//! [`transition`] is the whole state machine: it takes the current
//! [`DrawingState`] and one [`PointerEvent`] and returns the next state
//! plus the [`DrawingOutput`]s the map layer should render or forward.
//! [`DrawingSession`] owns a state and feeds events through it.

use citizen_map_geometry::ProgramArea;
use citizen_map_geometry_models::{Coordinate, Geometry, GeometryKind, ScreenPoint};

use crate::config::MapConfig;
use crate::snap::is_snapped_within;
use crate::warning::ZoomWarning;

/// Decides whether a new point may be placed at a coordinate.
pub trait AreaBounds {
    fn contains(&self, coord: Coordinate) -> bool;
}

impl AreaBounds for ProgramArea {
    fn contains(&self, coord: Coordinate) -> bool {
        Self::contains(self, coord)
    }
}

impl<T: AreaBounds + ?Sized> AreaBounds for &T {
    fn contains(&self, coord: Coordinate) -> bool {
        (**self).contains(coord)
    }
}

/// Accepts every coordinate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl AreaBounds for Unbounded {
    fn contains(&self, _coord: Coordinate) -> bool {
        true
    }
}

/// A pointer event from the map, in screen and geographic space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move {
        screen: ScreenPoint,
        coord: Coordinate,
    },
    Click {
        screen: ScreenPoint,
        coord: Coordinate,
    },
}

/// Map view state sampled when an event arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub zoom: f64,
    /// Monotonic clock, in milliseconds.
    pub now_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawingState {
    Idle,
    /// A marker is placed but not yet submitted.
    CapturingPoint { position: Coordinate },
    CapturingLine {
        vertices: Vec<Coordinate>,
        /// Screen position of the latest appended vertex, for the snap
        /// test. `None` until the line has a second vertex.
        previous_click: Option<ScreenPoint>,
    },
    CapturingPolygon {
        vertices: Vec<Coordinate>,
        /// Screen position of the first click; snapping to it closes the ring.
        anchor: ScreenPoint,
    },
    /// A finished geometry waiting to be collected.
    Committed { geometry: Geometry },
}

impl DrawingState {
    /// Vertices of the shape being drawn.
    #[must_use]
    pub fn pending_vertices(&self) -> &[Coordinate] {
        match self {
            Self::CapturingPoint { position } => std::slice::from_ref(position),
            Self::CapturingLine { vertices, .. } | Self::CapturingPolygon { vertices, .. } => {
                vertices
            }
            Self::Idle | Self::Committed { .. } => &[],
        }
    }
}

/// Something the map layer should act on after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingOutput {
    /// Every click, accepted or not, is forwarded as-is.
    RawClick(Coordinate),
    /// The point marker moved here.
    Placed(Coordinate),
    VertexAdded {
        coord: Coordinate,
        vertex_count: usize,
    },
    /// Dashed preview from the shape to the pointer. Empty clears it.
    RubberBand(Vec<Coordinate>),
    /// A shape was closed by snapping.
    Committed(Geometry),
    /// The click was rejected for zoom; show the warning until `until_ms`.
    ZoomWarning { until_ms: u64 },
}

/// Everything a transition needs besides the state and the event.
#[derive(Clone, Copy)]
pub struct TransitionContext<'a> {
    pub kind: GeometryKind,
    pub view: MapView,
    pub config: &'a MapConfig,
    pub bounds: &'a dyn AreaBounds,
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: DrawingState,
    pub outputs: Vec<DrawingOutput>,
}

impl Transition {
    const fn new(state: DrawingState, outputs: Vec<DrawingOutput>) -> Self {
        Self { state, outputs }
    }
}

/// Applies one pointer event to a drawing state.
#[must_use]
pub fn transition(
    state: DrawingState,
    event: PointerEvent,
    ctx: &TransitionContext<'_>,
) -> Transition {
    match event {
        PointerEvent::Move { coord, .. } => on_move(state, coord),
        PointerEvent::Click { screen, coord } => on_click(state, screen, coord, ctx),
    }
}

fn on_move(state: DrawingState, pointer: Coordinate) -> Transition {
    let band = match &state {
        DrawingState::CapturingLine { vertices, .. } => {
            vertices.last().map(|last| vec![*last, pointer])
        }
        DrawingState::CapturingPolygon { vertices, .. } => {
            match (vertices.first(), vertices.last()) {
                (Some(first), Some(last)) => Some(vec![*first, pointer, *last]),
                _ => None,
            }
        }
        _ => None,
    };

    let outputs = band.map(DrawingOutput::RubberBand).into_iter().collect();
    Transition::new(state, outputs)
}

fn on_click(
    state: DrawingState,
    screen: ScreenPoint,
    coord: Coordinate,
    ctx: &TransitionContext<'_>,
) -> Transition {
    let mut outputs = vec![DrawingOutput::RawClick(coord)];

    if ctx.view.zoom < ctx.config.min_capture_zoom {
        log::debug!(
            "Ignoring click at zoom {} (minimum {})",
            ctx.view.zoom,
            ctx.config.min_capture_zoom
        );
        outputs.push(DrawingOutput::ZoomWarning {
            until_ms: ctx
                .view
                .now_ms
                .saturating_add(ctx.config.zoom_warning_timeout_ms),
        });
        return Transition::new(state, outputs);
    }

    let state = match ctx.kind {
        GeometryKind::Point => click_point(state, coord, ctx.bounds, &mut outputs),
        GeometryKind::LineString => {
            outputs.push(DrawingOutput::RubberBand(Vec::new()));
            click_line(state, screen, coord, ctx.config.snap_distance_px, &mut outputs)
        }
        GeometryKind::Polygon => {
            outputs.push(DrawingOutput::RubberBand(Vec::new()));
            click_polygon(state, screen, coord, ctx.config.snap_distance_px, &mut outputs)
        }
    };

    Transition::new(state, outputs)
}

fn click_point(
    state: DrawingState,
    coord: Coordinate,
    bounds: &dyn AreaBounds,
    outputs: &mut Vec<DrawingOutput>,
) -> DrawingState {
    if !bounds.contains(coord) {
        log::debug!("Click at {coord:?} is outside the program area");
        return state;
    }

    outputs.push(DrawingOutput::Placed(coord));
    DrawingState::CapturingPoint { position: coord }
}

fn click_line(
    state: DrawingState,
    screen: ScreenPoint,
    coord: Coordinate,
    tolerance: f64,
    outputs: &mut Vec<DrawingOutput>,
) -> DrawingState {
    match state {
        DrawingState::CapturingLine {
            vertices,
            previous_click,
        } if previous_click
            .is_some_and(|previous| is_snapped_within(previous, screen, tolerance)) =>
        {
            commit(Geometry::LineString(vertices), outputs)
        }
        DrawingState::CapturingLine { mut vertices, .. } => {
            vertices.push(coord);
            outputs.push(DrawingOutput::VertexAdded {
                coord,
                vertex_count: vertices.len(),
            });
            DrawingState::CapturingLine {
                vertices,
                previous_click: Some(screen),
            }
        }
        _ => {
            outputs.push(DrawingOutput::VertexAdded {
                coord,
                vertex_count: 1,
            });
            DrawingState::CapturingLine {
                vertices: vec![coord],
                previous_click: None,
            }
        }
    }
}

fn click_polygon(
    state: DrawingState,
    screen: ScreenPoint,
    coord: Coordinate,
    tolerance: f64,
    outputs: &mut Vec<DrawingOutput>,
) -> DrawingState {
    match state {
        DrawingState::CapturingPolygon { vertices, anchor }
            if is_snapped_within(anchor, screen, tolerance) =>
        {
            commit(Geometry::Polygon(vec![vertices]), outputs)
        }
        DrawingState::CapturingPolygon {
            mut vertices,
            anchor,
        } => {
            vertices.push(coord);
            outputs.push(DrawingOutput::VertexAdded {
                coord,
                vertex_count: vertices.len(),
            });
            DrawingState::CapturingPolygon { vertices, anchor }
        }
        _ => {
            outputs.push(DrawingOutput::VertexAdded {
                coord,
                vertex_count: 1,
            });
            DrawingState::CapturingPolygon {
                vertices: vec![coord],
                anchor: screen,
            }
        }
    }
}

fn commit(geometry: Geometry, outputs: &mut Vec<DrawingOutput>) -> DrawingState {
    log::debug!(
        "Committed {} with {} vertices",
        geometry.kind(),
        geometry.vertex_count()
    );
    outputs.push(DrawingOutput::Committed(geometry));
    DrawingState::Idle
}

/// One capture gesture on the map: a fixed geometry kind, the program
/// area new points must fall in, and the current drawing state.
#[derive(Debug)]
pub struct DrawingSession<B = ProgramArea> {
    kind: GeometryKind,
    state: DrawingState,
    config: MapConfig,
    bounds: B,
    warning: ZoomWarning,
}

impl DrawingSession<ProgramArea> {
    /// Starts a session drawing the program's geometry kind inside its area.
    #[must_use]
    pub fn for_program(area: ProgramArea, config: MapConfig) -> Self {
        Self::new(area.geometry_kind(), config, area)
    }
}

impl<B: AreaBounds> DrawingSession<B> {
    #[must_use]
    pub fn new(kind: GeometryKind, config: MapConfig, bounds: B) -> Self {
        let warning = ZoomWarning::new(config.zoom_warning_timeout_ms);
        Self {
            kind,
            state: DrawingState::Idle,
            config,
            bounds,
            warning,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        self.kind
    }

    #[must_use]
    pub const fn state(&self) -> &DrawingState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Whether the zoom warning is showing at `now_ms`.
    #[must_use]
    pub fn is_warning_active(&self, now_ms: u64) -> bool {
        self.warning.is_active(now_ms)
    }

    /// Feeds one pointer event through the state machine.
    pub fn handle(&mut self, event: PointerEvent, view: MapView) -> Vec<DrawingOutput> {
        let ctx = TransitionContext {
            kind: self.kind,
            view,
            config: &self.config,
            bounds: &self.bounds,
        };
        let state = std::mem::replace(&mut self.state, DrawingState::Idle);
        let Transition { state, outputs } = transition(state, event, &ctx);
        self.state = state;

        for output in &outputs {
            if let DrawingOutput::ZoomWarning { until_ms } = output {
                self.warning.extend_to(*until_ms);
            }
        }

        outputs
    }

    /// Submits the placed point, moving the session to
    /// [`DrawingState::Committed`].
    ///
    /// Lines and polygons are finished by snapping instead, so in those
    /// modes this only returns a geometry already waiting in `Committed`.
    pub fn finish(&mut self) -> Option<Geometry> {
        if let DrawingState::CapturingPoint { position } = self.state {
            let geometry = Geometry::Point(position);
            log::debug!("Submitting point at {position:?}");
            self.state = DrawingState::Committed {
                geometry: geometry.clone(),
            };
            return Some(geometry);
        }

        match &self.state {
            DrawingState::Committed { geometry } => Some(geometry.clone()),
            _ => None,
        }
    }

    /// Takes the committed geometry, returning the session to idle.
    pub fn take_committed(&mut self) -> Option<Geometry> {
        match std::mem::replace(&mut self.state, DrawingState::Idle) {
            DrawingState::Committed { geometry } => Some(geometry),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Discards any in-progress shape.
    pub fn cancel(&mut self) {
        if !matches!(self.state, DrawingState::Idle) {
            log::debug!("Discarding in-progress {}", self.kind);
        }
        self.state = DrawingState::Idle;
        self.warning.clear();
    }
}

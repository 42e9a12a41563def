//! Pointer-driven drawing sessions and the tool controller.
//!
//! A drawing session is `Idle` while its draft is `None` and `Active` while a
//! draft exists. Sessions own their preview visual; completing or disposing a
//! session always releases it.

mod circle;
mod controller;
mod ellipse;
mod line;
mod polyline;

pub use circle::CircleSession;
pub use controller::{PointerOutcome, ShapeSink, ToolController};
pub use ellipse::EllipseSession;
pub use line::LineSession;
pub use polyline::PolylineSession;

use crate::scene::{Scene, SceneError};
use kurbo::Point;
use peniko::Color;
use thiserror::Error;
use vecdraw_core::id::IdGenerator;
use vecdraw_core::input::{InputSurface, ListenerId, PointerKind};
use vecdraw_core::shapes::{Shape, ShapeKind};
use vecdraw_core::store::StoreError;

/// Depth of preview visuals, above any committed shape.
pub const PREVIEW_DEPTH: f64 = 5.0;

/// Errors from routing a pointer event.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("Store rejected shape: {0}")]
    Store(#[from] StoreError),
}

/// Colors used for live previews.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewStyle {
    /// Outline of line, ellipse and polyline previews.
    pub stroke: Color,
    /// Translucent disk under the circle preview; its opaque variant outlines it.
    pub fill: Color,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            fill: Color::from_rgba8(0, 0x77, 0xff, 77),
        }
    }
}

/// The drawing session for the active drawing tool.
#[derive(Debug)]
pub enum DrawingSession {
    Line(LineSession),
    Circle(CircleSession),
    Ellipse(EllipseSession),
    Polyline(PolylineSession),
}

impl DrawingSession {
    /// Create a session for `kind` and attach its pointer listener.
    pub fn new(kind: ShapeKind, surface: &mut InputSurface, style: PreviewStyle) -> Self {
        let kinds: &[PointerKind] = match kind {
            ShapeKind::Polyline => &[PointerKind::Down, PointerKind::Move, PointerKind::DoubleClick],
            _ => &[PointerKind::Down, PointerKind::Move, PointerKind::Up],
        };
        let listener = surface.attach(kinds);
        match kind {
            ShapeKind::Line => DrawingSession::Line(LineSession::new(listener, style)),
            ShapeKind::Circle => DrawingSession::Circle(CircleSession::new(listener, style)),
            ShapeKind::Ellipse => DrawingSession::Ellipse(EllipseSession::new(listener, style)),
            ShapeKind::Polyline => DrawingSession::Polyline(PolylineSession::new(listener, style)),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            DrawingSession::Line(_) => ShapeKind::Line,
            DrawingSession::Circle(_) => ShapeKind::Circle,
            DrawingSession::Ellipse(_) => ShapeKind::Ellipse,
            DrawingSession::Polyline(_) => ShapeKind::Polyline,
        }
    }

    /// The attached listener, or `None` once disposed.
    pub fn listener(&self) -> Option<ListenerId> {
        match self {
            DrawingSession::Line(s) => s.listener,
            DrawingSession::Circle(s) => s.listener,
            DrawingSession::Ellipse(s) => s.listener,
            DrawingSession::Polyline(s) => s.listener,
        }
    }

    /// Whether a draft is in progress.
    pub fn is_active(&self) -> bool {
        match self {
            DrawingSession::Line(s) => s.draft.is_some(),
            DrawingSession::Circle(s) => s.draft.is_some(),
            DrawingSession::Ellipse(s) => s.draft.is_some(),
            DrawingSession::Polyline(s) => s.draft.is_some(),
        }
    }

    /// Feed one pointer event, already mapped to world space.
    ///
    /// Returns the finished shape when the event completes the draft.
    pub fn handle(
        &mut self,
        kind: PointerKind,
        point: Point,
        scene: &mut Scene,
        ids: &mut IdGenerator,
    ) -> Result<Option<Shape>, SceneError> {
        match (self, kind) {
            (DrawingSession::Line(s), PointerKind::Down) => s.pointer_down(point, scene).map(|_| None),
            (DrawingSession::Line(s), PointerKind::Move) => s.pointer_move(point, scene).map(|_| None),
            (DrawingSession::Line(s), PointerKind::Up) => s.pointer_up(point, scene, ids),

            (DrawingSession::Circle(s), PointerKind::Down) => s.pointer_down(point, scene).map(|_| None),
            (DrawingSession::Circle(s), PointerKind::Move) => s.pointer_move(point, scene).map(|_| None),
            (DrawingSession::Circle(s), PointerKind::Up) => s.pointer_up(point, scene, ids),

            (DrawingSession::Ellipse(s), PointerKind::Down) => s.pointer_down(point, scene).map(|_| None),
            (DrawingSession::Ellipse(s), PointerKind::Move) => s.pointer_move(point, scene).map(|_| None),
            (DrawingSession::Ellipse(s), PointerKind::Up) => s.pointer_up(point, scene, ids),

            (DrawingSession::Polyline(s), PointerKind::Down) => s.pointer_down(point).map(|_| None),
            (DrawingSession::Polyline(s), PointerKind::Move) => s.pointer_move(point, scene).map(|_| None),
            (DrawingSession::Polyline(s), PointerKind::DoubleClick) => s.double_click(scene, ids),

            _ => Ok(None),
        }
    }

    /// Detach the listener and discard any draft, releasing its preview.
    ///
    /// Safe to call in any state, any number of times.
    pub fn dispose(&mut self, scene: &mut Scene, surface: &mut InputSurface) -> Result<(), SceneError> {
        let listener = match self {
            DrawingSession::Line(s) => s.listener.take(),
            DrawingSession::Circle(s) => s.listener.take(),
            DrawingSession::Ellipse(s) => s.listener.take(),
            DrawingSession::Polyline(s) => s.listener.take(),
        };
        if let Some(listener) = listener {
            surface.detach(listener);
        }
        match self {
            DrawingSession::Line(s) => s.cancel(scene),
            DrawingSession::Circle(s) => s.cancel(scene),
            DrawingSession::Ellipse(s) => s.cancel(scene),
            DrawingSession::Polyline(s) => s.cancel(scene),
        }
    }
}

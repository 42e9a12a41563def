//! Active tool and pointer routing.

use super::{DrawingSession, InteractionError, PreviewStyle};
use crate::hit_test::HitTester;
use crate::scene::{Scene, SceneError};
use crate::synchronizer::VisualRegistry;
use vecdraw_core::camera::{Camera, world_point};
use vecdraw_core::id::IdGenerator;
use vecdraw_core::input::{InputSurface, ListenerId, PointerEvent, PointerKind};
use vecdraw_core::shapes::{Shape, ShapeId};
use vecdraw_core::store::{ShapeStore, StoreError};
use vecdraw_core::tools::ToolKind;

/// Where finished shapes and selection changes go.
pub trait ShapeSink {
    fn add_shape(&mut self, shape: Shape) -> Result<(), StoreError>;
    fn select_shape(&mut self, id: Option<ShapeId>);
}

impl ShapeSink for ShapeStore {
    fn add_shape(&mut self, shape: Shape) -> Result<(), StoreError> {
        self.add(shape)
    }

    fn select_shape(&mut self, id: Option<ShapeId>) {
        self.select(id);
    }
}

/// Result of routing one pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// No listener wanted the event.
    Ignored,
    /// A drawing session consumed the event.
    Consumed,
    /// A drawing session finished a shape and the sink accepted it.
    Committed(ShapeId),
    /// The select tool ran a hit test.
    Selected(Option<ShapeId>),
}

/// Owns the current tool and at most one drawing session.
#[derive(Debug)]
pub struct ToolController {
    tool: ToolKind,
    session: Option<DrawingSession>,
    select_listener: Option<ListenerId>,
    hit_tester: HitTester,
    ids: IdGenerator,
    preview: PreviewStyle,
}

impl ToolController {
    /// Start with the select tool bound to `surface`.
    pub fn new(hit_tester: HitTester, preview: PreviewStyle, surface: &mut InputSurface) -> Self {
        Self {
            tool: ToolKind::Select,
            session: None,
            select_listener: Some(surface.attach(&[PointerKind::Down])),
            hit_tester,
            ids: IdGenerator::new(),
            preview,
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn session(&self) -> Option<&DrawingSession> {
        self.session.as_ref()
    }

    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Raise id counters past the ids in a freshly loaded collection.
    pub fn sync_ids(&mut self, shapes: &[Shape]) {
        self.ids.sync_with(shapes);
    }

    /// Switch tools. Selecting the current tool again does nothing.
    ///
    /// Any draft in progress is discarded without producing a shape.
    pub fn set_tool(
        &mut self,
        tool: ToolKind,
        scene: &mut Scene,
        surface: &mut InputSurface,
    ) -> Result<(), SceneError> {
        if tool == self.tool {
            return Ok(());
        }
        self.unbind(scene, surface)?;
        self.tool = tool;

        match tool.shape_kind() {
            Some(kind) => self.session = Some(DrawingSession::new(kind, surface, self.preview)),
            None => self.select_listener = Some(surface.attach(&[PointerKind::Down])),
        }
        log::info!("Tool changed to {}", tool);
        Ok(())
    }

    fn unbind(&mut self, scene: &mut Scene, surface: &mut InputSurface) -> Result<(), SceneError> {
        if let Some(mut session) = self.session.take() {
            session.dispose(scene, surface)?;
        }
        if let Some(listener) = self.select_listener.take() {
            surface.detach(listener);
        }
        Ok(())
    }

    /// Route a pointer event to the active session or to the hit tester.
    ///
    /// The event is mapped to world space here, against the camera and
    /// element rect as they are right now.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        scene: &mut Scene,
        camera: &Camera,
        surface: &InputSurface,
        registry: &VisualRegistry,
        sink: &mut impl ShapeSink,
    ) -> Result<PointerOutcome, InteractionError> {
        let kind = event.kind();

        if let Some(listener) = self.select_listener {
            if !surface.listens(listener, kind) {
                return Ok(PointerOutcome::Ignored);
            }
            let hit = self
                .hit_tester
                .pick(event.position(), surface.rect(), camera, scene, registry);
            log::debug!("Hit test at {:?}: {:?}", event.position(), hit);
            sink.select_shape(hit.clone());
            return Ok(PointerOutcome::Selected(hit));
        }

        let Some(session) = &mut self.session else {
            return Ok(PointerOutcome::Ignored);
        };
        let listening = session
            .listener()
            .is_some_and(|listener| surface.listens(listener, kind));
        if !listening {
            return Ok(PointerOutcome::Ignored);
        }
        let Some(point) = world_point(event.position(), surface.rect(), camera) else {
            log::warn!("Pointer event on a zero-sized surface ignored");
            return Ok(PointerOutcome::Ignored);
        };

        match session.handle(kind, point, scene, &mut self.ids)? {
            Some(shape) => {
                let id = shape.id.clone();
                log::info!("Committed {}", id);
                sink.add_shape(shape)?;
                Ok(PointerOutcome::Committed(id))
            }
            None => Ok(PointerOutcome::Consumed),
        }
    }

    /// Tear down: dispose the session and detach every listener.
    pub fn dispose(&mut self, scene: &mut Scene, surface: &mut InputSurface) -> Result<(), SceneError> {
        self.unbind(scene, surface)
    }
}

//! Line drawing: press at the start point, drag, release at the end point.

use super::{PREVIEW_DEPTH, PreviewStyle};
use crate::factory::line_visual;
use crate::scene::{MaterialData, NodeId, Scene, SceneError};
use kurbo::Point;
use vecdraw_core::id::IdGenerator;
use vecdraw_core::input::ListenerId;
use vecdraw_core::shapes::{Geometry, Line, Shape, ShapeKind};

#[derive(Debug)]
pub(super) struct LineDraft {
    start: Point,
    preview: NodeId,
}

#[derive(Debug)]
pub struct LineSession {
    pub(super) listener: Option<ListenerId>,
    pub(super) draft: Option<LineDraft>,
    style: PreviewStyle,
}

impl LineSession {
    pub(super) fn new(listener: ListenerId, style: PreviewStyle) -> Self {
        Self {
            listener: Some(listener),
            draft: None,
            style,
        }
    }

    pub(super) fn pointer_down(&mut self, point: Point, scene: &mut Scene) -> Result<(), SceneError> {
        // A press without a matching release leaves a stale draft behind.
        self.cancel(scene)?;
        let mut visual = line_visual(&Line::new(point, point), MaterialData::stroke(self.style.stroke));
        visual.transform.depth = PREVIEW_DEPTH;
        let preview = scene.insert(visual);
        log::debug!("Line draft started at {:?}", point);
        self.draft = Some(LineDraft { start: point, preview });
        Ok(())
    }

    pub(super) fn pointer_move(&mut self, point: Point, scene: &mut Scene) -> Result<(), SceneError> {
        let Some(draft) = &self.draft else {
            return Ok(());
        };
        scene.replace_vertices(draft.preview, vec![draft.start, point])
    }

    pub(super) fn pointer_up(
        &mut self,
        point: Point,
        scene: &mut Scene,
        ids: &mut IdGenerator,
    ) -> Result<Option<Shape>, SceneError> {
        let Some(draft) = self.draft.take() else {
            return Ok(None);
        };
        scene.dispose(draft.preview)?;
        let shape = Shape::new(
            ids.next(ShapeKind::Line),
            Geometry::Line(Line::new(draft.start, point)),
        );
        Ok(Some(shape))
    }

    pub(super) fn cancel(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        match self.draft.take() {
            Some(draft) => scene.dispose(draft.preview),
            None => Ok(()),
        }
    }
}

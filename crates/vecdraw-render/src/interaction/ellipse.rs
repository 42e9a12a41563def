//! Ellipse drawing: press at the center, drag to a corner of the bounding box.

use super::{PREVIEW_DEPTH, PreviewStyle};
use crate::factory::unit_disk;
use crate::scene::{MaterialData, NodeId, Scene, SceneError, Transform, Visual};
use kurbo::{Point, Vec2};
use vecdraw_core::id::IdGenerator;
use vecdraw_core::input::ListenerId;
use vecdraw_core::shapes::{Ellipse, Geometry, Shape, ShapeKind};

#[derive(Debug)]
pub(super) struct EllipseDraft {
    center: Point,
    preview: NodeId,
}

#[derive(Debug)]
pub struct EllipseSession {
    pub(super) listener: Option<ListenerId>,
    pub(super) draft: Option<EllipseDraft>,
    style: PreviewStyle,
}

impl EllipseSession {
    pub(super) fn new(listener: ListenerId, style: PreviewStyle) -> Self {
        Self {
            listener: Some(listener),
            draft: None,
            style,
        }
    }

    pub(super) fn pointer_down(&mut self, point: Point, scene: &mut Scene) -> Result<(), SceneError> {
        self.cancel(scene)?;
        let preview = scene.insert(
            Visual::mesh(unit_disk(), MaterialData::wireframe(self.style.stroke)).with_transform(
                Transform {
                    translation: point.to_vec2(),
                    scale: Vec2::ZERO,
                    depth: PREVIEW_DEPTH,
                },
            ),
        );
        log::debug!("Ellipse draft started at {:?}", point);
        self.draft = Some(EllipseDraft {
            center: point,
            preview,
        });
        Ok(())
    }

    /// Rescale the unit disk preview; no geometry is reallocated.
    pub(super) fn pointer_move(&mut self, point: Point, scene: &mut Scene) -> Result<(), SceneError> {
        let Some(draft) = &self.draft else {
            return Ok(());
        };
        let e = Ellipse::from_center_corner(draft.center, point);
        scene.set_scale(draft.preview, Vec2::new(e.radius_x, e.radius_y))
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
            ids.next(ShapeKind::Ellipse),
            Geometry::Ellipse(Ellipse::from_center_corner(draft.center, point)),
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

//! Circle drawing: press at the center, drag to set the radius.

use super::{PREVIEW_DEPTH, PreviewStyle};
use crate::factory::{circle_outline, disk};
use crate::scene::{GeometryData, MaterialData, NodeId, Scene, SceneError, Transform, Visual};
use kurbo::Point;
use vecdraw_core::id::IdGenerator;
use vecdraw_core::input::ListenerId;
use vecdraw_core::shapes::{Circle, Geometry, Shape, ShapeKind};

#[derive(Debug)]
pub(super) struct CircleDraft {
    center: Point,
    preview: NodeId,
}

#[derive(Debug)]
pub struct CircleSession {
    pub(super) listener: Option<ListenerId>,
    pub(super) draft: Option<CircleDraft>,
    style: PreviewStyle,
}

impl CircleSession {
    pub(super) fn new(listener: ListenerId, style: PreviewStyle) -> Self {
        Self {
            listener: Some(listener),
            draft: None,
            style,
        }
    }

    /// Start a draft with a zero-radius preview at the press point.
    pub(super) fn pointer_down(&mut self, point: Point, scene: &mut Scene) -> Result<(), SceneError> {
        self.cancel(scene)?;
        log::debug!("Circle draft started at {:?}", point);
        let preview = scene.insert(self.preview(point, 0.0));
        self.draft = Some(CircleDraft {
            center: point,
            preview,
        });
        Ok(())
    }

    /// Rebuild the preview for the new radius.
    pub(super) fn pointer_move(&mut self, point: Point, scene: &mut Scene) -> Result<(), SceneError> {
        let Some(draft) = &self.draft else {
            return Ok(());
        };
        let (center, old) = (draft.center, draft.preview);
        let preview = scene.insert(self.preview(center, center.distance(point)));
        scene.dispose(old)?;
        if let Some(draft) = &mut self.draft {
            draft.preview = preview;
        }
        Ok(())
    }

    /// Translucent disk plus opaque outline.
    fn preview(&self, center: Point, radius: f64) -> Visual {
        Visual::group(vec![
            Visual::mesh(disk(radius), MaterialData::fill(self.style.fill)),
            Visual::mesh(
                GeometryData::line_loop(circle_outline(radius)),
                MaterialData::stroke(self.style.fill.with_alpha(1.0)),
            ),
        ])
        .with_transform(Transform {
            depth: PREVIEW_DEPTH,
            ..Transform::translated(center.to_vec2())
        })
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
            ids.next(ShapeKind::Circle),
            Geometry::Circle(Circle::through(draft.center, point)),
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

#[cfg(test)]
mod tests {
    use super::*;
    use vecdraw_core::input::{InputSurface, PointerKind};

    fn session() -> CircleSession {
        let mut surface = InputSurface::default();
        let listener = surface.attach(&[PointerKind::Down]);
        CircleSession::new(listener, PreviewStyle::default())
    }

    #[test]
    fn test_each_move_rebuilds_preview_group() {
        let mut scene = Scene::new();
        let mut circle = session();
        circle.pointer_down(Point::new(1.0, 1.0), &mut scene).unwrap();
        // group + fill + outline
        assert_eq!(scene.node_count(), 3);

        circle.pointer_move(Point::new(4.0, 5.0), &mut scene).unwrap();
        circle.pointer_move(Point::new(1.0, 3.0), &mut scene).unwrap();
        assert_eq!(scene.node_count(), 3);
        assert_eq!(scene.live_geometries(), 2);
        assert_eq!(scene.stats().geometries_released, 4);
    }

    #[test]
    fn test_press_shows_zero_radius_preview() {
        let mut scene = Scene::new();
        let mut circle = session();
        circle.pointer_down(Point::new(2.0, 3.0), &mut scene).unwrap();

        let group = circle.draft.as_ref().unwrap().preview;
        assert!(scene.is_displayed(group));
        assert!((scene.world_depth(group) - PREVIEW_DEPTH).abs() < 1e-12);
        let outline = scene.node(group).unwrap().children()[1];
        let (geometry, _) = scene.mesh(outline).unwrap();
        assert!(geometry.vertices.iter().all(|v| *v == Point::ZERO));

        circle.cancel(&mut scene).unwrap();
        assert_eq!(scene.node_count(), 0);
        assert_eq!(scene.live_materials(), 0);
    }

    #[test]
    fn test_radius_is_distance_to_release_point() {
        let mut scene = Scene::new();
        let mut ids = IdGenerator::new();
        let mut circle = session();
        circle.pointer_down(Point::new(0.0, 0.0), &mut scene).unwrap();
        circle.pointer_move(Point::new(1.0, 1.0), &mut scene).unwrap();
        let shape = circle
            .pointer_up(Point::new(3.0, 4.0), &mut scene, &mut ids)
            .unwrap()
            .unwrap();
        let Geometry::Circle(c) = shape.geometry else {
            panic!("expected a circle");
        };
        assert!((c.radius - 5.0).abs() < f64::EPSILON);
        assert_eq!(scene.live_geometries(), 0);
    }
}

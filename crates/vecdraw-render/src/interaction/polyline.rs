//! Polyline drawing: each press adds a vertex, a double click finishes.

use super::{PREVIEW_DEPTH, PreviewStyle};
use crate::factory::polyline_visual;
use crate::scene::{MaterialData, NodeId, Scene, SceneError};
use kurbo::Point;
use vecdraw_core::id::IdGenerator;
use vecdraw_core::input::ListenerId;
use vecdraw_core::shapes::{Geometry, Polyline, Shape, ShapeKind};

#[derive(Debug, Default)]
pub(super) struct PolylineDraft {
    points: Vec<Point>,
    preview: Option<NodeId>,
}

#[derive(Debug)]
pub struct PolylineSession {
    pub(super) listener: Option<ListenerId>,
    pub(super) draft: Option<PolylineDraft>,
    style: PreviewStyle,
}

impl PolylineSession {
    pub(super) fn new(listener: ListenerId, style: PreviewStyle) -> Self {
        Self {
            listener: Some(listener),
            draft: None,
            style,
        }
    }

    /// Committed vertices of the draft, if one is in progress.
    pub fn points(&self) -> Option<&[Point]> {
        self.draft.as_ref().map(|d| d.points.as_slice())
    }

    pub(super) fn pointer_down(&mut self, point: Point) -> Result<(), SceneError> {
        let draft = self.draft.get_or_insert_with(|| {
            log::debug!("Polyline draft started at {:?}", point);
            PolylineDraft::default()
        });
        draft.points.push(point);
        Ok(())
    }

    /// Redraw the preview through all committed vertices and the cursor.
    pub(super) fn pointer_move(&mut self, point: Point, scene: &mut Scene) -> Result<(), SceneError> {
        let Some(draft) = &mut self.draft else {
            return Ok(());
        };
        if let Some(old) = draft.preview.take() {
            scene.dispose(old)?;
        }
        let mut path = draft.points.clone();
        path.push(point);
        let mut visual = polyline_visual(&Polyline::new(path), MaterialData::stroke(self.style.stroke));
        visual.transform.depth = PREVIEW_DEPTH;
        draft.preview = Some(scene.insert(visual));
        Ok(())
    }

    /// Finish the polyline.
    ///
    /// The press that belongs to the double click added a duplicate vertex,
    /// which is always dropped. With fewer than two vertices left nothing is
    /// committed and drawing continues from the remaining vertex.
    pub(super) fn double_click(
        &mut self,
        scene: &mut Scene,
        ids: &mut IdGenerator,
    ) -> Result<Option<Shape>, SceneError> {
        let Some(mut draft) = self.draft.take() else {
            return Ok(None);
        };
        draft.points.pop();
        if draft.points.len() < Polyline::MIN_POINTS {
            log::debug!("Polyline double click before {} vertices, still drawing", Polyline::MIN_POINTS);
            if draft.points.is_empty() {
                if let Some(preview) = draft.preview {
                    scene.dispose(preview)?;
                }
            } else {
                self.draft = Some(draft);
            }
            return Ok(None);
        }
        if let Some(preview) = draft.preview {
            scene.dispose(preview)?;
        }
        let shape = Shape::new(
            ids.next(ShapeKind::Polyline),
            Geometry::Polyline(Polyline::new(draft.points)),
        );
        Ok(Some(shape))
    }

    pub(super) fn cancel(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        match self.draft.take().and_then(|d| d.preview) {
            Some(preview) => scene.dispose(preview),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecdraw_core::input::{InputSurface, PointerKind};

    fn session() -> PolylineSession {
        let mut surface = InputSurface::default();
        let listener = surface.attach(&[PointerKind::Down]);
        PolylineSession::new(listener, PreviewStyle::default())
    }

    #[test]
    fn test_double_click_drops_duplicate_vertex() {
        let mut scene = Scene::new();
        let mut ids = IdGenerator::new();
        let mut poly = session();
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)] {
            poly.pointer_down(Point::new(x, y)).unwrap();
            poly.pointer_move(Point::new(x + 1.0, y), &mut scene).unwrap();
        }
        // the double click's own press
        poly.pointer_down(Point::new(10.0, 10.0)).unwrap();

        let shape = poly.double_click(&mut scene, &mut ids).unwrap().unwrap();
        let Geometry::Polyline(p) = shape.geometry else {
            panic!("expected a polyline");
        };
        assert_eq!(
            p.points,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)]
        );
        assert!(poly.points().is_none());
        assert_eq!(scene.live_geometries(), 0);
    }

    #[test]
    fn test_double_click_with_one_point_keeps_drawing() {
        let mut scene = Scene::new();
        let mut ids = IdGenerator::new();
        let mut poly = session();
        poly.pointer_down(Point::new(0.0, 0.0)).unwrap();
        poly.pointer_down(Point::new(0.0, 0.0)).unwrap();

        assert!(poly.double_click(&mut scene, &mut ids).unwrap().is_none());
        assert_eq!(poly.points(), Some(&[Point::new(0.0, 0.0)][..]));
        assert_eq!(ids.current(ShapeKind::Polyline), 0);
    }

    #[test]
    fn test_drawing_continues_after_early_double_click() {
        let mut scene = Scene::new();
        let mut ids = IdGenerator::new();
        let mut poly = session();
        poly.pointer_down(Point::new(0.0, 0.0)).unwrap();
        poly.pointer_down(Point::new(0.0, 0.0)).unwrap();
        assert!(poly.double_click(&mut scene, &mut ids).unwrap().is_none());

        poly.pointer_down(Point::new(5.0, 0.0)).unwrap();
        poly.pointer_down(Point::new(5.0, 5.0)).unwrap();
        poly.pointer_move(Point::new(6.0, 5.0), &mut scene).unwrap();
        poly.pointer_down(Point::new(5.0, 5.0)).unwrap();

        let shape = poly.double_click(&mut scene, &mut ids).unwrap().unwrap();
        let Geometry::Polyline(p) = shape.geometry else {
            panic!("expected a polyline");
        };
        assert_eq!(
            p.points,
            vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)]
        );
        assert_eq!(shape.id, "Polyline-1");
        assert_eq!(scene.live_geometries(), 0);
    }

    #[test]
    fn test_double_click_on_lone_press_clears_draft() {
        let mut scene = Scene::new();
        let mut ids = IdGenerator::new();
        let mut poly = session();
        poly.pointer_down(Point::new(3.0, 3.0)).unwrap();
        poly.pointer_move(Point::new(4.0, 3.0), &mut scene).unwrap();

        assert!(poly.double_click(&mut scene, &mut ids).unwrap().is_none());
        assert!(poly.points().is_none());
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn test_double_click_when_idle_is_noop() {
        let mut scene = Scene::new();
        let mut ids = IdGenerator::new();
        let mut poly = session();
        assert!(poly.double_click(&mut scene, &mut ids).unwrap().is_none());
    }

    #[test]
    fn test_preview_includes_cursor() {
        let mut scene = Scene::new();
        let mut poly = session();
        poly.pointer_down(Point::new(0.0, 0.0)).unwrap();
        poly.pointer_down(Point::new(5.0, 0.0)).unwrap();
        poly.pointer_move(Point::new(5.0, 5.0), &mut scene).unwrap();

        let preview = poly.draft.as_ref().unwrap().preview.unwrap();
        let (geometry, _) = scene.mesh(preview).unwrap();
        assert_eq!(geometry.vertices.len(), 3);
        assert_eq!(geometry.vertices[2], Point::new(5.0, 5.0));
    }
}

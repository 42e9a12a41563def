//! Picking shapes under the pointer.

use crate::scene::{MaterialKind, NodeId, Scene, Topology};
use crate::synchronizer::VisualRegistry;
use kurbo::{Line, ParamCurveNearest, Point};
use std::cmp::Ordering;
use vecdraw_core::camera::{Camera, Ray, SurfaceRect, screen_to_ndc};
use vecdraw_core::shapes::ShapeId;

/// One intersected scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    /// Distance from the camera along the ray.
    pub distance: f64,
}

/// Casts rays from the camera into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTester {
    /// Maximum distance (world units) between the ray and a stroke.
    pub tolerance: f64,
}

impl Default for HitTester {
    fn default() -> Self {
        Self { tolerance: 3.0 }
    }
}

impl HitTester {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Id of the nearest registered shape under a client-space point.
    pub fn pick(
        &self,
        client: Point,
        rect: &SurfaceRect,
        camera: &Camera,
        scene: &Scene,
        registry: &VisualRegistry,
    ) -> Option<ShapeId> {
        let ndc = screen_to_ndc(client, rect)?;
        let ray = camera.ray(ndc);
        let hits = self.intersect(&ray, scene, registry.nodes());
        let nearest = hits.first()?;
        resolve(nearest.node, scene, registry)
    }

    /// All nodes under the ray within the given subtrees, nearest first.
    ///
    /// Hidden nodes and their children are skipped. Equal distances put the
    /// most recently inserted node first.
    pub fn intersect(
        &self,
        ray: &Ray,
        scene: &Scene,
        roots: impl IntoIterator<Item = NodeId>,
    ) -> Vec<Hit> {
        let mut hits = Vec::new();
        for root in roots {
            for node in scene.descendants(root) {
                if !scene.is_displayed(node) {
                    continue;
                }
                if self.hits_node(ray.origin, node, scene) {
                    hits.push(Hit {
                        node,
                        distance: ray.distance_to(scene.world_depth(node)),
                    });
                }
            }
        }
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.node.cmp(&a.node))
        });
        hits
    }

    fn hits_node(&self, point: Point, node: NodeId, scene: &Scene) -> bool {
        let Some((geometry, material)) = scene.mesh(node) else {
            return false;
        };
        let transform = scene.world_transform(node);
        let vertices: Vec<Point> = geometry.vertices.iter().map(|v| transform * *v).collect();

        match (&geometry.topology, material.kind) {
            (Topology::Triangles(triangles), _) => triangles.iter().any(|t| {
                let get = |i: u32| vertices.get(i as usize).copied();
                match (get(t[0]), get(t[1]), get(t[2])) {
                    (Some(a), Some(b), Some(c)) => point_in_triangle(point, a, b, c),
                    _ => false,
                }
            }),
            (Topology::LineStrip, MaterialKind::Fill) | (Topology::LineLoop, MaterialKind::Fill) => {
                false
            }
            (Topology::LineStrip, _) => self.near_path(point, &vertices, false),
            (Topology::LineLoop, _) => self.near_path(point, &vertices, true),
        }
    }

    fn near_path(&self, point: Point, vertices: &[Point], closed: bool) -> bool {
        let tolerance_sq = self.tolerance * self.tolerance;
        let near = |a: Point, b: Point| Line::new(a, b).nearest(point, 1e-9).distance_sq <= tolerance_sq;

        if let [only] = vertices {
            return only.distance_squared(point) <= tolerance_sq;
        }
        if vertices.windows(2).any(|w| near(w[0], w[1])) {
            return true;
        }
        match (closed, vertices.first(), vertices.last()) {
            (true, Some(first), Some(last)) if vertices.len() > 2 => near(*last, *first),
            _ => false,
        }
    }
}

/// Walk up from a hit node until a registered visual is found.
pub fn resolve(node: NodeId, scene: &Scene, registry: &VisualRegistry) -> Option<ShapeId> {
    let mut current = Some(node);
    while let Some(id) = current {
        if let Some(shape) = registry.shape_for(id) {
            return Some(shape.clone());
        }
        current = scene.node(id).and_then(|n| n.parent());
    }
    None
}

fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let cross = |o: Point, u: Point, v: Point| (u - o).cross(v - o);
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{build_visual, circle_outline, disk};
    use crate::scene::{GeometryData, MaterialData, Transform, Visual};
    use crate::synchronizer::SceneSynchronizer;
    use kurbo::{Size, Vec2};
    use peniko::Color;
    use vecdraw_core::shapes::{Circle, Ellipse, Geometry, Line as LineShape, Shape};

    const W: f64 = 800.0;
    const H: f64 = 600.0;

    fn setup() -> (Camera, SurfaceRect) {
        (
            Camera::from_viewport(Size::new(W, H), 0.1, 1000.0),
            SurfaceRect::new(0.0, 0.0, W, H),
        )
    }

    /// Client position of a world point for the default camera.
    fn client(x: f64, y: f64) -> Point {
        Point::new(x + W / 2.0, H / 2.0 - y)
    }

    #[test]
    fn test_pick_line_within_tolerance() {
        let (camera, rect) = setup();
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.001);
        let shapes = vec![Shape::new(
            "Line-1",
            Geometry::Line(LineShape::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0))),
        )];
        sync.sync(&shapes, &mut scene).unwrap();

        let tester = HitTester::new(3.0);
        let pick = |x, y| tester.pick(client(x, y), &rect, &camera, &scene, sync.registry());
        assert_eq!(pick(50.0, 2.0).as_deref(), Some("Line-1"));
        assert_eq!(pick(50.0, 10.0), None);
        assert_eq!(pick(110.0, 0.0), None);
    }

    #[test]
    fn test_nearest_wins_for_overlapping_circles() {
        let (camera, rect) = setup();
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.001);
        let shapes = vec![
            Shape::new("Circle-1", Geometry::Circle(Circle::new(Point::ZERO, 50.0))),
            Shape::new("Circle-2", Geometry::Circle(Circle::new(Point::new(100.0, 0.0), 50.0))),
        ];
        sync.sync(&shapes, &mut scene).unwrap();

        let tester = HitTester::default();
        // (50, 0) lies on both outlines.
        let ndc = screen_to_ndc(client(50.0, 0.0), &rect).unwrap();
        let hits = tester.intersect(&camera.ray(ndc), &scene, sync.registry().nodes());
        assert_eq!(hits.len(), 2);
        assert!(hits[0].distance < hits[1].distance);

        let picked = tester.pick(client(50.0, 0.0), &rect, &camera, &scene, sync.registry());
        assert_eq!(picked.as_deref(), Some("Circle-2"));
    }

    #[test]
    fn test_pick_inside_circle_outline_misses() {
        let (camera, rect) = setup();
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.001);
        let shapes = vec![Shape::new("Circle-1", Geometry::Circle(Circle::new(Point::ZERO, 50.0)))];
        sync.sync(&shapes, &mut scene).unwrap();

        let tester = HitTester::default();
        assert_eq!(tester.pick(client(0.0, 0.0), &rect, &camera, &scene, sync.registry()), None);
        assert!(tester.pick(client(0.0, 50.0), &rect, &camera, &scene, sync.registry()).is_some());
    }

    #[test]
    fn test_pick_inside_ellipse_hits() {
        let (camera, rect) = setup();
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.001);
        let shapes = vec![Shape::new(
            "Ellipse-1",
            Geometry::Ellipse(Ellipse::new(Point::new(10.0, 10.0), 40.0, 10.0)),
        )];
        sync.sync(&shapes, &mut scene).unwrap();

        let tester = HitTester::new(0.0);
        let pick = |x, y| tester.pick(client(x, y), &rect, &camera, &scene, sync.registry());
        assert_eq!(pick(40.0, 12.0).as_deref(), Some("Ellipse-1"));
        assert_eq!(pick(10.0, 25.0), None);
    }

    #[test]
    fn test_hidden_visuals_are_not_hit() {
        let (camera, rect) = setup();
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.001);
        let shapes = vec![
            Shape::new(
                "Line-1",
                Geometry::Line(LineShape::new(Point::new(-10.0, 0.0), Point::new(10.0, 0.0))),
            )
            .with_visible(false),
        ];
        sync.sync(&shapes, &mut scene).unwrap();

        let tester = HitTester::default();
        assert_eq!(tester.pick(client(0.0, 0.0), &rect, &camera, &scene, sync.registry()), None);
    }

    #[test]
    fn test_composite_hit_resolves_to_registered_parent() {
        let (camera, rect) = setup();
        let mut scene = Scene::new();
        let mut registry = VisualRegistry::default();

        let group = Visual::group(vec![
            Visual::mesh(disk(20.0), MaterialData::fill(Color::from_rgba8(0, 119, 255, 77))),
            Visual::mesh(
                GeometryData::line_loop(circle_outline(20.0)),
                MaterialData::stroke(Color::BLACK),
            ),
        ])
        .with_transform(Transform::translated(Vec2::new(100.0, 100.0)));
        let node = scene.insert(group);
        let shape = Shape::new("Circle-7", Geometry::Circle(Circle::new(Point::new(100.0, 100.0), 20.0)));
        registry.register(&shape, node);

        let tester = HitTester::default();
        let picked = tester.pick(client(105.0, 100.0), &rect, &camera, &scene, &registry);
        assert_eq!(picked.as_deref(), Some("Circle-7"));
    }

    #[test]
    fn test_unregistered_chain_resolves_to_none() {
        let mut scene = Scene::new();
        let registry = VisualRegistry::default();
        let shape = Shape::new("Line-1", Geometry::Line(LineShape::new(Point::ZERO, Point::ZERO)));
        let node = scene.insert(build_visual(&shape).unwrap());
        assert_eq!(resolve(node, &scene, &registry), None);
    }

    #[test]
    fn test_degenerate_rect_picks_nothing() {
        let (camera, _) = setup();
        let scene = Scene::new();
        let registry = VisualRegistry::default();
        let rect = SurfaceRect::new(0.0, 0.0, 0.0, 0.0);
        assert!(HitTester::default()
            .pick(Point::ZERO, &rect, &camera, &scene, &registry)
            .is_none());
    }
}

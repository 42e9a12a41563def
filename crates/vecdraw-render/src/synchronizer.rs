//! Keeps the scene a faithful projection of the shape collection.

use crate::factory::build_visual;
use crate::scene::{NodeId, Scene, SceneError};
use std::collections::{HashMap, HashSet};
use vecdraw_core::shapes::{Geometry, Shape, ShapeId};

/// What the registry last applied to a visual.
#[derive(Debug, Clone)]
struct Entry {
    node: NodeId,
    geometry: Geometry,
    visible: bool,
    color: String,
    depth: f64,
}

/// Mapping between shape ids and the scene nodes that draw them.
#[derive(Debug, Default)]
pub struct VisualRegistry {
    by_shape: HashMap<ShapeId, Entry>,
    by_node: HashMap<NodeId, ShapeId>,
}

impl VisualRegistry {
    pub fn node_for(&self, id: &str) -> Option<NodeId> {
        self.by_shape.get(id).map(|e| e.node)
    }

    /// Reverse lookup used by hit testing.
    pub fn shape_for(&self, node: NodeId) -> Option<&ShapeId> {
        self.by_node.get(&node)
    }

    /// Registered root nodes.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.by_shape.values().map(|e| e.node)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ShapeId> + '_ {
        self.by_shape.keys()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_shape.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_shape.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_shape.is_empty()
    }

    fn insert(&mut self, id: ShapeId, entry: Entry) {
        self.by_node.insert(entry.node, id.clone());
        if let Some(old) = self.by_shape.insert(id, entry) {
            self.by_node.remove(&old.node);
        }
    }

    fn remove(&mut self, id: &str) -> Option<Entry> {
        let entry = self.by_shape.remove(id)?;
        self.by_node.remove(&entry.node);
        Some(entry)
    }

    #[cfg(test)]
    pub(crate) fn register(&mut self, shape: &Shape, node: NodeId) {
        self.insert(
            shape.id.clone(),
            Entry {
                node,
                geometry: shape.geometry.clone(),
                visible: shape.visible,
                color: shape.color.clone(),
                depth: 0.0,
            },
        );
    }
}

/// Counts of what a [`SceneSynchronizer::sync`] pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub replaced: usize,
    pub restyled: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl SyncReport {
    /// True when the pass did not touch the scene.
    pub fn is_noop(&self) -> bool {
        self.created + self.replaced + self.restyled + self.removed == 0
    }
}

/// Reconciles the shape list against the scene.
#[derive(Debug)]
pub struct SceneSynchronizer {
    registry: VisualRegistry,
    depth_step: f64,
}

impl SceneSynchronizer {
    /// `depth_step` separates consecutive shapes along z, so later shapes
    /// are nearer the camera.
    pub fn new(depth_step: f64) -> Self {
        Self {
            registry: VisualRegistry::default(),
            depth_step,
        }
    }

    pub fn registry(&self) -> &VisualRegistry {
        &self.registry
    }

    /// Bring the scene in line with `shapes`.
    ///
    /// Visuals of shapes no longer present are released. New shapes get a
    /// visual. A shape whose geometry changed gets a freshly built visual that
    /// replaces the old one; a shape whose geometry is unchanged is restyled
    /// in place. A record that no longer produces a visual loses its old one.
    pub fn sync(&mut self, shapes: &[Shape], scene: &mut Scene) -> Result<SyncReport, SceneError> {
        let mut report = SyncReport::default();

        let current: HashSet<&str> = shapes.iter().map(|s| s.id.as_str()).collect();
        let stale: Vec<ShapeId> = self
            .registry
            .ids()
            .filter(|id| !current.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            if let Some(entry) = self.registry.remove(&id) {
                scene.dispose(entry.node)?;
                report.removed += 1;
            }
        }

        for (index, shape) in shapes.iter().enumerate() {
            let depth = index as f64 * self.depth_step;
            let Some(entry) = self.registry.by_shape.get(&shape.id) else {
                if let Some(mut visual) = build_visual(shape) {
                    visual.transform.depth = depth;
                    let node = scene.insert(visual);
                    self.registry.insert(shape.id.clone(), snapshot(shape, node, depth));
                    report.created += 1;
                }
                continue;
            };

            if entry.geometry == shape.geometry {
                if entry.visible == shape.visible && entry.color == shape.color && entry.depth == depth {
                    report.unchanged += 1;
                    continue;
                }
                let node = entry.node;
                scene.set_visible(node, shape.visible)?;
                scene.set_color(node, shape.stroke())?;
                scene.set_depth(node, depth)?;
                self.registry.insert(shape.id.clone(), snapshot(shape, node, depth));
                report.restyled += 1;
                continue;
            }

            let old = entry.node;
            match build_visual(shape) {
                Some(mut visual) => {
                    visual.transform.depth = depth;
                    if let Some(node) = scene.node(old) {
                        visual.visible = node.visible();
                    }
                    let node = scene.insert(visual);
                    scene.dispose(old)?;
                    self.registry.insert(shape.id.clone(), snapshot(shape, node, depth));
                    report.replaced += 1;
                }
                None => {
                    self.registry.remove(&shape.id);
                    scene.dispose(old)?;
                    report.removed += 1;
                }
            }
        }

        self.apply_styles(shapes, scene)?;
        log::debug!("Scene sync: {:?}", report);
        Ok(report)
    }

    /// Apply each shape's `visible` and `color` to its registered visual.
    pub fn apply_styles(&mut self, shapes: &[Shape], scene: &mut Scene) -> Result<(), SceneError> {
        for shape in shapes {
            let Some(entry) = self.registry.by_shape.get_mut(&shape.id) else {
                continue;
            };
            scene.set_visible(entry.node, shape.visible)?;
            scene.set_color(entry.node, shape.stroke())?;
            entry.visible = shape.visible;
            entry.color.clone_from(&shape.color);
        }
        Ok(())
    }

    /// Release every registered visual.
    pub fn dispose_all(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        let ids: Vec<ShapeId> = self.registry.ids().cloned().collect();
        for id in ids {
            if let Some(entry) = self.registry.remove(&id) {
                scene.dispose(entry.node)?;
            }
        }
        Ok(())
    }
}

fn snapshot(shape: &Shape, node: NodeId, depth: f64) -> Entry {
    Entry {
        node,
        geometry: shape.geometry.clone(),
        visible: shape.visible,
        color: shape.color.clone(),
        depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use peniko::Color;
    use vecdraw_core::shapes::{Circle, Line, Polyline};

    fn line(id: &str, x: f64) -> Shape {
        Shape::new(
            id,
            Geometry::Line(Line::new(Point::new(0.0, 0.0), Point::new(x, 0.0))),
        )
    }

    fn circle(id: &str) -> Shape {
        Shape::new(id, Geometry::Circle(Circle::new(Point::new(5.0, 5.0), 2.0)))
    }

    #[test]
    fn test_creates_visuals_for_new_shapes() {
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.01);
        let report = sync.sync(&[line("Line-1", 1.0), circle("Circle-1")], &mut scene).unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(sync.registry().len(), 2);
        assert_eq!(scene.roots().len(), 2);

        let node = sync.registry().node_for("Circle-1").unwrap();
        assert!((scene.world_depth(node) - 0.01).abs() < 1e-12);
        assert_eq!(sync.registry().shape_for(node).map(String::as_str), Some("Circle-1"));
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.01);
        let shapes = vec![line("Line-1", 1.0).with_color("#ff000080"), circle("Circle-1")];
        sync.sync(&shapes, &mut scene).unwrap();
        let stats = scene.stats();
        let colors = |scene: &Scene, sync: &SceneSynchronizer| -> Vec<Color> {
            ["Line-1", "Circle-1"]
                .iter()
                .map(|id| scene.mesh(sync.registry().node_for(id).unwrap()).unwrap().1.color)
                .collect()
        };
        let before = colors(&scene, &sync);

        let report = sync.sync(&shapes, &mut scene).unwrap();
        assert!(report.is_noop());
        assert_eq!(report.unchanged, 2);
        assert_eq!(scene.stats(), stats);
        assert_eq!(scene.node_count(), 2);
        assert_eq!(colors(&scene, &sync), before);
    }

    #[test]
    fn test_translucent_color_survives_repeated_styling() {
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.01);
        let shapes = vec![line("Line-1", 1.0).with_color("#ff000080")];
        for _ in 0..3 {
            sync.sync(&shapes, &mut scene).unwrap();
            sync.apply_styles(&shapes, &mut scene).unwrap();
            let node = sync.registry().node_for("Line-1").unwrap();
            let (_, material) = scene.mesh(node).unwrap();
            assert_eq!(material.color.to_rgba8().a, 128);
        }
    }

    #[test]
    fn test_removes_stale_visuals() {
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.01);
        sync.sync(&[line("Line-1", 1.0), circle("Circle-1")], &mut scene).unwrap();

        let report = sync.sync(&[circle("Circle-1")], &mut scene).unwrap();
        assert_eq!(report.removed, 1);
        assert!(!sync.registry().contains("Line-1"));
        assert_eq!(scene.live_geometries(), 1);
        assert_eq!(scene.stats().geometries_released, 1);
    }

    #[test]
    fn test_geometry_change_replaces_visual_once() {
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.01);
        sync.sync(&[line("Line-1", 1.0), circle("Circle-1")], &mut scene).unwrap();
        let old_line = sync.registry().node_for("Line-1").unwrap();
        let old_circle = sync.registry().node_for("Circle-1").unwrap();

        let report = sync.sync(&[line("Line-1", 9.0), circle("Circle-1")], &mut scene).unwrap();
        assert_eq!(report.replaced, 1);
        assert_eq!(report.unchanged, 1);

        let new_line = sync.registry().node_for("Line-1").unwrap();
        assert_ne!(new_line, old_line);
        assert!(!scene.contains(old_line));
        assert_eq!(sync.registry().node_for("Circle-1"), Some(old_circle));
        assert!(sync.registry().shape_for(old_line).is_none());

        let (geometry, _) = scene.mesh(new_line).unwrap();
        assert_eq!(geometry.vertices[1], Point::new(9.0, 0.0));
        assert_eq!(scene.stats().geometries_released, 1);
        assert_eq!(scene.live_geometries(), 2);
    }

    #[test]
    fn test_style_change_converges_in_place() {
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.01);
        sync.sync(&[line("Line-1", 1.0), circle("Circle-1")], &mut scene).unwrap();
        let before = scene.stats();
        let node = sync.registry().node_for("Line-1").unwrap();

        let edited = vec![
            line("Line-1", 1.0).with_color("#00ff00").with_visible(false),
            circle("Circle-1"),
        ];
        let report = sync.sync(&edited, &mut scene).unwrap();
        assert_eq!(report.restyled, 1);
        assert_eq!(sync.registry().node_for("Line-1"), Some(node));
        assert!(!scene.node(node).unwrap().visible());
        let (_, material) = scene.mesh(node).unwrap();
        assert_eq!(material.color.to_rgba8().g, 255);
        assert_eq!(scene.stats(), before);
    }

    #[test]
    fn test_replacement_keeps_display_state_consistent() {
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.01);
        sync.sync(&[line("Line-1", 1.0).with_visible(false)], &mut scene).unwrap();

        sync.sync(&[line("Line-1", 4.0).with_visible(false)], &mut scene).unwrap();
        let node = sync.registry().node_for("Line-1").unwrap();
        assert!(!scene.node(node).unwrap().visible());
    }

    #[test]
    fn test_malformed_update_drops_visual() {
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.01);
        let poly = |points| Shape::new("Polyline-1", Geometry::Polyline(Polyline::new(points)));
        sync.sync(&[poly(vec![Point::ZERO, Point::new(1.0, 1.0)])], &mut scene).unwrap();

        let report = sync.sync(&[poly(vec![Point::ZERO])], &mut scene).unwrap();
        assert_eq!(report.removed, 1);
        assert!(sync.registry().is_empty());
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn test_dispose_all() {
        let mut scene = Scene::new();
        let mut sync = SceneSynchronizer::new(0.01);
        sync.sync(&[line("Line-1", 1.0), circle("Circle-1")], &mut scene).unwrap();
        sync.dispose_all(&mut scene).unwrap();
        assert!(sync.registry().is_empty());
        assert_eq!(scene.stats().live_geometries(), 0);
        assert_eq!(scene.stats().live_materials(), 0);
    }
}

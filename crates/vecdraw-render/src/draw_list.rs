//! Flattening the scene into screen-space paint commands.

use crate::scene::{MaterialKind, NodeId, Scene, Topology};
use kurbo::{BezPath, Point, Size};
use peniko::Color;
use std::cmp::Ordering;
use vecdraw_core::camera::{Camera, SurfaceRect, world_to_screen};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Stroke { color: Color, width: f64 },
    Fill { color: Color },
}

/// One path to paint, in viewport pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub node: NodeId,
    pub path: BezPath,
    pub paint: Paint,
}

/// Everything needed to paint one frame, back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub size: Size,
    pub background: Color,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Build the draw list for the current scene state.
    ///
    /// Displayed mesh nodes are emitted in increasing depth; nodes at equal
    /// depth keep scene order.
    pub fn build(scene: &Scene, camera: &Camera, size: Size, background: Color, stroke_width: f64) -> Self {
        let rect = SurfaceRect::from_size(size);

        let mut nodes: Vec<(f64, usize, NodeId)> = scene
            .roots()
            .iter()
            .flat_map(|root| scene.descendants(*root))
            .enumerate()
            .filter(|(_, node)| scene.is_displayed(*node))
            .map(|(order, node)| (scene.world_depth(node), order, node))
            .collect();
        nodes.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal).then(a.1.cmp(&b.1)));

        let mut commands = Vec::new();
        for (_, _, node) in nodes {
            let Some((geometry, material)) = scene.mesh(node) else {
                continue;
            };
            let transform = scene.world_transform(node);
            let to_screen = |p: Point| world_to_screen(transform * p, &rect, camera);
            let stroke = Paint::Stroke {
                color: material.color,
                width: stroke_width,
            };

            match (&geometry.topology, material.kind) {
                (Topology::Triangles(triangles), kind) => {
                    let mut path = BezPath::new();
                    for t in triangles {
                        let Some([a, b, c]) = geometry.triangle(t) else {
                            continue;
                        };
                        path.move_to(to_screen(a));
                        path.line_to(to_screen(b));
                        path.line_to(to_screen(c));
                        path.close_path();
                    }
                    let paint = match kind {
                        MaterialKind::Fill => Paint::Fill {
                            color: material.color,
                        },
                        MaterialKind::Stroke | MaterialKind::Wireframe => stroke,
                    };
                    commands.push(DrawCommand { node, path, paint });
                }
                (topology, _) => {
                    let mut points = geometry.vertices.iter().map(|p| to_screen(*p));
                    let Some(first) = points.next() else {
                        continue;
                    };
                    let mut path = BezPath::new();
                    path.move_to(first);
                    for p in points {
                        path.line_to(p);
                    }
                    if *topology == Topology::LineLoop {
                        path.close_path();
                    }
                    commands.push(DrawCommand {
                        node,
                        path,
                        paint: stroke,
                    });
                }
            }
        }

        Self {
            size,
            background,
            commands,
        }
    }
}

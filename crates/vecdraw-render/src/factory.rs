//! Shape record to visual mapping.

use crate::scene::{GeometryData, MaterialData, Topology, Transform, Visual, VisualTag};
use kurbo::{Point, Vec2};
use std::f64::consts::TAU;
use vecdraw_core::shapes::{Circle, Ellipse, Geometry, Line, Polyline, Shape};

/// Tessellation used for circles and ellipses.
pub const CIRCLE_SEGMENTS: usize = 64;

/// Build the visual for a shape record.
///
/// Returns `None` when the record cannot be drawn (non-finite coordinates,
/// negative radii or a polyline with fewer than two points). The visual is
/// tinted with the shape's color, starts with the shape's visibility and
/// carries an `(id, kind)` tag.
pub fn build_visual(shape: &Shape) -> Option<Visual> {
    if !shape.geometry.is_well_formed() {
        log::warn!("Shape {} has malformed geometry, skipping visual", shape.id);
        return None;
    }

    let color = shape.stroke();
    let visual = match &shape.geometry {
        Geometry::Line(line) => line_visual(line, MaterialData::stroke(color)),
        Geometry::Circle(circle) => circle_visual(circle, MaterialData::stroke(color)),
        Geometry::Ellipse(ellipse) => ellipse_visual(ellipse, MaterialData::wireframe(color)),
        Geometry::Polyline(polyline) => polyline_visual(polyline, MaterialData::stroke(color)),
    };

    Some(visual.with_visible(shape.visible).with_tag(VisualTag {
        id: shape.id.clone(),
        kind: shape.kind(),
    }))
}

pub fn line_visual(line: &Line, material: MaterialData) -> Visual {
    Visual::mesh(GeometryData::line_strip(vec![line.start, line.end]), material)
}

pub fn circle_visual(circle: &Circle, material: MaterialData) -> Visual {
    Visual::mesh(GeometryData::line_loop(circle_outline(circle.radius)), material)
        .with_transform(Transform::translated(circle.center.to_vec2()))
}

/// Unit disk scaled by the radii.
pub fn ellipse_visual(ellipse: &Ellipse, material: MaterialData) -> Visual {
    Visual::mesh(unit_disk(), material).with_transform(Transform {
        translation: ellipse.center.to_vec2(),
        scale: Vec2::new(ellipse.radius_x, ellipse.radius_y),
        depth: 0.0,
    })
}

pub fn polyline_visual(polyline: &Polyline, material: MaterialData) -> Visual {
    Visual::mesh(GeometryData::line_strip(polyline.points.clone()), material)
}

/// `CIRCLE_SEGMENTS` points on a circle around the origin.
pub fn circle_outline(radius: f64) -> Vec<Point> {
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = TAU * i as f64 / CIRCLE_SEGMENTS as f64;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Triangle fan disk: center vertex, then `CIRCLE_SEGMENTS + 1` rim vertices
/// (the first rim vertex is repeated to close the fan).
pub fn disk(radius: f64) -> GeometryData {
    let mut vertices = Vec::with_capacity(CIRCLE_SEGMENTS + 2);
    vertices.push(Point::ZERO);
    for i in 0..=CIRCLE_SEGMENTS {
        let angle = TAU * i as f64 / CIRCLE_SEGMENTS as f64;
        vertices.push(Point::new(radius * angle.cos(), radius * angle.sin()));
    }
    let triangles = (1..=CIRCLE_SEGMENTS as u32).map(|i| [0, i, i + 1]).collect();
    GeometryData {
        vertices,
        topology: Topology::Triangles(triangles),
    }
}

pub fn unit_disk() -> GeometryData {
    disk(1.0)
}

//! Retained scene graph with explicit resource ownership.
//!
//! Every mesh node owns one geometry buffer and one material. Both are
//! allocated by [`Scene::insert`] and released by [`Scene::dispose`]; the
//! scene keeps running totals so callers (and tests) can check that nothing
//! leaks and nothing is released twice.

use kurbo::{Affine, Point, Vec2};
use peniko::Color;
use std::collections::HashMap;
use thiserror::Error;
use vecdraw_core::shapes::{ShapeId, ShapeKind};

/// Scene graph errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("Unknown scene node: {0:?}")]
    UnknownNode(NodeId),
    #[error("Unknown geometry buffer: {0:?}")]
    UnknownGeometry(GeometryId),
    #[error("Unknown material: {0:?}")]
    UnknownMaterial(MaterialId),
    #[error("Node {0:?} is a group and has no geometry")]
    NotAMesh(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u64);

/// How the vertices of a geometry buffer are connected.
#[derive(Debug, Clone, PartialEq)]
pub enum Topology {
    /// Open path through the vertices in order.
    LineStrip,
    /// Closed path; the last vertex connects back to the first.
    LineLoop,
    /// Indexed triangles.
    Triangles(Vec<[u32; 3]>),
}

/// Vertex data in the node's local space.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    pub vertices: Vec<Point>,
    pub topology: Topology,
}

impl GeometryData {
    pub fn line_strip(vertices: Vec<Point>) -> Self {
        Self {
            vertices,
            topology: Topology::LineStrip,
        }
    }

    pub fn line_loop(vertices: Vec<Point>) -> Self {
        Self {
            vertices,
            topology: Topology::LineLoop,
        }
    }

    /// Line segments making up this geometry, as vertex pairs.
    ///
    /// Triangles contribute their three edges.
    pub fn segments(&self) -> Vec<(Point, Point)> {
        let v = &self.vertices;
        match &self.topology {
            Topology::LineStrip => v.windows(2).map(|w| (w[0], w[1])).collect(),
            Topology::LineLoop => {
                let mut segs: Vec<_> = v.windows(2).map(|w| (w[0], w[1])).collect();
                if let (Some(first), Some(last)) = (v.first(), v.last()) {
                    if v.len() > 2 {
                        segs.push((*last, *first));
                    }
                }
                segs
            }
            Topology::Triangles(tris) => tris
                .iter()
                .filter_map(|t| self.triangle(t))
                .flat_map(|[a, b, c]| [(a, b), (b, c), (c, a)])
                .collect(),
        }
    }

    /// Resolve a triangle's indices; `None` if any index is out of range.
    pub fn triangle(&self, indices: &[u32; 3]) -> Option<[Point; 3]> {
        let get = |i: u32| self.vertices.get(i as usize).copied();
        Some([get(indices[0])?, get(indices[1])?, get(indices[2])?])
    }
}

/// How a material paints its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Stroke the line segments.
    Stroke,
    /// Fill the triangles.
    Fill,
    /// Stroke the triangle edges.
    Wireframe,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialData {
    /// Color as painted: the tint with `opacity` applied.
    pub color: Color,
    /// Base opacity, applied on top of every tint.
    pub opacity: f32,
    pub kind: MaterialKind,
}

impl MaterialData {
    fn new(color: Color, kind: MaterialKind) -> Self {
        Self {
            color,
            opacity: 1.0,
            kind,
        }
    }

    pub fn stroke(color: Color) -> Self {
        Self::new(color, MaterialKind::Stroke)
    }

    pub fn fill(color: Color) -> Self {
        Self::new(color, MaterialKind::Fill)
    }

    pub fn wireframe(color: Color) -> Self {
        Self::new(color, MaterialKind::Wireframe)
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self.color = self.color.multiply_alpha(opacity);
        self
    }

    /// Replace the tint. The painted alpha is the tint's alpha times `opacity`.
    pub fn tint(&mut self, color: Color) {
        self.color = color.multiply_alpha(self.opacity);
    }
}

/// Reverse-lookup metadata attached to shape visuals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualTag {
    pub id: ShapeId,
    pub kind: ShapeKind,
}

/// Local transform: scale, then translate. `depth` orders nodes along z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec2,
    pub scale: Vec2,
    pub depth: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            depth: 0.0,
        }
    }
}

impl Transform {
    pub fn translated(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translation) * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

/// CPU-side description of a visual, turned into scene nodes by [`Scene::insert`].
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub content: VisualContent,
    pub transform: Transform,
    pub visible: bool,
    pub tag: Option<VisualTag>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisualContent {
    Mesh {
        geometry: GeometryData,
        material: MaterialData,
    },
    Group(Vec<Visual>),
}

impl Visual {
    pub fn mesh(geometry: GeometryData, material: MaterialData) -> Self {
        Self {
            content: VisualContent::Mesh { geometry, material },
            transform: Transform::default(),
            visible: true,
            tag: None,
        }
    }

    pub fn group(children: Vec<Visual>) -> Self {
        Self {
            content: VisualContent::Group(children),
            transform: Transform::default(),
            visible: true,
            tag: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_tag(mut self, tag: VisualTag) -> Self {
        self.tag = Some(tag);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeContent {
    Mesh {
        geometry: GeometryId,
        material: MaterialId,
    },
    Group,
}

#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    content: NodeContent,
    transform: Transform,
    visible: bool,
    tag: Option<VisualTag>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn content(&self) -> NodeContent {
        self.content
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn tag(&self) -> Option<&VisualTag> {
        self.tag.as_ref()
    }
}

/// Allocation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    pub geometries_allocated: u64,
    pub geometries_released: u64,
    pub materials_allocated: u64,
    pub materials_released: u64,
}

impl ResourceStats {
    pub fn live_geometries(&self) -> u64 {
        self.geometries_allocated - self.geometries_released
    }

    pub fn live_materials(&self) -> u64 {
        self.materials_allocated - self.materials_released
    }
}

/// The live scene: root nodes in insertion order plus the resource arenas.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    geometries: HashMap<GeometryId, GeometryData>,
    materials: HashMap<MaterialId, MaterialData>,
    next_id: u64,
    stats: ResourceStats,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_raw_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Add a visual as a new root, allocating its resources.
    pub fn insert(&mut self, visual: Visual) -> NodeId {
        let id = self.insert_node(visual, None);
        self.roots.push(id);
        id
    }

    fn insert_node(&mut self, visual: Visual, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_raw_id());
        let (content, children) = match visual.content {
            VisualContent::Mesh { geometry, material } => {
                let geometry_id = GeometryId(self.next_raw_id());
                self.geometries.insert(geometry_id, geometry);
                self.stats.geometries_allocated += 1;

                let material_id = MaterialId(self.next_raw_id());
                self.materials.insert(material_id, material);
                self.stats.materials_allocated += 1;

                (
                    NodeContent::Mesh {
                        geometry: geometry_id,
                        material: material_id,
                    },
                    Vec::new(),
                )
            }
            VisualContent::Group(children) => (NodeContent::Group, children),
        };

        self.nodes.insert(
            id,
            Node {
                parent,
                children: Vec::new(),
                content,
                transform: visual.transform,
                visible: visual.visible,
                tag: visual.tag,
            },
        );

        let child_ids: Vec<NodeId> = children
            .into_iter()
            .map(|child| self.insert_node(child, Some(id)))
            .collect();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.children = child_ids;
        }
        id
    }

    /// Remove a node and its subtree, releasing every resource it owns.
    ///
    /// Disposing a node that is no longer in the scene is an error, so a
    /// resource can never be released twice.
    pub fn dispose(&mut self, id: NodeId) -> Result<(), SceneError> {
        let parent = self.nodes.get(&id).ok_or(SceneError::UnknownNode(id))?.parent;
        match parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        self.release_subtree(id)
    }

    fn release_subtree(&mut self, id: NodeId) -> Result<(), SceneError> {
        let node = self.nodes.remove(&id).ok_or(SceneError::UnknownNode(id))?;
        if let NodeContent::Mesh { geometry, material } = node.content {
            self.geometries
                .remove(&geometry)
                .ok_or(SceneError::UnknownGeometry(geometry))?;
            self.stats.geometries_released += 1;
            self.materials
                .remove(&material)
                .ok_or(SceneError::UnknownMaterial(material))?;
            self.stats.materials_released += 1;
        }
        for child in node.children {
            self.release_subtree(child)?;
        }
        Ok(())
    }

    /// Release every root and its subtree.
    pub fn clear(&mut self) -> Result<(), SceneError> {
        for root in std::mem::take(&mut self.roots) {
            self.release_subtree(root)?;
        }
        Ok(())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&GeometryData> {
        self.geometries.get(&id)
    }

    pub fn material(&self, id: MaterialId) -> Option<&MaterialData> {
        self.materials.get(&id)
    }

    /// Geometry and material of a mesh node.
    pub fn mesh(&self, id: NodeId) -> Option<(&GeometryData, &MaterialData)> {
        match self.nodes.get(&id)?.content {
            NodeContent::Mesh { geometry, material } => {
                Some((self.geometries.get(&geometry)?, self.materials.get(&material)?))
            }
            NodeContent::Group => None,
        }
    }

    pub fn stats(&self) -> ResourceStats {
        self.stats
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    /* ---------------- mutation ---------------- */

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), SceneError> {
        self.node_mut(id)?.visible = visible;
        Ok(())
    }

    /// Tint every material in the subtree, keeping each material's base opacity.
    pub fn set_color(&mut self, id: NodeId, color: Color) -> Result<(), SceneError> {
        let node = self.nodes.get(&id).ok_or(SceneError::UnknownNode(id))?;
        let children = node.children.clone();
        if let NodeContent::Mesh { material, .. } = node.content {
            let data = self
                .materials
                .get_mut(&material)
                .ok_or(SceneError::UnknownMaterial(material))?;
            data.tint(color);
        }
        for child in children {
            self.set_color(child, color)?;
        }
        Ok(())
    }

    pub fn set_translation(&mut self, id: NodeId, translation: Vec2) -> Result<(), SceneError> {
        self.node_mut(id)?.transform.translation = translation;
        Ok(())
    }

    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) -> Result<(), SceneError> {
        self.node_mut(id)?.transform.scale = scale;
        Ok(())
    }

    pub fn set_depth(&mut self, id: NodeId, depth: f64) -> Result<(), SceneError> {
        self.node_mut(id)?.transform.depth = depth;
        Ok(())
    }

    /// Overwrite the vertices of a mesh node's geometry buffer in place.
    pub fn replace_vertices(&mut self, id: NodeId, vertices: Vec<Point>) -> Result<(), SceneError> {
        let node = self.nodes.get(&id).ok_or(SceneError::UnknownNode(id))?;
        let NodeContent::Mesh { geometry, .. } = node.content else {
            return Err(SceneError::NotAMesh(id));
        };
        let data = self
            .geometries
            .get_mut(&geometry)
            .ok_or(SceneError::UnknownGeometry(geometry))?;
        data.vertices = vertices;
        Ok(())
    }

    /* ---------------- queries ---------------- */

    /// Local-to-world transform, composed through all ancestors.
    pub fn world_transform(&self, id: NodeId) -> Affine {
        let mut affine = Affine::IDENTITY;
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            affine = node.transform.to_affine() * affine;
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        affine
    }

    /// World z of a node: the sum of depths along its ancestor chain.
    pub fn world_depth(&self, id: NodeId) -> f64 {
        let mut depth = 0.0;
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            depth += node.transform.depth;
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        depth
    }

    /// Whether the node and all of its ancestors are visible.
    pub fn is_displayed(&self, id: NodeId) -> bool {
        let mut current = self.nodes.get(&id);
        if current.is_none() {
            return false;
        }
        while let Some(node) = current {
            if !node.visible {
                return false;
            }
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        true
    }

    /// The node and all of its descendants, parents before children.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

//! Editor shell: store, scene and tools wired together.

use crate::error::{AppError, AppResult};
use kurbo::{Point, Size};
use peniko::Color;
use std::cell::Cell;
use std::rc::Rc;
use vecdraw_core::shapes::parse_hex_color;
use vecdraw_core::{
    Camera, EditorConfig, InputSurface, PointerEvent, Shape, ShapeDocument, ShapeId, ShapeStore,
    Storage, SurfaceRect, ToolKind,
};
use vecdraw_render::{
    DrawList, HitTester, PointerOutcome, PreviewStyle, RenderContext, Renderer, Scene,
    SceneSynchronizer, SyncReport, ToolController, VisualRegistry,
};

/// One editor instance bound to one drawing surface.
///
/// Store mutations only mark the scene dirty; [`Editor::flush`] brings the
/// scene in line with the store. Every public mutation flushes before
/// returning, so callers never observe a stale scene.
pub struct Editor {
    config: EditorConfig,
    store: ShapeStore,
    scene: Scene,
    camera: Camera,
    surface: InputSurface,
    synchronizer: SceneSynchronizer,
    controller: ToolController,
    background: Color,
    shapes_dirty: Rc<Cell<bool>>,
    selection_dirty: Rc<Cell<bool>>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("tool", &self.controller.tool())
            .field("shapes", &self.store.len())
            .field("nodes", &self.scene.node_count())
            .finish()
    }
}

impl Editor {
    /// Build an editor from a validated configuration.
    pub fn new(config: EditorConfig) -> AppResult<Self> {
        config.validate()?;
        let background = config.background()?;
        let preview = PreviewStyle {
            stroke: config.preview_stroke()?,
            fill: config.preview_fill()?,
        };

        let mut surface = InputSurface::new(SurfaceRect::from_size(config.viewport()));
        let controller = ToolController::new(HitTester::new(config.hit_tolerance), preview, &mut surface);

        let shapes_dirty = Rc::new(Cell::new(false));
        let selection_dirty = Rc::new(Cell::new(false));
        let mut store = ShapeStore::new();
        {
            let dirty = Rc::clone(&shapes_dirty);
            store.subscribe(move || dirty.set(true));
            let dirty = Rc::clone(&selection_dirty);
            store.subscribe_selection(move || dirty.set(true));
        }

        log::info!(
            "Editor created with a {}x{} surface",
            config.width,
            config.height
        );

        Ok(Self {
            camera: config.camera(),
            synchronizer: SceneSynchronizer::new(config.depth_step),
            config,
            store,
            scene: Scene::new(),
            surface,
            controller,
            background,
            shapes_dirty,
            selection_dirty,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn surface(&self) -> &InputSurface {
        &self.surface
    }

    pub fn registry(&self) -> &VisualRegistry {
        self.synchronizer.registry()
    }

    pub fn shapes(&self) -> &[Shape] {
        self.store.list()
    }

    pub fn tool(&self) -> ToolKind {
        self.controller.tool()
    }

    pub fn selected(&self) -> Option<&Shape> {
        self.store.selected()
    }

    /// Bring the scene in line with the store.
    ///
    /// Returns the sync report when the collection changed since the last
    /// flush. A selection-only change just restyles existing visuals.
    pub fn flush(&mut self) -> AppResult<Option<SyncReport>> {
        if self.shapes_dirty.replace(false) {
            self.selection_dirty.set(false);
            let report = self.synchronizer.sync(self.store.list(), &mut self.scene)?;
            log::debug!("Scene synced: {:?}", report);
            return Ok(Some(report));
        }
        if self.selection_dirty.replace(false) {
            self.synchronizer.apply_styles(self.store.list(), &mut self.scene)?;
        }
        Ok(None)
    }

    /* ---------------- tools and input ---------------- */

    /// Switch the active tool, discarding any unfinished drawing.
    pub fn set_tool(&mut self, tool: ToolKind) -> AppResult<()> {
        self.controller.set_tool(tool, &mut self.scene, &mut self.surface)?;
        Ok(())
    }

    /// Route a client-space pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> AppResult<PointerOutcome> {
        let outcome = self.controller.handle_pointer(
            &event,
            &mut self.scene,
            &self.camera,
            &self.surface,
            self.synchronizer.registry(),
            &mut self.store,
        );
        self.flush()?;
        Ok(outcome?)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> AppResult<PointerOutcome> {
        self.handle_pointer(PointerEvent::Down {
            position: Point::new(x, y),
        })
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> AppResult<PointerOutcome> {
        self.handle_pointer(PointerEvent::Move {
            position: Point::new(x, y),
        })
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> AppResult<PointerOutcome> {
        self.handle_pointer(PointerEvent::Up {
            position: Point::new(x, y),
        })
    }

    pub fn double_click(&mut self, x: f64, y: f64) -> AppResult<PointerOutcome> {
        self.handle_pointer(PointerEvent::DoubleClick {
            position: Point::new(x, y),
        })
    }

    /// Resize the drawing surface, keeping its page offset.
    ///
    /// Zero-sized surfaces are ignored.
    pub fn resize(&mut self, width: f64, height: f64) {
        let rect = self.surface.rect();
        self.set_surface_rect(SurfaceRect::new(rect.left, rect.top, width, height));
    }

    /// Update the element rect used to map client coordinates.
    pub fn set_surface_rect(&mut self, rect: SurfaceRect) {
        if rect.is_degenerate() {
            log::debug!("Ignoring degenerate surface rect {:?}", rect);
            return;
        }
        if self.camera.resize(rect.size()) {
            log::debug!("Camera resized to {}x{}", rect.width, rect.height);
        }
        self.surface.set_rect(rect);
    }

    /* ---------------- rendering ---------------- */

    /// Flush pending changes and flatten the scene for painting.
    pub fn frame(&mut self) -> AppResult<DrawList> {
        self.flush()?;
        Ok(self.render_context(1.0).draw_list())
    }

    /// Flush pending changes and hand the frame to a renderer.
    pub fn render(&mut self, renderer: &mut impl Renderer, scale_factor: f64) -> AppResult<()> {
        self.flush()?;
        renderer.build_scene(&self.render_context(scale_factor))?;
        Ok(())
    }

    fn render_context(&self, scale_factor: f64) -> RenderContext<'_> {
        RenderContext::new(&self.scene, &self.camera, self.viewport_size())
            .with_scale_factor(scale_factor)
            .with_background(self.background)
            .with_stroke_width(self.config.stroke_width)
    }

    fn viewport_size(&self) -> Size {
        self.surface.rect().size()
    }

    /* ---------------- shape edits ---------------- */

    /// Replace a shape record. Returns false if no shape has that id.
    pub fn update_shape(&mut self, shape: Shape) -> AppResult<bool> {
        let updated = self.store.update(shape);
        self.flush()?;
        Ok(updated)
    }

    /// Change the color of a shape. The color must be `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn set_color(&mut self, id: &str, color: &str) -> AppResult<bool> {
        if parse_hex_color(color).is_none() {
            return Err(AppError::InvalidColor(color.to_string()));
        }
        let Some(shape) = self.store.get(id) else {
            return Ok(false);
        };
        let shape = shape.clone().with_color(color);
        self.update_shape(shape)
    }

    pub fn delete_shape(&mut self, id: &str) -> AppResult<bool> {
        let deleted = self.store.delete(id);
        self.flush()?;
        Ok(deleted)
    }

    /// Delete the selected shape, if any.
    pub fn delete_selected(&mut self) -> AppResult<Option<ShapeId>> {
        let Some(id) = self.store.selected().map(|s| s.id.clone()) else {
            return Ok(None);
        };
        self.delete_shape(&id)?;
        Ok(Some(id))
    }

    pub fn toggle_visibility(&mut self, id: &str) -> AppResult<bool> {
        let toggled = self.store.toggle_visibility(id);
        self.flush()?;
        Ok(toggled)
    }

    pub fn select(&mut self, id: Option<ShapeId>) -> AppResult<()> {
        self.store.select(id);
        self.flush()?;
        Ok(())
    }

    pub fn clear(&mut self) -> AppResult<()> {
        self.store.clear();
        self.flush()?;
        Ok(())
    }

    /* ---------------- documents ---------------- */

    pub fn document(&self) -> ShapeDocument {
        ShapeDocument::new(self.store.list().to_vec())
    }

    /// Serialize the collection as a document.
    pub fn save_json(&self) -> AppResult<String> {
        Ok(self.document().to_json()?)
    }

    /// Replace the collection with a parsed document.
    ///
    /// Nothing changes if the document is malformed or repeats an id.
    /// Returns the number of loaded shapes.
    pub fn load_json(&mut self, json: &str) -> AppResult<usize> {
        let document = ShapeDocument::from_json(json)?;
        self.load_document(document)
    }

    pub fn load_document(&mut self, document: ShapeDocument) -> AppResult<usize> {
        self.store.load(document.shapes)?;
        self.controller.sync_ids(self.store.list());
        self.flush()?;
        Ok(self.store.len())
    }

    pub fn save_to(&self, storage: &impl Storage, name: &str) -> AppResult<()> {
        storage.save(name, &self.document())?;
        log::info!("Saved {} shapes as {}", self.store.len(), name);
        Ok(())
    }

    pub fn load_from(&mut self, storage: &impl Storage, name: &str) -> AppResult<usize> {
        let document = storage.load(name)?;
        self.load_document(document)
    }

    /// Release every scene resource and detach every listener.
    pub fn dispose(&mut self) -> AppResult<()> {
        self.controller.dispose(&mut self.scene, &mut self.surface)?;
        self.synchronizer.dispose_all(&mut self.scene)?;
        log::info!("Editor disposed");
        Ok(())
    }
}

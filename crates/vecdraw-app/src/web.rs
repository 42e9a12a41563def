//! WebAssembly entry point and browser bindings.
//!
//! JavaScript owns the DOM event listeners and the animation loop; it
//! forwards `clientX`/`clientY` of pointer events to [`WebEditor`] and calls
//! [`WebEditor::render`] once per frame.

use crate::editor::Editor;
use crate::error::AppError;
use kurbo::PathEl;
use peniko::Color;
use vecdraw_core::{EditorConfig, SurfaceRect, ToolKind};
use vecdraw_render::{Paint, PointerOutcome, RenderContext, RenderResult, Renderer, RendererError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Initialize panic reporting and logging once the module loads.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Vecdraw WASM module loaded");
}

fn to_js(error: AppError) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

/// CSS `rgba()` string for a color.
fn css_color(color: Color) -> String {
    let c = color.to_rgba8();
    format!("rgba({}, {}, {}, {:.3})", c.r, c.g, c.b, c.a as f64 / 255.0)
}

/// Paints draw lists onto a 2D canvas context.
struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    fn paint(&self, ctx: &RenderContext) -> Result<(), JsValue> {
        let list = ctx.draw_list();
        let dpr = ctx.scale_factor;
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;

        self.ctx.set_fill_style_str(&css_color(list.background));
        self.ctx.fill_rect(0.0, 0.0, list.size.width, list.size.height);

        for command in &list.commands {
            self.ctx.begin_path();
            for el in command.path.elements() {
                match *el {
                    PathEl::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                    PathEl::LineTo(p) => self.ctx.line_to(p.x, p.y),
                    PathEl::QuadTo(c, p) => self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                    PathEl::CurveTo(c1, c2, p) => {
                        self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                    }
                    PathEl::ClosePath => self.ctx.close_path(),
                }
            }
            match command.paint {
                Paint::Stroke { color, width } => {
                    self.ctx.set_stroke_style_str(&css_color(color));
                    self.ctx.set_line_width(width);
                    self.ctx.stroke();
                }
                Paint::Fill { color } => {
                    self.ctx.set_fill_style_str(&css_color(color));
                    self.ctx.fill();
                }
            }
        }
        Ok(())
    }
}

impl Renderer for CanvasPainter {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.paint(ctx)
            .map_err(|e| RendererError::RenderFailed(format!("{:?}", e)))
    }
}

/// An editor bound to one `<canvas>` element.
#[wasm_bindgen]
pub struct WebEditor {
    editor: Editor,
    canvas: HtmlCanvasElement,
    painter: CanvasPainter,
}

#[wasm_bindgen]
impl WebEditor {
    /// Bind to a canvas. `config` is an optional JSON editor config.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config: Option<String>) -> Result<WebEditor, JsValue> {
        let config = match config {
            Some(json) => EditorConfig::from_json(&json).map_err(|e| to_js(e.into()))?,
            None => EditorConfig::default(),
        };
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut web_editor = WebEditor {
            editor: Editor::new(config).map_err(to_js)?,
            canvas,
            painter: CanvasPainter { ctx },
        };
        web_editor.refresh_rect();
        Ok(web_editor)
    }

    /// Re-read the canvas position and size, and resize its backing store.
    #[wasm_bindgen(js_name = refreshRect)]
    pub fn refresh_rect(&mut self) {
        let bounds = self.canvas.get_bounding_client_rect();
        let rect = SurfaceRect::new(bounds.left(), bounds.top(), bounds.width(), bounds.height());
        if rect.is_degenerate() {
            return;
        }
        let dpr = device_pixel_ratio();
        self.canvas.set_width((rect.width * dpr).round() as u32);
        self.canvas.set_height((rect.height * dpr).round() as u32);
        self.editor.set_surface_rect(rect);
    }

    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, tool: &str) -> Result<(), JsValue> {
        let tool: ToolKind = tool
            .parse()
            .map_err(|_| to_js(AppError::UnknownTool(tool.to_string())))?;
        self.editor.set_tool(tool).map_err(to_js)
    }

    pub fn tool(&self) -> String {
        self.editor.tool().name().to_string()
    }

    /// Returns the id of a committed or selected shape, if any.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, client_x: f64, client_y: f64) -> Result<Option<String>, JsValue> {
        self.refresh_rect();
        let outcome = self.editor.pointer_down(client_x, client_y).map_err(to_js)?;
        Ok(outcome_id(outcome))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) -> Result<(), JsValue> {
        self.editor.pointer_move(client_x, client_y).map_err(to_js)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, client_x: f64, client_y: f64) -> Result<Option<String>, JsValue> {
        let outcome = self.editor.pointer_up(client_x, client_y).map_err(to_js)?;
        Ok(outcome_id(outcome))
    }

    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&mut self, client_x: f64, client_y: f64) -> Result<Option<String>, JsValue> {
        let outcome = self.editor.double_click(client_x, client_y).map_err(to_js)?;
        Ok(outcome_id(outcome))
    }

    /// Paint the current scene.
    pub fn render(&mut self) -> Result<(), JsValue> {
        self.editor
            .render(&mut self.painter, device_pixel_ratio())
            .map_err(to_js)
    }

    /// The shape collection as a JSON array, for side panels.
    #[wasm_bindgen(js_name = shapesJson)]
    pub fn shapes_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.editor.shapes()).map_err(|e| to_js(e.into()))
    }

    #[wasm_bindgen(js_name = selectedId)]
    pub fn selected_id(&self) -> Option<String> {
        self.editor.selected().map(|s| s.id.clone())
    }

    pub fn select(&mut self, id: Option<String>) -> Result<(), JsValue> {
        self.editor.select(id).map_err(to_js)
    }

    /// Replace one shape record, given as JSON. Returns false if its id is unknown.
    #[wasm_bindgen(js_name = updateShape)]
    pub fn update_shape(&mut self, json: &str) -> Result<bool, JsValue> {
        let shape = serde_json::from_str(json).map_err(|e| to_js(e.into()))?;
        self.editor.update_shape(shape).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, id: &str, color: &str) -> Result<bool, JsValue> {
        self.editor.set_color(id, color).map_err(to_js)
    }

    #[wasm_bindgen(js_name = toggleVisibility)]
    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool, JsValue> {
        self.editor.toggle_visibility(id).map_err(to_js)
    }

    #[wasm_bindgen(js_name = deleteShape)]
    pub fn delete_shape(&mut self, id: &str) -> Result<bool, JsValue> {
        self.editor.delete_shape(id).map_err(to_js)
    }

    #[wasm_bindgen(js_name = deleteSelected)]
    pub fn delete_selected(&mut self) -> Result<Option<String>, JsValue> {
        self.editor.delete_selected().map_err(to_js)
    }

    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.editor.clear().map_err(to_js)
    }

    #[wasm_bindgen(js_name = saveJson)]
    pub fn save_json(&self) -> Result<String, JsValue> {
        self.editor.save_json().map_err(to_js)
    }

    /// Replace the collection with a document. Returns the shape count.
    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&mut self, json: &str) -> Result<usize, JsValue> {
        self.editor.load_json(json).map_err(to_js)
    }

    /// Release scene resources. The editor must not be used afterwards.
    pub fn dispose(&mut self) -> Result<(), JsValue> {
        self.editor.dispose().map_err(to_js)
    }
}

fn outcome_id(outcome: PointerOutcome) -> Option<String> {
    match outcome {
        PointerOutcome::Committed(id) => Some(id),
        PointerOutcome::Selected(id) => id,
        PointerOutcome::Ignored | PointerOutcome::Consumed => None,
    }
}

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
}

//! Renderer trait abstraction.

use crate::draw_list::DrawList;
use crate::scene::Scene;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;
use vecdraw_core::camera::Camera;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a Scene,
    /// The camera looking at it.
    pub camera: &'a Camera,
    /// Viewport size in CSS pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Stroke width of outlines, in CSS pixels.
    pub stroke_width: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(scene: &'a Scene, camera: &'a Camera, viewport_size: Size) -> Self {
        Self {
            scene,
            camera,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            stroke_width: 1.0,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    /// Flatten the scene for this frame.
    pub fn draw_list(&self) -> DrawList {
        DrawList::build(
            self.scene,
            self.camera,
            self.viewport_size,
            self.background_color,
            self.stroke_width,
        )
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, a browser 2D context, or simply record
/// the frame.
pub trait Renderer {
    /// Build the command buffer for a frame.
    ///
    /// Called once per frame with the latest scene state.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;
}

/// Renderer that keeps the last frame's draw list, for headless use.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    last_frame: Option<DrawList>,
    frames: u64,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&DrawList> {
        self.last_frame.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for RecordingRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.last_frame = Some(ctx.draw_list());
        self.frames += 1;
        Ok(())
    }
}

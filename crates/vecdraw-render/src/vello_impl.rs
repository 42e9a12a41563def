//! Vello-based renderer implementation.

use crate::draw_list::Paint;
use crate::renderer::{RenderContext, RenderResult, Renderer};
use kurbo::{Affine, Rect, Stroke};
use peniko::Fill;
use vello::Scene;

/// Vello-based renderer for GPU-accelerated 2D graphics.
#[derive(Default)]
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.scene.reset();
        let list = ctx.draw_list();
        let transform = Affine::scale(ctx.scale_factor);

        self.scene.fill(
            Fill::NonZero,
            transform,
            list.background,
            None,
            &Rect::from_origin_size((0.0, 0.0), list.size),
        );

        for command in &list.commands {
            match command.paint {
                Paint::Stroke { color, width } => {
                    self.scene
                        .stroke(&Stroke::new(width), transform, color, None, &command.path);
                }
                Paint::Fill { color } => {
                    self.scene
                        .fill(Fill::NonZero, transform, color, None, &command.path);
                }
            }
        }
        Ok(())
    }
}

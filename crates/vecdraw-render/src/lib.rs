//! Vecdraw Render Library
//!
//! The retained scene, shape visuals, drawing sessions, scene
//! synchronization, hit testing and renderer backends.

pub mod draw_list;
pub mod factory;
pub mod hit_test;
pub mod interaction;
mod renderer;
pub mod scene;
pub mod synchronizer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use draw_list::{DrawCommand, DrawList, Paint};
pub use factory::{CIRCLE_SEGMENTS, build_visual};
pub use hit_test::{Hit, HitTester};
pub use interaction::{
    DrawingSession, InteractionError, PointerOutcome, PreviewStyle, ShapeSink, ToolController,
};
pub use renderer::{RecordingRenderer, RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{NodeId, Scene, SceneError, Visual};
pub use synchronizer::{SceneSynchronizer, SyncReport, VisualRegistry};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;

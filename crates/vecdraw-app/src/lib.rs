//! Vecdraw Application
//!
//! The editor shell wiring the shape store, scene, synchronizer and tool
//! controller together, plus the browser bindings and a headless scenario
//! runner.

mod editor;
mod error;
pub mod scenario;

pub use editor::Editor;
pub use error::{AppError, AppResult};
pub use scenario::{Scenario, Step};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebEditor, run_wasm};

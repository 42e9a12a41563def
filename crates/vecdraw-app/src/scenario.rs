//! Scripted editor sessions.
//!
//! A scenario is a JSON file with an optional editor config, an optional
//! initial document and a list of steps. Pointer coordinates are client
//! pixels, exactly as a browser would report them.
//!
//! ```json
//! {
//!   "config": { "width": 800, "height": 600 },
//!   "steps": [
//!     { "action": "tool", "tool": "line" },
//!     { "action": "down", "x": 400, "y": 300 },
//!     { "action": "move", "x": 450, "y": 300 },
//!     { "action": "up", "x": 500, "y": 300 }
//!   ]
//! }
//! ```

use crate::editor::Editor;
use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use vecdraw_core::{EditorConfig, ShapeDocument, ShapeId, ToolKind};

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Step {
    Tool { tool: ToolKind },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    DoubleClick { x: f64, y: f64 },
    /// Down then up at the same spot.
    Click { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
    Select { id: Option<ShapeId> },
    Delete { id: ShapeId },
    DeleteSelected,
    ToggleVisibility { id: ShapeId },
    SetColor { id: ShapeId, color: String },
    Clear,
}

impl Step {
    pub fn apply(&self, editor: &mut Editor) -> AppResult<()> {
        match self {
            Step::Tool { tool } => editor.set_tool(*tool)?,
            Step::Down { x, y } => {
                editor.pointer_down(*x, *y)?;
            }
            Step::Move { x, y } => {
                editor.pointer_move(*x, *y)?;
            }
            Step::Up { x, y } => {
                editor.pointer_up(*x, *y)?;
            }
            Step::DoubleClick { x, y } => {
                editor.double_click(*x, *y)?;
            }
            Step::Click { x, y } => {
                editor.pointer_down(*x, *y)?;
                editor.pointer_up(*x, *y)?;
            }
            Step::Resize { width, height } => editor.resize(*width, *height),
            Step::Select { id } => editor.select(id.clone())?,
            Step::Delete { id } => {
                if !editor.delete_shape(id)? {
                    log::warn!("Delete of unknown shape {}", id);
                }
            }
            Step::DeleteSelected => {
                editor.delete_selected()?;
            }
            Step::ToggleVisibility { id } => {
                if !editor.toggle_visibility(id)? {
                    log::warn!("Visibility toggle of unknown shape {}", id);
                }
            }
            Step::SetColor { id, color } => {
                if !editor.set_color(id, color)? {
                    log::warn!("Color change of unknown shape {}", id);
                }
            }
            Step::Clear => editor.clear()?,
        }
        Ok(())
    }
}

/// A config, a starting document and the steps to replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub config: EditorConfig,
    pub document: Option<ShapeDocument>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replay every step on a fresh editor and return it.
    pub fn run(&self) -> AppResult<Editor> {
        let mut editor = Editor::new(self.config.clone())?;
        if let Some(document) = &self.document {
            editor.load_document(document.clone())?;
        }
        for (index, step) in self.steps.iter().enumerate() {
            log::debug!("Step {}: {:?}", index, step);
            step.apply(&mut editor)?;
        }
        Ok(editor)
    }
}

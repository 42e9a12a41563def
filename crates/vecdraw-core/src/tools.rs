//! Editor tools.

use crate::shapes::ShapeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Line,
    Circle,
    Ellipse,
    Polyline,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Select,
        ToolKind::Line,
        ToolKind::Circle,
        ToolKind::Ellipse,
        ToolKind::Polyline,
    ];

    /// Name used by the toolbar and in scenario files.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Line => "line",
            ToolKind::Circle => "circle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Polyline => "polyline",
        }
    }

    /// The shape kind a drawing tool produces; `None` for select.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Select => None,
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            ToolKind::Polyline => Some(ShapeKind::Polyline),
        }
    }

    pub fn is_drawing(self) -> bool {
        self.shape_kind().is_some()
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown tool: {s}"))
    }
}

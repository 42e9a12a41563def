//! Shape records for the editor.
//!
//! A [`Shape`] is the authoritative record held by the shape store. It pairs the
//! attributes every kind shares (`id`, `visible`, `color`) with a kind-specific
//! [`Geometry`]. The JSON form is flat: `{"id": .., "type": "line", "start": ..}`.

mod circle;
mod ellipse;
mod line;
mod polyline;

pub use circle::Circle;
pub use ellipse::Ellipse;
pub use line::Line;
pub use polyline::Polyline;

use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for shapes, formatted as `<Kind>-<N>`.
pub type ShapeId = String;

/// Default stroke color for new and loaded shapes.
pub const DEFAULT_COLOR: &str = "#000000";

fn default_visible() -> bool {
    true
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// The closed set of shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Circle,
    Ellipse,
    Polyline,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Line,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Polyline,
    ];

    /// Lowercase tag used in the `type` field of the JSON format.
    pub fn tag(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Polyline => "polyline",
        }
    }

    /// Capitalized prefix used when generating ids (`Line-3`).
    pub fn id_prefix(self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Circle => "Circle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Polyline => "Polyline",
        }
    }

    /// Reverse of [`ShapeKind::id_prefix`].
    pub fn from_id_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id_prefix() == prefix)
    }

    /// Position of this kind in [`ShapeKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            ShapeKind::Line => 0,
            ShapeKind::Circle => 1,
            ShapeKind::Ellipse => 2,
            ShapeKind::Polyline => 3,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.tag() == s)
            .ok_or_else(|| format!("unknown shape kind: {s}"))
    }
}

/// Kind-specific geometry, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Line(Line),
    Circle(Circle),
    Ellipse(Ellipse),
    Polyline(Polyline),
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Line(_) => ShapeKind::Line,
            Geometry::Circle(_) => ShapeKind::Circle,
            Geometry::Ellipse(_) => ShapeKind::Ellipse,
            Geometry::Polyline(_) => ShapeKind::Polyline,
        }
    }

    /// Whether the geometry can be turned into a visual: finite coordinates,
    /// non-negative radii and at least two polyline vertices.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Geometry::Line(g) => g.is_well_formed(),
            Geometry::Circle(g) => g.is_well_formed(),
            Geometry::Ellipse(g) => g.is_well_formed(),
            Geometry::Polyline(g) => g.is_well_formed(),
        }
    }
}

/// A shape record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Stable identifier, unique within a collection.
    pub id: ShapeId,
    /// Display state.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Hex stroke color (`#rrggbb`).
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(flatten)]
    pub geometry: Geometry,
}

impl Shape {
    /// Create a visible black shape.
    pub fn new(id: impl Into<ShapeId>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            visible: true,
            color: default_color(),
            geometry,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Fill attributes left empty by a caller with their defaults.
    pub(crate) fn normalize(&mut self) {
        if self.color.trim().is_empty() {
            self.color = default_color();
        }
    }

    /// Parsed stroke color, falling back to black for unparseable strings.
    pub fn stroke(&self) -> Color {
        parse_hex_color(&self.color).unwrap_or(Color::BLACK)
    }
}

/// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` string.
pub fn parse_hex_color(color: &str) -> Option<Color> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let r = channel(&hex[0..1])? * 17;
            let g = channel(&hex[1..2])? * 17;
            let b = channel(&hex[2..3])? * 17;
            Some(Color::from_rgba8(r, g, b, 255))
        }
        6 => Some(Color::from_rgba8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        )),
        8 => Some(Color::from_rgba8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

pub(crate) fn point_is_finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

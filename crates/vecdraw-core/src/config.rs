//! Editor configuration.

use crate::camera::Camera;
use crate::shapes::parse_hex_color;
use kurbo::Size;
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid color for {field}: {value}")]
    InvalidColor { field: &'static str, value: String },
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

/// Editor configuration. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
    pub camera_near: f64,
    pub camera_far: f64,
    pub camera_z: f64,
    /// How far (world units) a pick may land from a stroke and still hit it.
    pub hit_tolerance: f64,
    /// Stroke width (pixels) used when painting shape outlines.
    pub stroke_width: f64,
    /// Fill tint of the circle preview disk.
    pub preview_fill_color: String,
    pub preview_fill_opacity: f32,
    /// Outline color of drawing previews.
    pub preview_stroke_color: String,
    /// Depth added per shape so later shapes sit above earlier ones.
    pub depth_step: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            background_color: "#fafafa".to_string(),
            camera_near: 0.1,
            camera_far: 1000.0,
            camera_z: 10.0,
            hit_tolerance: 3.0,
            stroke_width: 1.0,
            preview_fill_color: "#0077ff".to_string(),
            preview_fill_opacity: 0.3,
            preview_stroke_color: "#000000".to_string(),
            depth_step: 0.001,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.background()?;
        self.preview_fill()?;
        self.preview_stroke()?;
        if !(self.camera_near < self.camera_far) {
            return Err(ConfigError::InvalidValue {
                field: "cameraNear",
                reason: "must be less than cameraFar",
            });
        }
        if !(self.hit_tolerance >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "hitTolerance",
                reason: "must be non-negative",
            });
        }
        if !(self.depth_step > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "depthStep",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    pub fn viewport(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Camera matching this config's viewport and clip planes.
    pub fn camera(&self) -> Camera {
        let mut camera = Camera::from_viewport(self.viewport(), self.camera_near, self.camera_far);
        camera.z = self.camera_z;
        camera
    }

    pub fn background(&self) -> Result<Color, ConfigError> {
        color_field("backgroundColor", &self.background_color)
    }

    pub fn preview_fill(&self) -> Result<Color, ConfigError> {
        color_field("previewFillColor", &self.preview_fill_color)
            .map(|c| c.multiply_alpha(self.preview_fill_opacity))
    }

    pub fn preview_stroke(&self) -> Result<Color, ConfigError> {
        color_field("previewStrokeColor", &self.preview_stroke_color)
    }
}

fn color_field(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    parse_hex_color(value).ok_or_else(|| ConfigError::InvalidColor {
        field,
        value: value.to_string(),
    })
}

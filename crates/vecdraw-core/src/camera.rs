//! Orthographic camera and screen-to-world mapping.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default distance of the camera from the drawing plane.
pub const DEFAULT_CAMERA_Z: f64 = 10.0;

/// Orthographic camera looking down the negative z axis at the drawing plane.
///
/// The frustum is expressed in world units relative to `position`. With the
/// default setup one world unit maps to one CSS pixel and the world origin
/// sits in the middle of the viewport, Y up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub near: f64,
    pub far: f64,
    /// Pan offset in world units.
    pub position: Vec2,
    /// Distance from the drawing plane (z = 0).
    pub z: f64,
    /// Current zoom level; 1.0 shows one world unit per pixel.
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_viewport(Size::new(2.0, 2.0), 0.1, 1000.0)
    }
}

impl Camera {
    /// Frustum covering `size` centered on the origin.
    pub fn from_viewport(size: Size, near: f64, far: f64) -> Self {
        Self {
            left: -size.width / 2.0,
            right: size.width / 2.0,
            top: size.height / 2.0,
            bottom: -size.height / 2.0,
            near,
            far,
            position: Vec2::ZERO,
            z: DEFAULT_CAMERA_Z,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }

    /// Rebuild the frustum for a new viewport size.
    ///
    /// Zero-sized viewports (a collapsed container) are ignored so the
    /// projection never degenerates. Returns whether anything changed.
    pub fn resize(&mut self, size: Size) -> bool {
        if size.width <= 0.0 || size.height <= 0.0 {
            return false;
        }
        self.left = -size.width / 2.0;
        self.right = size.width / 2.0;
        self.top = size.height / 2.0;
        self.bottom = -size.height / 2.0;
        true
    }

    /// Width and height of the visible region in world units.
    pub fn visible_size(&self) -> Size {
        Size::new(
            (self.right - self.left) / self.zoom,
            (self.top - self.bottom) / self.zoom,
        )
    }

    /// Un-project a clip-space point (`[-1, 1]` on both axes, Y up) onto the drawing plane.
    pub fn ndc_to_world(&self, ndc: Point) -> Point {
        let half_w = (self.right - self.left) / 2.0;
        let half_h = (self.top - self.bottom) / 2.0;
        let cx = (self.right + self.left) / 2.0;
        let cy = (self.top + self.bottom) / 2.0;
        Point::new(
            self.position.x + (cx + ndc.x * half_w) / self.zoom,
            self.position.y + (cy + ndc.y * half_h) / self.zoom,
        )
    }

    /// Project a world point into clip space.
    pub fn world_to_ndc(&self, world: Point) -> Point {
        let half_w = (self.right - self.left) / 2.0;
        let half_h = (self.top - self.bottom) / 2.0;
        let cx = (self.right + self.left) / 2.0;
        let cy = (self.top + self.bottom) / 2.0;
        Point::new(
            ((world.x - self.position.x) * self.zoom - cx) / half_w,
            ((world.y - self.position.y) * self.zoom - cy) / half_h,
        )
    }

    /// Ray through a clip-space point: origin on the camera plane, pointing at the drawing plane.
    pub fn ray(&self, ndc: Point) -> Ray {
        Ray {
            origin: self.ndc_to_world(ndc),
            origin_z: self.z,
        }
    }

    /// Pan the camera by a delta in world units.
    pub fn pan(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Zoom the camera, keeping the given clip-space point fixed.
    pub fn zoom_at(&mut self, ndc: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let anchor = self.ndc_to_world(ndc);
        self.zoom = new_zoom;
        let moved = self.ndc_to_world(ndc);
        self.position += anchor - moved;
    }

    /// Reset pan and zoom.
    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
        self.zoom = 1.0;
    }
}

/// A ray cast straight down the z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Where the ray crosses the drawing plane.
    pub origin: Point,
    /// Z coordinate the ray starts from.
    pub origin_z: f64,
}

impl Ray {
    /// Distance along the ray to a point lying at depth `z`.
    pub fn distance_to(&self, z: f64) -> f64 {
        self.origin_z - z
    }
}

/// Bounding rectangle of the element receiving pointer events, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rect anchored at the client origin.
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Normalize a client-space point into clip space, flipping Y.
///
/// Returns `None` for a degenerate rect.
pub fn screen_to_ndc(client: Point, rect: &SurfaceRect) -> Option<Point> {
    if rect.is_degenerate() {
        return None;
    }
    Some(Point::new(
        (client.x - rect.left) / rect.width * 2.0 - 1.0,
        -((client.y - rect.top) / rect.height) * 2.0 + 1.0,
    ))
}

/// Map a pointer position to the drawing plane through `camera`.
///
/// Call this on every event: the camera or the element rect may have changed
/// since the previous one.
pub fn world_point(client: Point, rect: &SurfaceRect, camera: &Camera) -> Option<Point> {
    screen_to_ndc(client, rect).map(|ndc| camera.ndc_to_world(ndc))
}

/// Inverse of [`world_point`], used by the draw list.
pub fn world_to_screen(world: Point, rect: &SurfaceRect, camera: &Camera) -> Point {
    let ndc = camera.world_to_ndc(world);
    Point::new(
        rect.left + (ndc.x + 1.0) / 2.0 * rect.width,
        rect.top + (1.0 - ndc.y) / 2.0 * rect.height,
    )
}

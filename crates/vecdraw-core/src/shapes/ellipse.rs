//! Ellipse shape.

use super::point_is_finite;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// An axis-aligned ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    /// Center point.
    pub center: Point,
    /// Horizontal radius.
    pub radius_x: f64,
    /// Vertical radius.
    pub radius_y: f64,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
        }
    }

    /// Ellipse centered at `center` whose radii reach `corner` on each axis.
    pub fn from_center_corner(center: Point, corner: Point) -> Self {
        Self::new(
            center,
            (corner.x - center.x).abs(),
            (corner.y - center.y).abs(),
        )
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        point_is_finite(self.center)
            && self.radius_x.is_finite()
            && self.radius_y.is_finite()
            && self.radius_x >= 0.0
            && self.radius_y >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipse_creation() {
        let ellipse = Ellipse::new(Point::new(50.0, 50.0), 30.0, 20.0);
        assert!((ellipse.center.x - 50.0).abs() < f64::EPSILON);
        assert!((ellipse.radius_x - 30.0).abs() < f64::EPSILON);
        assert!((ellipse.radius_y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_center_corner_uses_absolute_offsets() {
        let e = Ellipse::from_center_corner(Point::new(10.0, 10.0), Point::new(4.0, 13.0));
        assert!((e.radius_x - 6.0).abs() < f64::EPSILON);
        assert!((e.radius_y - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_uses_camel_case_radii() {
        let ellipse = Ellipse::new(Point::ZERO, 4.0, 2.0);
        let value = serde_json::to_value(ellipse).unwrap();
        assert_eq!(value["radiusX"], 4.0);
        assert_eq!(value["radiusY"], 2.0);
        assert!(!Ellipse::new(Point::ZERO, -4.0, 2.0).is_well_formed());
    }
}

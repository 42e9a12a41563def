//! Circle shape.

use super::point_is_finite;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A circle given by center and radius. A zero radius is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center point.
    pub center: Point,
    /// Radius in world units.
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Circle centered at `center` passing through `rim`.
    pub fn through(center: Point, rim: Point) -> Self {
        Self::new(center, center.distance(rim))
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        point_is_finite(self.center) && self.radius.is_finite() && self.radius >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_through() {
        let c = Circle::through(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((c.radius - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_radius_is_malformed() {
        assert!(Circle::new(Point::ZERO, 0.0).is_well_formed());
        assert!(!Circle::new(Point::ZERO, -1.0).is_well_formed());
    }
}

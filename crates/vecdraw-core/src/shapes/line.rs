//! Line shape.

use super::point_is_finite;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A straight segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        point_is_finite(self.start) && point_is_finite(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_length_is_well_formed() {
        let p = Point::new(3.0, 3.0);
        assert!(Line::new(p, p).is_well_formed());
        assert!(!Line::new(p, Point::new(f64::NAN, 0.0)).is_well_formed());
    }

    #[test]
    fn test_json_field_names() {
        let line = Line::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0));
        let value = serde_json::to_value(line).unwrap();
        assert_eq!(value["start"]["x"], 1.0);
        assert_eq!(value["end"]["y"], 4.0);
    }
}

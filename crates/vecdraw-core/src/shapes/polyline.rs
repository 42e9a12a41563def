//! Polyline shape.

use super::point_is_finite;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// An open path through `points`, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    /// Minimum number of vertices a committed polyline keeps.
    pub const MIN_POINTS: usize = 2;

    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.points.len() >= Self::MIN_POINTS && self.points.iter().all(|p| point_is_finite(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_is_malformed() {
        assert!(!Polyline::new(vec![Point::ZERO]).is_well_formed());
        assert!(Polyline::new(vec![Point::ZERO, Point::ZERO]).is_well_formed());
        assert!(!Polyline::new(vec![Point::ZERO, Point::new(f64::INFINITY, 1.0)]).is_well_formed());
    }
}

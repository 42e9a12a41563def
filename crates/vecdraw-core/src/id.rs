//! Per-kind shape id generation.

use crate::shapes::{Shape, ShapeId, ShapeKind};

/// Hands out ids of the form `<Kind>-<N>`, with an independent counter per kind.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    counters: [u64; ShapeKind::ALL.len()],
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next id for `kind`. The first id of each kind ends in `-1`.
    ///
    /// The counter saturates at `u64::MAX`; the store rejects the repeated id.
    pub fn next(&mut self, kind: ShapeKind) -> ShapeId {
        let counter = &mut self.counters[kind.index()];
        *counter = counter.saturating_add(1);
        format!("{}-{}", kind.id_prefix(), counter)
    }

    /// Current counter value for `kind` (the suffix of the last id issued).
    pub fn current(&self, kind: ShapeKind) -> u64 {
        self.counters[kind.index()]
    }

    /// Raise counters past every `<Kind>-<N>` id in `shapes`.
    ///
    /// Ids that do not follow the pattern are ignored, as are ids whose
    /// suffix is `u64::MAX` since no id can follow them. Counters never go down.
    pub fn sync_with(&mut self, shapes: &[Shape]) {
        for shape in shapes {
            let Some((kind, n)) = parse_id(&shape.id) else {
                continue;
            };
            if n == u64::MAX {
                log::warn!("Id {} leaves no room for new ids, not tracking it", shape.id);
                continue;
            }
            let counter = &mut self.counters[kind.index()];
            *counter = (*counter).max(n);
        }
    }
}

/// Split `Circle-12` into `(ShapeKind::Circle, 12)`.
fn parse_id(id: &str) -> Option<(ShapeKind, u64)> {
    let (prefix, number) = id.rsplit_once('-')?;
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let kind = ShapeKind::from_id_prefix(prefix)?;
    Some((kind, number.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Geometry, Line};
    use kurbo::Point;

    fn line(id: &str) -> Shape {
        Shape::new(id, Geometry::Line(Line::new(Point::ZERO, Point::ZERO)))
    }

    #[test]
    fn test_counters_are_per_kind() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next(ShapeKind::Line), "Line-1");
        assert_eq!(ids.next(ShapeKind::Line), "Line-2");
        assert_eq!(ids.next(ShapeKind::Circle), "Circle-1");
        assert_eq!(ids.next(ShapeKind::Polyline), "Polyline-1");
    }

    #[test]
    fn test_sync_with_loaded_shapes() {
        let mut ids = IdGenerator::new();
        let shapes = vec![
            line("Line-7"),
            line("Line-3"),
            Shape::new("Circle-2", Geometry::Circle(Circle::new(Point::ZERO, 1.0))),
            line("custom"),
            line("Rect-40"),
            line("Line-x"),
        ];
        ids.sync_with(&shapes);
        assert_eq!(ids.next(ShapeKind::Line), "Line-8");
        assert_eq!(ids.next(ShapeKind::Circle), "Circle-3");
        assert_eq!(ids.next(ShapeKind::Ellipse), "Ellipse-1");
    }

    #[test]
    fn test_sync_never_lowers_counter() {
        let mut ids = IdGenerator::new();
        for _ in 0..5 {
            ids.next(ShapeKind::Line);
        }
        ids.sync_with(&[line("Line-2")]);
        assert_eq!(ids.current(ShapeKind::Line), 5);
    }

    #[test]
    fn test_oversized_loaded_id_does_not_overflow() {
        let mut ids = IdGenerator::new();
        ids.sync_with(&[line("Line-18446744073709551615")]);
        assert_eq!(ids.next(ShapeKind::Line), "Line-1");

        ids.sync_with(&[line("Line-18446744073709551614")]);
        assert_eq!(ids.next(ShapeKind::Line), "Line-18446744073709551615");
        assert_eq!(ids.next(ShapeKind::Line), "Line-18446744073709551615");
        assert_eq!(ids.current(ShapeKind::Line), u64::MAX);
    }
}

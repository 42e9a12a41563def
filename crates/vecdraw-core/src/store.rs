//! The authoritative shape collection with change notification.

use crate::shapes::{Shape, ShapeId};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Errors surfaced by store mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Shape with id \"{0}\" already exists")]
    DuplicateId(ShapeId),
}

/// Handle returned by `subscribe*`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut()>;

/// Ordered shape collection plus single selection.
///
/// Shapes keep insertion order, which is also their draw order. Listeners
/// registered with [`ShapeStore::subscribe`] fire after every change to the
/// collection; selection listeners fire after every selection change.
#[derive(Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    selected: Option<ShapeId>,
    listeners: Vec<(SubscriptionId, Listener)>,
    selection_listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for ShapeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeStore")
            .field("shapes", &self.shapes)
            .field("selected", &self.selected)
            .field("listeners", &self.listeners.len())
            .field("selection_listeners", &self.selection_listeners.len())
            .finish()
    }
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /* ---------------- subscriptions ---------------- */

    /// Register a listener for collection changes.
    pub fn subscribe(&mut self, listener: impl FnMut() + 'static) -> SubscriptionId {
        let id = self.next_subscription_id();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Register a listener for selection changes.
    pub fn subscribe_selection(&mut self, listener: impl FnMut() + 'static) -> SubscriptionId {
        let id = self.next_subscription_id();
        self.selection_listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener of either kind. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len() + self.selection_listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.selection_listeners.retain(|(sid, _)| *sid != id);
        before != self.listeners.len() + self.selection_listeners.len()
    }

    fn next_subscription_id(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener();
        }
    }

    fn notify_selection(&mut self) {
        for (_, listener) in &mut self.selection_listeners {
            listener();
        }
    }

    /* ---------------- shapes ---------------- */

    /// Append a shape. Fails without touching the collection if the id is taken.
    pub fn add(&mut self, mut shape: Shape) -> Result<(), StoreError> {
        if self.contains(&shape.id) {
            return Err(StoreError::DuplicateId(shape.id));
        }
        shape.normalize();
        log::debug!("Adding shape {}", shape.id);
        self.shapes.push(shape);
        self.notify();
        Ok(())
    }

    /// Replace the record with the same id. Returns false (and does nothing) if absent.
    pub fn update(&mut self, mut shape: Shape) -> bool {
        let Some(existing) = self.shapes.iter_mut().find(|s| s.id == shape.id) else {
            return false;
        };
        shape.normalize();
        *existing = shape;
        self.notify();
        true
    }

    /// Remove a shape. Clears the selection if it pointed at the removed shape.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.shapes.iter().position(|s| s.id == id) else {
            return false;
        };
        self.shapes.remove(index);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.notify_selection();
        }
        self.notify();
        true
    }

    /// Flip the `visible` flag of a shape. Returns false if absent.
    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        let Some(shape) = self.shapes.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        shape.visible = !shape.visible;
        self.notify();
        true
    }

    /// Remove every shape and clear the selection.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.selected = None;
        self.notify();
        self.notify_selection();
    }

    /// Replace the whole collection.
    ///
    /// All-or-nothing: if `shapes` contains a repeated id the store is left
    /// untouched and the error names the first duplicate.
    pub fn load(&mut self, shapes: Vec<Shape>) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        for shape in &shapes {
            if !seen.insert(shape.id.as_str()) {
                return Err(StoreError::DuplicateId(shape.id.clone()));
            }
        }
        self.shapes = shapes;
        for shape in &mut self.shapes {
            shape.normalize();
        }
        self.selected = None;
        log::info!("Loaded {} shapes", self.shapes.len());
        self.notify();
        self.notify_selection();
        Ok(())
    }

    /// Shapes in insertion order.
    pub fn list(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /* ---------------- selection ---------------- */

    /// Set or clear the selection. Always notifies selection listeners.
    pub fn select(&mut self, id: Option<ShapeId>) {
        self.selected = id;
        self.notify_selection();
    }

    /// The selected shape, if the selected id still names a shape.
    pub fn selected(&self) -> Option<&Shape> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Geometry, Line};
    use kurbo::Point;
    use std::cell::Cell;
    use std::rc::Rc;

    fn line(id: &str) -> Shape {
        Shape::new(
            id,
            Geometry::Line(Line::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0))),
        )
    }

    fn counter(store: &mut ShapeStore) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        store.subscribe(move || c.set(c.get() + 1));
        count
    }

    #[test]
    fn test_add_and_list_keeps_order() {
        let mut store = ShapeStore::new();
        store.add(line("Line-1")).unwrap();
        store.add(line("Line-2")).unwrap();
        let ids: Vec<_> = store.list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["Line-1", "Line-2"]);
    }

    #[test]
    fn test_duplicate_add_fails_and_keeps_size() {
        let mut store = ShapeStore::new();
        store.add(line("Line-1")).unwrap();
        let err = store.add(line("Line-1")).unwrap_err();
        assert_eq!(err, StoreError::DuplicateId("Line-1".into()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_fills_empty_color() {
        let mut store = ShapeStore::new();
        store.add(line("Line-1").with_color("")).unwrap();
        assert_eq!(store.get("Line-1").unwrap().color, "#000000");
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut store = ShapeStore::new();
        let count = counter(&mut store);
        assert!(!store.update(line("Line-9")));
        assert!(store.is_empty());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_update_replaces_record() {
        let mut store = ShapeStore::new();
        store.add(line("Line-1")).unwrap();
        let count = counter(&mut store);
        assert!(store.update(line("Line-1").with_color("#ff0000")));
        assert_eq!(store.get("Line-1").unwrap().color, "#ff0000");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_selection_clears_on_delete() {
        let mut store = ShapeStore::new();
        store.add(line("Line-1")).unwrap();
        let selection_events = Rc::new(Cell::new(0));
        let c = selection_events.clone();
        store.subscribe_selection(move || c.set(c.get() + 1));

        store.select(Some("Line-1".into()));
        assert!(store.is_selected("Line-1"));
        assert!(store.delete("Line-1"));
        assert!(store.selected().is_none());
        assert_eq!(selection_events.get(), 2);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = ShapeStore::new();
        store.add(line("Line-1")).unwrap();
        assert!(!store.delete("Line-2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_toggle_visibility() {
        let mut store = ShapeStore::new();
        store.add(line("Line-1")).unwrap();
        assert!(store.toggle_visibility("Line-1"));
        assert!(!store.get("Line-1").unwrap().visible);
        assert!(!store.toggle_visibility("Line-2"));
    }

    #[test]
    fn test_load_is_all_or_nothing() {
        let mut store = ShapeStore::new();
        store.add(line("Line-1")).unwrap();
        let result = store.load(vec![line("Line-5"), line("Line-5")]);
        assert!(result.is_err());
        assert_eq!(store.len(), 1);
        assert!(store.contains("Line-1"));

        store.select(Some("Line-1".into()));
        let circle = Shape::new("Circle-1", Geometry::Circle(Circle::new(Point::ZERO, 2.0)));
        store.load(vec![circle]).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_selected_of_missing_id_is_none() {
        let mut store = ShapeStore::new();
        store.select(Some("Line-3".into()));
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = ShapeStore::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let id = store.subscribe(move || c.set(c.get() + 1));
        store.add(line("Line-1")).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add(line("Line-2")).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = ShapeStore::new();
        store.add(line("Line-1")).unwrap();
        store.select(Some("Line-1".into()));
        store.clear();
        assert!(store.is_empty());
        assert!(store.selected().is_none());
    }
}

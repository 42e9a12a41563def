//! Pointer events and the element that receives them.

use crate::camera::SurfaceRect;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pointer event kinds a listener can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Down,
    Move,
    Up,
    DoubleClick,
}

impl PointerKind {
    /// The DOM event name.
    pub fn dom_name(self) -> &'static str {
        match self {
            PointerKind::Down => "pointerdown",
            PointerKind::Move => "pointermove",
            PointerKind::Up => "pointerup",
            PointerKind::DoubleClick => "dblclick",
        }
    }
}

/// Pointer event in client (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    #[serde(rename = "dblclick")]
    DoubleClick { position: Point },
}

impl PointerEvent {
    pub fn kind(&self) -> PointerKind {
        match self {
            PointerEvent::Down { .. } => PointerKind::Down,
            PointerEvent::Move { .. } => PointerKind::Move,
            PointerEvent::Up { .. } => PointerKind::Up,
            PointerEvent::DoubleClick { .. } => PointerKind::DoubleClick,
        }
    }

    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position }
            | PointerEvent::DoubleClick { position } => position,
        }
    }
}

/// Handle for a set of attached listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// The canvas element as seen by the interaction layer.
///
/// Tracks the element's bounding rect (used for every coordinate mapping)
/// and which listeners are attached for which event kinds. An event is only
/// delivered while some listener wants its kind; detaching a listener is how
/// a drawing session stops receiving input.
#[derive(Debug, Clone, Default)]
pub struct InputSurface {
    rect: SurfaceRect,
    listeners: BTreeMap<ListenerId, Vec<PointerKind>>,
    next_listener: u64,
}

impl InputSurface {
    pub fn new(rect: SurfaceRect) -> Self {
        Self {
            rect,
            ..Self::default()
        }
    }

    pub fn rect(&self) -> &SurfaceRect {
        &self.rect
    }

    /// Update the bounding rect, e.g. after a layout change or scroll.
    pub fn set_rect(&mut self, rect: SurfaceRect) {
        self.rect = rect;
    }

    /// Register a listener for `kinds`.
    pub fn attach(&mut self, kinds: &[PointerKind]) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, kinds.to_vec());
        log::debug!("Attached listener {:?} for {:?}", id, kinds);
        id
    }

    /// Remove a listener. Returns false if it was already detached.
    pub fn detach(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(&id).is_some();
        if removed {
            log::debug!("Detached listener {:?}", id);
        }
        removed
    }

    pub fn is_attached(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Whether `id` is attached and registered for `kind`.
    pub fn listens(&self, id: ListenerId, kind: PointerKind) -> bool {
        self.listeners
            .get(&id)
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    /// Whether any attached listener wants `kind`.
    pub fn wants(&self, kind: PointerKind) -> bool {
        self.listeners.values().any(|kinds| kinds.contains(&kind))
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

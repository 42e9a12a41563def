//! Vecdraw Core Library
//!
//! Platform-agnostic data structures for the vecdraw editor: shape records,
//! the shape store, the document format, storage, camera and input types.

pub mod camera;
pub mod config;
pub mod document;
pub mod id;
pub mod input;
pub mod shapes;
pub mod storage;
pub mod store;
pub mod tools;

pub use camera::{Camera, Ray, SurfaceRect, screen_to_ndc, world_point, world_to_screen};
pub use config::{ConfigError, EditorConfig};
pub use document::{DocumentError, ShapeDocument};
pub use id::IdGenerator;
pub use input::{InputSurface, ListenerId, PointerEvent, PointerKind};
pub use shapes::{Circle, Ellipse, Geometry, Line, Polyline, Shape, ShapeId, ShapeKind};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use store::{ShapeStore, StoreError, SubscriptionId};
pub use tools::ToolKind;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;

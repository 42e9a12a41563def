//! Application error type.

use thiserror::Error;
use vecdraw_core::{ConfigError, DocumentError, StorageError, StoreError};
use vecdraw_render::{InteractionError, RendererError, SceneError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Interaction(#[from] InteractionError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

use std::io;

use thiserror::Error;

use crate::data::LoadError;
use crate::storage::StoreError;

/// Error type for game startup and terminal handling.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to load fallback questions: {0}")]
    Load(#[from] LoadError),
    #[error("question store unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

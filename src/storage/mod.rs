//! Flat key-value persistence.
//!
//! Values are opaque strings (JSON-encoded records in practice). Expiry is
//! the reader's business; stores only keep what they are given.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store file {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store file {path} is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    fn delete(&mut self, key: &str) -> Result<(), StoreError>;

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

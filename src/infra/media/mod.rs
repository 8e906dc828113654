//! External object storage for avatars and post images.
//!
//! Only a [`PhotoRef`] (provider id + URL) is persisted; the bytes live with the provider.

pub mod cloudinary;
pub mod memory;

pub use cloudinary::CloudinaryStorage;
pub use memory::MemoryObjectStorage;

use crate::domain::model::PhotoRef;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("object storage rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("object storage unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected object storage response: {0}")]
    InvalidResponse(String),
}

/// A file received from a client, not yet stored.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores the file under `folder` and returns its reference.
    async fn upload(&self, folder: &str, upload: Upload) -> Result<PhotoRef, MediaError>;

    /// Deletes the object. Deleting an object that does not exist succeeds.
    async fn delete(&self, id: &str) -> Result<(), MediaError>;

    /// Verifies credentials and reachability.
    async fn check(&self) -> Result<(), MediaError>;
}

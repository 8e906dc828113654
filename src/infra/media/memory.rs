use crate::domain::model::PhotoRef;
use crate::infra::media::{MediaError, ObjectStorage, Upload};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Keeps uploaded objects in process memory. Used by tests and `MEDIA_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryObjectStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.objects.lock().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(&self, folder: &str, upload: Upload) -> Result<PhotoRef, MediaError> {
        let id = format!("{}/{}", folder, Uuid::new_v4().simple());
        let secure_url = format!("memory://{}", id);
        self.objects.lock().await.insert(id.clone(), upload.bytes);
        Ok(PhotoRef { id, secure_url })
    }

    async fn delete(&self, id: &str) -> Result<(), MediaError> {
        self.objects.lock().await.remove(id);
        Ok(())
    }

    async fn check(&self) -> Result<(), MediaError> {
        Ok(())
    }
}

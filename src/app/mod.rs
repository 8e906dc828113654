//! Application operations, one service per component, wired over a shared store and
//! object storage.

pub mod accounts;
pub mod cascade;
pub mod engagement;
pub mod graph;
pub mod posts;
pub mod session;

pub use accounts::{AccountService, ProfileInput, SignupInput};
pub use cascade::CascadeOrchestrator;
pub use engagement::EngagementService;
pub use graph::GraphService;
pub use posts::PostService;
pub use session::{Identity, SessionIssuer, SESSION_COOKIE};

use crate::crypto::TokenCodec;
use crate::infra::config::{AppConfig, MediaBackend, StoreBackend};
use crate::infra::media::{CloudinaryStorage, MemoryObjectStorage, ObjectStorage};
use crate::storage::{MemorySocialStore, PgSocialStore, SocialStore};
use anyhow::Context;
use std::sync::Arc;

/// Upload folders in object storage.
#[derive(Debug, Clone)]
pub struct MediaFolders {
    pub avatars: String,
    pub posts: String,
}

#[derive(Clone)]
pub struct AppServices {
    pub accounts: AccountService,
    pub sessions: SessionIssuer,
    pub posts: PostService,
    pub engagement: EngagementService,
    pub graph: GraphService,
    pub cascade: CascadeOrchestrator,
    store: Arc<dyn SocialStore>,
    media: Arc<dyn ObjectStorage>,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn SocialStore>,
        media: Arc<dyn ObjectStorage>,
        tokens: TokenCodec,
        folders: MediaFolders,
    ) -> Self {
        let cascade = CascadeOrchestrator::new(store.clone(), media.clone());
        Self {
            accounts: AccountService::new(
                store.clone(),
                media.clone(),
                cascade.clone(),
                folders.avatars,
            ),
            sessions: SessionIssuer::new(Arc::new(tokens), store.clone()),
            posts: PostService::new(store.clone(), media.clone(), cascade.clone(), folders.posts),
            engagement: EngagementService::new(store.clone()),
            graph: GraphService::new(store.clone()),
            cascade,
            store,
            media,
        }
    }

    /// Connects the configured backends and wires every service over them.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store = connect_store(config).await?;
        let media = connect_media(config)?;
        let tokens = TokenCodec::new(&config.jwt_secret, config.jwt_expiry);
        let folders = MediaFolders {
            avatars: config.user_folder.clone(),
            posts: config.post_folder.clone(),
        };
        Ok(Self::new(store, media, tokens, folders))
    }

    pub fn store(&self) -> &Arc<dyn SocialStore> {
        &self.store
    }

    pub fn media(&self) -> &Arc<dyn ObjectStorage> {
        &self.media
    }
}

pub async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn SocialStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres backend")?;
            let store = PgSocialStore::connect(url, config.database_max_connections).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => Ok(Arc::new(MemorySocialStore::new())),
    }
}

pub fn connect_media(config: &AppConfig) -> anyhow::Result<Arc<dyn ObjectStorage>> {
    match config.media_backend {
        MediaBackend::Cloudinary => {
            let cloudinary = config
                .cloudinary
                .clone()
                .context("Cloudinary credentials must be set for the cloudinary backend")?;
            Ok(Arc::new(CloudinaryStorage::new(cloudinary)?))
        }
        MediaBackend::Memory => Ok(Arc::new(MemoryObjectStorage::new())),
    }
}

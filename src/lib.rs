pub mod app;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{AppServices, CascadeOrchestrator};
pub use error::{AppError, AppResult, AuthFailure};
pub use infra::config::AppConfig;
pub use infra::media::{MemoryObjectStorage, ObjectStorage};
pub use storage::{MemorySocialStore, PgSocialStore, SocialStore};

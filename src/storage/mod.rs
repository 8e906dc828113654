//! Persistence for users, posts, likes, comments and the follow graph.
//!
//! [`SocialStore`] is the seam between the operations in `app` and a concrete backend:
//! [`PgSocialStore`] for PostgreSQL and [`MemorySocialStore`] for tests and local runs.

pub mod memory;
pub mod postgres;

pub use memory::MemorySocialStore;
pub use postgres::PgSocialStore;

use crate::domain::model::{
    Comment, Like, NewComment, NewPost, NewUser, PostFilter, PostRecord, ProfileChanges,
    UserRecord,
};
use crate::domain::{DeletionPlan, DeletionReport, Toggle};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    /// Names the missing entity kind (`"User"`, `"Post"`, ...).
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Attempts a toggle makes before giving up on a pair that keeps changing underneath it.
pub const TOGGLE_ATTEMPTS: usize = 8;

#[async_trait]
pub trait SocialStore: Send + Sync {
    /// Cheap round trip used by health checks.
    async fn ping(&self) -> StoreResult<()>;

    // --- users ---

    /// Fails with `DuplicateEmail` if the email is taken.
    async fn insert_user(&self, user: NewUser) -> StoreResult<UserRecord>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;
    async fn list_users(&self) -> StoreResult<Vec<UserRecord>>;
    /// Users among `ids` that exist, in no particular order.
    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<UserRecord>>;
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> StoreResult<UserRecord>;
    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<()>;

    // --- follow graph ---

    /// Flips `actor -> target`. Both users must exist.
    async fn toggle_follow(&self, actor: Uuid, target: Uuid) -> StoreResult<Toggle>;

    // --- posts ---

    async fn insert_post(&self, post: NewPost) -> StoreResult<PostRecord>;
    async fn find_post(&self, id: Uuid) -> StoreResult<Option<PostRecord>>;
    /// Posts in creation order.
    async fn list_posts(&self, filter: PostFilter) -> StoreResult<Vec<PostRecord>>;

    // --- likes and comments ---

    /// Flips the like of `user_id` on `post_id`, returning the created or removed record.
    async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> StoreResult<(Toggle, Like)>;
    async fn likes_on_posts(&self, post_ids: &[Uuid]) -> StoreResult<Vec<Like>>;
    async fn likes_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Like>>;

    /// Creates the comment and appends its id to the post. Fails with `NotFound` if the post is gone.
    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Comment>;
    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;
    /// Removes the comment and splices it out of its post. `None` if it was already gone.
    async fn delete_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;
    async fn comments_on_posts(&self, post_ids: &[Uuid]) -> StoreResult<Vec<Comment>>;
    async fn comments_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Comment>>;

    // --- cascades ---

    /// Applies every step of `plan` as one unit (transaction or single lock).
    async fn apply_deletion(&self, plan: &DeletionPlan) -> StoreResult<DeletionReport>;
}

use crate::domain::model::user::{PhotoRef, UserSummary};
use crate::domain::refs::RefList;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Stored post document. `likes` and `comments` hold join-record ids in creation order.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Author id.
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub content: String,
    pub photo: Option<PhotoRef>,
    #[schema(value_type = Vec<String>)]
    pub likes: RefList,
    #[schema(value_type = Vec<String>)]
    pub comments: RefList,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub content: String,
    pub photo: Option<PhotoRef>,
}

/// Which posts a listing returns.
#[derive(Debug, Clone)]
pub enum PostFilter {
    All,
    ByAuthor(Uuid),
}

/// A like as embedded in a post listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LikeView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
}

/// A comment as embedded in a post listing, with its author resolved.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: UserSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Post joined at read time with its author, likes and comments.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: UserSummary,
    pub content: String,
    pub photo: Option<PhotoRef>,
    pub likes: Vec<LikeView>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

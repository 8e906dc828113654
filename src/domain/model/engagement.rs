use crate::domain::model::post::PostView;
use crate::domain::model::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Join record: `user_id` likes `post_id`. At most one per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "post")]
    pub post_id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "post")]
    pub post_id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

/// A like made by some user, with the liked post resolved.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikedPost {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    pub post: PostView,
    pub created_at: DateTime<Utc>,
}

/// A comment made by some user, with the commenter and the post resolved.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentedPost {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: UserSummary,
    pub content: String,
    pub post: PostView,
    pub created_at: DateTime<Utc>,
}

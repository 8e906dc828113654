use crate::app::AppServices;
use crate::domain::model::{Comment, CommentedPost, LikedPost, PostView, User, UserSummary};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub services: AppServices,
}

impl AppState {
    pub fn new(services: AppServices) -> Self {
        Self { services }
    }
}

// --- request bodies (JSON or multipart text fields) ---

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub day: String,
    pub month: String,
    pub year: String,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub day: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct DeleteAccountRequest {
    pub password: String,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct PostContentRequest {
    pub content: String,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct FollowQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

// --- responses ---

#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UpdatedUserResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<User>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub success: bool,
    pub user_one: User,
    pub message: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct FollowsResponse {
    pub success: bool,
    pub follows: Vec<UserSummary>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct FollowersResponse {
    pub success: bool,
    pub followers: Vec<UserSummary>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PostsResponse {
    pub success: bool,
    pub posts: Vec<PostView>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PostResponse {
    pub success: bool,
    pub message: String,
    pub post: PostView,
}

/// `success` is `true` when the post is now liked and `false` when the like was removed.
#[derive(Serialize, Debug, ToSchema)]
pub struct LikeToggleResponse {
    pub success: bool,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CommentResponse {
    pub success: bool,
    pub message: String,
    pub comment: Comment,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikedPostsResponse {
    pub success: bool,
    pub liked_posts: Vec<LikedPost>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentedPostsResponse {
    pub success: bool,
    pub commented_posts: Vec<CommentedPost>,
}

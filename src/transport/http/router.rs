use crate::domain::model::{
    Comment, CommentView, CommentedPost, DateOfBirth, LikeView, LikedPost, PhotoRef, PostView,
    User, UserSummary,
};
use crate::transport::http::handlers::{health, posts, users};
use crate::transport::http::types::{
    AppState, ChangePasswordRequest, CommentRequest, CommentResponse, CommentedPostsResponse,
    DeleteAccountRequest, ErrorResponse, FollowResponse, FollowersResponse, FollowsResponse,
    HealthResponse, LikeToggleResponse, LikedPostsResponse, LoginRequest, LoginResponse,
    MessageResponse, PostContentRequest, PostResponse, PostsResponse, SignupRequest,
    UpdateProfileRequest, UpdatedUserResponse, UserResponse, UsersResponse,
};
use axum::routing::{delete, get, post, put};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::hello_handler,
        health::healthcheck_handler,
        users::signup_handler,
        users::login_handler,
        users::logout_handler,
        users::me_handler,
        users::list_users_handler,
        users::toggle_follow_handler,
        users::my_follows_handler,
        users::my_followers_handler,
        users::update_profile_handler,
        users::change_password_handler,
        users::delete_account_handler,
        posts::all_posts_handler,
        posts::following_posts_handler,
        posts::posts_by_author_handler,
        posts::add_post_handler,
        posts::delete_post_handler,
        posts::toggle_like_handler,
        posts::add_comment_handler,
        posts::delete_comment_handler,
        posts::liked_posts_handler,
        posts::commented_posts_handler
    ),
    components(schemas(
        ErrorResponse,
        MessageResponse,
        HealthResponse,
        SignupRequest,
        LoginRequest,
        LoginResponse,
        UpdateProfileRequest,
        ChangePasswordRequest,
        DeleteAccountRequest,
        UserResponse,
        UpdatedUserResponse,
        UsersResponse,
        FollowResponse,
        FollowsResponse,
        FollowersResponse,
        PostContentRequest,
        PostResponse,
        PostsResponse,
        LikeToggleResponse,
        CommentRequest,
        CommentResponse,
        LikedPostsResponse,
        CommentedPostsResponse,
        User,
        UserSummary,
        DateOfBirth,
        PhotoRef,
        PostView,
        LikeView,
        CommentView,
        Comment,
        LikedPost,
        CommentedPost
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/signup", post(users::signup_handler))
        .route("/login", post(users::login_handler))
        .route("/logout", get(users::logout_handler))
        .route("/me", get(users::me_handler))
        .route("/all", get(users::list_users_handler))
        .route("/follow", put(users::toggle_follow_handler))
        .route("/myfollows", get(users::my_follows_handler))
        .route("/myfollowers", get(users::my_followers_handler))
        .route("/update", put(users::update_profile_handler))
        .route("/updatepassword", put(users::change_password_handler))
        .route("/delete", delete(users::delete_account_handler));

    // `/comment/:id` is the post id for POST and the comment id for DELETE.
    let post_routes = Router::new()
        .route("/all", get(posts::all_posts_handler))
        .route("/following", get(posts::following_posts_handler))
        .route("/mine/:id", get(posts::posts_by_author_handler))
        .route("/mylikes/:id", get(posts::liked_posts_handler))
        .route("/mycomments/:id", get(posts::commented_posts_handler))
        .route("/add", post(posts::add_post_handler))
        .route("/like/:id", put(posts::toggle_like_handler))
        .route(
            "/comment/:id",
            post(posts::add_comment_handler).delete(posts::delete_comment_handler),
        )
        .route("/:id", delete(posts::delete_post_handler));

    Router::new()
        .route("/", get(health::hello_handler))
        .route("/health", get(health::healthcheck_handler))
        .nest("/user", user_routes)
        .nest("/post", post_routes)
        .with_state(app_state)
}

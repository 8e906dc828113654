use crate::error::AppResult;
use crate::transport::http::extract::{parse_id, AuthUser, FormData};
use crate::transport::http::types::{
    AppState, CommentRequest, CommentResponse, CommentedPostsResponse, ErrorResponse,
    LikeToggleResponse, LikedPostsResponse, MessageResponse, PostContentRequest, PostResponse,
    PostsResponse,
};
use axum::extract::{Path, State};
use axum::Json;

#[utoipa::path(
    get,
    path = "/post/all",
    responses((status = 200, description = "Every post, oldest first", body = PostsResponse))
)]
pub async fn all_posts_handler(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
) -> AppResult<Json<PostsResponse>> {
    let posts = state.services.posts.list_all().await?;
    Ok(Json(PostsResponse {
        success: true,
        posts,
    }))
}

#[utoipa::path(
    get,
    path = "/post/following",
    responses((status = 200, description = "Posts of accounts the caller follows", body = PostsResponse))
)]
pub async fn following_posts_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<PostsResponse>> {
    let posts = state.services.posts.list_following(&identity).await?;
    Ok(Json(PostsResponse {
        success: true,
        posts,
    }))
}

#[utoipa::path(
    get,
    path = "/post/mine/{id}",
    params(("id" = String, Path, description = "Author id")),
    responses((status = 200, description = "Posts by the author; empty for an unknown author", body = PostsResponse))
)]
pub async fn posts_by_author_handler(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<PostsResponse>> {
    let author = parse_id(&id)?;
    let posts = state.services.posts.list_by_author(author).await?;
    Ok(Json(PostsResponse {
        success: true,
        posts,
    }))
}

#[utoipa::path(
    post,
    path = "/post/add",
    request_body = PostContentRequest,
    responses(
        (status = 200, description = "Post created", body = PostResponse),
        (status = 400, description = "Content outside 1..=500 characters", body = ErrorResponse)
    )
)]
pub async fn add_post_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    form: FormData<PostContentRequest>,
) -> AppResult<Json<PostResponse>> {
    let post = state
        .services
        .posts
        .create(&identity, &form.fields.content, form.file)
        .await?;
    Ok(Json(PostResponse {
        success: true,
        message: "New Post added".to_string(),
        post,
    }))
}

#[utoipa::path(
    delete,
    path = "/post/{postId}",
    params(("postId" = String, Path, description = "Post to delete")),
    responses(
        (status = 200, description = "Post and its likes and comments deleted", body = MessageResponse),
        (status = 403, description = "Caller is not the author", body = ErrorResponse),
        (status = 404, description = "Unknown post", body = ErrorResponse)
    )
)]
pub async fn delete_post_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(post_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let post_id = parse_id(&post_id)?;
    state.services.posts.delete(&identity, post_id).await?;
    Ok(Json(MessageResponse::ok("Your Post deleted")))
}

#[utoipa::path(
    put,
    path = "/post/like/{postId}",
    params(("postId" = String, Path, description = "Post to like or unlike")),
    responses(
        (status = 200, description = "`success: true` when now liked, `false` when unliked", body = LikeToggleResponse),
        (status = 404, description = "Unknown post", body = ErrorResponse)
    )
)]
pub async fn toggle_like_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(post_id): Path<String>,
) -> AppResult<Json<LikeToggleResponse>> {
    let post_id = parse_id(&post_id)?;
    let (toggle, _like) = state
        .services
        .engagement
        .toggle_like(&identity, post_id)
        .await?;
    Ok(Json(LikeToggleResponse {
        success: toggle.is_linked(),
    }))
}

#[utoipa::path(
    post,
    path = "/post/comment/{postId}",
    params(("postId" = String, Path, description = "Post to comment on")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Empty or too long comment", body = ErrorResponse),
        (status = 404, description = "Unknown post", body = ErrorResponse)
    )
)]
pub async fn add_comment_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(post_id): Path<String>,
    form: FormData<CommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    let post_id = parse_id(&post_id)?;
    let comment = state
        .services
        .engagement
        .add_comment(&identity, post_id, &form.fields.content)
        .await?;
    Ok(Json(CommentResponse {
        success: true,
        message: "Comment Added".to_string(),
        comment,
    }))
}

#[utoipa::path(
    delete,
    path = "/post/comment/{commentId}",
    params(("commentId" = String, Path, description = "Comment to delete")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 403, description = "Caller wrote neither the comment nor the post", body = ErrorResponse),
        (status = 404, description = "Unknown comment", body = ErrorResponse)
    )
)]
pub async fn delete_comment_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(comment_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let comment_id = parse_id(&comment_id)?;
    state
        .services
        .engagement
        .delete_comment(&identity, comment_id)
        .await?;
    Ok(Json(MessageResponse::ok("Comment Deleted")))
}

#[utoipa::path(
    get,
    path = "/post/mylikes/{id}",
    params(("id" = String, Path, description = "Account whose likes to list")),
    responses((status = 200, description = "Likes with the liked posts", body = LikedPostsResponse))
)]
pub async fn liked_posts_handler(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<LikedPostsResponse>> {
    let user_id = parse_id(&id)?;
    let liked_posts = state.services.posts.liked_by(user_id).await?;
    Ok(Json(LikedPostsResponse {
        success: true,
        liked_posts,
    }))
}

#[utoipa::path(
    get,
    path = "/post/mycomments/{id}",
    params(("id" = String, Path, description = "Account whose comments to list")),
    responses((status = 200, description = "Comments with the commented posts; empty for an unknown account", body = CommentedPostsResponse))
)]
pub async fn commented_posts_handler(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<CommentedPostsResponse>> {
    let user_id = parse_id(&id)?;
    let commented_posts = state.services.posts.commented_by(user_id).await?;
    Ok(Json(CommentedPostsResponse {
        success: true,
        commented_posts,
    }))
}

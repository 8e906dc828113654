use crate::app::{ProfileInput, SignupInput};
use crate::domain::model::User;
use crate::error::{AppError, AppResult};
use crate::transport::http::extract::{parse_id, AuthUser, FormData};
use crate::transport::http::types::{
    AppState, ChangePasswordRequest, DeleteAccountRequest, ErrorResponse, FollowQuery,
    FollowResponse, FollowersResponse, FollowsResponse, LoginRequest, LoginResponse,
    MessageResponse, SignupRequest, UpdateProfileRequest, UpdatedUserResponse, UserResponse,
    UsersResponse,
};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::CookieJar;

#[utoipa::path(
    post,
    path = "/user/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid input or email already registered", body = ErrorResponse)
    )
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    form: FormData<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let SignupRequest {
        name,
        email,
        password,
        day,
        month,
        year,
    } = form.fields;
    state
        .services
        .accounts
        .signup(SignupInput {
            name,
            email,
            password,
            day,
            month,
            year,
            avatar: form.file,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok(
            "New user created, Please Login to continue !!!",
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; the token is also set as the `token` cookie", body = LoginResponse),
        (status = 400, description = "Incorrect password", body = ErrorResponse),
        (status = 404, description = "Unknown email", body = ErrorResponse)
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    form: FormData<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let services = &state.services;
    let user = services
        .accounts
        .login(&form.fields.email, &form.fields.password)
        .await?;
    let token = services.sessions.issue(user.id)?;
    let jar = CookieJar::new().add(services.sessions.session_cookie(&token));
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Logged In successfully !!".to_string(),
            token,
            user: User::from(user),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/user/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
pub async fn logout_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> impl IntoResponse {
    tracing::info!(user_id = %identity.id(), "user logged out");
    (
        CookieJar::new().add(state.services.sessions.cleared_cookie()),
        Json(MessageResponse::ok("User logout successfully")),
    )
}

#[utoipa::path(
    get,
    path = "/user/me",
    responses(
        (status = 200, description = "The caller's profile", body = UserResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
pub async fn me_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.accounts.me(&identity).await?;
    Ok(Json(UserResponse {
        success: true,
        user: User::from(user),
    }))
}

#[utoipa::path(
    get,
    path = "/user/all",
    responses(
        (status = 200, description = "Every account", body = UsersResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
) -> AppResult<Json<UsersResponse>> {
    let users = state.services.accounts.list().await?;
    Ok(Json(UsersResponse {
        success: true,
        users: users.into_iter().map(User::from).collect(),
    }))
}

#[utoipa::path(
    put,
    path = "/user/follow",
    params(("userId" = String, Query, description = "Account to follow or unfollow")),
    responses(
        (status = 200, description = "Follow toggled", body = FollowResponse),
        (status = 400, description = "Invalid or own id", body = ErrorResponse),
        (status = 404, description = "Unknown account", body = ErrorResponse)
    )
)]
pub async fn toggle_follow_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(query): Query<FollowQuery>,
) -> AppResult<Json<FollowResponse>> {
    let raw = query
        .user_id
        .ok_or_else(|| AppError::validation("userId is required"))?;
    let target = parse_id(&raw)?;
    let (state_after, me) = state.services.graph.toggle_follow(&identity, target).await?;
    let message = if state_after.is_linked() {
        "Started following"
    } else {
        "Stopped following"
    };
    Ok(Json(FollowResponse {
        success: true,
        user_one: User::from(me),
        message: message.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/user/myfollows",
    responses((status = 200, description = "Accounts the caller follows", body = FollowsResponse))
)]
pub async fn my_follows_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<FollowsResponse>> {
    let follows = state.services.graph.follows(&identity).await?;
    Ok(Json(FollowsResponse {
        success: true,
        follows,
    }))
}

#[utoipa::path(
    get,
    path = "/user/myfollowers",
    responses((status = 200, description = "Accounts following the caller", body = FollowersResponse))
)]
pub async fn my_followers_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<FollowersResponse>> {
    let followers = state.services.graph.followers(&identity).await?;
    Ok(Json(FollowersResponse {
        success: true,
        followers,
    }))
}

#[utoipa::path(
    put,
    path = "/user/update",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UpdatedUserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn update_profile_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    form: FormData<UpdateProfileRequest>,
) -> AppResult<Json<UpdatedUserResponse>> {
    let UpdateProfileRequest {
        name,
        email,
        day,
        month,
        year,
    } = form.fields;
    let user = state
        .services
        .accounts
        .update_profile(
            &identity,
            ProfileInput {
                name,
                email,
                day,
                month,
                year,
                avatar: form.file,
            },
        )
        .await?;
    Ok(Json(UpdatedUserResponse {
        success: true,
        message: "Info Updated".to_string(),
        user: User::from(user),
    }))
}

#[utoipa::path(
    put,
    path = "/user/updatepassword",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Old password incorrect or new password too short", body = ErrorResponse)
    )
)]
pub async fn change_password_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    form: FormData<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .accounts
        .change_password(&identity, &form.fields.old_password, &form.fields.new_password)
        .await?;
    Ok(Json(MessageResponse::ok("Password Updated")))
}

#[utoipa::path(
    delete,
    path = "/user/delete",
    request_body = DeleteAccountRequest,
    responses(
        (status = 200, description = "Account and everything it authored deleted", body = MessageResponse),
        (status = 400, description = "Password incorrect", body = ErrorResponse)
    )
)]
pub async fn delete_account_handler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    form: FormData<DeleteAccountRequest>,
) -> AppResult<impl IntoResponse> {
    let services = &state.services;
    services
        .accounts
        .delete_account(&identity, &form.fields.password)
        .await?;
    Ok((
        CookieJar::new().add(services.sessions.cleared_cookie()),
        Json(MessageResponse::ok("Your Account is deleted, #GoodBye")),
    ))
}

//! End-to-end flows through the HTTP router, backed by the in-memory store and object storage.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::Utc;
use common::{multipart, test_app, JWT_SECRET, PASSWORD};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

#[tokio::test]
async fn signup_login_post_follow_and_like() {
    let app = test_app();
    let (a_id, a_token) = app.register("user a", "a@x.com").await;
    let (b_id, b_token) = app.register("user b", "b@x.com").await;

    let reply = app
        .json(Method::POST, "/post/add", Some(&a_token), json!({ "content": "hello world" }))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["message"], "New Post added");
    assert_eq!(reply.body["post"]["content"], "hello world");
    assert_eq!(reply.body["post"]["user"]["name"], "User A");
    let post_id = reply.body["post"]["_id"].as_str().unwrap().to_string();

    let follow = format!("/user/follow?userId={}", a_id);
    let reply = app.send(Method::PUT, &follow, &b_token).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["message"], "Started following");
    assert_eq!(reply.body["userOne"]["follows"], json!([a_id]));

    let reply = app.get("/user/me", Some(&a_token)).await;
    assert_eq!(reply.body["user"]["followers"], json!([b_id]));

    let reply = app.get("/post/following", Some(&b_token)).await;
    assert_eq!(reply.body["posts"].as_array().unwrap().len(), 1);

    let reply = app.send(Method::PUT, &follow, &b_token).await;
    assert_eq!(reply.body["message"], "Stopped following");
    let reply = app.get("/user/me", Some(&a_token)).await;
    assert_eq!(reply.body["user"]["followers"], json!([]));

    let like = format!("/post/like/{}", post_id);
    let reply = app.send(Method::PUT, &like, &b_token).await;
    assert_eq!(reply.body["success"], true);
    let reply = app.get("/post/all", Some(&b_token)).await;
    assert_eq!(reply.body["posts"][0]["likes"][0]["user"], b_id);

    let reply = app.send(Method::PUT, &like, &b_token).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], false);
    let reply = app.get("/post/all", Some(&b_token)).await;
    assert_eq!(reply.body["posts"][0]["likes"], json!([]));
}

#[tokio::test]
async fn login_never_returns_the_password_hash() {
    let app = test_app();
    app.register("ada", "ada@x.com").await;
    let reply = app
        .json(
            Method::POST,
            "/user/login",
            None,
            json!({ "email": " ADA@x.com ", "password": PASSWORD }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["message"], "Logged In successfully !!");
    let user = reply.body["user"].as_object().unwrap();
    assert!(!user.contains_key("password"));
    assert!(!user.contains_key("passwordHash"));
    assert!(!reply.body.to_string().contains("$argon2"));

    let cookie = reply.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=None"));
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let app = test_app();
    app.register("ada", "ada@x.com").await;

    let reply = app
        .json(
            Method::POST,
            "/user/login",
            None,
            json!({ "email": "ada@x.com", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "Incorrect password. Please try again.");

    let reply = app
        .json(
            Method::POST,
            "/user/login",
            None,
            json!({ "email": "nobody@x.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_email_creates_no_record() {
    let app = test_app();
    app.register("ada", "ada@x.com").await;
    let reply = app
        .json(
            Method::POST,
            "/user/signup",
            None,
            json!({
                "name": "impostor",
                "email": "ADA@x.com",
                "password": "password456",
                "day": "2", "month": "March", "year": "1991"
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body["error"],
        "User already exist, Sign In instead or Try again !!"
    );

    let (_, token) = app.register("bob", "bob@x.com").await;
    let reply = app.get("/user/all", Some(&token)).await;
    assert_eq!(reply.body["users"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn signup_rejects_invalid_fields() {
    let app = test_app();
    let reply = app
        .json(
            Method::POST,
            "/user/signup",
            None,
            json!({ "name": "ada", "email": "not-an-email", "password": PASSWORD,
                    "day": "1", "month": "1", "year": "1990" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "Please enter valid email address");

    let reply = app
        .json(
            Method::POST,
            "/user/signup",
            None,
            json!({ "name": "ada", "email": "ada@x.com", "password": "short",
                    "day": "1", "month": "1", "year": "1990" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn content_outside_bounds_is_rejected_before_any_write() {
    let app = test_app();
    let (_, token) = app.register("ada", "ada@x.com").await;

    for content in [String::new(), "a".repeat(501)] {
        let (content_type, body) = multipart(&[("content", content.as_str())], Some(("pic.png", &b"png"[..])));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/post/add")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        let reply = app.call(request).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply.body["error"],
            "Content must be between 1 and 500 characters."
        );
    }

    assert!(app.media.is_empty().await);
    let reply = app.get("/post/all", Some(&token)).await;
    assert_eq!(reply.body["posts"], json!([]));

    let reply = app
        .json(Method::POST, "/post/add", Some(&token), json!({ "content": "a".repeat(500) }))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn missing_expired_and_forged_tokens_are_unauthorized() {
    let app = test_app();
    let (user_id, _) = app.register("ada", "ada@x.com").await;

    let reply = app.get("/user/me", None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "Unauthorized");

    let now = Utc::now().timestamp();
    let claims = json!({ "sub": user_id, "iat": now - 7200, "exp": now - 3600 });
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    let reply = app.get("/user/me", Some(&expired)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "Token expired, Please SignIn again");

    let claims = json!({ "sub": user_id, "iat": now, "exp": now + 3600 });
    let forged = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"someone else's secret"),
    )
    .unwrap();
    let reply = app.get("/user/me", Some(&forged)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "Unauthorized");
}

#[tokio::test]
async fn session_cookie_authenticates_and_logout_clears_it() {
    let app = test_app();
    let (_, token) = app.register("ada", "ada@x.com").await;

    let request = Request::builder()
        .uri("/user/logout")
        .header(header::COOKIE, format!("token={}", token))
        .body(Body::empty())
        .unwrap();
    let reply = app.call(request).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["message"], "User logout successfully");
    let cookie = reply.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn listings_use_document_ids_and_named_collections() {
    let app = test_app();
    let (a_id, a_token) = app.register("ada", "ada@x.com").await;
    let (b_id, b_token) = app.register("bob", "bob@x.com").await;
    let post_id = app.add_post(&a_token, "first").await;

    app.send(Method::PUT, &format!("/post/like/{}", post_id), &b_token)
        .await;
    app.json(
        Method::POST,
        &format!("/post/comment/{}", post_id),
        Some(&b_token),
        json!({ "content": "nice" }),
    )
    .await;

    let reply = app.get("/post/all", Some(&b_token)).await;
    let post = &reply.body["posts"][0];
    assert_eq!(post["_id"], post_id);
    assert!(post.get("id").is_none());
    assert_eq!(post["user"]["_id"], a_id);
    assert!(post["likes"][0]["_id"].is_string());
    assert_eq!(post["comments"][0]["user"]["_id"], b_id);

    let reply = app.get(&format!("/post/mylikes/{}", b_id), Some(&b_token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.get("likes").is_none());
    assert!(reply.body["likedPosts"][0]["_id"].is_string());
    assert_eq!(reply.body["likedPosts"][0]["post"]["_id"], post_id);

    let reply = app.get(&format!("/post/mycomments/{}", b_id), Some(&b_token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.get("comments").is_none());
    assert_eq!(reply.body["commentedPosts"][0]["content"], "nice");
    assert_eq!(reply.body["commentedPosts"][0]["post"]["_id"], post_id);
}

#[tokio::test]
async fn listings_for_an_unknown_user_are_empty() {
    let app = test_app();
    let (_, token) = app.register("ada", "ada@x.com").await;
    let stranger = uuid::Uuid::new_v4();

    let reply = app.get(&format!("/post/mine/{}", stranger), Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["posts"], json!([]));

    let reply = app.get(&format!("/post/mylikes/{}", stranger), Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["likedPosts"], json!([]));

    let reply = app.get(&format!("/post/mycomments/{}", stranger), Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["commentedPosts"], json!([]));
}

#[tokio::test]
async fn deleting_a_post_removes_its_likes_comments_and_image() {
    let app = test_app();
    let (_, a_token) = app.register("ada", "ada@x.com").await;
    let (b_id, b_token) = app.register("bob", "bob@x.com").await;

    let (content_type, body) = multipart(&[("content", "with a picture")], Some(("pic.png", &b"\x89PNG"[..])));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/post/add")
        .header(header::AUTHORIZATION, format!("Bearer {}", a_token))
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    let reply = app.call(request).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    let post_id = reply.body["post"]["_id"].as_str().unwrap().to_string();
    let image_id = reply.body["post"]["photo"]["id"].as_str().unwrap().to_string();
    assert!(app.media.contains(&image_id).await);

    app.send(Method::PUT, &format!("/post/like/{}", post_id), &b_token)
        .await;
    let reply = app
        .json(
            Method::POST,
            &format!("/post/comment/{}", post_id),
            Some(&b_token),
            json!({ "content": "  nice  " }),
        )
        .await;
    assert_eq!(reply.body["message"], "Comment Added");
    assert_eq!(reply.body["comment"]["content"], "nice");

    let reply = app.send(Method::DELETE, &format!("/post/{}", post_id), &b_token).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = app.send(Method::DELETE, &format!("/post/{}", post_id), &a_token).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["message"], "Your Post deleted");

    let reply = app.get(&format!("/post/mylikes/{}", b_id), Some(&b_token)).await;
    assert_eq!(reply.body["likedPosts"], json!([]));
    let reply = app.get(&format!("/post/mycomments/{}", b_id), Some(&b_token)).await;
    assert_eq!(reply.body["commentedPosts"], json!([]));
    assert!(!app.media.contains(&image_id).await);

    let reply = app.send(Method::DELETE, &format!("/post/{}", post_id), &a_token).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_can_be_deleted_by_their_author_or_the_post_author() {
    let app = test_app();
    let (_, a_token) = app.register("ada", "ada@x.com").await;
    let (_, b_token) = app.register("bob", "bob@x.com").await;
    let (_, c_token) = app.register("cy", "cy@x.com").await;
    let post_id = app.add_post(&a_token, "discuss").await;

    let mut comment_ids = Vec::new();
    for _ in 0..2 {
        let reply = app
            .json(
                Method::POST,
                &format!("/post/comment/{}", post_id),
                Some(&b_token),
                json!({ "content": "first!" }),
            )
            .await;
        comment_ids.push(reply.body["comment"]["_id"].as_str().unwrap().to_string());
    }

    let reply = app
        .send(Method::DELETE, &format!("/post/comment/{}", comment_ids[0]), &c_token)
        .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = app
        .send(Method::DELETE, &format!("/post/comment/{}", comment_ids[0]), &b_token)
        .await;
    assert_eq!(reply.body["message"], "Comment Deleted");
    let reply = app
        .send(Method::DELETE, &format!("/post/comment/{}", comment_ids[1]), &a_token)
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app.get("/post/all", Some(&a_token)).await;
    assert_eq!(reply.body["posts"][0]["comments"], json!([]));

    let reply = app
        .json(
            Method::POST,
            &format!("/post/comment/{}", post_id),
            Some(&b_token),
            json!({ "content": "   " }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_an_account_cascades_through_the_graph() {
    let app = test_app();
    let (a_id, a_token) = app.register("ada", "ada@x.com").await;
    let (b_id, b_token) = app.register("bob", "bob@x.com").await;
    let (c_id, c_token) = app.register("cy", "cy@x.com").await;

    // a <-> b, c -> a
    app.send(Method::PUT, &format!("/user/follow?userId={}", b_id), &a_token).await;
    app.send(Method::PUT, &format!("/user/follow?userId={}", a_id), &b_token).await;
    app.send(Method::PUT, &format!("/user/follow?userId={}", a_id), &c_token).await;

    let a_post = app.add_post(&a_token, "ada's post").await;
    let b_post = app.add_post(&b_token, "bob's post").await;
    app.send(Method::PUT, &format!("/post/like/{}", a_post), &c_token).await;
    app.send(Method::PUT, &format!("/post/like/{}", b_post), &a_token).await;
    app.json(
        Method::POST,
        &format!("/post/comment/{}", b_post),
        Some(&a_token),
        json!({ "content": "from ada" }),
    )
    .await;
    app.json(
        Method::POST,
        &format!("/post/comment/{}", a_post),
        Some(&c_token),
        json!({ "content": "on ada's post" }),
    )
    .await;

    let reply = app
        .json(Method::DELETE, "/user/delete", Some(&a_token), json!({ "password": "nope-nope" }))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .json(Method::DELETE, "/user/delete", Some(&a_token), json!({ "password": PASSWORD }))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["message"], "Your Account is deleted, #GoodBye");

    let reply = app.get("/user/me", Some(&a_token)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "User no longer exists");

    let reply = app.get("/user/me", Some(&b_token)).await;
    assert_eq!(reply.body["user"]["follows"], json!([]));
    assert_eq!(reply.body["user"]["followers"], json!([]));
    let reply = app.get("/user/me", Some(&c_token)).await;
    assert_eq!(reply.body["user"]["follows"], json!([]));

    let reply = app.get("/post/all", Some(&b_token)).await;
    let posts = reply.body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["_id"], b_post);
    assert_eq!(posts[0]["likes"], json!([]));
    assert_eq!(posts[0]["comments"], json!([]));

    let reply = app.get(&format!("/post/mylikes/{}", c_id), Some(&c_token)).await;
    assert_eq!(reply.body["likedPosts"], json!([]));
    let reply = app.get(&format!("/post/mycomments/{}", c_id), Some(&c_token)).await;
    assert_eq!(reply.body["commentedPosts"], json!([]));
}

#[tokio::test]
async fn profile_updates_replace_the_avatar() {
    let app = test_app();
    let (content_type, body) = multipart(
        &[
            ("name", "ada"),
            ("email", "ada@x.com"),
            ("password", PASSWORD),
            ("day", "10"),
            ("month", "December"),
            ("year", "1815"),
        ],
        Some(("me.png", &b"first"[..])),
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/user/signup")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    let reply = app.call(request).await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);

    let reply = app
        .json(
            Method::POST,
            "/user/login",
            None,
            json!({ "email": "ada@x.com", "password": PASSWORD }),
        )
        .await;
    let token = reply.body["token"].as_str().unwrap().to_string();
    let first_avatar = reply.body["user"]["photo"]["id"].as_str().unwrap().to_string();
    assert!(app.media.contains(&first_avatar).await);

    let (content_type, body) = multipart(&[("name", "ada lovelace")], Some(("new.png", &b"second"[..])));
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/user/update")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    let reply = app.call(request).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["message"], "Info Updated");
    assert_eq!(reply.body["user"]["name"], "Ada Lovelace");
    assert_eq!(reply.body["user"]["email"], "ada@x.com");
    assert_eq!(reply.body["user"]["dateOfBirth"]["year"], "1815");
    let second_avatar = reply.body["user"]["photo"]["id"].as_str().unwrap().to_string();

    assert!(!app.media.contains(&first_avatar).await);
    assert!(app.media.contains(&second_avatar).await);
    assert_eq!(app.media.len().await, 1);
}

#[tokio::test]
async fn password_change_requires_the_old_password() {
    let app = test_app();
    let (_, token) = app.register("ada", "ada@x.com").await;

    let reply = app
        .json(
            Method::PUT,
            "/user/updatepassword",
            Some(&token),
            json!({ "oldPassword": "not-it-at-all", "newPassword": "brand-new-pass" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "Old Password Incorrect");

    let reply = app
        .json(
            Method::PUT,
            "/user/updatepassword",
            Some(&token),
            json!({ "oldPassword": PASSWORD, "newPassword": "brand-new-pass" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["message"], "Password Updated");

    let reply = app
        .json(
            Method::POST,
            "/user/login",
            None,
            json!({ "email": "ada@x.com", "password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn follows_and_followers_are_listed_in_order() {
    let app = test_app();
    let (_, a_token) = app.register("ada", "ada@x.com").await;
    let (b_id, _) = app.register("bob", "bob@x.com").await;
    let (c_id, _) = app.register("cy", "cy@x.com").await;

    app.send(Method::PUT, &format!("/user/follow?userId={}", c_id), &a_token).await;
    app.send(Method::PUT, &format!("/user/follow?userId={}", b_id), &a_token).await;

    let reply = app.get("/user/myfollows", Some(&a_token)).await;
    let follows = reply.body["follows"].as_array().unwrap();
    assert_eq!(follows.len(), 2);
    assert_eq!(follows[0]["_id"], c_id);
    assert_eq!(follows[0]["name"], "Cy");
    assert_eq!(follows[1]["_id"], b_id);

    let reply = app.get("/user/myfollowers", Some(&a_token)).await;
    assert_eq!(reply.body["followers"], json!([]));
}

#[tokio::test]
async fn following_yourself_and_bad_ids_are_validation_errors() {
    let app = test_app();
    let (a_id, a_token) = app.register("ada", "ada@x.com").await;

    let reply = app
        .send(Method::PUT, &format!("/user/follow?userId={}", a_id), &a_token)
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app.send(Method::PUT, "/post/like/not-a-uuid", &a_token).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .send(Method::PUT, &format!("/post/like/{}", uuid::Uuid::new_v4()), &a_token)
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn liveness_routes() {
    let app = test_app();
    let reply = app.get("/", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!("Hello"));

    let reply = app.get("/health", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ok");
}

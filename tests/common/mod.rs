//! Shared helpers: an in-process router over memory backends and a tiny request builder.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chirpline::app::MediaFolders;
use chirpline::crypto::TokenCodec;
use chirpline::transport::http::{create_router, AppState};
use chirpline::{AppServices, MemoryObjectStorage, MemorySocialStore};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub router: Router,
    pub services: AppServices,
    pub store: Arc<MemorySocialStore>,
    pub media: Arc<MemoryObjectStorage>,
}

pub fn services_over(store: Arc<MemorySocialStore>, media: Arc<MemoryObjectStorage>) -> AppServices {
    AppServices::new(
        store,
        media,
        TokenCodec::new(JWT_SECRET, Duration::from_secs(3600)),
        MediaFolders {
            avatars: "avatars".to_string(),
            posts: "posts".to_string(),
        },
    )
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemorySocialStore::new());
    let media = Arc::new(MemoryObjectStorage::new());
    let services = services_over(store.clone(), media.clone());
    let router = create_router(AppState::new(services.clone()));
    TestApp {
        router,
        services,
        store,
        media,
    }
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn call(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        Reply {
            status,
            headers,
            body,
        }
    }

    pub async fn json(&self, method: Method, uri: &str, token: Option<&str>, body: Value) -> Reply {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.call(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Reply {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.call(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn send(&self, method: Method, uri: &str, token: &str) -> Reply {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.call(request).await
    }

    /// Signs up `email` and logs in, returning `(user id, token)`.
    pub async fn register(&self, name: &str, email: &str) -> (String, String) {
        let reply = self
            .json(
                Method::POST,
                "/user/signup",
                None,
                json!({
                    "name": name,
                    "email": email,
                    "password": PASSWORD,
                    "day": "1",
                    "month": "January",
                    "year": "1990"
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        let reply = self
            .json(
                Method::POST,
                "/user/login",
                None,
                json!({ "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        (
            reply.body["user"]["_id"].as_str().unwrap().to_string(),
            reply.body["token"].as_str().unwrap().to_string(),
        )
    }

    pub async fn add_post(&self, token: &str, content: &str) -> String {
        let reply = self
            .json(Method::POST, "/post/add", Some(token), json!({ "content": content }))
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        reply.body["post"]["_id"].as_str().unwrap().to_string()
    }
}

/// Builds a `multipart/form-data` body with text fields and an optional `file` part.
pub fn multipart(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let boundary = "X-CHIRPLINE-TEST-BOUNDARY";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                boundary, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    (format!("multipart/form-data; boundary={}", boundary), body)
}

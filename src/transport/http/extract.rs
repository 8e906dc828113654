//! Request extractors: the authenticated caller, form bodies with an optional file, and ids.

use crate::app::{Identity, SESSION_COOKIE};
use crate::error::AppError;
use crate::infra::media::Upload;
use crate::transport::http::types::AppState;
use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// Name of the multipart part carrying an uploaded image.
pub const FILE_FIELD: &str = "file";

/// The caller, resolved from a bearer token or the session cookie.
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = bearer_token(&parts.headers).or_else(|| cookie_token(&jar));
        let identity = state.services.sessions.resolve(token.as_deref()).await?;
        Ok(AuthUser(identity))
    }
}

/// Reads the token from `Authorization: Bearer <token>`, falling back to the `token` cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_token(&CookieJar::from_headers(headers)))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty() && *t != "null")
        .map(str::to_string)
}

fn cookie_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Text fields deserialized into `T`, plus the optional `file` part.
///
/// Accepts `multipart/form-data` or a JSON body (which never carries a file).
pub struct FormData<T> {
    pub fields: T,
    pub file: Option<Upload>,
}

#[async_trait]
impl<S, T> FromRequest<S> for FormData<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, AppError> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let Json(fields) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;
            return Ok(Self { fields, file: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        let mut text = Map::new();
        let mut file = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == FILE_FIELD {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(e.body_text()))?;
                if !bytes.is_empty() {
                    file = Some(Upload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(e.body_text()))?;
                text.insert(name, JsonValue::String(value));
            }
        }

        let fields = serde_json::from_value(JsonValue::Object(text))
            .map_err(|e| AppError::validation(format!("Invalid form body: {}", e)))?;
        Ok(Self { fields, file })
    }
}

/// Parses a path or query id.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::validation(format!("Invalid id: {}", raw)))
}

//! Session issuance and identity resolution.

use crate::crypto::TokenCodec;
use crate::domain::model::UserRecord;
use crate::error::{AppError, AppResult, AuthFailure};
use crate::storage::SocialStore;
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "token";

/// The authenticated caller, resolved from a verified token.
///
/// Operations take this value explicitly instead of reading ambient request state.
#[derive(Debug, Clone)]
pub struct Identity(UserRecord);

impl Identity {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn user(&self) -> &UserRecord {
        &self.0
    }

    pub fn into_user(self) -> UserRecord {
        self.0
    }
}

#[derive(Clone)]
pub struct SessionIssuer {
    codec: Arc<TokenCodec>,
    store: Arc<dyn SocialStore>,
}

impl SessionIssuer {
    pub fn new(codec: Arc<TokenCodec>, store: Arc<dyn SocialStore>) -> Self {
        Self { codec, store }
    }

    pub fn issue(&self, user_id: Uuid) -> AppResult<String> {
        Ok(self.codec.issue(user_id)?)
    }

    /// Verifies `token` and loads its subject.
    pub async fn resolve(&self, token: Option<&str>) -> AppResult<Identity> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized(AuthFailure::Missing))?;
        let user_id = self.codec.verify(token).map_err(AppError::Unauthorized)?;
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(AppError::Unauthorized(AuthFailure::UnknownUser))?;
        Ok(Identity(user))
    }

    /// Cookie carrying a fresh session token, valid for the token lifetime.
    pub fn session_cookie(&self, token: &str) -> Cookie<'static> {
        let max_age = i64::try_from(self.codec.ttl().as_secs()).unwrap_or(i64::MAX);
        session_cookie_with(token.to_string(), time::Duration::seconds(max_age))
    }

    /// Cookie that expires the session cookie immediately.
    pub fn cleared_cookie(&self) -> Cookie<'static> {
        session_cookie_with(String::new(), time::Duration::ZERO)
    }
}

/// The session cookie is sent cross-site, so it must be `Secure` with `SameSite=None`.
fn session_cookie_with(value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .max_age(max_age)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySocialStore;
    use std::time::Duration;

    fn issuer() -> SessionIssuer {
        SessionIssuer::new(
            Arc::new(TokenCodec::new("secret", Duration::from_secs(3600))),
            Arc::new(MemorySocialStore::new()),
        )
    }

    #[test]
    fn session_cookie_is_cross_site_and_http_only() {
        let cookie = issuer().session_cookie("abc.def.ghi");
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc.def.ghi");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let cookie = issuer().cleared_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert!(cookie.to_string().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn missing_and_unknown_subjects_are_rejected() {
        let issuer = issuer();
        assert!(matches!(
            issuer.resolve(None).await,
            Err(AppError::Unauthorized(AuthFailure::Missing))
        ));
        let token = issuer.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(
            issuer.resolve(Some(&token)).await,
            Err(AppError::Unauthorized(AuthFailure::UnknownUser))
        ));
    }
}

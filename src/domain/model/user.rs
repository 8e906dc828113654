use crate::domain::refs::RefList;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Reference to an image held by external object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PhotoRef {
    /// Identifier assigned by the storage provider (used for deletion).
    pub id: String,
    pub secure_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateOfBirth {
    pub day: String,
    pub month: String,
    pub year: String,
}

/// Stored user document, including the password hash.
///
/// Never serialized to clients; convert into [`User`] first.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub date_of_birth: DateOfBirth,
    pub photo: Option<PhotoRef>,
    pub follows: RefList,
    pub followers: RefList,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User profile as returned by the API (password elided).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub date_of_birth: DateOfBirth,
    pub photo: Option<PhotoRef>,
    #[schema(value_type = Vec<String>)]
    pub follows: RefList,
    #[schema(value_type = Vec<String>)]
    pub followers: RefList,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            date_of_birth: r.date_of_birth,
            photo: r.photo,
            follows: r.follows,
            followers: r.followers,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Short form used when embedding a user in another payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub photo: Option<PhotoRef>,
}

impl From<&UserRecord> for UserSummary {
    fn from(r: &UserRecord) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            email: r.email.clone(),
            photo: r.photo.clone(),
        }
    }
}

/// Insert payload for a new account. Fields are already normalized and validated.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub date_of_birth: DateOfBirth,
    pub photo: Option<PhotoRef>,
}

/// Partial profile update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<DateOfBirth>,
    pub photo: Option<PhotoRef>,
}

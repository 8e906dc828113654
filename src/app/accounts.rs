//! Credential store operations: signup, login, profile and password changes, account deletion.

use crate::app::cascade::CascadeOrchestrator;
use crate::app::session::Identity;
use crate::crypto::{hash_password, verify_password};
use crate::domain::model::{DateOfBirth, NewUser, ProfileChanges, UserRecord};
use crate::domain::validation::{
    normalize_email, normalize_name, validate_account, validate_email, validate_name,
    validate_password, AccountFields,
};
use crate::domain::DeletionReport;
use crate::error::{AppError, AppResult};
use crate::infra::media::{ObjectStorage, Upload};
use crate::storage::SocialStore;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub day: String,
    pub month: String,
    pub year: String,
    pub avatar: Option<Upload>,
}

/// Profile fields a user may change. Absent or blank fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub day: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub avatar: Option<Upload>,
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn SocialStore>,
    media: Arc<dyn ObjectStorage>,
    cascade: CascadeOrchestrator,
    avatar_folder: String,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn SocialStore>,
        media: Arc<dyn ObjectStorage>,
        cascade: CascadeOrchestrator,
        avatar_folder: String,
    ) -> Self {
        Self {
            store,
            media,
            cascade,
            avatar_folder,
        }
    }

    /// Creates an account. The email is checked before the avatar is uploaded.
    pub async fn signup(&self, input: SignupInput) -> AppResult<UserRecord> {
        let fields = AccountFields {
            name: normalize_name(&input.name),
            email: normalize_email(&input.email),
            password: input.password,
            day: input.day.trim().to_string(),
            month: input.month.trim().to_string(),
            year: input.year.trim().to_string(),
        };
        validate_account(&fields)?;

        if self.store.find_user_by_email(&fields.email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }
        let password_hash = hash_password(&fields.password)?;

        let photo = match input.avatar {
            Some(upload) => Some(self.media.upload(&self.avatar_folder, upload).await?),
            None => None,
        };

        let new_user = NewUser {
            name: fields.name,
            email: fields.email,
            password_hash,
            date_of_birth: DateOfBirth {
                day: fields.day,
                month: fields.month,
                year: fields.year,
            },
            photo: photo.clone(),
        };
        match self.store.insert_user(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "account created");
                Ok(user)
            }
            Err(e) => {
                // Lost a race on the email, or the insert failed: the upload is orphaned.
                if let Some(photo) = photo {
                    self.cascade.discard_image(&photo.id).await;
                }
                Err(e.into())
            }
        }
    }

    /// Checks credentials and returns the account.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<UserRecord> {
        let email = normalize_email(email);
        let user = self.store.find_user_by_email(&email).await?.ok_or_else(|| {
            AppError::not_found("User not found. Please check your email address.")
        })?;
        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredential(
                "Incorrect password. Please try again.".into(),
            ));
        }
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(user)
    }

    /// Re-reads the caller's account so the response reflects the latest follow lists.
    pub async fn me(&self, identity: &Identity) -> AppResult<UserRecord> {
        self.store
            .find_user(identity.id())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn list(&self) -> AppResult<Vec<UserRecord>> {
        Ok(self.store.list_users().await?)
    }

    /// Applies a partial profile update. A new avatar replaces the old one, whose image
    /// is deleted before the new one is uploaded.
    pub async fn update_profile(
        &self,
        identity: &Identity,
        input: ProfileInput,
    ) -> AppResult<UserRecord> {
        let current = identity.user();
        let mut changes = ProfileChanges::default();

        if let Some(name) = non_blank(input.name) {
            let name = normalize_name(&name);
            validate_name(&name)?;
            changes.name = Some(name);
        }
        if let Some(email) = non_blank(input.email) {
            let email = normalize_email(&email);
            validate_email(&email)?;
            if email != current.email {
                if let Some(other) = self.store.find_user_by_email(&email).await? {
                    if other.id != current.id {
                        return Err(AppError::DuplicateEmail);
                    }
                }
            }
            changes.email = Some(email);
        }
        let (day, month, year) = (
            non_blank(input.day),
            non_blank(input.month),
            non_blank(input.year),
        );
        if day.is_some() || month.is_some() || year.is_some() {
            let dob = &current.date_of_birth;
            changes.date_of_birth = Some(DateOfBirth {
                day: day.unwrap_or_else(|| dob.day.clone()),
                month: month.unwrap_or_else(|| dob.month.clone()),
                year: year.unwrap_or_else(|| dob.year.clone()),
            });
        }

        if let Some(upload) = input.avatar {
            if let Some(old) = &current.photo {
                self.media.delete(&old.id).await?;
            }
            changes.photo = Some(self.media.upload(&self.avatar_folder, upload).await?);
        }

        let updated = self.store.update_profile(current.id, changes).await?;
        tracing::info!(user_id = %updated.id, "profile updated");
        Ok(updated)
    }

    pub async fn change_password(
        &self,
        identity: &Identity,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = identity.user();
        if !verify_password(old_password, &user.password_hash)? {
            return Err(AppError::InvalidCredential("Old Password Incorrect".into()));
        }
        validate_password(new_password)?;
        let hash = hash_password(new_password)?;
        self.store.set_password_hash(user.id, &hash).await?;
        tracing::info!(user_id = %user.id, "password changed");
        Ok(())
    }

    /// Verifies the password, then removes the account and everything that depends on it.
    pub async fn delete_account(
        &self,
        identity: &Identity,
        password: &str,
    ) -> AppResult<DeletionReport> {
        if !verify_password(password, &identity.user().password_hash)? {
            return Err(AppError::InvalidCredential("Password Incorrect".into()));
        }
        // Reload so the follow lists are current when the plan is built.
        let user = match self.store.find_user(identity.id()).await? {
            Some(user) => user,
            None => return Ok(DeletionReport::default()),
        };
        self.cascade.delete_account(&user).await
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

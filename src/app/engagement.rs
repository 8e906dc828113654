//! Likes and comments.

use crate::app::session::Identity;
use crate::domain::model::{Comment, Like, NewComment};
use crate::domain::validation::normalize_comment;
use crate::domain::Toggle;
use crate::error::{AppError, AppResult};
use crate::storage::SocialStore;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct EngagementService {
    store: Arc<dyn SocialStore>,
}

impl EngagementService {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    /// Flips the caller's like on the post. `Linked` means the post is now liked.
    pub async fn toggle_like(&self, identity: &Identity, post_id: Uuid) -> AppResult<(Toggle, Like)> {
        let (state, like) = self.store.toggle_like(identity.id(), post_id).await?;
        tracing::debug!(user_id = %identity.id(), post_id = %post_id, ?state, "like toggled");
        Ok((state, like))
    }

    pub async fn add_comment(
        &self,
        identity: &Identity,
        post_id: Uuid,
        content: &str,
    ) -> AppResult<Comment> {
        let content = normalize_comment(content)?;
        let comment = self
            .store
            .insert_comment(NewComment {
                post_id,
                user_id: identity.id(),
                content,
            })
            .await?;
        tracing::debug!(comment_id = %comment.id, post_id = %post_id, "comment added");
        Ok(comment)
    }

    /// Removes a comment. Allowed to the comment's author and to the post's author.
    pub async fn delete_comment(&self, identity: &Identity, comment_id: Uuid) -> AppResult<()> {
        let comment = self
            .store
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))?;

        if comment.user_id != identity.id() {
            let post_author = self
                .store
                .find_post(comment.post_id)
                .await?
                .map(|p| p.user_id);
            if post_author != Some(identity.id()) {
                return Err(AppError::Forbidden(
                    "You can only delete your own comments".into(),
                ));
            }
        }

        if self.store.delete_comment(comment_id).await?.is_some() {
            tracing::debug!(comment_id = %comment_id, "comment deleted");
        }
        Ok(())
    }
}

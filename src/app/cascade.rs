//! Cascading deletion of posts and accounts.
//!
//! The orchestrator reads what depends on the target, builds a [`DeletionPlan`] and hands
//! it to the store, which applies it atomically and reports the images held by whatever it
//! removed. Those images are deleted afterwards, best-effort.
//! Every step is idempotent, so re-running a cascade for a target that is already gone
//! succeeds with an empty report.

use crate::domain::model::{PostFilter, PostRecord, UserRecord};
use crate::domain::{DeletionPlan, DeletionReport, DeletionStep};
use crate::error::AppResult;
use crate::infra::media::ObjectStorage;
use crate::storage::SocialStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct CascadeOrchestrator {
    store: Arc<dyn SocialStore>,
    media: Arc<dyn ObjectStorage>,
}

impl CascadeOrchestrator {
    pub fn new(store: Arc<dyn SocialStore>, media: Arc<dyn ObjectStorage>) -> Self {
        Self { store, media }
    }

    /// Removes the post with its likes, comments and image.
    pub async fn delete_post(&self, post: &PostRecord) -> AppResult<DeletionReport> {
        let mut plan = DeletionPlan::new();
        plan.post(post.id);
        let report = self.store.apply_deletion(&plan).await?;
        self.discard_images(&report).await;
        tracing::info!(post_id = %post.id, likes = report.likes, comments = report.comments, "post deleted");
        Ok(report)
    }

    /// Removes the account, everything it authored and every follow edge touching it.
    pub async fn delete_account(&self, user: &UserRecord) -> AppResult<DeletionReport> {
        let posts = self.store.list_posts(PostFilter::ByAuthor(user.id)).await?;
        let plan = account_plan(user, &posts);
        let report = self.store.apply_deletion(&plan).await?;
        self.discard_images(&report).await;
        tracing::info!(
            user_id = %user.id,
            posts = report.posts,
            likes = report.likes,
            comments = report.comments,
            follow_edges = report.follow_edges,
            "account deleted"
        );
        Ok(report)
    }

    /// Deletes the images held by the records a cascade removed.
    async fn discard_images(&self, report: &DeletionReport) {
        for id in &report.images {
            self.discard_image(id).await;
        }
    }

    /// Deletes an image the store no longer references. Failures are logged, not returned.
    pub async fn discard_image(&self, id: &str) {
        if let Err(e) = self.media.delete(id).await {
            tracing::warn!(image_id = %id, error = %e, "could not delete image");
        }
    }
}

/// The user's own likes and comments go first, then each authored post with its
/// dependents, then both directions of the follow graph, then the user record.
fn account_plan(user: &UserRecord, posts: &[PostRecord]) -> DeletionPlan {
    let mut plan = DeletionPlan::new();
    plan.push(DeletionStep::LikesByUser(user.id))
        .push(DeletionStep::CommentsByUser(user.id));
    for post in posts {
        plan.post(post.id);
    }
    for followee in user.follows.iter() {
        plan.push(DeletionStep::FollowEdge {
            follower: user.id,
            followee,
        });
    }
    for follower in user.followers.iter() {
        plan.push(DeletionStep::FollowEdge {
            follower,
            followee: user.id,
        });
    }
    plan.push(DeletionStep::User(user.id));
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DateOfBirth;
    use crate::domain::RefList;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(follows: Vec<Uuid>, followers: Vec<Uuid>) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@x.com".into(),
            password_hash: String::new(),
            date_of_birth: DateOfBirth {
                day: "1".into(),
                month: "1".into(),
                year: "1990".into(),
            },
            photo: None,
            follows: RefList::from(follows),
            followers: RefList::from(followers),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn account_plan_covers_both_edge_directions() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let u = user(vec![a], vec![b]);
        let plan = account_plan(&u, &[]);
        let steps = plan.steps();
        assert_eq!(steps.first(), Some(&DeletionStep::LikesByUser(u.id)));
        assert!(steps.contains(&DeletionStep::FollowEdge {
            follower: u.id,
            followee: a
        }));
        assert!(steps.contains(&DeletionStep::FollowEdge {
            follower: b,
            followee: u.id
        }));
        assert_eq!(steps.last(), Some(&DeletionStep::User(u.id)));
    }
}

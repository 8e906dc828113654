//! Deletion plans: the ordered, idempotent steps that remove a post or an account
//! together with everything that depends on it.

use serde::Serialize;
use uuid::Uuid;

/// One store mutation in a cascade. Applying a step whose target is already gone is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionStep {
    /// Every like on the post.
    LikesOnPost(Uuid),
    /// Every comment on the post.
    CommentsOnPost(Uuid),
    /// Every like the user made, spliced out of the liked posts.
    LikesByUser(Uuid),
    /// Every comment the user made, spliced out of the commented posts.
    CommentsByUser(Uuid),
    Post(Uuid),
    /// The follow relationship `follower -> followee`, both sides.
    FollowEdge { follower: Uuid, followee: Uuid },
    /// The user record, plus anything still referencing it that the earlier steps missed.
    User(Uuid),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    steps: Vec<DeletionStep>,
}

impl DeletionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: DeletionStep) -> &mut Self {
        self.steps.push(step);
        self
    }

    /// Likes and comments of the post, then the post itself.
    pub fn post(&mut self, post_id: Uuid) -> &mut Self {
        self.push(DeletionStep::LikesOnPost(post_id))
            .push(DeletionStep::CommentsOnPost(post_id))
            .push(DeletionStep::Post(post_id))
    }

    pub fn steps(&self) -> &[DeletionStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Number of records each cascade actually removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    pub likes: u64,
    pub comments: u64,
    pub posts: u64,
    pub follow_edges: u64,
    pub users: u64,
    /// Object storage ids of the post images and avatars held by removed records.
    pub images: Vec<String>,
}

impl DeletionReport {
    /// Removed records; `images` are not counted.
    pub fn total(&self) -> u64 {
        self.likes + self.comments + self.posts + self.follow_edges + self.users
    }
}

//! In-process document store.
//!
//! Documents keep their reference sequences inline (`follows`, `followers`, `likes`,
//! `comments`) and every mutation runs under one lock, so toggles and cascades are atomic.

use crate::domain::model::{
    Comment, Like, NewComment, NewPost, NewUser, PostFilter, PostRecord, ProfileChanges,
    UserRecord,
};
use crate::domain::{DeletionPlan, DeletionReport, DeletionStep, RefList, Toggle};
use crate::storage::{SocialStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Documents {
    users: Vec<UserRecord>,
    posts: Vec<PostRecord>,
    likes: Vec<Like>,
    comments: Vec<Comment>,
}

impl Documents {
    fn user_mut(&mut self, id: Uuid) -> Option<&mut UserRecord> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    fn post_mut(&mut self, id: Uuid) -> Option<&mut PostRecord> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    fn remove_follow_edge(&mut self, follower: Uuid, followee: Uuid) -> bool {
        let mut changed = false;
        if let Some(u) = self.user_mut(follower) {
            changed |= u.follows.remove_if_present(followee);
        }
        if let Some(u) = self.user_mut(followee) {
            changed |= u.followers.remove_if_present(follower);
        }
        changed
    }

    fn remove_likes(&mut self, pred: impl Fn(&Like) -> bool) -> u64 {
        let (gone, kept): (Vec<Like>, Vec<Like>) =
            std::mem::take(&mut self.likes).into_iter().partition(|l| pred(l));
        self.likes = kept;
        for like in &gone {
            if let Some(post) = self.post_mut(like.post_id) {
                post.likes.remove_if_present(like.id);
            }
        }
        gone.len() as u64
    }

    fn remove_comments(&mut self, pred: impl Fn(&Comment) -> bool) -> u64 {
        let (gone, kept): (Vec<Comment>, Vec<Comment>) =
            std::mem::take(&mut self.comments).into_iter().partition(|c| pred(c));
        self.comments = kept;
        for comment in &gone {
            if let Some(post) = self.post_mut(comment.post_id) {
                post.comments.remove_if_present(comment.id);
            }
        }
        gone.len() as u64
    }

    /// Removes the post with its likes and comments.
    fn remove_post(&mut self, post_id: Uuid, report: &mut DeletionReport) {
        report.likes += self.remove_likes(|l| l.post_id == post_id);
        report.comments += self.remove_comments(|c| c.post_id == post_id);
        if let Some(idx) = self.posts.iter().position(|p| p.id == post_id) {
            let post = self.posts.remove(idx);
            report.posts += 1;
            report.images.extend(post.photo.map(|p| p.id));
        }
    }

    fn apply(&mut self, step: &DeletionStep, report: &mut DeletionReport) {
        match *step {
            DeletionStep::LikesOnPost(post_id) => {
                report.likes += self.remove_likes(|l| l.post_id == post_id);
            }
            DeletionStep::CommentsOnPost(post_id) => {
                report.comments += self.remove_comments(|c| c.post_id == post_id);
            }
            DeletionStep::LikesByUser(user_id) => {
                report.likes += self.remove_likes(|l| l.user_id == user_id);
            }
            DeletionStep::CommentsByUser(user_id) => {
                report.comments += self.remove_comments(|c| c.user_id == user_id);
            }
            DeletionStep::Post(post_id) => self.remove_post(post_id, report),
            DeletionStep::FollowEdge { follower, followee } => {
                if self.remove_follow_edge(follower, followee) {
                    report.follow_edges += 1;
                }
            }
            DeletionStep::User(user_id) => {
                // Anything created after the plan was built still points at the user.
                report.likes += self.remove_likes(|l| l.user_id == user_id);
                report.comments += self.remove_comments(|c| c.user_id == user_id);
                let authored: Vec<Uuid> = self
                    .posts
                    .iter()
                    .filter(|p| p.user_id == user_id)
                    .map(|p| p.id)
                    .collect();
                for post_id in authored {
                    self.remove_post(post_id, report);
                }
                let edges: Vec<(Uuid, Uuid)> = self
                    .users
                    .iter()
                    .flat_map(|u| {
                        let out = u.follows.contains(user_id).then_some((u.id, user_id));
                        let inc = u.followers.contains(user_id).then_some((user_id, u.id));
                        out.into_iter().chain(inc)
                    })
                    .collect();
                for (follower, followee) in edges {
                    if self.remove_follow_edge(follower, followee) {
                        report.follow_edges += 1;
                    }
                }
                if let Some(idx) = self.users.iter().position(|u| u.id == user_id) {
                    let user = self.users.remove(idx);
                    report.users += 1;
                    report.images.extend(user.photo.map(|p| p.id));
                }
            }
        }
    }
}

/// Single-lock document store. Cloning is not supported; share it behind an `Arc`.
#[derive(Default)]
pub struct MemorySocialStore {
    docs: Mutex<Documents>,
}

impl MemorySocialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SocialStore for MemorySocialStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut docs = self.docs.lock().await;
        if docs.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            date_of_birth: user.date_of_birth,
            photo: user.photo,
            follows: RefList::new(),
            followers: RefList::new(),
            created_at: now,
            updated_at: now,
        };
        docs.users.push(record.clone());
        Ok(record)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let docs = self.docs.lock().await;
        Ok(docs.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let docs = self.docs.lock().await;
        Ok(docs.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.docs.lock().await.users.clone())
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<UserRecord>> {
        let docs = self.docs.lock().await;
        Ok(docs
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> StoreResult<UserRecord> {
        let mut docs = self.docs.lock().await;
        if let Some(email) = &changes.email {
            if docs.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::DuplicateEmail);
            }
        }
        let user = docs.user_mut(id).ok_or(StoreError::NotFound("User"))?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(dob) = changes.date_of_birth {
            user.date_of_birth = dob;
        }
        if let Some(photo) = changes.photo {
            user.photo = Some(photo);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<()> {
        let mut docs = self.docs.lock().await;
        let user = docs.user_mut(id).ok_or(StoreError::NotFound("User"))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn toggle_follow(&self, actor: Uuid, target: Uuid) -> StoreResult<Toggle> {
        let mut docs = self.docs.lock().await;
        let both_exist = docs.users.iter().any(|u| u.id == actor)
            && docs.users.iter().any(|u| u.id == target);
        if !both_exist {
            return Err(StoreError::NotFound("User"));
        }
        if docs.remove_follow_edge(actor, target) {
            return Ok(Toggle::Unlinked);
        }
        if let Some(u) = docs.user_mut(actor) {
            u.follows.add_if_absent(target);
        }
        if let Some(u) = docs.user_mut(target) {
            u.followers.add_if_absent(actor);
        }
        Ok(Toggle::Linked)
    }

    async fn insert_post(&self, post: NewPost) -> StoreResult<PostRecord> {
        let mut docs = self.docs.lock().await;
        if !docs.users.iter().any(|u| u.id == post.user_id) {
            return Err(StoreError::NotFound("User"));
        }
        let now = Utc::now();
        let record = PostRecord {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            content: post.content,
            photo: post.photo,
            likes: RefList::new(),
            comments: RefList::new(),
            created_at: now,
            updated_at: now,
        };
        docs.posts.push(record.clone());
        Ok(record)
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        let docs = self.docs.lock().await;
        Ok(docs.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_posts(&self, filter: PostFilter) -> StoreResult<Vec<PostRecord>> {
        let docs = self.docs.lock().await;
        Ok(docs
            .posts
            .iter()
            .filter(|p| match filter {
                PostFilter::All => true,
                PostFilter::ByAuthor(author) => p.user_id == author,
            })
            .cloned()
            .collect())
    }

    async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> StoreResult<(Toggle, Like)> {
        let mut docs = self.docs.lock().await;
        if !docs.users.iter().any(|u| u.id == user_id) {
            return Err(StoreError::NotFound("User"));
        }
        if !docs.posts.iter().any(|p| p.id == post_id) {
            return Err(StoreError::NotFound("Post"));
        }

        if let Some(idx) = docs
            .likes
            .iter()
            .position(|l| l.user_id == user_id && l.post_id == post_id)
        {
            let like = docs.likes.remove(idx);
            if let Some(post) = docs.post_mut(post_id) {
                post.likes.remove_if_present(like.id);
                post.updated_at = Utc::now();
            }
            return Ok((Toggle::Unlinked, like));
        }

        let like = Like {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            created_at: Utc::now(),
        };
        docs.likes.push(like.clone());
        if let Some(post) = docs.post_mut(post_id) {
            post.likes.add_if_absent(like.id);
            post.updated_at = Utc::now();
        }
        Ok((Toggle::Linked, like))
    }

    async fn likes_on_posts(&self, post_ids: &[Uuid]) -> StoreResult<Vec<Like>> {
        let docs = self.docs.lock().await;
        Ok(docs
            .likes
            .iter()
            .filter(|l| post_ids.contains(&l.post_id))
            .cloned()
            .collect())
    }

    async fn likes_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Like>> {
        let docs = self.docs.lock().await;
        Ok(docs
            .likes
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let mut docs = self.docs.lock().await;
        if !docs.users.iter().any(|u| u.id == comment.user_id) {
            return Err(StoreError::NotFound("User"));
        }
        let record = Comment {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: Utc::now(),
        };
        let post = docs
            .post_mut(comment.post_id)
            .ok_or(StoreError::NotFound("Post"))?;
        post.comments.add_if_absent(record.id);
        post.updated_at = Utc::now();
        docs.comments.push(record.clone());
        Ok(record)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let docs = self.docs.lock().await;
        Ok(docs.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let mut docs = self.docs.lock().await;
        let Some(idx) = docs.comments.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        let comment = docs.comments.remove(idx);
        if let Some(post) = docs.post_mut(comment.post_id) {
            post.comments.remove_if_present(comment.id);
            post.updated_at = Utc::now();
        }
        Ok(Some(comment))
    }

    async fn comments_on_posts(&self, post_ids: &[Uuid]) -> StoreResult<Vec<Comment>> {
        let docs = self.docs.lock().await;
        Ok(docs
            .comments
            .iter()
            .filter(|c| post_ids.contains(&c.post_id))
            .cloned()
            .collect())
    }

    async fn comments_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Comment>> {
        let docs = self.docs.lock().await;
        Ok(docs
            .comments
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn apply_deletion(&self, plan: &DeletionPlan) -> StoreResult<DeletionReport> {
        let mut docs = self.docs.lock().await;
        let mut report = DeletionReport::default();
        for step in plan.steps() {
            docs.apply(step, &mut report);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DateOfBirth, PhotoRef};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".into(),
            email: email.into(),
            password_hash: "hash".into(),
            date_of_birth: DateOfBirth {
                day: "1".into(),
                month: "1".into(),
                year: "2000".into(),
            },
            photo: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemorySocialStore::new();
        store.insert_user(new_user("a@x.com")).await.unwrap();
        let err = store.insert_user(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_comment_splices_it_from_the_post() {
        let store = MemorySocialStore::new();
        let user = store.insert_user(new_user("a@x.com")).await.unwrap();
        let post = store
            .insert_post(NewPost {
                user_id: user.id,
                content: "hi".into(),
                photo: None,
            })
            .await
            .unwrap();
        let comment = store
            .insert_comment(NewComment {
                post_id: post.id,
                user_id: user.id,
                content: "first".into(),
            })
            .await
            .unwrap();
        let stored = store.find_post(post.id).await.unwrap().unwrap();
        assert_eq!(stored.comments.as_slice(), &[comment.id]);

        assert!(store.delete_comment(comment.id).await.unwrap().is_some());
        assert!(store.delete_comment(comment.id).await.unwrap().is_none());
        let stored = store.find_post(post.id).await.unwrap().unwrap();
        assert!(stored.comments.is_empty());
    }

    #[tokio::test]
    async fn account_deletion_removes_posts_created_after_planning() {
        let store = MemorySocialStore::new();
        let mut author = new_user("a@x.com");
        author.photo = Some(PhotoRef {
            id: "avatar".into(),
            secure_url: "https://img/avatar".into(),
        });
        let author = store.insert_user(author).await.unwrap();
        let reader = store.insert_user(new_user("b@x.com")).await.unwrap();

        let mut plan = DeletionPlan::new();
        plan.push(DeletionStep::LikesByUser(author.id))
            .push(DeletionStep::CommentsByUser(author.id))
            .push(DeletionStep::User(author.id));

        let late = store
            .insert_post(NewPost {
                user_id: author.id,
                content: "posted mid-deletion".into(),
                photo: Some(PhotoRef {
                    id: "late-photo".into(),
                    secure_url: "https://img/late".into(),
                }),
            })
            .await
            .unwrap();
        store.toggle_like(reader.id, late.id).await.unwrap();
        store
            .insert_comment(NewComment {
                post_id: late.id,
                user_id: reader.id,
                content: "nice".into(),
            })
            .await
            .unwrap();

        let report = store.apply_deletion(&plan).await.unwrap();
        assert_eq!((report.users, report.posts), (1, 1));
        assert_eq!((report.likes, report.comments), (1, 1));
        assert!(report.images.contains(&"late-photo".to_string()));
        assert!(report.images.contains(&"avatar".to_string()));
        assert!(store.find_post(late.id).await.unwrap().is_none());
        assert!(store.likes_by_user(reader.id).await.unwrap().is_empty());
        assert!(store.comments_by_user(reader.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_plan_is_a_no_op() {
        let store = MemorySocialStore::new();
        let report = store.apply_deletion(&DeletionPlan::new()).await.unwrap();
        assert_eq!(report.total(), 0);
    }
}

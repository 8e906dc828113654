//! Content store operations and the read-time join that turns records into views.

use crate::app::cascade::CascadeOrchestrator;
use crate::app::session::Identity;
use crate::domain::model::{
    CommentView, CommentedPost, LikeView, LikedPost, NewPost, PostFilter, PostRecord, PostView,
    UserSummary,
};
use crate::domain::validation::validate_post_content;
use crate::error::{AppError, AppResult};
use crate::infra::media::{ObjectStorage, Upload};
use crate::storage::SocialStore;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn SocialStore>,
    media: Arc<dyn ObjectStorage>,
    cascade: CascadeOrchestrator,
    image_folder: String,
}

impl PostService {
    pub fn new(
        store: Arc<dyn SocialStore>,
        media: Arc<dyn ObjectStorage>,
        cascade: CascadeOrchestrator,
        image_folder: String,
    ) -> Self {
        Self {
            store,
            media,
            cascade,
            image_folder,
        }
    }

    /// Validates the content, uploads the image if any, then stores the post.
    pub async fn create(
        &self,
        identity: &Identity,
        content: &str,
        image: Option<Upload>,
    ) -> AppResult<PostView> {
        validate_post_content(content)?;

        let photo = match image {
            Some(upload) => Some(self.media.upload(&self.image_folder, upload).await?),
            None => None,
        };
        let inserted = self
            .store
            .insert_post(NewPost {
                user_id: identity.id(),
                content: content.to_string(),
                photo: photo.clone(),
            })
            .await;
        let post = match inserted {
            Ok(post) => post,
            Err(e) => {
                if let Some(photo) = photo {
                    self.cascade.discard_image(&photo.id).await;
                }
                return Err(e.into());
            }
        };
        tracing::info!(post_id = %post.id, user_id = %post.user_id, "post created");

        self.enrich(vec![post])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    pub async fn list_all(&self) -> AppResult<Vec<PostView>> {
        let posts = self.store.list_posts(PostFilter::All).await?;
        self.enrich(posts).await
    }

    /// Posts by `author_id`, oldest first. An unknown author has no posts.
    pub async fn list_by_author(&self, author_id: Uuid) -> AppResult<Vec<PostView>> {
        let posts = self.store.list_posts(PostFilter::ByAuthor(author_id)).await?;
        self.enrich(posts).await
    }

    /// Posts of every account the caller follows, grouped by followee in follow order.
    pub async fn list_following(&self, identity: &Identity) -> AppResult<Vec<PostView>> {
        let me = self
            .store
            .find_user(identity.id())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let mut posts = Vec::new();
        for followee in me.follows.iter() {
            posts.extend(self.store.list_posts(PostFilter::ByAuthor(followee)).await?);
        }
        self.enrich(posts).await
    }

    /// Deletes the caller's own post together with its likes, comments and image.
    pub async fn delete(&self, identity: &Identity, post_id: Uuid) -> AppResult<()> {
        let post = self
            .store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        if post.user_id != identity.id() {
            return Err(AppError::Forbidden(
                "You can only delete your own posts".into(),
            ));
        }
        self.cascade.delete_post(&post).await?;
        Ok(())
    }

    /// Likes made by `user_id`, oldest first, each with the liked post resolved.
    pub async fn liked_by(&self, user_id: Uuid) -> AppResult<Vec<LikedPost>> {
        let likes = self.store.likes_by_user(user_id).await?;
        let post_ids: Vec<Uuid> = likes.iter().map(|l| l.post_id).collect();
        let views = self.views_by_id(&post_ids).await?;

        Ok(likes
            .into_iter()
            .filter_map(|like| {
                let post = views.get(&like.post_id)?.clone();
                Some(LikedPost {
                    id: like.id,
                    user: like.user_id,
                    post,
                    created_at: like.created_at,
                })
            })
            .collect())
    }

    /// Comments made by `user_id`, oldest first, each with the commented post resolved.
    /// An unknown user has no comments.
    pub async fn commented_by(&self, user_id: Uuid) -> AppResult<Vec<CommentedPost>> {
        let Some(author) = self.store.find_user(user_id).await? else {
            return Ok(Vec::new());
        };
        let author = UserSummary::from(&author);

        let comments = self.store.comments_by_user(user_id).await?;
        let post_ids: Vec<Uuid> = comments.iter().map(|c| c.post_id).collect();
        let views = self.views_by_id(&post_ids).await?;

        Ok(comments
            .into_iter()
            .filter_map(|comment| {
                let post = views.get(&comment.post_id)?.clone();
                Some(CommentedPost {
                    id: comment.id,
                    user: author.clone(),
                    content: comment.content,
                    post,
                    created_at: comment.created_at,
                })
            })
            .collect())
    }

    async fn views_by_id(&self, post_ids: &[Uuid]) -> AppResult<HashMap<Uuid, PostView>> {
        let mut posts = Vec::new();
        let mut seen = Vec::new();
        for &id in post_ids {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            if let Some(post) = self.store.find_post(id).await? {
                posts.push(post);
            }
        }
        Ok(self
            .enrich(posts)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect())
    }

    /// Joins posts with their authors, likes and comments (with commenters).
    ///
    /// Likes and comments follow the order of the post's reference lists. A post whose
    /// author no longer exists is dropped.
    pub async fn enrich(&self, posts: Vec<PostRecord>) -> AppResult<Vec<PostView>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let likes: HashMap<Uuid, _> = self
            .store
            .likes_on_posts(&post_ids)
            .await?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();
        let comments: HashMap<Uuid, _> = self
            .store
            .comments_on_posts(&post_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut user_ids: Vec<Uuid> = posts.iter().map(|p| p.user_id).collect();
        user_ids.extend(comments.values().map(|c| c.user_id));
        user_ids.sort_unstable();
        user_ids.dedup();
        let users: HashMap<Uuid, UserSummary> = self
            .store
            .users_by_ids(&user_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        Ok(posts
            .into_iter()
            .filter_map(|post| {
                let author = users.get(&post.user_id)?.clone();
                let like_views = post
                    .likes
                    .iter()
                    .filter_map(|id| likes.get(&id))
                    .map(|l| LikeView {
                        id: l.id,
                        user: l.user_id,
                    })
                    .collect();
                let comment_views = post
                    .comments
                    .iter()
                    .filter_map(|id| comments.get(&id))
                    .filter_map(|c| {
                        Some(CommentView {
                            id: c.id,
                            user: users.get(&c.user_id)?.clone(),
                            content: c.content.clone(),
                            created_at: c.created_at,
                        })
                    })
                    .collect();
                Some(PostView {
                    id: post.id,
                    user: author,
                    content: post.content,
                    photo: post.photo,
                    likes: like_views,
                    comments: comment_views,
                    created_at: post.created_at,
                    updated_at: post.updated_at,
                })
            })
            .collect())
    }
}

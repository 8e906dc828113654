//! PostgreSQL-backed store.
//!
//! Relationships live in join tables (`follows`, `likes`, `comments`) keyed so that one row
//! backs both sides of a reference; the ordered id sequences on users and posts are read
//! back from those tables. Toggles are conditional single-statement writes on the pair key
//! and cascades run inside one transaction.

use crate::domain::model::{
    Comment, DateOfBirth, Like, NewComment, NewPost, NewUser, PhotoRef, PostFilter, PostRecord,
    ProfileChanges, UserRecord,
};
use crate::domain::{DeletionPlan, DeletionReport, DeletionStep, RefList, Toggle};
use crate::storage::{SocialStore, StoreError, StoreResult, TOGGLE_ATTEMPTS};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        dob_day TEXT NOT NULL,
        dob_month TEXT NOT NULL,
        dob_year TEXT NOT NULL,
        photo_id TEXT,
        photo_url TEXT,
        seq BIGSERIAL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT users_email_key UNIQUE (email)
    )",
    "CREATE TABLE IF NOT EXISTS follows (
        follower_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        followee_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        seq BIGSERIAL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (follower_id, followee_id)
    )",
    "CREATE INDEX IF NOT EXISTS follows_followee_idx ON follows (followee_id)",
    "CREATE TABLE IF NOT EXISTS posts (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        content TEXT NOT NULL CHECK (char_length(content) BETWEEN 1 AND 500),
        photo_id TEXT,
        photo_url TEXT,
        seq BIGSERIAL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS posts_user_idx ON posts (user_id)",
    "CREATE TABLE IF NOT EXISTS likes (
        id UUID PRIMARY KEY,
        post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        seq BIGSERIAL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT likes_user_post_key UNIQUE (user_id, post_id)
    )",
    "CREATE INDEX IF NOT EXISTS likes_post_idx ON likes (post_id)",
    "CREATE TABLE IF NOT EXISTS comments (
        id UUID PRIMARY KEY,
        post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        content TEXT NOT NULL,
        seq BIGSERIAL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS comments_post_idx ON comments (post_id)",
    "CREATE INDEX IF NOT EXISTS comments_user_idx ON comments (user_id)",
];

const USER_COLUMNS: &str = "u.id, u.name, u.email, u.password_hash, u.dob_day, u.dob_month, u.dob_year,
    u.photo_id, u.photo_url, u.created_at, u.updated_at,
    ARRAY(SELECT f.followee_id FROM follows f WHERE f.follower_id = u.id ORDER BY f.seq) AS follows,
    ARRAY(SELECT f.follower_id FROM follows f WHERE f.followee_id = u.id ORDER BY f.seq) AS followers";

const POST_COLUMNS: &str = "p.id, p.user_id, p.content, p.photo_id, p.photo_url, p.created_at, p.updated_at,
    ARRAY(SELECT l.id FROM likes l WHERE l.post_id = p.id ORDER BY l.seq) AS likes,
    ARRAY(SELECT c.id FROM comments c WHERE c.post_id = p.id ORDER BY c.seq) AS comments";

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.into())
}

fn db_code(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Maps a unique violation to `DuplicateEmail` and a missing parent row to `NotFound(parent)`.
/// The violated constraint decides the parent when it follows Postgres's default
/// `<table>_<column>_fkey` naming; `parent` is the fallback.
fn classify(e: sqlx::Error, parent: &'static str) -> StoreError {
    match db_code(&e).as_deref() {
        Some(UNIQUE_VIOLATION) => StoreError::DuplicateEmail,
        Some(FOREIGN_KEY_VIOLATION) => {
            let named = match &e {
                sqlx::Error::Database(db) => db.constraint().and_then(fk_parent),
                _ => None,
            };
            StoreError::NotFound(named.unwrap_or(parent))
        }
        _ => backend(e),
    }
}

fn fk_parent(constraint: &str) -> Option<&'static str> {
    let column = constraint.strip_suffix("_fkey")?;
    if column.ends_with("_post_id") {
        Some("Post")
    } else if ["_user_id", "_follower_id", "_followee_id"]
        .iter()
        .any(|suffix| column.ends_with(suffix))
    {
        Some("User")
    } else {
        None
    }
}

fn photo_from_row(row: &PgRow) -> Result<Option<PhotoRef>, sqlx::Error> {
    let id: Option<String> = row.try_get("photo_id")?;
    let url: Option<String> = row.try_get("photo_url")?;
    Ok(match (id, url) {
        (Some(id), Some(secure_url)) => Some(PhotoRef { id, secure_url }),
        _ => None,
    })
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        date_of_birth: DateOfBirth {
            day: row.try_get("dob_day")?,
            month: row.try_get("dob_month")?,
            year: row.try_get("dob_year")?,
        },
        photo: photo_from_row(row)?,
        follows: RefList::from(row.try_get::<Vec<Uuid>, _>("follows")?),
        followers: RefList::from(row.try_get::<Vec<Uuid>, _>("followers")?),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn post_from_row(row: &PgRow) -> Result<PostRecord, sqlx::Error> {
    Ok(PostRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        photo: photo_from_row(row)?,
        likes: RefList::from(row.try_get::<Vec<Uuid>, _>("likes")?),
        comments: RefList::from(row.try_get::<Vec<Uuid>, _>("comments")?),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn like_from_row(row: &PgRow) -> Result<Like, sqlx::Error> {
    Ok(Like {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn comment_from_row(row: &PgRow) -> Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}

#[derive(Clone)]
pub struct PgSocialStore {
    pool: PgPool,
}

impl PgSocialStore {
    /// Connects and creates the schema if it is missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        for stmt in SCHEMA {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn fetch_users(&self, clause: &str, bind: Option<&[Uuid]>) -> StoreResult<Vec<UserRecord>> {
        let sql = format!("SELECT {} FROM users u {} ORDER BY u.seq", USER_COLUMNS, clause);
        let mut query = sqlx::query(&sql);
        if let Some(ids) = bind {
            query = query.bind(ids.to_vec());
        }
        let rows = query.fetch_all(&self.pool).await.map_err(backend)?;
        rows.iter()
            .map(user_from_row)
            .collect::<Result<_, _>>()
            .map_err(backend)
    }

    fn record_images(rows: &[PgRow], report: &mut DeletionReport) -> Result<(), sqlx::Error> {
        for row in rows {
            if let Some(id) = row.try_get::<Option<String>, _>("photo_id")? {
                report.images.push(id);
            }
        }
        Ok(())
    }

    async fn apply_step(
        tx: &mut Transaction<'_, Postgres>,
        step: &DeletionStep,
        report: &mut DeletionReport,
    ) -> Result<(), sqlx::Error> {
        match *step {
            DeletionStep::LikesOnPost(post_id) => {
                let r = sqlx::query("DELETE FROM likes WHERE post_id = $1")
                    .bind(post_id)
                    .execute(tx.as_mut())
                    .await?;
                report.likes += r.rows_affected();
            }
            DeletionStep::CommentsOnPost(post_id) => {
                let r = sqlx::query("DELETE FROM comments WHERE post_id = $1")
                    .bind(post_id)
                    .execute(tx.as_mut())
                    .await?;
                report.comments += r.rows_affected();
            }
            DeletionStep::LikesByUser(user_id) => {
                let r = sqlx::query("DELETE FROM likes WHERE user_id = $1")
                    .bind(user_id)
                    .execute(tx.as_mut())
                    .await?;
                report.likes += r.rows_affected();
            }
            DeletionStep::CommentsByUser(user_id) => {
                let r = sqlx::query("DELETE FROM comments WHERE user_id = $1")
                    .bind(user_id)
                    .execute(tx.as_mut())
                    .await?;
                report.comments += r.rows_affected();
            }
            DeletionStep::Post(post_id) => {
                let removed = sqlx::query("DELETE FROM posts WHERE id = $1 RETURNING photo_id")
                    .bind(post_id)
                    .fetch_all(tx.as_mut())
                    .await?;
                Self::record_images(&removed, report)?;
                report.posts += removed.len() as u64;
            }
            DeletionStep::FollowEdge { follower, followee } => {
                let r = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
                    .bind(follower)
                    .bind(followee)
                    .execute(tx.as_mut())
                    .await?;
                report.follow_edges += r.rows_affected();
            }
            DeletionStep::User(user_id) => {
                // Sweep rows created after the plan was built.
                let r = sqlx::query(
                    "DELETE FROM likes WHERE user_id = $1
                        OR post_id IN (SELECT id FROM posts WHERE user_id = $1)",
                )
                .bind(user_id)
                .execute(tx.as_mut())
                .await?;
                report.likes += r.rows_affected();
                let r = sqlx::query(
                    "DELETE FROM comments WHERE user_id = $1
                        OR post_id IN (SELECT id FROM posts WHERE user_id = $1)",
                )
                .bind(user_id)
                .execute(tx.as_mut())
                .await?;
                report.comments += r.rows_affected();
                let removed = sqlx::query("DELETE FROM posts WHERE user_id = $1 RETURNING photo_id")
                    .bind(user_id)
                    .fetch_all(tx.as_mut())
                    .await?;
                Self::record_images(&removed, report)?;
                report.posts += removed.len() as u64;
                let r = sqlx::query("DELETE FROM follows WHERE follower_id = $1 OR followee_id = $1")
                    .bind(user_id)
                    .execute(tx.as_mut())
                    .await?;
                report.follow_edges += r.rows_affected();

                let removed = sqlx::query("DELETE FROM users WHERE id = $1 RETURNING photo_id")
                    .bind(user_id)
                    .fetch_all(tx.as_mut())
                    .await?;
                Self::record_images(&removed, report)?;
                report.users += removed.len() as u64;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SocialStore for PgSocialStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        let id = Uuid::new_v4();
        let (photo_id, photo_url) = match user.photo {
            Some(p) => (Some(p.id), Some(p.secure_url)),
            None => (None, None),
        };
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, dob_day, dob_month, dob_year, photo_id, photo_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.date_of_birth.day)
        .bind(&user.date_of_birth.month)
        .bind(&user.date_of_birth.year)
        .bind(photo_id)
        .bind(photo_url)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, "User"))?;

        self.find_user(id).await?.ok_or(StoreError::NotFound("User"))
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let sql = format!("SELECT {} FROM users u WHERE u.id = $1", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(user_from_row).transpose().map_err(backend)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let sql = format!("SELECT {} FROM users u WHERE u.email = $1", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(user_from_row).transpose().map_err(backend)
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        self.fetch_users("", None).await
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<UserRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_users("WHERE u.id = ANY($1)", Some(ids)).await
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> StoreResult<UserRecord> {
        let (day, month, year) = match changes.date_of_birth {
            Some(d) => (Some(d.day), Some(d.month), Some(d.year)),
            None => (None, None, None),
        };
        let (photo_id, photo_url) = match changes.photo {
            Some(p) => (Some(p.id), Some(p.secure_url)),
            None => (None, None),
        };
        let result = sqlx::query(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                dob_day = COALESCE($4, dob_day),
                dob_month = COALESCE($5, dob_month),
                dob_year = COALESCE($6, dob_year),
                photo_id = COALESCE($7, photo_id),
                photo_url = COALESCE($8, photo_url),
                updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(day)
        .bind(month)
        .bind(year)
        .bind(photo_id)
        .bind(photo_url)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, "User"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User"));
        }
        self.find_user(id).await?.ok_or(StoreError::NotFound("User"))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User"));
        }
        Ok(())
    }

    async fn toggle_follow(&self, actor: Uuid, target: Uuid) -> StoreResult<Toggle> {
        for _ in 0..TOGGLE_ATTEMPTS {
            let removed = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
                .bind(actor)
                .bind(target)
                .execute(&self.pool)
                .await
                .map_err(backend)?;
            if removed.rows_affected() > 0 {
                return Ok(Toggle::Unlinked);
            }

            let inserted = sqlx::query(
                "INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2)
                 ON CONFLICT (follower_id, followee_id) DO NOTHING",
            )
            .bind(actor)
            .bind(target)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "User"))?;
            if inserted.rows_affected() > 0 {
                return Ok(Toggle::Linked);
            }
            // A concurrent toggle inserted the edge between our delete and insert; flip it back.
        }
        Err(StoreError::Backend(anyhow::anyhow!(
            "follow toggle for ({}, {}) did not settle after {} attempts",
            actor,
            target,
            TOGGLE_ATTEMPTS
        )))
    }

    async fn insert_post(&self, post: NewPost) -> StoreResult<PostRecord> {
        let id = Uuid::new_v4();
        let (photo_id, photo_url) = match post.photo {
            Some(p) => (Some(p.id), Some(p.secure_url)),
            None => (None, None),
        };
        sqlx::query(
            "INSERT INTO posts (id, user_id, content, photo_id, photo_url) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(post.user_id)
        .bind(&post.content)
        .bind(photo_id)
        .bind(photo_url)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, "User"))?;

        self.find_post(id).await?.ok_or(StoreError::NotFound("Post"))
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        let sql = format!("SELECT {} FROM posts p WHERE p.id = $1", POST_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(post_from_row).transpose().map_err(backend)
    }

    async fn list_posts(&self, filter: PostFilter) -> StoreResult<Vec<PostRecord>> {
        let rows = match filter {
            PostFilter::All => {
                let sql = format!("SELECT {} FROM posts p ORDER BY p.seq", POST_COLUMNS);
                sqlx::query(&sql).fetch_all(&self.pool).await
            }
            PostFilter::ByAuthor(author) => {
                let sql = format!(
                    "SELECT {} FROM posts p WHERE p.user_id = $1 ORDER BY p.seq",
                    POST_COLUMNS
                );
                sqlx::query(&sql).bind(author).fetch_all(&self.pool).await
            }
        }
        .map_err(backend)?;
        rows.iter()
            .map(post_from_row)
            .collect::<Result<_, _>>()
            .map_err(backend)
    }

    async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> StoreResult<(Toggle, Like)> {
        for _ in 0..TOGGLE_ATTEMPTS {
            let removed = sqlx::query(
                "DELETE FROM likes WHERE user_id = $1 AND post_id = $2
                 RETURNING id, post_id, user_id, created_at",
            )
            .bind(user_id)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
            if let Some(row) = removed {
                let like = like_from_row(&row).map_err(backend)?;
                return Ok((Toggle::Unlinked, like));
            }

            let inserted = sqlx::query(
                "INSERT INTO likes (id, post_id, user_id) VALUES ($1, $2, $3)
                 ON CONFLICT (user_id, post_id) DO NOTHING
                 RETURNING id, post_id, user_id, created_at",
            )
            .bind(Uuid::new_v4())
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "Post"))?;
            if let Some(row) = inserted {
                let like = like_from_row(&row).map_err(backend)?;
                return Ok((Toggle::Linked, like));
            }
        }
        Err(StoreError::Backend(anyhow::anyhow!(
            "like toggle for ({}, {}) did not settle after {} attempts",
            user_id,
            post_id,
            TOGGLE_ATTEMPTS
        )))
    }

    async fn likes_on_posts(&self, post_ids: &[Uuid]) -> StoreResult<Vec<Like>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT id, post_id, user_id, created_at FROM likes WHERE post_id = ANY($1) ORDER BY seq",
        )
        .bind(post_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        rows.iter()
            .map(like_from_row)
            .collect::<Result<_, _>>()
            .map_err(backend)
    }

    async fn likes_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Like>> {
        let rows = sqlx::query(
            "SELECT id, post_id, user_id, created_at FROM likes WHERE user_id = $1 ORDER BY seq",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        rows.iter()
            .map(like_from_row)
            .collect::<Result<_, _>>()
            .map_err(backend)
    }

    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let row = sqlx::query(
            "INSERT INTO comments (id, post_id, user_id, content) VALUES ($1, $2, $3, $4)
             RETURNING id, post_id, user_id, content, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(comment.post_id)
        .bind(comment.user_id)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "Post"))?;
        comment_from_row(&row).map_err(backend)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let row = sqlx::query("SELECT id, post_id, user_id, content, created_at FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(comment_from_row).transpose().map_err(backend)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let row = sqlx::query(
            "DELETE FROM comments WHERE id = $1 RETURNING id, post_id, user_id, content, created_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        row.as_ref().map(comment_from_row).transpose().map_err(backend)
    }

    async fn comments_on_posts(&self, post_ids: &[Uuid]) -> StoreResult<Vec<Comment>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT id, post_id, user_id, content, created_at FROM comments
             WHERE post_id = ANY($1) ORDER BY seq",
        )
        .bind(post_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        rows.iter()
            .map(comment_from_row)
            .collect::<Result<_, _>>()
            .map_err(backend)
    }

    async fn comments_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT id, post_id, user_id, content, created_at FROM comments
             WHERE user_id = $1 ORDER BY seq",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        rows.iter()
            .map(comment_from_row)
            .collect::<Result<_, _>>()
            .map_err(backend)
    }

    async fn apply_deletion(&self, plan: &DeletionPlan) -> StoreResult<DeletionReport> {
        let mut report = DeletionReport::default();
        let mut tx = self.pool.begin().await.map_err(backend)?;
        for step in plan.steps() {
            Self::apply_step(&mut tx, step, &mut report)
                .await
                .map_err(backend)?;
        }
        // Dropping `tx` on an early return above rolls everything back.
        tx.commit().await.map_err(backend)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::fk_parent;

    #[test]
    fn foreign_key_names_map_to_their_parent() {
        assert_eq!(fk_parent("comments_user_id_fkey"), Some("User"));
        assert_eq!(fk_parent("comments_post_id_fkey"), Some("Post"));
        assert_eq!(fk_parent("likes_user_id_fkey"), Some("User"));
        assert_eq!(fk_parent("likes_post_id_fkey"), Some("Post"));
        assert_eq!(fk_parent("follows_followee_id_fkey"), Some("User"));
        assert_eq!(fk_parent("likes_user_post_key"), None);
    }
}

use std::time::Duration;

use anyhow::anyhow;
use axum::async_trait;
use diesel::dsl::count;
use diesel::pg::{Pg, PgConnection};
use diesel::query_builder::QueryFragment;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::pooled_connection::deadpool::{Hook, Pool as DeadPool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::methods::LoadQuery;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use super::{PostStore, UserStore, VoteStore};
use crate::error::{AppError, AppResult};
use crate::models::post::{NewPost, Page, Post, PostId, PostInput, PostWithVotes};
use crate::models::user::{CreateUser, User, UserId};
use crate::models::vote::Vote;
use crate::schema::{posts, users, votes};
use crate::services::Svc;

pub type Pool = DeadPool<AsyncPgConnection>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applies pending migrations on a blocking synchronous connection.
pub async fn run_migrations(database_url: String) -> anyhow::Result<()> {
    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let mut conn = PgConnection::establish(&database_url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!(e))?;
        info!(count = applied.len(), "applied pending migrations");
        Ok(())
    })
    .await?
}

/// Escapes LIKE wildcards so `search` matches as a literal substring.
///
/// A plain unescaped `LIKE '%' || search || '%'` would let `%` and `_` in the
/// search act as wildcards; they are escaped on purpose, do not drop this.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Posts whose title contains `search`, left-joined to their votes and
/// counted per post, so posts without votes come back with zero.
fn list_with_votes_query(
    search: &str,
    page: Page,
) -> impl LoadQuery<'static, AsyncPgConnection, (Post, i64)> + QueryFragment<Pg> + Send + 'static {
    posts::table
        .left_join(votes::table)
        .filter(posts::title.like(contains_pattern(search)).escape('\\'))
        .group_by(posts::id)
        .order_by(posts::id)
        .select((Post::as_select(), count(votes::post_id.nullable())))
        .limit(page.limit)
        .offset(page.offset)
}

fn find_with_votes_query(
    id: PostId,
) -> impl LoadQuery<'static, AsyncPgConnection, (Post, i64)> + QueryFragment<Pg> + Send + 'static {
    posts::table
        .left_join(votes::table)
        .filter(posts::id.eq(id))
        .group_by(posts::id)
        .select((Post::as_select(), count(votes::post_id.nullable())))
        .limit(1)
}

fn conflict_on_unique(message: impl Into<String>) -> impl FnOnce(DieselError) -> AppError {
    move |err| match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AppError::Conflict(message.into())
        }
        other => other.into(),
    }
}

#[derive(Clone)]
pub struct PgStore {
    db: Pool,
}

impl Svc for PgStore {}

impl PgStore {
    pub fn new(db: Pool) -> Self {
        Self { db }
    }

    pub fn connect(database_url: &str, max_size: usize) -> anyhow::Result<Self> {
        let mgr = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

        info!(max_size, "Starting DB pool");
        let pool = Pool::builder(mgr)
            .max_size(max_size)
            .wait_timeout(Some(Duration::from_secs(5)))
            .create_timeout(Some(Duration::from_secs(5)))
            .runtime(deadpool::Runtime::Tokio1)
            .post_create(Hook::async_fn(|_conn, metrics| {
                Box::pin(async move {
                    tracing::trace!(?metrics, "dbpool::post_create");
                    Ok(())
                })
            }))
            .build()?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn list_with_votes(&self, search: &str, page: Page) -> AppResult<Vec<PostWithVotes>> {
        let mut conn = self.db.get().await?;

        let rows: Vec<(Post, i64)> = list_with_votes_query(search, page)
            .load(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(PostWithVotes::from).collect())
    }

    async fn find_with_votes(&self, id: PostId) -> AppResult<Option<PostWithVotes>> {
        let mut conn = self.db.get().await?;

        let row: Option<(Post, i64)> = find_with_votes_query(id)
            .get_result(&mut *conn)
            .await
            .optional()?;

        Ok(row.map(PostWithVotes::from))
    }

    async fn find_post(&self, id: PostId) -> AppResult<Option<Post>> {
        let mut conn = self.db.get().await?;

        let post = posts::table
            .find(id)
            .select(Post::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(post)
    }

    async fn insert_post(&self, post: NewPost<'_>) -> AppResult<Post> {
        let mut conn = self.db.get().await?;

        let post = diesel::insert_into(posts::table)
            .values(&post)
            .returning(Post::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(post)
    }

    async fn replace_post(&self, id: PostId, input: &PostInput) -> AppResult<Option<Post>> {
        let mut conn = self.db.get().await?;

        let post = diesel::update(posts::table.find(id))
            .set(input)
            .returning(Post::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(post)
    }

    async fn delete_post(&self, id: PostId) -> AppResult<bool> {
        let mut conn = self.db.get().await?;

        let removed = diesel::delete(posts::table.find(id))
            .execute(&mut conn)
            .await?;
        Ok(removed > 0)
    }
}

#[async_trait]
impl VoteStore for PgStore {
    async fn find_vote(&self, vote: Vote) -> AppResult<Option<Vote>> {
        let mut conn = self.db.get().await?;

        let vote = votes::table
            .find((vote.user_id, vote.post_id))
            .select(Vote::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(vote)
    }

    async fn insert_vote(&self, vote: Vote) -> AppResult<()> {
        let mut conn = self.db.get().await?;

        diesel::insert_into(votes::table)
            .values(&vote)
            .execute(&mut conn)
            .await
            .map_err(conflict_on_unique(format!(
                "user {} has already voted on post {}",
                vote.user_id, vote.post_id
            )))?;
        Ok(())
    }

    async fn delete_vote(&self, vote: Vote) -> AppResult<bool> {
        let mut conn = self.db.get().await?;

        let removed = diesel::delete(votes::table.find((vote.user_id, vote.post_id)))
            .execute(&mut conn)
            .await?;
        Ok(removed > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, u: &CreateUser) -> AppResult<User> {
        let mut conn = self.db.get().await?;

        let user = diesel::insert_into(users::table)
            .values(u)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(conflict_on_unique(format!(
                "user with email {} already exists",
                u.email
            )))?;
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        let mut conn = self.db.get().await?;

        let user = users::table
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }
}

//! Persistence seam. Services only see these traits; `PgStore` backs them
//! with PostgreSQL and `MemoryStore` with in-process tables.

pub mod memory;
pub mod pg;

use axum::async_trait;

use crate::error::AppResult;
use crate::models::post::{NewPost, Page, Post, PostId, PostInput, PostWithVotes};
use crate::models::user::{CreateUser, User, UserId};
use crate::models::vote::Vote;
use crate::services::Svc;

pub use memory::MemoryStore;
pub use pg::PgStore;

#[async_trait]
pub trait PostStore: Svc {
    /// Posts whose title contains `search`, each paired with its vote count.
    /// Posts without votes are included with a count of zero.
    async fn list_with_votes(&self, search: &str, page: Page) -> AppResult<Vec<PostWithVotes>>;
    async fn find_with_votes(&self, id: PostId) -> AppResult<Option<PostWithVotes>>;
    async fn find_post(&self, id: PostId) -> AppResult<Option<Post>>;
    async fn insert_post(&self, post: NewPost<'_>) -> AppResult<Post>;
    /// Overwrites title, content and published. `None` if the post is gone.
    async fn replace_post(&self, id: PostId, input: &PostInput) -> AppResult<Option<Post>>;
    /// Returns whether a row was removed. Votes on the post go with it.
    async fn delete_post(&self, id: PostId) -> AppResult<bool>;
}

#[async_trait]
pub trait VoteStore: Svc {
    async fn find_vote(&self, vote: Vote) -> AppResult<Option<Vote>>;
    /// Fails with `AppError::Conflict` if the pair already exists.
    async fn insert_vote(&self, vote: Vote) -> AppResult<()>;
    async fn delete_vote(&self, vote: Vote) -> AppResult<bool>;
}

#[async_trait]
pub trait UserStore: Svc {
    /// Fails with `AppError::Conflict` if the email is taken.
    async fn insert_user(&self, user: &CreateUser) -> AppResult<User>;
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>>;
}

pub trait Store: PostStore + VoteStore + UserStore {}

impl<T: PostStore + VoteStore + UserStore> Store for T {}

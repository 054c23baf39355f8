use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use anyhow::anyhow;
use axum::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{PostStore, UserStore, VoteStore};
use crate::error::{AppError, AppResult};
use crate::models::post::{NewPost, Page, Post, PostId, PostInput, PostWithVotes};
use crate::models::user::{CreateUser, User, UserId};
use crate::models::vote::Vote;
use crate::services::Svc;

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    votes: BTreeSet<(UserId, PostId)>,
    last_user_id: UserId,
    last_post_id: PostId,
}

impl Tables {
    fn vote_count(&self, post_id: PostId) -> i64 {
        self.votes.iter().filter(|(_, p)| *p == post_id).count() as i64
    }

    fn with_votes(&self, post: &Post) -> PostWithVotes {
        PostWithVotes {
            post: post.clone(),
            votes: self.vote_count(post.id),
        }
    }
}

/// In-process store with the same observable behaviour as `PgStore`:
/// serial ids from 1, foreign keys checked on insert, and votes cascading
/// with their post.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl Svc for MemoryStore {}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn clamp(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list_with_votes(&self, search: &str, page: Page) -> AppResult<Vec<PostWithVotes>> {
        let tables = self.tables.read().await;

        Ok(tables
            .posts
            .values()
            .filter(|p| p.title.contains(search))
            .skip(clamp(page.offset))
            .take(clamp(page.limit))
            .map(|p| tables.with_votes(p))
            .collect())
    }

    async fn find_with_votes(&self, id: PostId) -> AppResult<Option<PostWithVotes>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).map(|p| tables.with_votes(p)))
    }

    async fn find_post(&self, id: PostId) -> AppResult<Option<Post>> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert_post(&self, post: NewPost<'_>) -> AppResult<Post> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.owner_id) {
            return Err(AppError::Other(anyhow!(
                "posts.owner_id {} references a missing user",
                post.owner_id
            )));
        }

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            title: post.title.to_owned(),
            content: post.content.to_owned(),
            published: post.published,
            owner_id: post.owner_id,
            created_at: Utc::now(),
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn replace_post(&self, id: PostId, input: &PostInput) -> AppResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(&id).map(|post| {
            post.title.clone_from(&input.title);
            post.content.clone_from(&input.content);
            post.published = input.published;
            post.clone()
        }))
    }

    async fn delete_post(&self, id: PostId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.posts.remove(&id).is_some();
        if removed {
            tables.votes.retain(|(_, p)| *p != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn find_vote(&self, vote: Vote) -> AppResult<Option<Vote>> {
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .contains(&(vote.user_id, vote.post_id))
            .then_some(vote))
    }

    async fn insert_vote(&self, vote: Vote) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&vote.user_id) || !tables.posts.contains_key(&vote.post_id) {
            return Err(AppError::Other(anyhow!(
                "vote ({}, {}) references a missing user or post",
                vote.user_id,
                vote.post_id
            )));
        }
        if !tables.votes.insert((vote.user_id, vote.post_id)) {
            return Err(AppError::Conflict(format!(
                "user {} has already voted on post {}",
                vote.user_id, vote.post_id
            )));
        }
        Ok(())
    }

    async fn delete_vote(&self, vote: Vote) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.votes.remove(&(vote.user_id, vote.post_id)))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, u: &CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|existing| existing.email == u.email) {
            return Err(AppError::Conflict(format!(
                "user with email {} already exists",
                u.email
            )));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            email: u.email.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

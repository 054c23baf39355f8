use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::user::UserId;

pub type PostId = i32;

fn published_by_default() -> bool {
    true
}

/// Body of `POST /posts/` and `PUT /posts/{id}`.
///
/// Updates are whole-object replaces, so an omitted `published` resets the
/// flag to `true` rather than keeping the stored value.
#[derive(Deserialize, Serialize, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostInput {
    pub title: String,
    pub content: String,
    #[serde(default = "published_by_default")]
    pub published: bool,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub published: bool,
    pub owner_id: UserId,
}

impl<'a> NewPost<'a> {
    pub fn new(input: &'a PostInput, owner_id: UserId) -> Self {
        Self {
            title: &input.title,
            content: &input.content,
            published: input.published,
            owner_id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A post together with the number of votes referencing it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PostWithVotes {
    pub post: Post,
    pub votes: i64,
}

impl From<(Post, i64)> for PostWithVotes {
    fn from((post, votes): (Post, i64)) -> Self {
        Self { post, votes }
    }
}

/// Pagination window for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

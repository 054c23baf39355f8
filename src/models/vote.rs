use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{post::PostId, user::UserId};

#[derive(Insertable, Queryable, Selectable, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = crate::schema::votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Vote {
    pub user_id: UserId,
    pub post_id: PostId,
}

/// `1` adds the caller's vote, `0` withdraws it.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum VoteDirection {
    Remove,
    Add,
}

impl TryFrom<u8> for VoteDirection {
    type Error = String;

    fn try_from(dir: u8) -> Result<Self, Self::Error> {
        match dir {
            0 => Ok(Self::Remove),
            1 => Ok(Self::Add),
            other => Err(format!("vote direction must be 0 or 1, got {other}")),
        }
    }
}

impl From<VoteDirection> for u8 {
    fn from(dir: VoteDirection) -> Self {
        match dir {
            VoteDirection::Remove => 0,
            VoteDirection::Add => 1,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct VoteInput {
    pub post_id: PostId,
    pub dir: VoteDirection,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub message: String,
}

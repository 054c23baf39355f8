use crate::error::{AppError, AppResult};
use crate::models::user::UserId;
use crate::models::vote::{Vote, VoteDirection, VoteInput, VoteOutcome};
use crate::store::{PostStore, VoteStore};

#[derive(Clone)]
pub struct VoteService<S> {
    store: S,
}

impl<S: PostStore + VoteStore> VoteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds or withdraws the caller's vote on `input.post_id`.
    #[tracing::instrument(skip(self))]
    pub async fn vote(&self, input: VoteInput, caller: UserId) -> AppResult<VoteOutcome> {
        if self.store.find_post(input.post_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Post with id {} does not exist",
                input.post_id
            )));
        }

        let vote = Vote {
            user_id: caller,
            post_id: input.post_id,
        };
        let message = match input.dir {
            VoteDirection::Add => {
                if self.store.find_vote(vote).await?.is_some() {
                    return Err(AppError::Conflict(format!(
                        "user {caller} has already voted on post {}",
                        input.post_id
                    )));
                }
                self.store.insert_vote(vote).await?;
                "successfully added vote"
            }
            VoteDirection::Remove => {
                if !self.store.delete_vote(vote).await? {
                    return Err(AppError::NotFound("Vote does not exist".to_owned()));
                }
                "successfully deleted vote"
            }
        };

        Ok(VoteOutcome {
            message: message.to_owned(),
        })
    }
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use super::extract::AppJson;
use super::AppState;
use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::models::vote::{VoteInput, VoteOutcome};
use crate::store::Store;

async fn vote<S: Store>(
    State(state): State<AppState<S>>,
    CurrentUser(caller): CurrentUser,
    AppJson(input): AppJson<VoteInput>,
) -> AppResult<(StatusCode, Json<VoteOutcome>)> {
    let outcome = state.votes.vote(input, caller).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub fn router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/vote", post(vote::<S>))
        .route("/vote/", post(vote::<S>))
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::extract::{AppJson, AppPath};
use super::AppState;
use crate::error::AppResult;
use crate::models::user::{CreateUser, User, UserId};
use crate::store::Store;

async fn create_user<S: Store>(
    State(state): State<AppState<S>>,
    AppJson(payload): AppJson<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.users.create_user(&payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user<S: Store>(
    State(state): State<AppState<S>>,
    AppPath(id): AppPath<UserId>,
) -> AppResult<Json<User>> {
    let user = state.users.get_user(id).await?;
    Ok(Json(user))
}

pub fn router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/users", post(create_user::<S>))
        .route("/users/", post(create_user::<S>))
        .route("/users/:id", get(get_user::<S>))
}

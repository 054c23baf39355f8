use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::extract::{AppJson, AppPath, AppQuery};
use super::AppState;
use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::models::post::{Page, Post, PostId, PostInput, PostWithVotes};
use crate::store::Store;

fn default_limit() -> u32 {
    10
}

#[derive(Deserialize, Debug)]
pub struct ListParams {
    #[serde(default)]
    search: String,
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    skip: u32,
}

async fn list_posts<S: Store>(
    State(state): State<AppState<S>>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Vec<PostWithVotes>>> {
    let page = Page {
        limit: params.limit.into(),
        offset: params.skip.into(),
    };
    let posts = state.posts.list(&params.search, page).await?;
    Ok(Json(posts))
}

async fn create_post<S: Store>(
    State(state): State<AppState<S>>,
    CurrentUser(caller): CurrentUser,
    AppJson(input): AppJson<PostInput>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let post = state.posts.create(&input, caller).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn get_post<S: Store>(
    State(state): State<AppState<S>>,
    CurrentUser(caller): CurrentUser,
    AppPath(id): AppPath<PostId>,
) -> AppResult<Json<PostWithVotes>> {
    let post = state.posts.get_by_id(id, caller).await?;
    Ok(Json(post))
}

async fn update_post<S: Store>(
    State(state): State<AppState<S>>,
    CurrentUser(caller): CurrentUser,
    AppPath(id): AppPath<PostId>,
    AppJson(input): AppJson<PostInput>,
) -> AppResult<Json<Post>> {
    let post = state.posts.update(id, &input, caller).await?;
    Ok(Json(post))
}

async fn delete_post<S: Store>(
    State(state): State<AppState<S>>,
    CurrentUser(caller): CurrentUser,
    AppPath(id): AppPath<PostId>,
) -> AppResult<StatusCode> {
    state.posts.delete(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router<S: Store>() -> Router<AppState<S>> {
    let collection = get(list_posts::<S>).post(create_post::<S>);
    Router::new()
        .route("/posts", collection.clone())
        .route("/posts/", collection)
        .route(
            "/posts/:id",
            get(get_post::<S>)
                .put(update_post::<S>)
                .delete(delete_post::<S>),
        )
}

pub mod extract;
pub mod posts;
pub mod users;
pub mod votes;

use axum::extract::FromRef;
use axum::Router;

use crate::auth::Authenticator;
use crate::middleware::cors::CorsExt;
use crate::middleware::logging::HttpLoggingExt;
use crate::services::{PostService, UserService, VoteService};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState<S> {
    pub posts: PostService<S>,
    pub votes: VoteService<S>,
    pub users: UserService<S>,
    pub auth: Authenticator,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S, auth: Authenticator) -> Self {
        Self {
            posts: PostService::new(store.clone()),
            votes: VoteService::new(store.clone()),
            users: UserService::new(store),
            auth,
        }
    }
}

impl<S> FromRef<AppState<S>> for Authenticator {
    fn from_ref(state: &AppState<S>) -> Self {
        state.auth.clone()
    }
}

/// The full HTTP surface over `state`.
pub fn app<S: Store>(state: AppState<S>, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(posts::router())
        .merge(votes::router())
        .merge(users::router())
        .with_http_logging()
        .with_cors(cors_origins)
        .with_state(state)
}

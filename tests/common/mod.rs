#![allow(dead_code)]

use axum::http::{header, HeaderValue};
use axum_test::TestServer;
use chrono::Duration;
use postboard::auth::Authenticator;
use postboard::models::user::{CreateUser, UserId};
use postboard::store::{MemoryStore, UserStore};
use postboard::{app, AppState};

pub struct TestApp {
    pub server: TestServer,
    pub store: MemoryStore,
    pub auth: Authenticator,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let auth = Authenticator::new("test-secret", Duration::minutes(30));
        let router = app(AppState::new(store.clone(), auth.clone()), &[]);
        let server = TestServer::new(router).unwrap();
        Self {
            server,
            store,
            auth,
        }
    }

    pub async fn user(&self, email: &str) -> UserId {
        self.store
            .insert_user(&CreateUser {
                email: email.to_owned(),
            })
            .await
            .unwrap()
            .id
    }

    pub fn bearer(&self, user: UserId) -> (header::HeaderName, HeaderValue) {
        let token = self.auth.issue(user).unwrap();
        (
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
    }
}

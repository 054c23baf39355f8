use crate::error::{AppError, AppResult};
use crate::models::user::{CreateUser, User, UserId};
use crate::store::UserStore;

#[derive(Clone)]
pub struct UserService<S> {
    store: S,
}

impl<S: UserStore> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip_all)]
    pub async fn create_user(&self, u: &CreateUser) -> AppResult<User> {
        let user = self.store.insert_user(u).await?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> AppResult<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {id} does not exist")))
    }
}

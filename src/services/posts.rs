use crate::error::{AppError, AppResult};
use crate::models::post::{NewPost, Page, Post, PostId, PostInput, PostWithVotes};
use crate::models::user::UserId;
use crate::store::PostStore;

fn not_found(id: PostId) -> AppError {
    AppError::NotFound(format!("Post with id {id} was not found"))
}

/// Create/read/update/delete over posts, with ownership checks on mutation.
///
/// Every method takes the caller explicitly. The store handle lives in the
/// service and each store call holds a pooled connection only for its own
/// duration.
#[derive(Clone)]
pub struct PostService<S> {
    store: S,
}

impl<S: PostStore> PostService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, search: &str, page: Page) -> AppResult<Vec<PostWithVotes>> {
        self.store.list_with_votes(search, page).await
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn create(&self, input: &PostInput, caller: UserId) -> AppResult<Post> {
        let post = self.store.insert_post(NewPost::new(input, caller)).await?;
        tracing::info!(post_id = post.id, "post created");
        Ok(post)
    }

    /// Any authenticated caller may read any post; ownership is not checked
    /// here, unlike `update` and `delete`.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: PostId, caller: UserId) -> AppResult<PostWithVotes> {
        self.store
            .find_with_votes(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn update(&self, id: PostId, input: &PostInput, caller: UserId) -> AppResult<Post> {
        self.owned_post(id, caller).await?;
        self.store
            .replace_post(id, input)
            .await?
            .ok_or_else(|| not_found(id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: PostId, caller: UserId) -> AppResult<()> {
        self.owned_post(id, caller).await?;
        if !self.store.delete_post(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(post_id = id, "post deleted");
        Ok(())
    }

    /// NotFound takes precedence over Forbidden.
    async fn owned_post(&self, id: PostId, caller: UserId) -> AppResult<Post> {
        let post = self.store.find_post(id).await?.ok_or_else(|| not_found(id))?;
        if post.owner_id != caller {
            tracing::warn!(post_id = id, owner_id = post.owner_id, "caller does not own post");
            return Err(AppError::Forbidden);
        }
        Ok(post)
    }
}

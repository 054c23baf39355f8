pub mod posts;
pub mod users;
pub mod votes;

pub use posts::PostService;
pub use users::UserService;
pub use votes::VoteService;

/// Marker for values shared across request handlers.
pub trait Svc: Clone + Send + Sync + 'static {}

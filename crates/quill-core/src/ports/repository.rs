use async_trait::async_trait;

use crate::domain::{
    NewPost, NewRating, NewUser, Post, Rating, RatingTotals, SharedIp, TopPost, User,
};
use crate::error::RepoError;

/// Generic repository trait for append-only entities.
///
/// `T` is the stored entity, `N` its unsaved form.
#[async_trait]
pub trait BaseRepository<T, N, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity and return it with its generated ID.
    ///
    /// Must fail with [`RepoError::Constraint`] when a storage-level
    /// uniqueness rule rejects the row.
    async fn insert(&self, entity: N) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, NewUser, i64> {
    /// Find a user by their (unique) login.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository with the aggregate queries.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost, i64> {
    /// Rated posts by descending mean rating, ties by ascending id, at most `limit`.
    /// Unrated posts are never returned.
    async fn top_rated(&self, limit: u64) -> Result<Vec<TopPost>, RepoError>;

    /// Addresses whose posts come from more than one distinct user, ordered by
    /// address, with the distinct logins of those users in alphabetical order.
    async fn shared_ips(&self) -> Result<Vec<SharedIp>, RepoError>;
}

/// Rating repository.
#[async_trait]
pub trait RatingRepository: BaseRepository<Rating, NewRating, i64> {
    /// Whether `user_id` already rated `post_id`.
    async fn exists_for(&self, user_id: i64, post_id: i64) -> Result<bool, RepoError>;

    /// Count and sum of all rating values of a post.
    async fn totals_for_post(&self, post_id: i64) -> Result<RatingTotals, RepoError>;
}

//! In-memory store - used when no database is configured, and in tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::{
    NewPost, NewRating, NewUser, Post, Rating, RatingTotals, SharedIp, TopPost, User,
};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, RatingRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    ratings: BTreeMap<i64, Rating>,
    // Unique indexes.
    users_by_login: HashMap<String, i64>,
    ratings_by_pair: HashMap<(i64, i64), i64>,
    next_user_id: i64,
    next_post_id: i64,
    next_rating_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// All three tables behind one async RwLock.
///
/// Each insert checks its unique and foreign keys and writes under the same
/// write guard, so the uniqueness guarantees match the database's.
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Number of stored users, posts and ratings.
    pub async fn counts(&self) -> (usize, usize, usize) {
        let tables = self.tables.read().await;
        (tables.users.len(), tables.posts.len(), tables.ratings.len())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, NewUser, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, entity: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users_by_login.contains_key(&entity.login) {
            return Err(RepoError::Constraint(format!(
                "users.login '{}' already exists",
                entity.login
            )));
        }

        let user = User {
            id: next_id(&mut tables.next_user_id),
            login: entity.login,
            created_at: entity.created_at,
        };
        tables.users_by_login.insert(user.login.clone(), user.id);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users_by_login
            .get(login)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, NewPost, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, entity: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&entity.user_id) {
            return Err(RepoError::Query(format!(
                "posts.user_id {} references a missing user",
                entity.user_id
            )));
        }

        let post = Post {
            id: next_id(&mut tables.next_post_id),
            user_id: entity.user_id,
            title: entity.title,
            body: entity.body,
            ip: entity.ip,
            created_at: entity.created_at,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn top_rated(&self, limit: u64) -> Result<Vec<TopPost>, RepoError> {
        let tables = self.tables.read().await;

        let mut totals: BTreeMap<i64, RatingTotals> = BTreeMap::new();
        for rating in tables.ratings.values() {
            let entry = totals.entry(rating.post_id).or_default();
            entry.count += 1;
            entry.sum += i64::from(rating.value);
        }

        // Compare means as fractions (a/b > c/d <=> a*d > c*b) to stay exact.
        let mut ranked: Vec<(i64, RatingTotals)> = totals.into_iter().collect();
        ranked.sort_by(|(a_id, a), (b_id, b)| {
            let lhs = i128::from(b.sum) * i128::from(a.count);
            let rhs = i128::from(a.sum) * i128::from(b.count);
            lhs.cmp(&rhs).then(a_id.cmp(b_id))
        });

        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(ranked
            .into_iter()
            .filter_map(|(id, _)| tables.posts.get(&id))
            .take(limit)
            .map(|post| TopPost {
                id: post.id,
                title: post.title.clone(),
                body: post.body.clone(),
            })
            .collect())
    }

    async fn shared_ips(&self) -> Result<Vec<SharedIp>, RepoError> {
        let tables = self.tables.read().await;

        let mut by_ip: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for post in tables.posts.values() {
            let (Some(ip), Some(user)) = (post.ip.as_deref(), tables.users.get(&post.user_id))
            else {
                continue;
            };
            by_ip.entry(ip).or_default().insert(user.login.as_str());
        }

        // Logins are unique, so distinct logins count distinct users.
        Ok(by_ip
            .into_iter()
            .filter(|(_, logins)| logins.len() > 1)
            .map(|(ip, logins)| SharedIp {
                ip: ip.to_string(),
                logins: logins.into_iter().map(str::to_string).collect(),
            })
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Rating, NewRating, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Rating>, RepoError> {
        Ok(self.tables.read().await.ratings.get(&id).cloned())
    }

    async fn insert(&self, entity: NewRating) -> Result<Rating, RepoError> {
        let mut tables = self.tables.write().await;
        let pair = (entity.user_id, entity.post_id);
        if tables.ratings_by_pair.contains_key(&pair) {
            return Err(RepoError::Constraint(format!(
                "ratings (user_id, post_id) = ({}, {}) already exists",
                pair.0, pair.1
            )));
        }
        if !tables.users.contains_key(&entity.user_id) || !tables.posts.contains_key(&entity.post_id)
        {
            return Err(RepoError::Query(
                "rating references a missing user or post".to_string(),
            ));
        }

        let rating = Rating {
            id: next_id(&mut tables.next_rating_id),
            post_id: entity.post_id,
            user_id: entity.user_id,
            value: entity.value,
            created_at: entity.created_at,
        };
        tables.ratings_by_pair.insert(pair, rating.id);
        tables.ratings.insert(rating.id, rating.clone());
        Ok(rating)
    }
}

#[async_trait]
impl RatingRepository for InMemoryStore {
    async fn exists_for(&self, user_id: i64, post_id: i64) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.ratings_by_pair.contains_key(&(user_id, post_id)))
    }

    async fn totals_for_post(&self, post_id: i64) -> Result<RatingTotals, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .values()
            .filter(|rating| rating.post_id == post_id)
            .fold(RatingTotals::default(), |mut totals, rating| {
                totals.count += 1;
                totals.sum += i64::from(rating.value);
                totals
            }))
    }
}

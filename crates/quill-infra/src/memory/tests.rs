use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use quill_core::DomainError;
use quill_core::domain::{NewRating, NewUser, Rating, RatingTotals, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, RatingRepository, UserRepository};
use quill_core::services::{PostInput, PostService, RatingService, UserService};

use super::InMemoryStore;

struct Fixture {
    store: Arc<InMemoryStore>,
    users: UserService,
    posts: PostService,
    ratings: RatingService,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let user_repo: Arc<dyn UserRepository> = store.clone();
    let post_repo: Arc<dyn PostRepository> = store.clone();
    let rating_repo: Arc<dyn RatingRepository> = store.clone();

    let users = UserService::new(user_repo.clone());
    Fixture {
        store,
        posts: PostService::new(users.clone(), post_repo.clone()),
        ratings: RatingService::new(user_repo, post_repo, rating_repo),
        users,
    }
}

fn input<'a>(login: &'a str, title: &'a str, ip: &'a str) -> PostInput<'a> {
    PostInput {
        login: Some(login),
        title: Some(title),
        body: Some("..."),
        ip: Some(ip),
    }
}

fn validation_messages(err: DomainError) -> Vec<String> {
    match err {
        DomainError::Validation(errors) => errors.into_messages(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_post_creates_new_user() {
    let f = fixture();

    let created = f
        .posts
        .create(input("new_user", "My first post", "127.0.0.1"))
        .await
        .unwrap();

    assert_eq!(created.post.title, "My first post");
    assert_eq!(created.author.login, "new_user");
    assert_eq!(created.post.user_id, created.author.id);
    assert_eq!(f.store.counts().await, (1, 1, 0));
}

#[tokio::test]
async fn test_create_post_reuses_existing_user() {
    let f = fixture();
    let existing = f.users.resolve(Some("existing_user")).await.unwrap();

    let created = f
        .posts
        .create(input("existing_user", "Another post", "192.168.1.1"))
        .await
        .unwrap();

    assert_eq!(created.author.id, existing.id);
    assert_eq!(f.store.counts().await, (1, 1, 0));
}

#[tokio::test]
async fn test_create_post_with_blank_title_persists_nothing() {
    let f = fixture();

    let err = f
        .posts
        .create(input("test_user", "", "127.0.0.1"))
        .await
        .unwrap_err();

    assert!(validation_messages(err).contains(&"Title can't be blank".to_string()));
    assert_eq!(f.store.counts().await, (0, 0, 0));
}

#[tokio::test]
async fn test_create_post_collects_every_message() {
    let f = fixture();

    let err = f.posts.create(PostInput::default()).await.unwrap_err();

    assert_eq!(
        validation_messages(err),
        [
            "Login can't be blank",
            "Title can't be blank",
            "Body can't be blank"
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolve_creates_one_user() {
    let f = fixture();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let users = f.users.clone();
            tokio::spawn(async move { users.resolve(Some("racer")).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }

    ids.dedup();
    assert_eq!(ids.len(), 1);
    assert_eq!(f.store.counts().await.0, 1);
}

/// Misses the first lookup, as if another request inserted the login
/// between our lookup and our insert.
struct StaleLookups {
    inner: Arc<InMemoryStore>,
    stale: AtomicBool,
}

#[async_trait]
impl BaseRepository<User, NewUser, i64> for StaleLookups {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        BaseRepository::<User, NewUser, i64>::find_by_id(self.inner.as_ref(), id).await
    }

    async fn insert(&self, entity: NewUser) -> Result<User, RepoError> {
        BaseRepository::<User, NewUser, i64>::insert(self.inner.as_ref(), entity).await
    }
}

#[async_trait]
impl UserRepository for StaleLookups {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError> {
        if self.stale.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.find_by_login(login).await
    }
}

#[tokio::test]
async fn test_resolve_recovers_from_lost_insert_race() {
    let store = Arc::new(InMemoryStore::new());
    let winner = UserService::new(store.clone())
        .resolve(Some("shared"))
        .await
        .unwrap();

    let users = UserService::new(Arc::new(StaleLookups {
        inner: store.clone(),
        stale: AtomicBool::new(true),
    }));
    let resolved = users.resolve(Some("shared")).await.unwrap();

    assert_eq!(resolved.id, winner.id);
    assert_eq!(store.counts().await.0, 1);
}

#[tokio::test]
async fn test_rating_returns_new_average() {
    let f = fixture();
    let created = f
        .posts
        .create(input("test_user", "A post", "127.0.0.1"))
        .await
        .unwrap();

    let rated = f
        .ratings
        .rate(created.post.id, Some(created.author.id), Some(4))
        .await
        .unwrap();

    assert_eq!(rated.average, 4.0);
    assert_eq!(rated.rating.value, 4);
    assert_eq!(f.store.counts().await.2, 1);
}

#[tokio::test]
async fn test_rating_same_post_twice_is_rejected() {
    let f = fixture();
    let created = f
        .posts
        .create(input("test_user", "A post", "127.0.0.1"))
        .await
        .unwrap();
    let (post_id, user_id) = (created.post.id, created.author.id);

    f.ratings.rate(post_id, Some(user_id), Some(5)).await.unwrap();
    let err = f
        .ratings
        .rate(post_id, Some(user_id), Some(1))
        .await
        .unwrap_err();

    assert_eq!(validation_messages(err), ["User can rate a post only once"]);
    assert_eq!(f.store.counts().await.2, 1);
}

/// Rating repository whose first existence check misses a row written concurrently.
struct RacingRatings {
    inner: Arc<InMemoryStore>,
    stale: AtomicBool,
}

#[async_trait]
impl BaseRepository<Rating, NewRating, i64> for RacingRatings {
    async fn find_by_id(&self, id: i64) -> Result<Option<Rating>, RepoError> {
        BaseRepository::<Rating, NewRating, i64>::find_by_id(self.inner.as_ref(), id).await
    }

    async fn insert(&self, entity: NewRating) -> Result<Rating, RepoError> {
        BaseRepository::<Rating, NewRating, i64>::insert(self.inner.as_ref(), entity).await
    }
}

#[async_trait]
impl RatingRepository for RacingRatings {
    async fn exists_for(&self, user_id: i64, post_id: i64) -> Result<bool, RepoError> {
        if self.stale.swap(false, Ordering::SeqCst) {
            return Ok(false);
        }
        self.inner.exists_for(user_id, post_id).await
    }

    async fn totals_for_post(&self, post_id: i64) -> Result<RatingTotals, RepoError> {
        self.inner.totals_for_post(post_id).await
    }
}

#[tokio::test]
async fn test_rating_insert_conflict_reports_duplicate() {
    let f = fixture();
    let created = f
        .posts
        .create(input("test_user", "A post", "127.0.0.1"))
        .await
        .unwrap();
    let (post_id, user_id) = (created.post.id, created.author.id);
    f.ratings.rate(post_id, Some(user_id), Some(5)).await.unwrap();

    let ratings = RatingService::new(
        f.store.clone(),
        f.store.clone(),
        Arc::new(RacingRatings {
            inner: f.store.clone(),
            stale: AtomicBool::new(true),
        }),
    );
    let err = ratings
        .rate(post_id, Some(user_id), Some(2))
        .await
        .unwrap_err();

    assert_eq!(validation_messages(err), ["User can rate a post only once"]);
    assert_eq!(f.store.counts().await.2, 1);
}

#[tokio::test]
async fn test_rating_value_out_of_range() {
    let f = fixture();
    let created = f
        .posts
        .create(input("test_user", "A post", "127.0.0.1"))
        .await
        .unwrap();

    let err = f
        .ratings
        .rate(created.post.id, Some(created.author.id), Some(6))
        .await
        .unwrap_err();

    assert_eq!(validation_messages(err), ["Value is not included in the list"]);
    assert_eq!(f.store.counts().await.2, 0);
}

#[tokio::test]
async fn test_rating_requires_existing_user() {
    let f = fixture();
    let created = f
        .posts
        .create(input("test_user", "A post", "127.0.0.1"))
        .await
        .unwrap();

    let err = f
        .ratings
        .rate(created.post.id, Some(999), Some(3))
        .await
        .unwrap_err();
    assert_eq!(validation_messages(err), ["User must exist"]);

    let err = f.ratings.rate(created.post.id, None, None).await.unwrap_err();
    assert_eq!(
        validation_messages(err),
        [
            "Value can't be blank",
            "Value is not included in the list",
            "User must exist"
        ]
    );
}

#[tokio::test]
async fn test_rating_unknown_post_is_not_found() {
    let f = fixture();
    let user = f.users.resolve(Some("test_user")).await.unwrap();

    let err = f.ratings.rate(42, Some(user.id), Some(3)).await.unwrap_err();

    assert!(matches!(
        err,
        DomainError::NotFound {
            entity_type: "Post",
            id: 42
        }
    ));
}

#[tokio::test]
async fn test_top_rated_ranks_by_mean_and_skips_unrated() {
    let f = fixture();
    let user = f.users.resolve(Some("test_user")).await.unwrap();
    let another = f.users.resolve(Some("another_user")).await.unwrap();

    let bad = f.posts.create(input("test_user", "Bad Post", "1.1.1.1")).await.unwrap();
    let excellent = f
        .posts
        .create(input("test_user", "Excellent Post", "2.2.2.2"))
        .await
        .unwrap();
    let average = f
        .posts
        .create(input("test_user", "Average Post", "3.3.3.3"))
        .await
        .unwrap();
    f.posts
        .create(input("test_user", "Unrated post", "4.4.4.4"))
        .await
        .unwrap();

    f.ratings.rate(bad.post.id, Some(user.id), Some(1)).await.unwrap();
    f.ratings.rate(excellent.post.id, Some(user.id), Some(5)).await.unwrap();
    f.ratings.rate(average.post.id, Some(user.id), Some(2)).await.unwrap();
    let rated = f
        .ratings
        .rate(average.post.id, Some(another.id), Some(4))
        .await
        .unwrap();
    assert_eq!(rated.average, 3.0);

    let top: Vec<_> = f.posts.top_rated(2).await.unwrap();
    let titles: Vec<_> = top.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Excellent Post", "Average Post"]);

    let all = f.posts.top_rated(10).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|p| p.title != "Unrated post"));

    assert!(f.posts.top_rated(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_top_rated_breaks_ties_by_id() {
    let f = fixture();
    let user = f.users.resolve(Some("rater")).await.unwrap();
    let first = f.posts.create(input("author", "First", "1.1.1.1")).await.unwrap();
    let second = f.posts.create(input("author", "Second", "1.1.1.1")).await.unwrap();

    f.ratings.rate(second.post.id, Some(user.id), Some(3)).await.unwrap();
    f.ratings.rate(first.post.id, Some(user.id), Some(3)).await.unwrap();

    let ids: Vec<_> = f
        .posts
        .top_rated(5)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, [first.post.id, second.post.id]);
}

#[tokio::test]
async fn test_shared_ips_require_distinct_users() {
    let f = fixture();
    for (login, title, ip) in [
        ("user_one", "First post", "1.1.1.1"),
        ("user_two", "Second post", "1.1.1.1"),
        ("user_one", "Third post", "2.2.2.2"),
        ("user_one", "Fourth post", "3.3.3.3"),
        ("user_two", "Fifth post", "3.3.3.3"),
        ("user_three", "Sixth post", "3.3.3.3"),
        ("user_one", "Seventh post", "2.2.2.2"),
    ] {
        f.posts.create(input(login, title, ip)).await.unwrap();
    }

    let groups = f.posts.shared_ips().await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].ip, "1.1.1.1");
    assert_eq!(groups[0].logins, ["user_one", "user_two"]);
    assert_eq!(groups[1].ip, "3.3.3.3");
    assert_eq!(groups[1].logins, ["user_one", "user_three", "user_two"]);
}

#[tokio::test]
async fn test_posts_without_ip_are_never_shared() {
    let f = fixture();
    for login in ["a", "b"] {
        f.posts
            .create(PostInput {
                login: Some(login),
                title: Some("t"),
                body: Some("b"),
                ip: None,
            })
            .await
            .unwrap();
    }

    assert!(f.posts.shared_ips().await.unwrap().is_empty());
}

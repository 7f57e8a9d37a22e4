use std::sync::Arc;

use crate::domain::{NewRating, Rating, ValidationErrors, check_value};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, RatingRepository, UserRepository};

const DUPLICATE_RATING: &str = "can rate a post only once";

/// Result of a successful rating.
#[derive(Debug, Clone)]
pub struct RatedPost {
    pub rating: Rating,
    /// Mean of all the post's ratings, including the new one, to two decimals.
    pub average: f64,
}

/// Records ratings and recomputes post averages.
#[derive(Clone)]
pub struct RatingService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    ratings: Arc<dyn RatingRepository>,
}

impl RatingService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        ratings: Arc<dyn RatingRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            ratings,
        }
    }

    /// Rate `post_id` on behalf of `user_id`.
    ///
    /// Fails with [`DomainError::NotFound`] for an unknown post, and with a
    /// validation error for a bad value, an unknown user, or a second rating
    /// of the same post by the same user.
    pub async fn rate(
        &self,
        post_id: i64,
        user_id: Option<i64>,
        value: Option<i64>,
    ) -> Result<RatedPost, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Post",
                id: post_id,
            })?;

        let mut errors = ValidationErrors::new();
        let value = check_value(value, &mut errors);

        let user = match user_id {
            Some(id) => self.users.find_by_id(id).await?,
            None => None,
        };
        match &user {
            None => errors.add("user", "must exist"),
            Some(user) => {
                if self.ratings.exists_for(user.id, post.id).await? {
                    errors.add("user", DUPLICATE_RATING);
                }
            }
        }
        errors.into_result()?;

        let (Some(user), Some(value)) = (user, value) else {
            return Err(DomainError::Internal("rating input passed validation incompletely".into()));
        };

        // The pre-check above is advisory; the unique index decides under concurrency.
        let rating = match self.ratings.insert(NewRating::new(post.id, user.id, value)).await {
            Ok(rating) => rating,
            Err(RepoError::Constraint(reason)) => {
                tracing::debug!(post_id, user_id = user.id, %reason, "Concurrent duplicate rating");
                return Err(ValidationErrors::from(("user", DUPLICATE_RATING)).into());
            }
            Err(e) => return Err(e.into()),
        };

        let totals = self.ratings.totals_for_post(post.id).await?;
        let average = totals.average().unwrap_or(f64::from(rating.value));

        tracing::info!(
            post_id = post.id,
            user_id = user.id,
            value = rating.value,
            average,
            "Rating recorded"
        );

        Ok(RatedPost { rating, average })
    }
}

//! Domain entities - the core business objects.

mod post;
mod rating;
mod user;
mod validation;

pub mod query;

pub use post::{NewPost, Post, PostDraft, SharedIp, TopPost};
pub use rating::{NewRating, RATING_VALUES, Rating, RatingTotals, check_value};
pub use user::{NewUser, User};
pub use validation::{ValidationErrors, is_blank};

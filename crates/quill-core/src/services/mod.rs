//! Application services - the operations exposed over HTTP, written against ports only.

mod posts;
mod ratings;
mod users;

pub use posts::{CreatedPost, PostInput, PostService};
pub use ratings::{RatedPost, RatingService};
pub use users::UserService;

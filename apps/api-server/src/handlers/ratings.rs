//! Rating handlers.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{CreateRatingRequest, RatingResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /posts/{post_id}/ratings
pub async fn create(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CreateRatingRequest>,
) -> AppResult<HttpResponse> {
    let raw_id = path.into_inner();
    // A non-numeric id cannot name a post.
    let post_id: i64 = raw_id
        .parse()
        .map_err(|_| AppError::NotFound(format!("Couldn't find Post with 'id'={}", raw_id)))?;

    let req = body.into_inner();
    let rated = state.ratings.rate(post_id, req.user_id, req.value).await?;

    Ok(HttpResponse::Created().json(RatingResponse {
        average_rating: rated.average,
    }))
}

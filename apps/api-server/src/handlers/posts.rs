//! Post handlers: creation and the aggregate reports.

use actix_web::{HttpResponse, web};

use quill_core::domain::query::coerce_count;
use quill_core::services::{CreatedPost, PostInput};
use quill_shared::dto::{
    CreatePostRequest, PostResponse, SharedIpResponse, TopPostResponse, TopPostsQuery,
    UserResponse,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let params = req.post.ok_or_else(|| {
        AppError::BadRequest("param is missing or the value is empty: post".to_string())
    })?;

    let created = state
        .posts
        .create(PostInput {
            login: req.login.as_deref(),
            title: params.title.as_deref(),
            body: params.body.as_deref(),
            ip: params.ip.as_deref(),
        })
        .await?;

    Ok(HttpResponse::Created().json(post_response(created)))
}

/// GET /posts/top?count=N
pub async fn top(
    state: web::Data<AppState>,
    query: web::Query<TopPostsQuery>,
) -> AppResult<HttpResponse> {
    let limit = coerce_count(query.count.as_deref());

    let posts: Vec<TopPostResponse> = state
        .posts
        .top_rated(limit)
        .await?
        .into_iter()
        .map(|post| TopPostResponse {
            id: post.id,
            title: post.title,
            body: post.body,
        })
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/shared_ips
pub async fn shared_ips(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let groups: Vec<SharedIpResponse> = state
        .posts
        .shared_ips()
        .await?
        .into_iter()
        .map(|group| SharedIpResponse {
            ip: group.ip,
            logins: group.logins,
        })
        .collect();

    Ok(HttpResponse::Ok().json(groups))
}

fn post_response(created: CreatedPost) -> PostResponse {
    let CreatedPost { post, author } = created;
    PostResponse {
        id: post.id,
        title: post.title,
        body: post.body,
        ip: post.ip,
        user_id: post.user_id,
        created_at: post.created_at.to_rfc3339(),
        user: UserResponse {
            id: author.id,
            login: author.login,
            created_at: author.created_at.to_rfc3339(),
        },
    }
}

//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Deserializer, Serialize};

/// `POST /posts` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub login: Option<String>,
    /// Required; a missing object is a malformed request rather than a validation failure.
    #[serde(default)]
    pub post: Option<PostParams>,
}

/// The nested `post` object of [`CreatePostRequest`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostParams {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

/// `POST /posts/{post_id}/ratings` body.
///
/// Integers may also arrive as numeric strings; anything else counts as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRatingRequest {
    #[serde(default, deserialize_with = "lenient_int")]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub value: Option<i64>,
}

/// `GET /posts/top` query string. `count` is coerced permissively by the server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopPostsQuery {
    pub count: Option<String>,
}

/// A user as embedded in a created post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub login: String,
    pub created_at: String,
}

/// A created post, including its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub ip: Option<String>,
    pub user_id: i64,
    pub created_at: String,
    pub user: UserResponse,
}

/// Average rating of a post right after a new rating was recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingResponse {
    pub average_rating: f64,
}

/// One entry of the top-rated posts list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPostResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// An address shared by several authors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedIpResponse {
    pub ip: String,
    pub logins: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i64),
    Text(String),
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IntOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(IntOrText::Int(value)) => Some(value),
        Some(IntOrText::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_request_accepts_numbers_and_numeric_strings() {
        let req: CreateRatingRequest =
            serde_json::from_str(r#"{"user_id": 3, "value": "4"}"#).unwrap();
        assert_eq!(req.user_id, Some(3));
        assert_eq!(req.value, Some(4));
    }

    #[test]
    fn test_rating_request_treats_junk_as_missing() {
        let req: CreateRatingRequest =
            serde_json::from_str(r#"{"value": "four", "user_id": null}"#).unwrap();
        assert_eq!(req.user_id, None);
        assert_eq!(req.value, None);
    }

    #[test]
    fn test_post_request_without_post_object() {
        let req: CreatePostRequest = serde_json::from_str(r#"{"login": "jane"}"#).unwrap();
        assert_eq!(req.login.as_deref(), Some("jane"));
        assert!(req.post.is_none());
    }

    #[test]
    fn test_top_post_has_only_public_fields() {
        let json = serde_json::to_value(TopPostResponse {
            id: 1,
            title: "t".into(),
            body: "b".into(),
        })
        .unwrap();

        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["body", "id", "title"]);
    }
}

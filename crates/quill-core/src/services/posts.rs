use std::sync::Arc;

use crate::domain::{NewUser, Post, PostDraft, SharedIp, TopPost, User, ValidationErrors};
use crate::error::DomainError;
use crate::ports::PostRepository;

use super::UserService;

/// Raw, unvalidated input for a new post.
#[derive(Debug, Clone, Default)]
pub struct PostInput<'a> {
    pub login: Option<&'a str>,
    pub title: Option<&'a str>,
    pub body: Option<&'a str>,
    pub ip: Option<&'a str>,
}

/// A freshly stored post together with its author.
#[derive(Debug, Clone)]
pub struct CreatedPost {
    pub post: Post,
    pub author: User,
}

/// Post creation and the post-level aggregate queries.
#[derive(Clone)]
pub struct PostService {
    users: UserService,
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(users: UserService, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    /// Create a post, resolving (or creating) its author by login.
    ///
    /// Every field is validated before anything is written, so a rejected
    /// post creates neither a post nor a user.
    pub async fn create(&self, input: PostInput<'_>) -> Result<CreatedPost, DomainError> {
        let user = NewUser::new(input.login);
        let draft = PostDraft::new(input.title, input.body, input.ip);
        let (new_user, draft) = match (user, draft) {
            (Ok(user), Ok(draft)) => (user, draft),
            (user, draft) => {
                let mut errors = ValidationErrors::new();
                if let Err(e) = user {
                    errors.extend(e);
                }
                if let Err(e) = draft {
                    errors.extend(e);
                }
                return Err(errors.into());
            }
        };

        let author = self.users.resolve_valid(new_user).await?;
        let post = self.posts.insert(draft.owned_by(author.id)).await?;

        tracing::info!(
            post_id = post.id,
            user_id = author.id,
            ip = post.ip.as_deref().unwrap_or("-"),
            "Post created"
        );

        Ok(CreatedPost { post, author })
    }

    /// Up to `limit` rated posts, best mean rating first.
    pub async fn top_rated(&self, limit: u64) -> Result<Vec<TopPost>, DomainError> {
        let posts = self.posts.top_rated(limit).await?;
        tracing::debug!(limit, returned = posts.len(), "Top posts computed");
        Ok(posts)
    }

    /// Addresses used by more than one author.
    pub async fn shared_ips(&self) -> Result<Vec<SharedIp>, DomainError> {
        let groups = self.posts.shared_ips().await?;
        tracing::debug!(groups = groups.len(), "Shared IPs computed");
        Ok(groups)
    }
}

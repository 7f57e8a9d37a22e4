use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::ValidationErrors;

/// Post entity - a titled text submitted by a user from some source address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated post content, not yet bound to an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub ip: Option<String>,
}

impl PostDraft {
    /// Validate raw post fields. All failures are reported at once.
    pub fn new(
        title: Option<&str>,
        body: Option<&str>,
        ip: Option<&str>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_present("title", title);
        errors.require_present("body", body);
        errors.into_result()?;

        // An empty address is the same as no address.
        let ip = ip.map(str::trim).filter(|ip| !ip.is_empty());

        Ok(Self {
            title: title.unwrap_or_default().to_string(),
            body: body.unwrap_or_default().to_string(),
            ip: ip.map(str::to_string),
        })
    }

    /// Attach the draft to its owner.
    pub fn owned_by(self, user_id: i64) -> NewPost {
        NewPost {
            user_id,
            title: self.title,
            body: self.body,
            ip: self.ip,
            created_at: Utc::now(),
        }
    }
}

/// A post that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A ranked post, as exposed by the top-posts query. Carries no rating or owner data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPost {
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// An address used by more than one distinct author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedIp {
    pub ip: String,
    pub logins: Vec<String>,
}

impl SharedIp {
    /// Fold `(ip, login)` pairs sorted by ip into groups, dropping repeated logins.
    pub fn group_sorted<I>(pairs: I) -> Vec<SharedIp>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut groups: Vec<SharedIp> = Vec::new();
        for (ip, login) in pairs {
            match groups.last_mut() {
                Some(group) if group.ip == ip => {
                    if !group.logins.contains(&login) {
                        group.logins.push(login);
                    }
                }
                _ => groups.push(SharedIp {
                    ip,
                    logins: vec![login],
                }),
            }
        }
        groups
    }
}

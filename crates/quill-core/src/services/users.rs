use std::sync::Arc;

use crate::domain::{NewUser, User};
use crate::error::{DomainError, RepoError};
use crate::ports::UserRepository;

/// Finds or creates users by login.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Return the user with `login`, creating it if it does not exist yet.
    ///
    /// Concurrent calls for the same login converge on a single row: when
    /// the insert loses a race against the unique index, the winner's row
    /// is fetched and returned.
    pub async fn resolve(&self, login: Option<&str>) -> Result<User, DomainError> {
        let new_user = NewUser::new(login)?;
        self.resolve_valid(new_user).await
    }

    pub(crate) async fn resolve_valid(&self, new_user: NewUser) -> Result<User, DomainError> {
        if let Some(user) = self.users.find_by_login(&new_user.login).await? {
            return Ok(user);
        }

        let login = new_user.login.clone();
        match self.users.insert(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, login = %user.login, "User created");
                Ok(user)
            }
            Err(RepoError::Constraint(reason)) => {
                tracing::debug!(login = %login, %reason, "Lost user insert race, re-fetching");
                self.users.find_by_login(&login).await?.ok_or_else(|| {
                    DomainError::Internal(format!(
                        "user '{login}' rejected as duplicate but not found"
                    ))
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

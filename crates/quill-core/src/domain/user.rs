use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::ValidationErrors;

/// User entity - an author or rater, identified by a unique login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub created_at: DateTime<Utc>,
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub login: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Validate the login and build an insertable user.
    ///
    /// Only presence is checked; the login format is free.
    pub fn new(login: Option<&str>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_present("login", login);
        errors.into_result()?;

        Ok(Self {
            login: login.unwrap_or_default().to_string(),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_is_required() {
        let err = NewUser::new(None).unwrap_err();
        assert_eq!(err.messages(), ["Login can't be blank"]);

        let err = NewUser::new(Some("   ")).unwrap_err();
        assert_eq!(err.messages(), ["Login can't be blank"]);
    }

    #[test]
    fn test_login_is_kept_verbatim() {
        let user = NewUser::new(Some("Jane.Doe")).unwrap();
        assert_eq!(user.login, "Jane.Doe");
    }
}

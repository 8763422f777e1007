use serde::Serialize;
use thiserror::Error;

use crate::model::field::{self, FieldError, SHORT_TEXT_MAX};
use crate::model::ids::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("email address must contain '@'")]
    InvalidEmail,
}

/// A registered learner.
///
/// The password is stored as given; credential handling belongs to whatever
/// front end authenticates users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    username: String,
    #[serde(skip)]
    password: String,
    first_name: String,
    last_name: String,
    email: String,
}

impl User {
    /// Create a validated user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Field` if any field is blank or longer than 64
    /// characters, and `UserError::InvalidEmail` if the email has no `@`.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserError> {
        let username = field::required("username", username, SHORT_TEXT_MAX)?;
        let password = field::required("password", password, SHORT_TEXT_MAX)?;
        let first_name = field::required("first_name", first_name, SHORT_TEXT_MAX)?;
        let last_name = field::required("last_name", last_name, SHORT_TEXT_MAX)?;
        let email = field::required("email", email, SHORT_TEXT_MAX)?;
        if !email.contains('@') {
            return Err(UserError::InvalidEmail);
        }

        Ok(Self {
            id,
            username,
            password,
            first_name,
            last_name,
            email,
        })
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(email: &str) -> Result<User, UserError> {
        User::new(UserId::new(1), "user", "pw", "testf", "testl", email)
    }

    #[test]
    fn accepts_sample_user() {
        let user = build("test@gmail.com").unwrap();
        assert_eq!(user.username(), "user");
        assert_eq!(user.email(), "test@gmail.com");
    }

    #[test]
    fn rejects_email_without_at() {
        assert_eq!(build("nope"), Err(UserError::InvalidEmail));
    }

    #[test]
    fn rejects_blank_username() {
        let err = User::new(UserId::new(1), " ", "pw", "f", "l", "a@b").unwrap_err();
        assert_eq!(err, UserError::Field(FieldError::Empty { field: "username" }));
    }

    #[test]
    fn password_is_not_serialized() {
        let user = build("test@gmail.com").unwrap();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
    }
}

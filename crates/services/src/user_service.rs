use std::sync::Arc;

use quiz_core::model::{Level, User, UserId};
use storage::repository::{LevelRepository, NewUserRecord, StorageError, UserRepository};

use crate::error::UserServiceError;

/// Registration details for a new learner.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Registers users and reports their progress.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    levels: Arc<dyn LevelRepository>,
}

impl UserService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, levels: Arc<dyn LevelRepository>) -> Self {
        Self { users, levels }
    }

    /// Create a user and its starting progress row.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::User` for validation failures,
    /// `UserServiceError::UsernameTaken` if the username exists, and
    /// `UserServiceError::Storage` if persistence fails.
    pub async fn register(&self, registration: Registration) -> Result<UserId, UserServiceError> {
        let draft = User::new(
            UserId::new(1),
            registration.username,
            registration.password,
            registration.first_name,
            registration.last_name,
            registration.email,
        )?;

        let user_id = match self
            .users
            .insert_new_user(NewUserRecord::from_user(&draft))
            .await
        {
            Ok(id) => id,
            Err(StorageError::Conflict) => {
                return Err(UserServiceError::UsernameTaken(draft.username().to_owned()));
            }
            Err(err) => return Err(err.into()),
        };
        self.levels.upsert_level(&Level::new(user_id)).await?;

        tracing::info!(user_id = %user_id, username = %draft.username(), "registered user");
        Ok(user_id)
    }

    /// Fetch a user by ID.
    ///
    /// Returns `Ok(None)` when the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::Storage` if repository access fails.
    pub async fn get_user(&self, user_id: UserId) -> Result<Option<User>, UserServiceError> {
        Ok(self.users.get_user(user_id).await?)
    }

    /// Current progress for a user; level 0 if nothing has been recorded yet.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::UnknownUser` if the user does not exist.
    /// Returns `UserServiceError::Storage` if repository access fails.
    pub async fn progress(&self, user_id: UserId) -> Result<Level, UserServiceError> {
        if let Some(level) = self.levels.get_level(user_id).await? {
            return Ok(level);
        }
        if self.users.get_user(user_id).await?.is_none() {
            return Err(UserServiceError::UnknownUser(user_id));
        }
        Ok(Level::new(user_id))
    }
}

//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::QuestionError;
use quiz_core::model::{FunctionError, ModuleError, UserError, UserId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error("choice {index} is out of range, question has {available} choices")]
    InvalidChoice { index: usize, available: usize },
    #[error("unknown user {0}")]
    UnknownUser(UserId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `UserService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UserServiceError {
    #[error(transparent)]
    User(#[from] UserError),
    #[error("username {0} is already taken")]
    UsernameTaken(String),
    #[error("unknown user {0}")]
    UnknownUser(UserId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogServiceError {
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error(transparent)]
    Function(#[from] FunctionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

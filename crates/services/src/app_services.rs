use std::sync::Arc;

use storage::repository::Storage;

use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::quiz_service::QuizService;
use crate::user_service::UserService;

/// Assembles app-facing services over a single storage backend.
#[derive(Clone)]
pub struct AppServices {
    quiz: Arc<QuizService>,
    users: Arc<UserService>,
    catalog: Arc<CatalogService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage))
    }

    /// Build services over an already-initialized storage aggregate.
    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        let quiz = Arc::new(QuizService::new(
            Arc::clone(&storage.users),
            Arc::clone(&storage.levels),
            Arc::clone(&storage.functions),
        ));
        let users = Arc::new(UserService::new(
            Arc::clone(&storage.users),
            Arc::clone(&storage.levels),
        ));
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&storage.modules),
            Arc::clone(&storage.functions),
        ));

        Self {
            quiz,
            users,
            catalog,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn users(&self) -> Arc<UserService> {
        Arc::clone(&self.users)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }
}

use quiz_core::model::{User, UserId};

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_user_row, read_error, user_id_from_i64, write_error};
use crate::repository::{NewUserRecord, StorageError, UserRepository};

#[async_trait::async_trait]
impl UserRepository for SqliteRepository {
    async fn insert_new_user(&self, user: NewUserRecord) -> Result<UserId, StorageError> {
        // The row id is assigned by SQLite; validate with a placeholder.
        let user = user.into_user(UserId::new(0))?;
        let res = sqlx::query(
            r"
            INSERT INTO users (username, password, first_name, last_name, email)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(user.username())
        .bind(user.password())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.email())
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        user_id_from_i64(res.last_insert_rowid())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, username, password, first_name, last_name, email
            FROM users WHERE user_id = ?1
            ",
        )
        .bind(id_to_i64("user_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, username, password, first_name, last_name, email
            FROM users WHERE username = ?1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?;

        row.as_ref().map(map_user_row).transpose()
    }
}

use quiz_core::model::{Level, UserId};

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_level_row, read_error, write_error};
use crate::repository::{LevelRepository, StorageError};

#[async_trait::async_trait]
impl LevelRepository for SqliteRepository {
    async fn get_level(&self, user_id: UserId) -> Result<Option<Level>, StorageError> {
        let row = sqlx::query("SELECT user_id, level, points FROM levels WHERE user_id = ?1")
            .bind(id_to_i64("user_id", user_id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error)?;

        row.as_ref().map(map_level_row).transpose()
    }

    async fn upsert_level(&self, level: &Level) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO levels (user_id, level, points)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                level = excluded.level,
                points = excluded.points
            ",
        )
        .bind(id_to_i64("user_id", level.user_id().value())?)
        .bind(i64::from(level.level()))
        .bind(i64::from(level.points()))
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(())
    }
}

use quiz_core::model::{Module, ModuleId};

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_module_row, module_id_from_i64, read_error, write_error};
use crate::repository::{ModuleRepository, NewModuleRecord, StorageError};

#[async_trait::async_trait]
impl ModuleRepository for SqliteRepository {
    async fn insert_new_module(&self, module: NewModuleRecord) -> Result<ModuleId, StorageError> {
        let module = module.into_module(ModuleId::new(0))?;
        let res = sqlx::query(
            r"
            INSERT INTO modules (name, description, additional_info, user_id)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(module.name())
        .bind(module.description())
        .bind(module.additional_info())
        .bind(id_to_i64("user_id", module.owner().value())?)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        module_id_from_i64(res.last_insert_rowid())
    }

    async fn get_module(&self, id: ModuleId) -> Result<Option<Module>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT module_id, name, description, additional_info, user_id
            FROM modules WHERE module_id = ?1
            ",
        )
        .bind(id_to_i64("module_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?;

        row.as_ref().map(map_module_row).transpose()
    }

    async fn list_modules(&self, limit: u32) -> Result<Vec<Module>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT module_id, name, description, additional_info, user_id
            FROM modules
            ORDER BY module_id ASC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;

        rows.iter().map(map_module_row).collect()
    }
}

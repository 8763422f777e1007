use quiz_core::model::{Function, FunctionId, ModuleId, QuizItem};

use super::SqliteRepository;
use super::mapping::{
    function_id_from_i64, id_to_i64, map_function_row, map_quiz_item_row, read_error, write_error,
};
use crate::repository::{FunctionRepository, NewFunctionRecord, StorageError};

#[async_trait::async_trait]
impl FunctionRepository for SqliteRepository {
    async fn insert_new_function(
        &self,
        function: NewFunctionRecord,
    ) -> Result<FunctionId, StorageError> {
        let function = function.into_function(FunctionId::new(0))?;
        let res = sqlx::query(
            r"
            INSERT INTO functions (
                name, description, additional_info, sample_code, output, user_id, module_id
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(function.name())
        .bind(function.description())
        .bind(function.additional_info())
        .bind(function.sample_code())
        .bind(function.output())
        .bind(id_to_i64("user_id", function.owner().value())?)
        .bind(id_to_i64("module_id", function.module_id().value())?)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        function_id_from_i64(res.last_insert_rowid())
    }

    async fn get_function(&self, id: FunctionId) -> Result<Option<Function>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT function_id, name, description, additional_info, sample_code, output,
                   user_id, module_id
            FROM functions WHERE function_id = ?1
            ",
        )
        .bind(id_to_i64("function_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?;

        row.as_ref().map(map_function_row).transpose()
    }

    async fn functions_in_module(
        &self,
        module_id: ModuleId,
    ) -> Result<Vec<Function>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT function_id, name, description, additional_info, sample_code, output,
                   user_id, module_id
            FROM functions
            WHERE module_id = ?1
            ORDER BY function_id ASC
            ",
        )
        .bind(id_to_i64("module_id", module_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;

        rows.iter().map(map_function_row).collect()
    }

    async fn eligible_quiz_items(&self) -> Result<Vec<QuizItem>, StorageError> {
        // SQL trims ASCII whitespace only; rows blank under Unicode rules are
        // dropped by `map_quiz_item_row`.
        let rows = sqlx::query(
            r"
            SELECT sample_code, output
            FROM functions
            WHERE sample_code IS NOT NULL AND trim(sample_code, ' ' || char(9, 10, 13)) != ''
              AND output IS NOT NULL AND trim(output, ' ' || char(9, 10, 13)) != ''
            ORDER BY function_id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;

        rows.iter()
            .map(map_quiz_item_row)
            .filter_map(Result::transpose)
            .collect()
    }
}

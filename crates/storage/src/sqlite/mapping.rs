use quiz_core::model::{Function, FunctionId, Level, Module, ModuleId, QuizItem, User, UserId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Classify a failed write: constraint violations become domain-level
/// storage errors, everything else is a connection problem.
pub(crate) fn write_error(e: sqlx::Error) -> StorageError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
        if db.is_foreign_key_violation() {
            return StorageError::NotFound;
        }
    }
    StorageError::Connection(e.to_string())
}

pub(crate) fn read_error(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn user_id_from_i64(v: i64) -> Result<UserId, StorageError> {
    Ok(UserId::new(i64_to_u64("user_id", v)?))
}

pub(crate) fn module_id_from_i64(v: i64) -> Result<ModuleId, StorageError> {
    Ok(ModuleId::new(i64_to_u64("module_id", v)?))
}

pub(crate) fn function_id_from_i64(v: i64) -> Result<FunctionId, StorageError> {
    Ok(FunctionId::new(i64_to_u64("function_id", v)?))
}

pub(crate) fn map_user_row(row: &SqliteRow) -> Result<User, StorageError> {
    User::new(
        user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?,
        row.try_get::<String, _>("username").map_err(ser)?,
        row.try_get::<String, _>("password").map_err(ser)?,
        row.try_get::<String, _>("first_name").map_err(ser)?,
        row.try_get::<String, _>("last_name").map_err(ser)?,
        row.try_get::<String, _>("email").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_level_row(row: &SqliteRow) -> Result<Level, StorageError> {
    Ok(Level::from_persisted(
        user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?,
        i64_to_u32("level", row.try_get::<i64, _>("level").map_err(ser)?)?,
        i64_to_u32("points", row.try_get::<i64, _>("points").map_err(ser)?)?,
    ))
}

pub(crate) fn map_module_row(row: &SqliteRow) -> Result<Module, StorageError> {
    Module::new(
        module_id_from_i64(row.try_get::<i64, _>("module_id").map_err(ser)?)?,
        user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
        row.try_get::<Option<String>, _>("additional_info").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_function_row(row: &SqliteRow) -> Result<Function, StorageError> {
    let sample_code: Option<String> = row.try_get("sample_code").map_err(ser)?;
    let output: Option<String> = row.try_get("output").map_err(ser)?;
    let additional_info: Option<String> = row.try_get("additional_info").map_err(ser)?;

    let function = Function::new(
        function_id_from_i64(row.try_get::<i64, _>("function_id").map_err(ser)?)?,
        module_id_from_i64(row.try_get::<i64, _>("module_id").map_err(ser)?)?,
        user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
    )
    .and_then(|f| f.with_sample(sample_code, output))
    .map_err(ser)?;

    Ok(function.with_additional_info(additional_info))
}

/// `None` when the sample code or output is blank.
pub(crate) fn map_quiz_item_row(row: &SqliteRow) -> Result<Option<QuizItem>, StorageError> {
    Ok(QuizItem::new(
        row.try_get::<String, _>("sample_code").map_err(ser)?,
        row.try_get::<String, _>("output").map_err(ser)?,
    )
    .ok())
}

use std::sync::Arc;

use quiz_core::model::{Function, FunctionId, Module, ModuleId, UserId};
use storage::repository::{
    FunctionRepository, ModuleRepository, NewFunctionRecord, NewModuleRecord,
};

use crate::error::CatalogServiceError;

/// Input for adding a function to a module.
#[derive(Debug, Clone, Default)]
pub struct FunctionDraft {
    pub module_id: ModuleId,
    pub name: String,
    pub description: String,
    pub additional_info: Option<String>,
    pub sample_code: Option<String>,
    pub output: Option<String>,
}

/// Manages learning modules and the functions documented in them.
#[derive(Clone)]
pub struct CatalogService {
    modules: Arc<dyn ModuleRepository>,
    functions: Arc<dyn FunctionRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(modules: Arc<dyn ModuleRepository>, functions: Arc<dyn FunctionRepository>) -> Self {
        Self { modules, functions }
    }

    /// Create a module owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Module` for validation failures.
    /// Returns `CatalogServiceError::Storage` if persistence fails or the owner is unknown.
    pub async fn create_module(
        &self,
        owner: UserId,
        name: String,
        description: String,
        additional_info: Option<String>,
    ) -> Result<ModuleId, CatalogServiceError> {
        let module = Module::new(ModuleId::new(1), owner, name, description, additional_info)?;
        let id = self
            .modules
            .insert_new_module(NewModuleRecord::from_module(&module))
            .await?;
        Ok(id)
    }

    /// Add a function, with optional sample code and output, to a module.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Function` for validation failures.
    /// Returns `CatalogServiceError::Storage` if persistence fails or the
    /// module or owner is unknown.
    pub async fn add_function(
        &self,
        owner: UserId,
        draft: FunctionDraft,
    ) -> Result<FunctionId, CatalogServiceError> {
        let function = Function::new(
            FunctionId::new(1),
            draft.module_id,
            owner,
            draft.name,
            draft.description,
        )?
        .with_sample(draft.sample_code, draft.output)?
        .with_additional_info(draft.additional_info);

        let id = self
            .functions
            .insert_new_function(NewFunctionRecord::from_function(&function))
            .await?;
        tracing::debug!(function_id = %id, quiz_eligible = function.quiz_item().is_some(), "added function");
        Ok(id)
    }

    /// List modules ordered by ID, up to the given limit.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Storage` if repository access fails.
    pub async fn list_modules(&self, limit: u32) -> Result<Vec<Module>, CatalogServiceError> {
        Ok(self.modules.list_modules(limit).await?)
    }

    /// Functions belonging to a module, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Storage` if repository access fails.
    pub async fn functions_in_module(
        &self,
        module_id: ModuleId,
    ) -> Result<Vec<Function>, CatalogServiceError> {
        Ok(self.functions.functions_in_module(module_id).await?)
    }
}

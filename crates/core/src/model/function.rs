use serde::Serialize;
use thiserror::Error;

use crate::model::field::{self, FieldError, LONG_TEXT_MAX, SHORT_TEXT_MAX};
use crate::model::ids::{FunctionId, ModuleId, UserId};
use crate::model::quiz::QuizItem;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FunctionError {
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// A documented function inside a module, optionally carrying a runnable
/// sample and its expected output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    id: FunctionId,
    module_id: ModuleId,
    owner: UserId,
    name: String,
    description: String,
    additional_info: Option<String>,
    sample_code: Option<String>,
    output: Option<String>,
}

impl Function {
    /// Create a validated function without sample code.
    ///
    /// # Errors
    ///
    /// Returns `FunctionError::Field` if the name or description is blank or too long.
    pub fn new(
        id: FunctionId,
        module_id: ModuleId,
        owner: UserId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, FunctionError> {
        Ok(Self {
            id,
            module_id,
            owner,
            name: field::required("name", name, SHORT_TEXT_MAX)?,
            description: field::required("description", description, LONG_TEXT_MAX)?,
            additional_info: None,
            sample_code: None,
            output: None,
        })
    }

    /// Attach free-form notes. Blank notes are dropped.
    #[must_use]
    pub fn with_additional_info(mut self, info: Option<String>) -> Self {
        self.additional_info = info.filter(|v| !v.trim().is_empty());
        self
    }

    /// Attach sample code and the output it produces.
    ///
    /// Blank values are stored as absent.
    ///
    /// # Errors
    ///
    /// Returns `FunctionError::Field` if either value exceeds 256 characters.
    pub fn with_sample(
        mut self,
        sample_code: Option<String>,
        output: Option<String>,
    ) -> Result<Self, FunctionError> {
        self.sample_code = field::optional("sample_code", sample_code, Some(LONG_TEXT_MAX))?;
        self.output = field::optional("output", output, Some(LONG_TEXT_MAX))?;
        Ok(self)
    }

    #[must_use]
    pub fn id(&self) -> FunctionId {
        self.id
    }

    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn additional_info(&self) -> Option<&str> {
        self.additional_info.as_deref()
    }

    #[must_use]
    pub fn sample_code(&self) -> Option<&str> {
        self.sample_code.as_deref()
    }

    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// The quiz view of this function, if it has both sample code and output.
    #[must_use]
    pub fn quiz_item(&self) -> Option<QuizItem> {
        match (self.sample_code.as_deref(), self.output.as_deref()) {
            (Some(code), Some(output)) => QuizItem::new(code, output).ok(),
            _ => None,
        }
    }
}

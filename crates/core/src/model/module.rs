use serde::Serialize;
use thiserror::Error;

use crate::model::field::{self, FieldError, LONG_TEXT_MAX, SHORT_TEXT_MAX};
use crate::model::ids::{ModuleId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModuleError {
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// A learning module grouping related functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    id: ModuleId,
    name: String,
    description: String,
    additional_info: Option<String>,
    owner: UserId,
}

impl Module {
    /// Create a validated module.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::Field` if the name or description is blank or too long.
    pub fn new(
        id: ModuleId,
        owner: UserId,
        name: impl Into<String>,
        description: impl Into<String>,
        additional_info: Option<String>,
    ) -> Result<Self, ModuleError> {
        Ok(Self {
            id,
            name: field::required("name", name, SHORT_TEXT_MAX)?,
            description: field::required("description", description, LONG_TEXT_MAX)?,
            additional_info: field::optional("additional_info", additional_info, None)?,
            owner,
        })
    }

    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_additional_info_is_dropped() {
        let module = Module::new(
            ModuleId::new(1),
            UserId::new(1),
            "testmod",
            "moddesc",
            Some(String::new()),
        )
        .unwrap();
        assert_eq!(module.additional_info(), None);
    }

    #[test]
    fn long_description_is_rejected() {
        let err = Module::new(
            ModuleId::new(1),
            UserId::new(1),
            "testmod",
            "d".repeat(LONG_TEXT_MAX + 1),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ModuleError::Field(FieldError::TooLong {
                field: "description",
                max: LONG_TEXT_MAX
            })
        );
    }
}

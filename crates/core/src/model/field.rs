use thiserror::Error;

/// Column width for names, usernames, and other short text.
pub const SHORT_TEXT_MAX: usize = 64;

/// Column width for descriptions, sample code, and outputs.
pub const LONG_TEXT_MAX: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Trim and validate a required text field.
pub(crate) fn required(
    field: &'static str,
    value: impl Into<String>,
    max: usize,
) -> Result<String, FieldError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Empty { field });
    }
    check_len(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Validate an optional text field, keeping its content as written.
///
/// Blank values collapse to `None`, matching how empty columns are treated
/// when deciding quiz eligibility.
pub(crate) fn optional(
    field: &'static str,
    value: Option<String>,
    max: Option<usize>,
) -> Result<Option<String>, FieldError> {
    match value {
        Some(v) if !v.trim().is_empty() => {
            if let Some(max) = max {
                check_len(field, &v, max)?;
            }
            Ok(Some(v))
        }
        _ => Ok(None),
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    if value.chars().count() > max {
        return Err(FieldError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_whitespace() {
        assert_eq!(required("name", "  map  ", 64).unwrap(), "map");
    }

    #[test]
    fn required_rejects_blank() {
        assert_eq!(
            required("name", "   ", 64),
            Err(FieldError::Empty { field: "name" })
        );
    }

    #[test]
    fn required_counts_chars_not_bytes() {
        let name = "é".repeat(64);
        assert!(required("name", name, 64).is_ok());
        assert!(matches!(
            required("name", "x".repeat(65), 64),
            Err(FieldError::TooLong { max: 64, .. })
        ));
    }

    #[test]
    fn optional_collapses_blank_to_none() {
        assert_eq!(optional("output", Some("  ".into()), Some(10)), Ok(None));
        assert_eq!(optional("output", None, Some(10)), Ok(None));
    }

    #[test]
    fn optional_keeps_inner_whitespace() {
        let code = "  print(1)\n".to_string();
        assert_eq!(
            optional("sample_code", Some(code.clone()), None),
            Ok(Some(code))
        );
    }
}

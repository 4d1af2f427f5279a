use crate::errors::CoreError;

/// First stage of every write operation: reject malformed input before any
/// repository call is made.
pub trait Validate {
    fn validate(&self) -> Result<(), CoreError>;
}

pub(crate) fn ensure_positive(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a positive number (got {value})"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be zero or a positive number (got {value})"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_max_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters (got {len})"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_not_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

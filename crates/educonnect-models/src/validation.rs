//! Form validation shared by the session DTOs.

use validator::{Validate, ValidationError, ValidationErrors};

use educonnect_core::ClientError;

/// Reject strings that are empty once trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Join every field error into one sentence, ordered by field name so the
/// message is stable.
pub fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run the derive validator and turn failures into [`ClientError::Validation`].
pub fn validate_dto<T: Validate>(dto: &T) -> Result<(), ClientError> {
    dto.validate()
        .map_err(|errors| ClientError::validation(format_errors(&errors)))
}

use crate::error::{ContactsError, ContactsResult};

/// Validates that a contact identifier is present and not blank.
/// Returns the trimmed identifier on success.
pub fn identifier(value: Option<&str>) -> ContactsResult<String> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        Err(ContactsError::MissingIdentifier)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parses a contact identifier into the provider's numeric row id.
pub fn numeric_id(value: &str) -> ContactsResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| ContactsError::InvalidArgument {
            name: "identifier".into(),
            reason: format!("'{}' is not a provider id: {}", value, e),
        })
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// True when the optional string carries something other than whitespace.
pub fn is_present(value: Option<&str>) -> bool {
    value.map(|s| !s.trim().is_empty()).unwrap_or(false)
}

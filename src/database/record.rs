use uuid::Uuid;

/// Errors that can occur while validating record input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
    #[error("Invalid month format: {0}")]
    InvalidMonth(String),
}

/// Parse a path identifier into the store's identifier type
pub fn parse_record_id(raw: &str) -> Result<Uuid, RecordError> {
    Uuid::parse_str(raw.trim()).map_err(|_| RecordError::InvalidId(raw.to_string()))
}

/// A field value counts as present when it is set and non-empty
pub fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Check that every named field is present
pub fn require_fields(fields: &[(&'static str, Option<&str>)]) -> Result<(), RecordError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| !is_present(*value))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() { Ok(()) } else { Err(RecordError::MissingRequiredFields(missing)) }
}

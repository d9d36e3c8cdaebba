use crate::error::StudioError;

/// Maximum text length for a single generation
const MAX_TEXT_LENGTH: usize = 5000;

/// Validate the text of a generation request
pub fn validate_text(text: &str) -> Result<(), StudioError> {
    if text.trim().is_empty() {
        return Err(StudioError::Configuration("Text cannot be empty".to_string()));
    }
    let chars = text.chars().count();
    if chars > MAX_TEXT_LENGTH {
        return Err(StudioError::Configuration(format!(
            "Text too long ({} characters, max {})",
            chars, MAX_TEXT_LENGTH
        )));
    }
    Ok(())
}

/// Validate that a usable credential is present
pub fn validate_api_key(key: Option<&str>) -> Result<&str, StudioError> {
    key.map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| StudioError::Configuration("Please configure an API key first".to_string()))
}

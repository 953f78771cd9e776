//! Validation of the URLs submitted for shortening.
//!
//! Only syntax is checked: the input must parse as an absolute URI. The
//! input string is stored as given, so deduplication is by exact match.

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),
}

/// Checks that `input` is a well-formed absolute URI.
///
/// # Errors
///
/// Returns [`UrlValidationError::Empty`] for blank input and
/// [`UrlValidationError::InvalidFormat`] for anything `url` cannot parse
/// without a base.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_absolute_url("http://example.org").is_ok());
/// assert!(validate_absolute_url("not a url").is_err());
/// ```
pub fn validate_absolute_url(input: &str) -> Result<Url, UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))
}

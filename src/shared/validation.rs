use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::shared::constants::MAX_IMAGE_URL_LENGTH;

lazy_static! {
    /// Regex for validating person names
    /// Must start with a letter and contain only letters, spaces, apostrophes, dots and hyphens
    /// - Valid: "John", "O'Brien", "María José", "Jean-Luc", "St. John"
    /// - Invalid: "123", "-John", "John3", "" (empty)
    pub static ref PERSON_NAME_REGEX: Regex =
        Regex::new(r"^\p{L}[\p{L}\p{M}' .\-]*$").expect("person name regex is valid");
}

/// Every evidence URL must be non-blank and bounded in length
pub fn validate_image_urls(urls: &[String]) -> Result<(), ValidationError> {
    for url in urls {
        if url.trim().is_empty() {
            return Err(ValidationError::new("image_url_blank")
                .with_message("Image URLs must not be blank".into()));
        }
        if url.len() > MAX_IMAGE_URL_LENGTH {
            return Err(ValidationError::new("image_url_too_long")
                .with_message("Image URL must not exceed 2048 characters".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name_regex_valid() {
        assert!(PERSON_NAME_REGEX.is_match("John"));
        assert!(PERSON_NAME_REGEX.is_match("O'Brien"));
        assert!(PERSON_NAME_REGEX.is_match("María José"));
        assert!(PERSON_NAME_REGEX.is_match("Jean-Luc"));
        assert!(PERSON_NAME_REGEX.is_match("St. John"));
    }

    #[test]
    fn test_person_name_regex_invalid() {
        assert!(!PERSON_NAME_REGEX.is_match("")); // empty
        assert!(!PERSON_NAME_REGEX.is_match("123")); // digits
        assert!(!PERSON_NAME_REGEX.is_match("-John")); // starts with hyphen
        assert!(!PERSON_NAME_REGEX.is_match("John3")); // trailing digit
        assert!(!PERSON_NAME_REGEX.is_match(" John")); // leading space
    }

    #[test]
    fn test_validate_image_urls() {
        assert!(validate_image_urls(&[]).is_ok());
        assert!(validate_image_urls(&["/static/a.jpeg".to_string()]).is_ok());
        assert!(validate_image_urls(&["/static/a.jpeg".to_string(), "  ".to_string()]).is_err());
        assert!(validate_image_urls(&["x".repeat(MAX_IMAGE_URL_LENGTH + 1)]).is_err());
    }
}

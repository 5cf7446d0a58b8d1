use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::MIN_PASSWORD_LEN;
use crate::utils::ValidationError;

// Conventional local@domain.tld shape; ASCII word characters only
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-.]+@([A-Za-z0-9_\-]+\.)+[A-Za-z0-9_\-]{2,4}$")
        .expect("email pattern is valid")
});

pub fn is_valid_email(text: &str) -> bool {
    EMAIL_RE.is_match(text)
}

pub fn validate_email(text: &str) -> Result<(), ValidationError> {
    if is_valid_email(text) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ValidationError::password_too_short())
    }
}

/// Email first, then password; the first failure wins
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_password(password)
}

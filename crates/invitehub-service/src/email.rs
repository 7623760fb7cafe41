//! Email normalization.
//!
//! Addresses are compared and stored trimmed and lowercased, both when a
//! ticket is issued and when a claimant presents it.

use validator::ValidateEmail;

use invitehub_core::error::AppError;

/// Trim and lowercase.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize and reject syntactically invalid addresses.
pub fn parse_email(raw: &str) -> Result<String, AppError> {
    let email = normalize_email(raw);
    if email.validate_email() {
        Ok(email)
    } else {
        Err(AppError::validation(format!("Invalid email address: '{}'", raw.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_email("  Bob@Example.COM "), "bob@example.com");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_email("not-an-email").is_err());
        assert!(parse_email("").is_err());
        assert_eq!(parse_email(" B@X.com").unwrap(), "b@x.com");
    }
}

//! Input validation utilities

use std::sync::LazyLock;

use regex::Regex;

use crate::constants;

static VERIFICATION_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9]{1,8}-[A-Z0-9]{4}-[A-Z0-9]{4}-[A-Z0-9]{4}$")
        .expect("verification code pattern is valid")
});

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters");
    }
    if username.len() > 32 {
        return Err("Username must be at most 32 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err("Username can only contain letters, numbers, dots, underscores, and hyphens");
    }
    if !username.chars().next().map(|c| c.is_alphabetic()).unwrap_or(false) {
        return Err("Username must start with a letter");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    if password.len() > 128 {
        return Err("Password must be at most 128 characters");
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err("Password must contain at least one letter");
    }
    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one number");
    }
    Ok(())
}

/// Validate user role
pub fn validate_role(role: &str) -> Result<(), &'static str> {
    if constants::roles::ALL.contains(&role) {
        Ok(())
    } else {
        Err("Invalid role")
    }
}

/// Validate course level
pub fn validate_level(level: &str) -> Result<(), &'static str> {
    if constants::levels::ALL.contains(&level) {
        Ok(())
    } else {
        Err("Invalid level. Use 'beginner', 'intermediate' or 'advanced'")
    }
}

/// Validate a passing score percentage
pub fn validate_passing_score(score: i32) -> Result<(), &'static str> {
    if (0..=100).contains(&score) {
        Ok(())
    } else {
        Err("Passing score must be between 0 and 100")
    }
}

/// Validate the shape of a certificate verification code
pub fn validate_verification_code(code: &str) -> Result<(), &'static str> {
    if VERIFICATION_CODE.is_match(code) {
        Ok(())
    } else {
        Err("Malformed verification code")
    }
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalize a course language tag: trimmed, lowercase
pub fn normalize_language(language: &str) -> Result<String, &'static str> {
    let normalized = sanitize_string(language).to_lowercase();
    if normalized.is_empty() {
        return Err("Language cannot be empty");
    }
    if normalized.len() > 64 {
        return Err("Language must be at most 64 characters");
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("Alice_123").is_ok());
        assert!(validate_username("ab").is_err()); // Too short
        assert!(validate_username("123abc").is_err()); // Starts with number
        assert!(validate_username("user@name").is_err()); // Invalid character
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hola1234").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("1234567890").is_err());
    }

    #[test]
    fn test_validate_role_and_level() {
        assert!(validate_role("teacher").is_ok());
        assert!(validate_role("organizer").is_err());
        assert!(validate_level("advanced").is_ok());
        assert!(validate_level("expert").is_err());
    }

    #[test]
    fn test_validate_passing_score() {
        assert!(validate_passing_score(0).is_ok());
        assert!(validate_passing_score(100).is_ok());
        assert!(validate_passing_score(101).is_err());
        assert!(validate_passing_score(-1).is_err());
    }

    #[test]
    fn test_validate_verification_code() {
        assert!(validate_verification_code("LL-ABCD-2345-WXYZ").is_ok());
        assert!(validate_verification_code("ll-abcd-2345-wxyz").is_err());
        assert!(validate_verification_code("LL-ABC-2345-WXYZ").is_err());
        assert!(validate_verification_code("LL-ABCD-2345-WXYZ-EXTRA").is_err());
        assert!(validate_verification_code("").is_err());
    }

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("  Spanish ").unwrap(), "spanish");
        assert!(normalize_language("   ").is_err());
    }
}

use garde::Validate;

use crate::{
    Auth::truncate_password,
    Constants::{MAX_PASSWORD_BYTES, MIN_PASSWORD_CHARS},
    Error::ProvisionError,
    Types::AdminCredentialRequest,
};

pub fn require_email(email: Option<&str>) -> Result<&str, ProvisionError> {
    match email.map(str::trim) {
        Some(email) if !email.is_empty() => Ok(email),
        _ => Err(ProvisionError::MissingInput("email")),
    }
}

pub fn require_password(password: Option<&str>) -> Result<&str, ProvisionError> {
    let password = password.ok_or(ProvisionError::MissingInput("password"))?;
    let actual = password.chars().count();
    if actual < MIN_PASSWORD_CHARS {
        return Err(ProvisionError::PasswordTooShort {
            min: MIN_PASSWORD_CHARS,
            actual,
        });
    }
    Ok(password)
}

/// Checks operator input and builds the request handed to the hasher and store.
///
/// Order matters: a missing email is reported before anything about the
/// password, and the password length is checked on the untruncated value.
/// Passwords longer than `MAX_PASSWORD_BYTES` are cut down silently.
pub fn validate(email: Option<&str>, password: Option<&str>) -> Result<AdminCredentialRequest, ProvisionError> {
    let email = require_email(email)?;
    let password = require_password(password)?;

    let request = AdminCredentialRequest {
        email: email.to_owned(),
        password: truncate_password(password.as_bytes()).to_vec(),
    };
    if let Err(err) = request.validate(&()) {
        tracing::info!("Validation failed with reason: {err}");
        return Err(ProvisionError::InvalidEmail(err.to_string()));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        tracing::info!("Password was {} bytes, truncated to {MAX_PASSWORD_BYTES}", password.len());
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_email() {
        for email in [None, Some(""), Some("   ")] {
            let err = validate(email, Some("password123")).unwrap_err();
            assert!(matches!(err, ProvisionError::MissingInput("email")), "{email:?}");
        }
    }

    #[test]
    fn email_is_checked_before_password() {
        let err = validate(None, Some("abc")).unwrap_err();
        assert!(matches!(err, ProvisionError::MissingInput("email")));
    }

    #[test]
    fn absent_password() {
        let err = validate(Some("admin@example.com"), None).unwrap_err();
        assert!(matches!(err, ProvisionError::MissingInput("password")));
    }

    #[test]
    fn short_passwords_are_rejected() {
        for password in ["", "a", "ab", "abc"] {
            let err = validate(Some("admin@example.com"), Some(password)).unwrap_err();
            match err {
                ProvisionError::PasswordTooShort { min, actual } => {
                    assert_eq!(min, 4);
                    assert_eq!(actual, password.len());
                }
                other => panic!("unexpected error for {password:?}: {other}"),
            }
        }
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // three characters, nine bytes
        let err = validate(Some("admin@example.com"), Some("日本語")).unwrap_err();
        assert!(matches!(err, ProvisionError::PasswordTooShort { actual: 3, .. }));
        assert!(validate(Some("admin@example.com"), Some("日本語s")).is_ok());
    }

    #[test]
    fn four_digit_pin_is_enough() {
        let request = validate(Some("admin@example.com"), Some("1234")).unwrap();
        assert_eq!(request.password, b"1234");
    }

    #[test]
    fn long_passwords_keep_the_first_72_bytes() {
        let password = "p".repeat(100);
        let request = validate(Some("admin@example.com"), Some(&password)).unwrap();
        assert_eq!(request.password.len(), 72);
        assert_eq!(request.password, password.as_bytes()[..72]);
    }

    #[test]
    fn passwords_at_the_limit_are_untouched() {
        for len in [4, 71, 72] {
            let password = "q".repeat(len);
            let request = validate(Some("admin@example.com"), Some(&password)).unwrap();
            assert_eq!(request.password, password.as_bytes());
        }
    }

    #[test]
    fn multibyte_passwords_are_cut_on_bytes() {
        // 30 two-byte characters, 60 bytes, followed by 20 ASCII bytes
        let password = format!("{}{}", "é".repeat(30), "z".repeat(20));
        let request = validate(Some("admin@example.com"), Some(&password)).unwrap();
        assert_eq!(request.password, password.as_bytes()[..72]);
    }

    #[test]
    fn malformed_email() {
        let err = validate(Some("admin"), Some("password123")).unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidEmail(_)));

        let too_long = format!("{}@example.com", "a".repeat(250));
        let err = validate(Some(&too_long), Some("password123")).unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidEmail(_)));
    }

    #[test]
    fn email_is_trimmed() {
        let request = validate(Some("  admin@example.com \n"), Some("password123")).unwrap();
        assert_eq!(request.email, "admin@example.com");
    }
}

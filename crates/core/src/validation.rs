//! Client-side credential checks run before anything is submitted

use thiserror::Error;

/// Minimum accepted password length, counted in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// Reasons a set of credentials is rejected before submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email address is required")]
    MissingEmail,

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("Password is required")]
    MissingPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
}

/// Check the credentials entered on sign-in
///
/// # Errors
///
/// Returns a [`ValidationError`] if the email is empty or malformed, or the
/// password is empty.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    Ok(())
}

/// Check a registration form
///
/// The confirmation is compared before any other rule, so a typo in either
/// password field is reported as a mismatch.
///
/// # Errors
///
/// Returns a [`ValidationError`] describing the first rule that failed.
pub fn validate_registration(
    email: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    validate_email(email)?;
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_registration() {
        assert_eq!(validate_registration("a@b.com", "secret", "secret"), Ok(()));
    }

    #[test]
    fn mismatch_reported_before_length() {
        assert_eq!(
            validate_registration("a@b.com", "abc", "abd"),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn mismatch_reported_before_missing_password_and_email() {
        assert_eq!(
            validate_registration("a@b.com", "", "secret"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_registration("", "secret", "secreT"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_registration("a@b.com", "", ""),
            Err(ValidationError::MissingPassword)
        );
    }

    #[test]
    fn short_password_rejected() {
        assert_eq!(
            validate_registration("a@b.com", "abc12", "abc12"),
            Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN))
        );
    }

    #[test]
    fn password_length_counts_characters() {
        // six characters, more than six bytes
        assert!(validate_registration("a@b.com", "éééééé", "éééééé").is_ok());
    }

    #[test]
    fn malformed_emails_rejected() {
        for email in ["", "   ", "plainaddress", "@b.com", "a@", "a@b@c", "a b@c.com"] {
            assert!(
                validate_credentials(email, "x").is_err(),
                "{email:?} should be rejected"
            );
        }
    }

    #[test]
    fn sign_in_requires_password() {
        assert_eq!(
            validate_credentials("a@b.com", ""),
            Err(ValidationError::MissingPassword)
        );
        assert!(validate_credentials("a@b.com", "x").is_ok());
    }
}

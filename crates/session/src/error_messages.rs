//! User-facing messages for failed operations

use crate::error::SessionError;

const UNEXPECTED: &str = "An unexpected error occurred. Please try again later.";

/// What the user was trying to do when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SignIn,
    Register,
    SearchMovies,
    MovieDetails,
    PersonDetails,
}

/// Convert an error into the text shown to the user
///
/// Sign-in and registration show the server's own message when there is
/// one. Catalog pages show a fixed message, except that a rejected person
/// lookup asks the user to log in.
pub fn user_message(operation: Operation, error: &SessionError) -> String {
    if let SessionError::Validation(e) = error {
        return e.to_string();
    }

    match operation {
        Operation::SignIn | Operation::Register => {
            if error.is_network() {
                return UNEXPECTED.to_string();
            }
            match error {
                SessionError::Client(e) => e.payload_message().map_or_else(
                    || fallback(operation).to_string(),
                    str::to_string,
                ),
                _ => UNEXPECTED.to_string(),
            }
        }
        Operation::PersonDetails if error.is_unauthorized() => {
            "Authentication required. Please log in to view this data.".to_string()
        }
        _ => fallback(operation).to_string(),
    }
}

const fn fallback(operation: Operation) -> &'static str {
    match operation {
        Operation::SignIn => "Login failed. Please check your credentials.",
        Operation::Register => "Registration failed. Please try again.",
        Operation::SearchMovies => "Failed to load movies. Please try again later.",
        Operation::MovieDetails => "Failed to load movie details. Please try again later.",
        Operation::PersonDetails => "Failed to load person details. Please try again later.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::ValidationError;
    use reel_http::ClientError;
    use reqwest::StatusCode;

    #[test]
    fn sign_in_uses_server_message() {
        let err = SessionError::Client(ClientError::AuthenticationFailed(
            "Incorrect email or password".into(),
        ));
        assert_eq!(
            user_message(Operation::SignIn, &err),
            "Incorrect email or password"
        );
    }

    #[test]
    fn sign_in_without_server_message_uses_fallback() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SessionError::Client(ClientError::Serialization(json_err));
        assert_eq!(
            user_message(Operation::SignIn, &err),
            "Login failed. Please check your credentials."
        );
    }

    #[test]
    fn sign_in_rejection_without_payload_message_uses_fallback() {
        let err = SessionError::Client(ClientError::from_response(StatusCode::UNAUTHORIZED, ""));
        assert_eq!(
            user_message(Operation::SignIn, &err),
            "Login failed. Please check your credentials."
        );

        let err = SessionError::Client(ClientError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error":true,"message":""}"#,
        ));
        assert_eq!(
            user_message(Operation::SignIn, &err),
            "Login failed. Please check your credentials."
        );

        let err = SessionError::Client(ClientError::from_response(
            StatusCode::CONFLICT,
            "User already exists",
        ));
        assert_eq!(
            user_message(Operation::Register, &err),
            "Registration failed. Please try again."
        );
    }

    #[test]
    fn register_uses_payload_message() {
        let err = SessionError::Client(ClientError::from_response(
            StatusCode::CONFLICT,
            r#"{"error":true,"message":"User already exists"}"#,
        ));
        assert_eq!(user_message(Operation::Register, &err), "User already exists");
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = SessionError::Validation(ValidationError::PasswordMismatch);
        assert_eq!(user_message(Operation::Register, &err), "Passwords do not match");
    }

    #[test]
    fn unauthorized_person_lookup_prompts_login() {
        let err = SessionError::Client(ClientError::AuthenticationFailed("expired".into()));
        assert_eq!(
            user_message(Operation::PersonDetails, &err),
            "Authentication required. Please log in to view this data."
        );

        let err = SessionError::Client(ClientError::NotFound("no such person".into()));
        assert_eq!(
            user_message(Operation::PersonDetails, &err),
            "Failed to load person details. Please try again later."
        );
    }

    #[test]
    fn catalog_errors_use_fixed_text() {
        let err = SessionError::Client(ClientError::ServerError {
            status: 500,
            message: "db down".into(),
        });
        assert_eq!(
            user_message(Operation::SearchMovies, &err),
            "Failed to load movies. Please try again later."
        );
    }
}

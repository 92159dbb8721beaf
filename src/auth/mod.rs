pub mod csrf;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserResponse;

// Re-export necessary items
pub use csrf::{issue_token, validate_token};
pub use middleware::{CsrfProtection, RequireAuth};
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address. Must be a valid email format.
    #[validate(required, email)]
    pub email: Option<String>,
    /// User's password. Must be between 6 and 32 characters.
    #[validate(required, length(min = 6, max = 32))]
    pub password: Option<String>,
}

/// Body of a successful login. The token fields are present only when
/// cookie-mode auth is disabled; otherwise the tokens travel as cookies.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid: LoginRequest =
            serde_json::from_str(r#"{"email": "test@example.com", "password": "password123"}"#)
                .unwrap();
        assert!(valid.validate().is_ok());

        let bad_email: LoginRequest =
            serde_json::from_str(r#"{"email": "testexample.com", "password": "password123"}"#)
                .unwrap();
        assert!(bad_email.validate().is_err());

        let short_password: LoginRequest =
            serde_json::from_str(r#"{"email": "test@example.com", "password": "123"}"#).unwrap();
        assert!(short_password.validate().is_err());

        let missing_fields: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(missing_fields.validate().is_err());
    }
}

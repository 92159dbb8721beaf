//! Authentication business rules: credential verification and token
//! issuance on login, uniqueness-checked registration.

use lazy_static::lazy_static;
use std::sync::Arc;

use crate::auth::csrf::issue_token;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::generate_token;
use crate::config::Config;
use crate::error::AppError;
use crate::models::User;
use crate::repository::UserRepository;

lazy_static! {
    // Verified against when the email is unknown, so that path costs a
    // bcrypt comparison just like a wrong password does.
    static ref PHANTOM_HASH: String =
        hash_password("phantom-credential").unwrap_or_default();
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("invalid email or password".into())
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }

    /// Verifies credentials and mints a session token plus a CSRF token.
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller (same message, same bcrypt cost) to prevent user
    /// enumeration. Nothing is persisted; the tokens are stateless.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(User, String, String), AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            verify_password(password, &PHANTOM_HASH);
            return Err(invalid_credentials());
        };

        if !verify_password(password, &user.password) {
            return Err(invalid_credentials());
        }

        let session_token = generate_token(
            &user.id.to_hex(),
            &user.email,
            &self.config.jwt.secret,
            self.config.jwt.expiry,
        )?;
        let csrf_token = issue_token(&self.config.csrf.secret);

        Ok((user, session_token, csrf_token))
    }

    /// Creates an account with a hashed password.
    ///
    /// The email is checked up front, and the store's unique constraint
    /// backstops the check against concurrent registrations; both paths
    /// surface the same "email already exists" conflict.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("email already exists".into()));
        }

        let password_hash = hash_password(password)?;
        self.users.create(User::new(email, &password_hash)).await
    }
}

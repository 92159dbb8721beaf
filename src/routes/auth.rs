use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

use crate::auth::{LoginRequest, LoginResponse};
use crate::config::Config;
use crate::error::AppError;
use crate::models::UserResponse;
use crate::response::ApiResponse;
use crate::services::AuthService;

fn same_site(value: &str) -> SameSite {
    match value.to_ascii_lowercase().as_str() {
        "none" => SameSite::None,
        "lax" => SameSite::Lax,
        _ => SameSite::Strict,
    }
}

fn session_cookie(
    config: &Config,
    name: &str,
    value: &str,
    http_only: bool,
) -> Cookie<'static> {
    let max_age = CookieDuration::seconds(config.jwt.expiry.as_secs() as i64);
    let mut builder = Cookie::build(name.to_owned(), value.to_owned())
        .path("/")
        .secure(config.cookie.secure)
        .http_only(http_only)
        .same_site(same_site(&config.cookie.same_site))
        .max_age(max_age);
    if !config.cookie.domain.is_empty() {
        builder = builder.domain(config.cookie.domain.clone());
    }
    builder.finish()
}

// Browsers only delete a cookie when name, domain, and path all match the
// cookie that was set, so the removal carries the same attributes as
// `session_cookie`.
fn removal_cookie(config: &Config, name: &str) -> Cookie<'static> {
    let mut builder = Cookie::build(name.to_owned(), "").path("/");
    if !config.cookie.domain.is_empty() {
        builder = builder.domain(config.cookie.domain.clone());
    }
    let mut cookie = builder.finish();
    cookie.make_removal();
    cookie
}

/// Authenticates a user and starts a session.
///
/// In cookie mode the session token travels as an HttpOnly `access_token`
/// cookie and the CSRF token as a readable `csrf_token` cookie; otherwise
/// both tokens are returned in the response body.
#[post("/login")]
pub async fn login(
    service: web::Data<AuthService>,
    config: web::Data<Config>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let email = body.email.as_deref().unwrap_or_default();
    let password = body.password.as_deref().unwrap_or_default();

    let (user, session_token, csrf_token) = service.login(email, password).await?;
    let user = UserResponse::from(&user);

    if config.server.auth_cookie {
        let payload = LoginResponse {
            user,
            access_token: None,
            csrf_token: None,
        };
        Ok(HttpResponse::Ok()
            .cookie(session_cookie(
                &config,
                "access_token",
                &session_token,
                config.cookie.http_only,
            ))
            .cookie(session_cookie(&config, "csrf_token", &csrf_token, false))
            .json(ApiResponse::success("login successful", payload)))
    } else {
        let payload = LoginResponse {
            user,
            access_token: Some(session_token),
            csrf_token: Some(csrf_token),
        };
        Ok(HttpResponse::Ok().json(ApiResponse::success("login successful", payload)))
    }
}

/// Ends the session by expiring both auth cookies. Tokens are stateless,
/// so there is nothing to revoke server-side.
#[post("/logout")]
pub async fn logout(config: web::Data<Config>) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(&config, "access_token"))
        .cookie(removal_cookie(&config, "csrf_token"))
        .json(ApiResponse::message_only("logout successful")))
}

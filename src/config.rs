//! Environment-based application configuration.
//!
//! Every option is read once at startup and the resulting [`Config`] value is
//! cloned into the components that need it; nothing mutates it afterwards.

use std::env;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub mongo: MongoConfig,
    pub jwt: JwtConfig,
    pub csrf: CsrfConfig,
    pub cookie: CookieConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub mode: String,
    /// When true, protected routes read the session token from the
    /// `access_token` cookie; otherwise from the `Authorization` header.
    pub auth_cookie: bool,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry: Duration,
}

#[derive(Debug, Clone)]
pub struct CsrfConfig {
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub domain: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: String,
}

/// Declared for operational parity; no component consumes it yet.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests: u32,
    pub window: Duration,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub expose_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age: usize,
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// Fails when one of the required secrets or connection settings is
    /// missing; defaults cover everything else.
    pub fn from_env() -> Result<Self, AppError> {
        let config = Self {
            server: ServerConfig {
                port: get_env_as_u64("PORT", 8080) as u16,
                mode: get_env("RUN_MODE", "debug"),
                auth_cookie: get_env_as_bool("SERVER_AUTH_COOKIE", true),
            },
            mongo: MongoConfig {
                uri: get_env("MONGODB_URI", "mongodb://localhost:27017"),
                database: get_env("MONGODB_DATABASE", "taskvault_db"),
                timeout: Duration::from_secs(get_env_as_u64("MONGODB_TIMEOUT", 10)),
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET", ""),
                expiry: Duration::from_secs(get_env_as_u64("JWT_EXPIRY_MINUTES", 15) * 60),
            },
            csrf: CsrfConfig {
                secret: get_env("CSRF_SECRET", ""),
            },
            cookie: CookieConfig {
                domain: get_env("COOKIE_DOMAIN", "localhost"),
                secure: get_env_as_bool("COOKIE_SECURE", false),
                http_only: get_env_as_bool("COOKIE_HTTP_ONLY", true),
                same_site: get_env("COOKIE_SAME_SITE", "Strict"),
            },
            rate_limit: RateLimitConfig {
                requests: get_env_as_u64("RATE_LIMIT_REQUESTS", 100) as u32,
                window: Duration::from_secs(get_env_as_u64("RATE_LIMIT_WINDOW", 60)),
            },
            cors: CorsConfig {
                allowed_origins: get_env_as_list(
                    "CORS_ALLOWED_ORIGINS",
                    &["http://localhost:5173"],
                ),
                allowed_methods: get_env_as_list(
                    "CORS_ALLOWED_METHODS",
                    &["GET", "POST", "PUT", "DELETE", "OPTIONS"],
                ),
                allowed_headers: get_env_as_list(
                    "CORS_ALLOWED_HEADERS",
                    &["Content-Type", "Authorization", "X-CSRF-Token"],
                ),
                expose_headers: get_env_as_list("CORS_EXPOSE_HEADERS", &[]),
                allow_credentials: get_env_as_bool("CORS_ALLOW_CREDENTIALS", true),
                max_age: get_env_as_u64("CORS_MAX_AGE", 3600) as usize,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.jwt.secret.is_empty() {
            return Err(AppError::Internal("JWT_SECRET is required".into()));
        }
        if self.csrf.secret.is_empty() {
            return Err(AppError::Internal("CSRF_SECRET is required".into()));
        }
        if self.mongo.uri.is_empty() {
            return Err(AppError::Internal("MONGODB_URI is required".into()));
        }
        if self.mongo.database.is_empty() {
            return Err(AppError::Internal("MONGODB_DATABASE is required".into()));
        }
        Ok(())
    }
}

fn get_env(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn get_env_as_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_env_as_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_env_as_list(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value
            .split(',')
            .map(|item| item.trim().to_string())
            .collect(),
        _ => default.iter().map(|item| item.to_string()).collect(),
    }
}

pub mod auth;
pub mod health;
pub mod tasks;

use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::web;

use crate::auth::{CsrfProtection, RequireAuth};
use crate::config::Config;

/// Mounts the health probe and the `/api/v1` surface. Login stays open;
/// everything else sits behind `RequireAuth` and `CsrfProtection`, with
/// authentication wrapped outermost so it runs first.
pub fn configure(config: &Config) -> impl FnOnce(&mut web::ServiceConfig) {
    let config = config.clone();
    move |cfg| {
        cfg.service(health::health).service(
            web::scope("/api/v1").service(auth::login).service(
                web::scope("")
                    .wrap(CsrfProtection::new(config.clone()))
                    .wrap(RequireAuth::new(config.clone()))
                    .service(auth::logout)
                    .service(
                        web::scope("/tasks")
                            .service(tasks::list_tasks)
                            .service(tasks::create_task)
                            .service(tasks::get_task)
                            .service(tasks::update_task)
                            .service(tasks::delete_task),
                    ),
            ),
        );
    }
}

/// Builds the CORS policy from configuration. Methods and headers are
/// taken verbatim; origins are matched exactly.
pub fn cors(config: &Config) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(config.cors.allowed_methods.iter().map(String::as_str))
        .allowed_headers(config.cors.allowed_headers.iter().map(String::as_str))
        .expose_headers(config.cors.expose_headers.iter().map(String::as_str))
        .max_age(config.cors.max_age);
    for origin in &config.cors.allowed_origins {
        cors = cors.allowed_origin(origin);
    }
    if config.cors.allow_credentials {
        cors = cors.supports_credentials();
    }
    cors
}

/// Browser-hardening headers attached to every response.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"))
}

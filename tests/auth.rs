use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use taskvault::config::{
    Config, CookieConfig, CorsConfig, CsrfConfig, JwtConfig, MongoConfig, RateLimitConfig,
    ServerConfig,
};
use taskvault::repository::{InMemoryTaskRepository, InMemoryUserRepository};
use taskvault::routes;
use taskvault::services::{AuthService, TaskService};

const EMAIL: &str = "integration@example.com";
const PASSWORD: &str = "password123";

fn test_config(auth_cookie: bool) -> Config {
    Config {
        server: ServerConfig {
            port: 0,
            mode: "test".into(),
            auth_cookie,
        },
        mongo: MongoConfig {
            uri: "mongodb://localhost:27017".into(),
            database: "test".into(),
            timeout: Duration::from_secs(1),
        },
        jwt: JwtConfig {
            secret: "jwt-secret".into(),
            expiry: Duration::from_secs(900),
        },
        csrf: CsrfConfig {
            secret: "csrf-secret".into(),
        },
        cookie: CookieConfig {
            domain: String::new(),
            secure: false,
            http_only: true,
            same_site: "Strict".into(),
        },
        rate_limit: RateLimitConfig {
            requests: 100,
            window: Duration::from_secs(60),
        },
        cors: CorsConfig {
            allowed_origins: vec![],
            allowed_methods: vec![],
            allowed_headers: vec![],
            expose_headers: vec![],
            allow_credentials: true,
            max_age: 3600,
        },
    }
}

/// Builds the app over in-memory repositories with one registered user.
async fn spawn_app(
    config: Config,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let users = Arc::new(InMemoryUserRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let auth_service = web::Data::new(AuthService::new(users, config.clone()));
    let task_service = web::Data::new(TaskService::new(tasks));

    auth_service
        .register(EMAIL, PASSWORD)
        .await
        .expect("failed to seed user");

    test::init_service(
        App::new()
            .app_data(auth_service)
            .app_data(task_service)
            .app_data(web::Data::new(config.clone()))
            .app_data(taskvault::error::json_config())
            .app_data(taskvault::error::query_config())
            .app_data(taskvault::error::path_config())
            .configure(routes::configure(&config)),
    )
    .await
}

async fn login<S, B>(app: &S) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": EMAIL, "password": PASSWORD }))
        .to_request();
    test::call_service(app, req).await
}

fn cookie_named<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

#[actix_rt::test]
async fn test_login_sets_session_and_csrf_cookies() {
    let app = spawn_app(test_config(true)).await;

    let resp = login(&app).await;
    assert_eq!(resp.status(), 200);

    let access = cookie_named(&resp, "access_token").expect("access_token cookie");
    assert_eq!(access.http_only(), Some(true));
    let csrf = cookie_named(&resp, "csrf_token").expect("csrf_token cookie");
    assert_ne!(csrf.http_only(), Some(true));

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "login successful");
    assert_eq!(body["data"]["user"]["email"], EMAIL);
    // Tokens travel only as cookies in cookie mode.
    assert!(body["data"].get("access_token").is_none());
    assert!(body["data"].get("csrf_token").is_none());
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    let app = spawn_app(test_config(true)).await;

    for payload in [
        json!({ "email": EMAIL, "password": "wrong-password" }),
        json!({ "email": "nobody@example.com", "password": PASSWORD }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "invalid email or password");
    }
}

#[actix_rt::test]
async fn test_login_validation_errors() {
    let app = spawn_app(test_config(true)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": "not-an-email", "password": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "validation failed");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[actix_rt::test]
async fn test_protected_route_requires_token() {
    let app = spawn_app(test_config(true)).await;

    let req = test::TestRequest::get().uri("/api/v1/tasks").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "authentication required");
}

#[actix_rt::test]
async fn test_garbage_token_is_rejected() {
    let app = spawn_app(test_config(true)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .cookie(Cookie::new("access_token", "not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "invalid or expired token");
}

#[actix_rt::test]
async fn test_logout_expires_cookies() {
    // A configured cookie domain must survive into the removal cookies,
    // otherwise browsers will not match and delete the originals.
    let mut config = test_config(true);
    config.cookie.domain = "localhost".into();
    let app = spawn_app(config).await;

    let resp = login(&app).await;
    let access = cookie_named(&resp, "access_token").expect("access_token cookie");
    let csrf = cookie_named(&resp, "csrf_token").expect("csrf_token cookie");
    assert_eq!(access.domain(), Some("localhost"));

    let req = test::TestRequest::post()
        .uri("/api/v1/logout")
        .cookie(access)
        .cookie(csrf.clone())
        .insert_header(("X-CSRF-Token", csrf.value()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    for name in ["access_token", "csrf_token"] {
        let cleared = cookie_named(&resp, name).expect("removal cookie");
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.domain(), Some("localhost"));
        assert_eq!(cleared.path(), Some("/"));
    }

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "logout successful");
}

#[actix_rt::test]
async fn test_header_mode_returns_tokens_in_body() {
    let app = spawn_app(test_config(false)).await;

    let resp = login(&app).await;
    assert_eq!(resp.status(), 200);
    assert!(cookie_named(&resp, "access_token").is_none());

    let body: serde_json::Value = test::read_body_json(resp).await;
    let access_token = body["data"]["access_token"]
        .as_str()
        .expect("access token in body")
        .to_string();
    assert!(body["data"]["csrf_token"].is_string());

    // The bearer token authenticates read requests without any cookies.
    let req = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .insert_header(("Authorization", format!("Bearer {}", access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

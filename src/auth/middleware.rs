use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::csrf::validate_token;
use crate::auth::token::verify_token;
use crate::config::Config;
use crate::error::AppError;

pub const CSRF_TOKEN_HEADER: &str = "X-CSRF-Token";

/// Session-token enforcement for protected routes.
///
/// Reads the token from the `access_token` cookie (cookie-mode, the default)
/// or the `Authorization: Bearer` header, verifies it, and stashes the
/// decoded claims in request extensions for downstream use.
pub struct RequireAuth {
    config: Config,
}

impl RequireAuth {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService {
            service,
            config: self.config.clone(),
        }))
    }
}

pub struct RequireAuthService<S> {
    service: S,
    config: Config,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = if self.config.server.auth_cookie {
            req.cookie("access_token").map(|c| c.value().to_string())
        } else {
            req.headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(|value| value.to_string())
        };

        let Some(token) = token else {
            let err = AppError::Unauthorized("authentication required".into());
            let res = req.into_response(err.error_response()).map_into_right_body();
            return Box::pin(async move { Ok(res) });
        };

        match verify_token(&token, &self.config.jwt.secret) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
            }
            Err(app_err) => {
                let res = req
                    .into_response(app_err.error_response())
                    .map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

/// Double-submit CSRF enforcement.
///
/// Mutating requests must carry an `X-CSRF-Token` header equal to the
/// `csrf_token` cookie, and the token itself must carry a valid HMAC
/// signature. Safe methods pass through untouched.
pub struct CsrfProtection {
    config: Config,
}

impl CsrfProtection {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CsrfProtection
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CsrfProtectionService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CsrfProtectionService {
            service,
            config: self.config.clone(),
        }))
    }
}

pub struct CsrfProtectionService<S> {
    service: S,
    config: Config,
}

impl<S, B> Service<ServiceRequest> for CsrfProtectionService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) });
        }

        let reject = |req: ServiceRequest, err: AppError| {
            let res = req.into_response(err.error_response()).map_into_right_body();
            Box::pin(async move { Ok(res) }) as Self::Future
        };

        let header_token = req
            .headers()
            .get(CSRF_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let Some(header_token) = header_token else {
            return reject(req, AppError::Forbidden("csrf token missing in header".into()));
        };

        let Some(cookie_token) = req.cookie("csrf_token").map(|c| c.value().to_string()) else {
            return reject(req, AppError::Forbidden("csrf token missing in cookie".into()));
        };

        if header_token != cookie_token {
            return reject(req, AppError::Forbidden("csrf token mismatch".into()));
        }

        if !validate_token(&header_token, &self.config.csrf.secret) {
            return reject(req, AppError::Forbidden("invalid csrf token".into()));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
    }
}

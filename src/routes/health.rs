use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

/// Liveness probe. Unauthenticated and unenveloped on purpose so load
/// balancers can poll it cheaply.
#[get("/health-check")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy"
    }))
}

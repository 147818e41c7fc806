use actix_web::{HttpResponse, Responder};

/// `GET /health`: liveness check for the launcher and monitoring.
pub async fn process() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}

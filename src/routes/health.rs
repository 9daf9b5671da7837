use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

/// Health check endpoint
///
/// Reports whether the database answers. Needs no credentials.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    match state.users.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "timestamp": Utc::now()
        })),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "error": "Service Unavailable",
                "status": "unavailable",
                "timestamp": Utc::now()
            }))
        }
    }
}

use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::env;

use super::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    open_sessions: usize,
    environment: String,
    version: String,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let health = HealthStatus {
        status: "ok".to_string(),
        open_sessions: state.sessions.len().await,
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    HttpResponse::Ok().json(health)
}

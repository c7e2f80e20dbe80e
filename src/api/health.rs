use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::error;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Round-trip `SELECT 1` and report `up`/`down` status labels accordingly
async fn probe(pool: &Pool<Postgres>, up: &'static str, down: &'static str) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: up,
            database: "connected",
            error: None,
        }),
        Err(e) => {
            error!("{} probe failed: {:?}", down, e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: down,
                database: "disconnected",
                error: Some("Database unavailable".to_string()),
            })
        }
    }
}

/// General health check including database connectivity
#[get("/health")]
async fn health_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    probe(&pool, "healthy", "unhealthy").await
}

/// Readiness probe: 503 while the database is unreachable
#[get("/ready")]
async fn readiness_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    probe(&pool, "ready", "not_ready").await
}

/// Liveness probe. Does not check dependencies.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive",
        database: "not_checked",
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}

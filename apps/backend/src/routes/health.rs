use actix_web::{web, HttpResponse};
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    db: &'static str,
    time: String,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let db = match app_state.require_db() {
        Ok(conn) => {
            let probe =
                Statement::from_string(conn.get_database_backend(), "SELECT 1 AS health_check");
            match conn.query_one(probe).await {
                Ok(_) => "ok",
                Err(e) => {
                    warn!(error = %Redacted(&e.to_string()), "Health check query failed");
                    "error"
                }
            }
        }
        Err(_) => "error",
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        app_version: app_state.app_version,
        db,
        time,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}

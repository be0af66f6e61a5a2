use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::CurrentNgo;
use crate::services::analytics;
use crate::state::AppState;

async fn reports(app_state: web::Data<AppState>, ngo: CurrentNgo) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    Ok(HttpResponse::Ok().json(analytics::ngo_report(db, ngo.ngo_id).await?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reports", web::get().to(reports));
}

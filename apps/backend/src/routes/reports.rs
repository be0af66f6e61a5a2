use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::services::platform;
use crate::state::AppState;

async fn overall(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    Ok(HttpResponse::Ok().json(platform::overall_report(db).await?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/overall", web::get().to(overall));
}

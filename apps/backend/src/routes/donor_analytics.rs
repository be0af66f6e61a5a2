use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::CurrentDonor;
use crate::services::analytics;
use crate::state::AppState;

async fn reports(
    app_state: web::Data<AppState>,
    donor: CurrentDonor,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    Ok(HttpResponse::Ok().json(analytics::donor_report(db, donor.donor_id).await?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reports", web::get().to(reports));
}

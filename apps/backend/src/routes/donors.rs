use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::CurrentNgo;
use crate::services::ngos;
use crate::state::AppState;

async fn list(app_state: web::Data<AppState>, ngo: CurrentNgo) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    Ok(HttpResponse::Ok().json(ngos::donors_of_ngo(db, ngo.ngo_id).await?))
}

async fn history(
    app_state: web::Data<AppState>,
    ngo: CurrentNgo,
    donor_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let response = ngos::donor_history(db, ngo.ngo_id, donor_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/list", web::get().to(list))
        .route("/{donor_id}/history", web::get().to(history));
}

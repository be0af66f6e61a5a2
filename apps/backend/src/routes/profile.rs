use actix_web::{web, HttpResponse};

use crate::auth::Principal;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::profile::{self, DonorProfileRequest, NgoProfileRequest};
use crate::state::AppState;

async fn update_donor(
    app_state: web::Data<AppState>,
    principal: Principal,
    body: ValidatedJson<DonorProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let response = profile::update_donor(db, principal.user_id, &body).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn update_ngo(
    app_state: web::Data<AppState>,
    principal: Principal,
    body: ValidatedJson<NgoProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let response = profile::update_ngo(db, principal.user_id, &body).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/donor", web::post().to(update_donor))
        .route("/ngo", web::post().to(update_ngo));
}

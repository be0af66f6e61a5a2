use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::{CurrentDonor, LenientPrincipal, ValidatedJson};
use crate::repos::ngos;
use crate::services::donations::{self, CreateDonationRequest};
use crate::state::AppState;

/// The caller's NGO donations, or every donation for anyone else.
async fn records(
    app_state: web::Data<AppState>,
    LenientPrincipal(principal): LenientPrincipal,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let ngo_id = match principal {
        Some(p) => ngos::find_id_by_user(db, p.user_id).await?,
        None => None,
    };
    Ok(HttpResponse::Ok().json(donations::records(db, ngo_id).await?))
}

async fn donor_history(
    app_state: web::Data<AppState>,
    donor: CurrentDonor,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    Ok(HttpResponse::Ok().json(donations::donor_donations(db, donor.donor_id).await?))
}

async fn create(
    app_state: web::Data<AppState>,
    donor: CurrentDonor,
    body: ValidatedJson<CreateDonationRequest>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let response = donations::create_donation(db, donor.donor_id, &body).await?;
    Ok(HttpResponse::Created().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/records", web::get().to(records))
        .route("/donor/history", web::get().to(donor_history))
        .route("/create", web::post().to(create));
}

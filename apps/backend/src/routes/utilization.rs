use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::{CurrentNgo, LenientPrincipal, ValidatedJson};
use crate::repos::ngos;
use crate::services::utilization::{self, AddProjectRequest, AddUtilizationRequest};
use crate::state::AppState;

async fn projects(app_state: web::Data<AppState>, ngo: CurrentNgo) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    Ok(HttpResponse::Ok().json(utilization::projects(db, ngo.ngo_id).await?))
}

async fn donations(
    app_state: web::Data<AppState>,
    ngo: CurrentNgo,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    Ok(HttpResponse::Ok().json(utilization::donations(db, ngo.ngo_id).await?))
}

/// The caller's NGO records, or every record for anyone else.
async fn records(
    app_state: web::Data<AppState>,
    LenientPrincipal(principal): LenientPrincipal,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let ngo_id = match principal {
        Some(p) => ngos::find_id_by_user(db, p.user_id).await?,
        None => None,
    };
    Ok(HttpResponse::Ok().json(utilization::records(db, ngo_id).await?))
}

async fn add_project(
    app_state: web::Data<AppState>,
    ngo: CurrentNgo,
    body: ValidatedJson<AddProjectRequest>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let response = utilization::add_project(db, ngo.ngo_id, &body).await?;
    Ok(HttpResponse::Created().json(response))
}

async fn add_utilization(
    app_state: web::Data<AppState>,
    ngo: CurrentNgo,
    body: ValidatedJson<AddUtilizationRequest>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let response = utilization::add_utilization(db, ngo.ngo_id, &body).await?;
    Ok(HttpResponse::Created().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/projects", web::get().to(projects))
        .route("/donations", web::get().to(donations))
        .route("/records", web::get().to(records))
        .route("/add-project", web::post().to(add_project))
        .route("/add-utilization", web::post().to(add_utilization));
}

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::MaybePrincipal;
use crate::services::ngos;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    ngo_id: Option<String>,
}

impl DashboardQuery {
    fn ngo_id(&self) -> Result<Option<i64>, AppError> {
        match self.ngo_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                AppError::bad_request(ErrorCode::BadRequest, "ngo_id must be an integer")
            }),
        }
    }
}

async fn list(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    Ok(HttpResponse::Ok().json(ngos::list_ngos(db).await?))
}

async fn dashboard(
    app_state: web::Data<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let requested = query.ngo_id()?;
    let db = app_state.require_db()?;
    let response = ngos::dashboard(db, requested, principal.as_ref()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/list", web::get().to(list))
        .route("/dashboard", web::get().to(dashboard));
}

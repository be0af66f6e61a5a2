use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::auth::{self, LoginRequest, SignupRequest};
use crate::state::AppState;

async fn login(
    app_state: web::Data<AppState>,
    body: ValidatedJson<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let response = auth::login(db, &app_state.security, &body).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn signup(
    app_state: web::Data<AppState>,
    body: ValidatedJson<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let response = auth::signup(db, &body).await?;
    Ok(HttpResponse::Created().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/signup", web::post().to(signup));
}

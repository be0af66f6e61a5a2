use actix_web::{web, HttpResponse};
use tracing::debug;

use crate::auth::Role;
use crate::error::AppError;
use crate::extractors::LenientPrincipal;
use crate::services::platform;
use crate::state::AppState;

async fn dashboard(
    app_state: web::Data<AppState>,
    LenientPrincipal(principal): LenientPrincipal,
) -> Result<HttpResponse, AppError> {
    // Open to everyone for now; the caller is only recorded.
    debug!(
        user_id = ?principal.as_ref().map(|p| p.user_id),
        admin = principal.as_ref().is_some_and(|p| p.has_role(Role::Admin)),
        "Admin dashboard requested"
    );
    let db = app_state.require_db()?;
    Ok(HttpResponse::Ok().json(platform::admin_dashboard(db).await?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(dashboard));
}

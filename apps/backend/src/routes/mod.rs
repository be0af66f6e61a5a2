use actix_web::web;

pub mod admin;
pub mod auth;
pub mod donations;
pub mod donor_analytics;
pub mod donors;
pub mod health;
pub mod ngo_analytics;
pub mod ngos;
pub mod profile;
pub mod reports;
pub mod utilization;

/// Register every route. `main.rs` and the integration tests share this so
/// both exercise the same paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    health::configure_routes(cfg);

    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));
    cfg.service(web::scope("/api/profile").configure(profile::configure_routes));
    cfg.service(web::scope("/api/ngo").configure(ngos::configure_routes));
    cfg.service(web::scope("/api/donors").configure(donors::configure_routes));
    cfg.service(web::scope("/api/donations").configure(donations::configure_routes));
    cfg.service(web::scope("/api/utilization").configure(utilization::configure_routes));
    cfg.service(web::scope("/api/ngo-analytics").configure(ngo_analytics::configure_routes));
    cfg.service(web::scope("/api/donor-analytics").configure(donor_analytics::configure_routes));
    cfg.service(web::scope("/api/admin").configure(admin::configure_routes));
    cfg.service(web::scope("/api/reports").configure(reports::configure_routes));
}

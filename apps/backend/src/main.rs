use actix_web::{web, App, HttpServer};
use givetrack_backend::config::AppConfig;
use givetrack_backend::infra::state::build_state;
use givetrack_backend::middleware::cors::cors_middleware;
use givetrack_backend::middleware::request_trace::RequestTrace;
use givetrack_backend::middleware::structured_logger::StructuredLogger;
use givetrack_backend::middleware::trace_span::TraceSpan;
use givetrack_backend::{routes, telemetry};
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    telemetry::init_tracing();
    info!(config = ?cfg, "Starting GiveTrack backend");

    let app_state = match build_state(cfg.security())
        .with_database_url(cfg.database_url.clone())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(host = %cfg.host, port = cfg.port, "Database connected, listening");

    let data = web::Data::new(app_state);
    let origins = cfg.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((cfg.host.as_str(), cfg.port))?
    .run()
    .await
}

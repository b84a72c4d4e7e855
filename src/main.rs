use actix_cors::Cors;
use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fueltrade::config::{Config, LogFormat, ServerConfig};
use fueltrade::middleware::RequestId;
use fueltrade::AppServices;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config.app.log_level, config.app.log_format);
    config.validate().context("Configuration validation failed")?;

    tracing::info!(
        env = config.app.env.as_str(),
        bind = %config.server.bind_address(),
        workers = config.server.workers,
        "Starting fueltrade"
    );

    let pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        pool_size = config.database.pool_size,
        max_connections = config.database.max_connections,
        "Database pool initialized"
    );

    let services = AppServices::new(pool.clone(), &config.app)?;
    let server_config = config.server.clone();

    let server = HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(cors(&server_config))
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .configure(move |cfg| services.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(config.server.bind_address())
    .with_context(|| format!("Failed to bind {}", config.server.bind_address()))?
    .run();

    let result = server.await;

    pool.close().await;
    tracing::info!("Database pool closed");

    result.context("HTTP server terminated with an error")
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fueltrade={},actix_web=info", level)));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors(server: &ServerConfig) -> Cors {
    match &server.cors_allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allow_any_header()
            .max_age(3600),
        None => Cors::permissive(),
    }
}

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use clap::Parser;
use tracing::{info, Subscriber};
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, Layer,
};

mod api;
mod cli;
mod config;
mod db;
mod shutdown;

use crate::api::{
    auth::JwtAuth,
    health::health_config,
    pekerjaan::{pekerjaan_config, PekerjaanService},
    validation,
};
use crate::cli::{Cli, Command};
use crate::db::PgPekerjaanRepository;
use crate::shutdown::ShutdownCoordinator;

fn file_layer<S>(log_dir: &str, name: &str, level: LevelFilter) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, name))
        .with_ansi(false)
        .with_filter(level)
}

/// Console output plus daily-rotating per-level files under `log_dir`,
/// e.g. logs/info.log.2024-12-22, logs/error.log.2024-12-22
fn init_tracing(log_dir: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer(log_dir, "info.log", LevelFilter::INFO))
        .with(file_layer(log_dir, "warn.log", LevelFilter::WARN))
        .with(file_layer(log_dir, "error.log", LevelFilter::ERROR))
        .with(file_layer(log_dir, "debug.log", LevelFilter::DEBUG))
        .init();

    Ok(())
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config::Config {
        database_url,
        jwt_secret,
        host,
        port,
        max_payload_size,
        max_db_connections,
        log_dir,
    } = config::Config::from_env().map_err(|e| startup_error("Failed to load configuration", e))?;

    init_tracing(&log_dir)?;

    let pool = db::connection::get_connection(&database_url, max_db_connections)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;
    info!("Database connection pool established (max {} connections)", max_db_connections);

    db::migrations::run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run database migrations", e))?;

    if cli.command() == Command::Migrate {
        pool.close().await;
        return Ok(());
    }

    info!("Starting alumni-pekerjaan service");
    info!("  - Max payload size: {} bytes", max_payload_size);

    // One store and one verifier, shared by every worker
    let service = web::Data::new(PekerjaanService::new(Arc::new(PgPekerjaanRepository::new(
        pool.clone(),
    ))));
    let jwt = web::Data::new(JwtAuth::new(&jwt_secret));
    let server_pool = pool.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(service.clone())
            .app_data(jwt.clone())
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::json_config().limit(max_payload_size))
            .app_data(validation::path_config())
            .configure(health_config)
            .configure(pekerjaan_config)
    });

    info!("Server starting on http://{}:{}", host, port);

    let server = server.bind((host.as_str(), port))?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}

use std::io;

use actix_web::{web, HttpServer};
use projects_api::{
    build_app,
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    logging::init_logging,
    settings::AppConfig,
    AppState,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let log_guard = match init_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging setup failed: {:#}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Loaded configuration: {:?}", config);

    let pool = create_pool(&config.database_url, config.max_db_connections)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database connection pool: {}", e);
            io::Error::other(e)
        })?;

    run_migrations(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        io::Error::other(e)
    })?;

    let app_state = web::Data::new(AppState::new(pool.clone()));
    let expose_details = config.expose_error_details();
    let public_dir = config.public_dir.clone();

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} v{} on {} ({})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.env
    );

    let server = HttpServer::new(move || {
        build_app(app_state.clone(), expose_details, public_dir.clone())
    })
    .workers(config.worker_count)
    .disable_signals()
    .bind(server_addr)?
    .run();

    let handle = server.handle();

    tokio::select! {
        res = server => res?,
        _ = shutdown_signal() => handle.stop(true).await,
    }

    pool.close().await;
    tracing::info!("Database pool closed, shutdown complete.");
    drop(log_guard);

    Ok(())
}

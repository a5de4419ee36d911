use actix_web::{App, HttpServer, middleware::Logger};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobboard::{
  adapters::http::{RequestIdMiddleware, configure_app},
  infrastructure::{
    config::{Config, DatabaseConfig},
    wiring::{Repositories, build_dependencies},
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jobboard=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting job board API");

  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  tracing::info!("Configuration loaded successfully");

  let repos = if config.database.is_in_memory() {
    tracing::warn!("Using the in-memory store; data is lost on shutdown");
    Repositories::in_memory()
  } else {
    let pool = connect_database(&config.database).await?;
    Repositories::postgres(pool)
  };

  for dir in [&config.storage.resume_dir, &config.storage.logo_dir] {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
      tracing::error!("Failed to create upload directory {}: {}", dir.display(), e);
      e
    })?;
  }

  let deps = build_dependencies(repos, &config.security, &config.storage).map_err(|e| {
    tracing::error!("Failed to initialize security components: {}", e);
    std::io::Error::other(e.to_string())
  })?;

  let server_host = config.server.host.clone();
  let server_port = config.server.port;
  let api_prefix = config.server.api_prefix.clone();
  let logo_dir = config.storage.logo_dir.clone();

  tracing::info!(
    "Starting HTTP server on {}:{} (API under '{}')",
    server_host,
    server_port,
    api_prefix
  );

  HttpServer::new(move || {
    App::new()
      // Add request ID middleware
      .wrap(RequestIdMiddleware::new())
      // Add logging middleware
      .wrap(Logger::default())
      .configure(|cfg| configure_app(cfg, deps.clone(), &api_prefix, logo_dir.clone()))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}

/// Connects to Postgres and applies pending migrations
async fn connect_database(database: &DatabaseConfig) -> std::io::Result<PgPool> {
  tracing::info!("Connecting to database");

  let pool = tokio::time::timeout(
    Duration::from_secs(database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(database.max_connections)
      .acquire_timeout(Duration::from_secs(database.acquire_timeout_seconds))
      .connect(&database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
    tracing::error!("Failed to run database migrations: {}", e);
    std::io::Error::other(format!("Migration error: {}", e))
  })?;
  tracing::info!("Database migrations completed");

  Ok(pool)
}

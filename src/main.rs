mod app_state;
mod config;
mod db;
mod models;
mod routes;
mod services;

use axum::{routing::get, routing::post, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use app_state::AppState;
use config::AppConfig;
use services::{ai::InferenceClient, mailer::Mailer, storage::DocumentStore};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing resume-intake server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_histogram!(
        "intake_processing_seconds",
        "Time to process one application submission"
    );
    metrics::describe_counter!("intake_requests_total", "Total application submissions");
    metrics::describe_counter!(
        "intake_duplicates_total",
        "Submissions answered from a stored decision"
    );
    metrics::describe_counter!("intake_failures_total", "Submissions that ended in an error");
    metrics::describe_counter!(
        "notifications_sent_total",
        "Interview invitations confirmed sent"
    );
    metrics::describe_counter!(
        "notifications_failed_total",
        "Interview invitation sends that failed"
    );

    // Initialize database connection pool
    tracing::info!("Connecting to PostgreSQL database");
    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run database migrations
    tracing::info!("Running database migrations");
    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    // Apply the error-log retention policy outside the request path
    match db::queries::purge_error_logs(&db_pool, config.error_log_retention_days).await {
        Ok(purged) if purged > 0 => {
            tracing::info!(purged, "Purged expired error-log entries");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Error-log retention purge failed");
        }
    }

    // Initialize object storage for uploaded documents
    tracing::info!("Initializing document storage client");
    let storage = DocumentStore::new(
        &config.s3_bucket,
        &config.s3_endpoint,
        &config.s3_access_key,
        &config.s3_secret_key,
    )
    .expect("Failed to initialize document storage client");

    // Initialize inference client (classification, summarization, embeddings)
    tracing::info!("Initializing inference client");
    let inference = InferenceClient::new(
        &config.inference_url,
        &config.chat_model,
        &config.embed_model,
    );

    // Initialize SMTP notification dispatcher
    tracing::info!("Initializing notification dispatcher");
    let mailer = Mailer::new(
        &config.smtp_server,
        &config.smtp_user,
        &config.smtp_pass,
        &config.from_email,
        &config.booking_link,
    );

    // Create shared application state
    let state = AppState::new(db_pool, storage, inference, mailer);

    // Build API routes
    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/api/v1/applications",
            post(routes::applications::submit_application),
        )
        .with_state(state)
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024)); // 10 MB limit

    tracing::info!("Starting resume-intake on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}

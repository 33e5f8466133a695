//! Basecamp Server - bookings and administration
//!
//! REST API server for the public booking form and the staff portals.

use anyhow::Context;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use basecamp_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{redis::RedisService, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("basecamp_server={},tower_http=debug", config.logging.level).into());

    let json = config.logging.format.eq_ignore_ascii_case("json");
    tracing_subscriber::registry()
        .with(filter)
        .with((!json).then(tracing_subscriber::fmt::layer))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .init();

    tracing::info!("Starting Basecamp Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let redis_service = RedisService::new(
        &config.redis.url,
        config.registration.duplicate_window_seconds,
    )
    .await
    .context("Failed to connect to Redis")?;

    tracing::info!("Connected to Redis");

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config, redis_service)
        .await
        .context("Failed to create services")?;

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        .route("/portal", get(api::auth::portal))
        // Public booking
        .route("/programs", get(api::registrations::list_programs))
        .route("/registrations", post(api::registrations::submit_registration))
        .route("/registrations/quote", post(api::registrations::quote))
        .route("/faq/ask", post(api::faq::ask))
        // Admin portal
        .route("/admin/registrations", get(api::registrations::list_registrations))
        .route("/admin/registrations/:id", get(api::registrations::get_registration))
        .route("/admin/registrations/:id", put(api::registrations::update_registration))
        .route("/admin/check-in/:token", get(api::registrations::check_in))
        .route("/admin/leads", get(api::leads::list_leads))
        .route("/admin/leads/:id", put(api::leads::update_lead))
        .route("/admin/profiles", get(api::profiles::list_profiles))
        .route("/admin/profiles", post(api::profiles::create_profile))
        .route("/admin/profiles/:id/access", put(api::profiles::update_access))
        // Accounts portal
        .route("/accounts/dashboard", get(api::dashboard::get_dashboard))
        .route("/accounts/invoices", get(api::finance::list_invoices))
        .route("/accounts/invoices", post(api::finance::create_invoice))
        .route("/accounts/invoices/:id", get(api::finance::get_invoice))
        .route("/accounts/invoices/:id", put(api::finance::update_invoice))
        .route("/accounts/invoices/:id", delete(api::finance::delete_invoice))
        .route("/accounts/payments", get(api::finance::list_payments))
        .route("/accounts/payments", post(api::finance::create_payment))
        .route("/accounts/payments/:id", get(api::finance::get_payment))
        .route("/accounts/payments/:id", put(api::finance::update_payment))
        .route("/accounts/payments/:id", delete(api::finance::delete_payment))
        .route("/accounts/expenses", get(api::finance::list_expenses))
        .route("/accounts/expenses", post(api::finance::create_expense))
        .route("/accounts/expenses/:id", get(api::finance::get_expense))
        .route("/accounts/expenses/:id", put(api::finance::update_expense))
        .route("/accounts/expenses/:id", delete(api::finance::delete_expense))
        .route("/accounts/budgets", get(api::finance::list_budgets))
        .route("/accounts/budgets", post(api::finance::create_budget))
        .route("/accounts/budgets/:id", get(api::finance::get_budget))
        .route("/accounts/budgets/:id", put(api::finance::update_budget))
        .route("/accounts/budgets/:id", delete(api::finance::delete_budget))
        .route("/accounts/collections", get(api::finance::list_collections))
        .route("/accounts/collections", post(api::finance::create_collection))
        .route("/accounts/collections/:id", get(api::finance::get_collection))
        .route("/accounts/collections/:id", put(api::finance::update_collection))
        .route("/accounts/collections/:id", delete(api::finance::delete_collection))
        // Vendors portal
        .route("/vendors", get(api::vendors::list_vendors))
        .route("/vendors", post(api::vendors::create_vendor))
        .route("/vendors/bills", get(api::vendors::list_bills))
        .route("/vendors/bills", post(api::vendors::create_bill))
        .route("/vendors/bills/:id", get(api::vendors::get_bill))
        .route("/vendors/bills/:id", put(api::vendors::update_bill))
        .route("/vendors/bills/:id", delete(api::vendors::delete_bill))
        .route("/vendors/:id", get(api::vendors::get_vendor))
        .route("/vendors/:id", put(api::vendors::update_vendor))
        .route("/vendors/:id", delete(api::vendors::delete_vendor))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

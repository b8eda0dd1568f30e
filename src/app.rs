/*
 * Responsibility
 * - Load Config -> build dependencies -> assemble the Router
 * - Apply middleware (CORS, request id, tracing, limits)
 * - Start axum::serve() with graceful shutdown
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    error::AppError,
    middleware,
    repos::PgDrinkRepo,
    services::auth::build_auth_service,
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,drinks_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        issuer = %config.auth.issuer(),
        "starting drinks API"
    );

    let state = build_state(&config).await?;
    let app = build_router(state);
    let app = middleware::cors::apply(app, &config);
    let app = middleware::http::apply(app);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let drinks = PgDrinkRepo::new(pool);
    if config.reset_db_on_start {
        let sample = drinks.reset_with_sample().await?;
        tracing::warn!(drink_id = sample.id, "drinks table reset; sample drink seeded");
    }

    let auth = build_auth_service(&config.auth)?;

    Ok(AppState::new(Arc::new(drinks), auth))
}

/// Routes + fallback, without transport middleware. Tests drive this directly.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::v1::routes(&state))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // keep serving; the process can still be killed
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

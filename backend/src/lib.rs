use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod services;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let protected_routes = Router::new()
        // Habits
        .route(
            "/api/habits",
            get(handlers::habits::list_habits).post(handlers::habits::create_habit),
        )
        .route(
            "/api/habits/:id",
            get(handlers::habits::get_habit)
                .put(handlers::habits::update_habit)
                .delete(handlers::habits::retire_habit),
        )
        // Entries
        .route(
            "/api/habits/:id/toggle",
            post(handlers::entries::toggle_entry),
        )
        .route(
            "/api/habits/:id/entries",
            get(handlers::entries::list_entries),
        )
        .route(
            "/api/habits/:id/entries/:date/notes",
            put(handlers::entries::update_entry_notes),
        )
        // Progress
        .route(
            "/api/habits/:id/progress",
            get(handlers::progress::get_habit_progress),
        )
        .route("/api/progress/today", get(handlers::progress::get_today_progress))
        .route("/api/progress/daily", get(handlers::progress::get_daily_progress))
        // Feedback
        .route(
            "/api/feedback",
            get(handlers::feedback::list_feedback).post(handlers::feedback::upsert_feedback),
        )
        .route("/api/feedback/today", get(handlers::feedback::get_today_feedback))
        // Onboarding
        .route(
            "/api/personality-test",
            post(handlers::personality::save_personality_test),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

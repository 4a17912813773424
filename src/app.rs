use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/timer", get(handlers::get_timer))
        .route("/api/timer/start", post(handlers::start_timer))
        .route("/api/timer/pause", post(handlers::pause_timer))
        .route("/api/timer/reset", post(handlers::reset_timer))
        .route("/api/timer/duration", post(handlers::set_duration))
        .route("/api/timer/selection", post(handlers::set_selection))
        .route("/api/stats/today", get(handlers::get_today))
        .route("/api/stats", get(handlers::get_history))
        .route("/api/notifications", get(handlers::get_notifications))
        .route("/api/newsletter", post(handlers::subscribe_newsletter))
        .with_state(state)
}

use crate::errors::AppError;
use crate::models::{
    DurationRequest, HistoryResponse, NewsletterRequest, NotificationsResponse, SelectionRequest,
    TimerSnapshot, TodayStatsResponse,
};
use crate::notify::{Level, Notifier};
use crate::state::AppState;
use crate::stats::today;
use crate::ui::render_index;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.timer.snapshot().await;
    let date = today();
    let stats = state.stats.load(date).await;
    Html(render_index(&date.to_string(), &snapshot, &stats))
}

pub async fn get_timer(State(state): State<AppState>) -> Json<TimerSnapshot> {
    Json(state.timer.snapshot().await)
}

pub async fn start_timer(State(state): State<AppState>) -> Json<TimerSnapshot> {
    state.timer.start().await;
    Json(state.timer.snapshot().await)
}

pub async fn pause_timer(State(state): State<AppState>) -> Json<TimerSnapshot> {
    state.timer.pause().await;
    Json(state.timer.snapshot().await)
}

pub async fn reset_timer(State(state): State<AppState>) -> Json<TimerSnapshot> {
    state.timer.reset().await;
    Json(state.timer.snapshot().await)
}

pub async fn set_duration(
    State(state): State<AppState>,
    payload: Result<Json<DurationRequest>, JsonRejection>,
) -> Result<Json<TimerSnapshot>, AppError> {
    // An unreadable body is just another unavailable length; 0 is never offered.
    let minutes = payload
        .ok()
        .and_then(|Json(request)| u32::try_from(request.minutes).ok())
        .unwrap_or(0);
    state
        .timer
        .choose_duration(minutes)
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?;
    Ok(Json(state.timer.snapshot().await))
}

pub async fn set_selection(
    State(state): State<AppState>,
    Json(payload): Json<SelectionRequest>,
) -> Json<TimerSnapshot> {
    state.timer.select(payload.skill_id, payload.notes).await;
    Json(state.timer.snapshot().await)
}

pub async fn get_today(State(state): State<AppState>) -> Json<TodayStatsResponse> {
    let date = today();
    let stats = state.stats.load(date).await;
    Json(TodayStatsResponse {
        date: date.to_string(),
        sessions: stats.sessions,
        focus_time: stats.focus_time,
        xp: stats.xp,
    })
}

pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(state.stats.history(today()).await)
}

pub async fn get_notifications(State(state): State<AppState>) -> Json<NotificationsResponse> {
    Json(NotificationsResponse {
        notices: state.toasts.active(),
    })
}

pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    Json(payload): Json<NewsletterRequest>,
) -> Result<Json<NotificationsResponse>, AppError> {
    if !looks_like_email(payload.email.trim()) {
        state
            .toasts
            .notify("Please enter a valid email address.", Level::Warning);
        return Err(AppError::bad_request("a valid email address is required"));
    }

    state.toasts.notify("Thank you for subscribing!", Level::Success);
    Ok(Json(NotificationsResponse {
        notices: state.toasts.active(),
    }))
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

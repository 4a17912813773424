use focus_tracker::{
    audio::{Chime, Silent, TerminalBell},
    notify::ToastBoard,
    recorder::HttpSessionRecorder,
    router,
    stats::StatsStore,
    storage::JsonFileStore,
    AppState, Config, FocusTimer,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;

    let store = JsonFileStore::open(&config.data_path).await;
    info!(path = %store.path().display(), "daily stats store opened");
    let stats = StatsStore::new(Arc::new(store));

    let recorder = HttpSessionRecorder::new(config.session_endpoint.clone(), config.session_cookies.clone())?;
    let toasts = Arc::new(ToastBoard::new());
    let chime: Arc<dyn Chime> = if config.chime {
        Arc::new(TerminalBell)
    } else {
        Arc::new(Silent)
    };

    let timer = FocusTimer::new(
        config.default_duration,
        Arc::new(recorder),
        toasts.clone(),
        stats.clone(),
        chime,
    );
    let app = router(AppState::new(timer, stats, toasts));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(endpoint = %config.session_endpoint, "sessions will be recorded remotely");
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

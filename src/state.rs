use crate::focus::FocusTimer;
use crate::notify::ToastBoard;
use crate::stats::StatsStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub timer: FocusTimer,
    pub stats: StatsStore,
    pub toasts: Arc<ToastBoard>,
}

impl AppState {
    pub fn new(timer: FocusTimer, stats: StatsStore, toasts: Arc<ToastBoard>) -> Self {
        Self {
            timer,
            stats,
            toasts,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// How long a notice stays on the dashboard.
pub const NOTICE_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// Something that can show the user a short-lived notice.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: Level);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub level: Level,
}

#[derive(Debug)]
struct Posted {
    notice: Notice,
    posted_at: Instant,
}

#[derive(Debug, Default)]
struct Board {
    next_id: u64,
    posted: Vec<Posted>,
}

impl Board {
    fn dismiss_expired(&mut self) {
        self.posted
            .retain(|posted| posted.posted_at.elapsed() < NOTICE_LIFETIME);
    }
}

/// Notices for the dashboard, dropped once they are older than
/// [`NOTICE_LIFETIME`]. Every notice is also logged.
#[derive(Debug, Default)]
pub struct ToastBoard {
    board: Mutex<Board>,
}

impl ToastBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices that have not been dismissed yet, oldest first.
    pub fn active(&self) -> Vec<Notice> {
        let Ok(mut board) = self.board.lock() else {
            return Vec::new();
        };
        board.dismiss_expired();
        board
            .posted
            .iter()
            .map(|posted| posted.notice.clone())
            .collect()
    }
}

impl Notifier for ToastBoard {
    fn notify(&self, message: &str, level: Level) {
        match level {
            Level::Info | Level::Success => info!(?level, "{message}"),
            Level::Warning => warn!("{message}"),
            Level::Error => error!("{message}"),
        }

        let Ok(mut board) = self.board.lock() else {
            return;
        };
        board.dismiss_expired();
        board.next_id += 1;
        let notice = Notice {
            id: board.next_id,
            message: message.to_string(),
            level,
        };
        board.posted.push(Posted {
            notice,
            posted_at: Instant::now(),
        });
    }
}

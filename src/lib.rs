pub mod app;
pub mod audio;
pub mod config;
pub mod csrf;
pub mod errors;
pub mod focus;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod recorder;
pub mod state;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use focus::FocusTimer;
pub use state::AppState;

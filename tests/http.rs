use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct TimerSnapshot {
    phase: String,
    duration_minutes: u32,
    remaining_seconds: u32,
    display: String,
    progress_percent: f64,
    skill_id: Option<String>,
    notes: String,
}

#[derive(Debug, Deserialize)]
struct TodayStats {
    date: String,
    sessions: u64,
    focus_time: u64,
    xp: u64,
}

#[derive(Debug, Deserialize)]
struct Notice {
    message: String,
    level: String,
}

#[derive(Debug, Deserialize)]
struct Notifications {
    notices: Vec<Notice>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("focus_tracker_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/timer")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_focus_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("SESSION_ENDPOINT", "http://127.0.0.1:9/pomodoro/")
        .env("FOCUS_CHIME", "off")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn post_timer(client: &Client, server: &TestServer, action: &str) -> TimerSnapshot {
    client
        .post(format!("{}/api/timer/{action}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_start_pause_reset_cycle() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let reset = post_timer(&client, &server, "reset").await;
    assert_eq!(reset.phase, "idle");
    assert_eq!(reset.remaining_seconds, reset.duration_minutes * 60);
    assert_eq!(reset.progress_percent, 0.0);

    let started = post_timer(&client, &server, "start").await;
    assert_eq!(started.phase, "running");

    sleep(Duration::from_millis(1300)).await;
    let paused = post_timer(&client, &server, "pause").await;
    assert_eq!(paused.phase, "paused");
    assert!(paused.remaining_seconds < paused.duration_minutes * 60);

    let reset = post_timer(&client, &server, "reset").await;
    assert_eq!(reset.phase, "idle");
    assert_eq!(reset.remaining_seconds, reset.duration_minutes * 60);
}

#[tokio::test]
async fn http_duration_change_and_validation() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/timer/duration", server.base_url))
        .json(&serde_json::json!({ "minutes": 45 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let timer: TimerSnapshot = response.json().await.unwrap();
    assert_eq!(timer.duration_minutes, 45);
    assert_eq!(timer.display, "45:00");

    let response = client
        .post(format!("{}/api/timer/duration", server.base_url))
        .json(&serde_json::json!({ "minutes": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let timer: TimerSnapshot = client
        .get(format!("{}/api/timer", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(timer.duration_minutes, 45);

    let notices: Notifications = client
        .get(format!("{}/api/notifications", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(notices.notices.iter().any(|notice| notice.level == "warning"));
}

#[tokio::test]
async fn http_selection_is_kept() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let timer: TimerSnapshot = client
        .post(format!("{}/api/timer/selection", server.base_url))
        .json(&serde_json::json!({ "skill_id": "3", "notes": "chapter 4" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(timer.skill_id.as_deref(), Some("3"));
    assert_eq!(timer.notes, "chapter 4");
}

#[tokio::test]
async fn http_today_stats_start_empty() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let today: TodayStats = client
        .get(format!("{}/api/stats/today", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!today.date.is_empty());
    assert_eq!((today.sessions, today.focus_time, today.xp), (0, 0, 0));

    let history: serde_json::Value = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["last_7_days"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn http_newsletter_requires_email() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/newsletter", server.base_url))
        .json(&serde_json::json!({ "email": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/api/newsletter", server.base_url))
        .json(&serde_json::json!({ "email": "ada@example.com" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let notices: Notifications = response.json().await.unwrap();
    assert!(notices
        .notices
        .iter()
        .any(|notice| notice.message == "Thank you for subscribing!"));
}

#[tokio::test]
async fn http_index_renders_timer() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("timer-display"));
    assert!(body.contains("duration-select"));
}

#[tokio::test]
async fn http_malformed_duration_is_a_validation_failure() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: TimerSnapshot = client
        .get(format!("{}/api/timer", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    for body in [
        serde_json::json!({ "minutes": -5 }),
        serde_json::json!({ "minutes": "x" }),
        serde_json::json!({}),
    ] {
        let response = client
            .post(format!("{}/api/timer/duration", server.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
    }

    let after: TimerSnapshot = client
        .get(format!("{}/api/timer", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after.duration_minutes, before.duration_minutes);

    let notices: Notifications = client
        .get(format!("{}/api/notifications", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let warnings = notices
        .notices
        .iter()
        .filter(|notice| notice.level == "warning")
        .count();
    assert!(warnings >= 3);
}

//! The focus timer: a [`Countdown`] driven by a one-second interval task,
//! plus the completion sequence that records the session and updates
//! today's stats.

use crate::audio::Chime;
use crate::errors::RecordError;
use crate::models::{DailyStats, TimerSnapshot};
use crate::notify::{Level, Notifier};
use crate::recorder::{SessionRecorder, SessionSubmission};
use crate::stats::{self, StatsStore};
use crate::timer::{Countdown, DurationMinutes, InvalidDuration, TickOutcome};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Ignored,
    Counting(u32),
    /// The countdown reached zero; the session still has to be recorded.
    Completed(SessionSubmission),
}

#[derive(Debug)]
pub enum Completion {
    /// `today` is `None` when the local stats could not be saved.
    Recorded {
        points: u64,
        today: Option<DailyStats>,
    },
    Failed(RecordError),
}

struct TimerState {
    countdown: Countdown,
    skill_id: Option<String>,
    notes: String,
    ticker: Option<JoinHandle<()>>,
    /// Bumped on every start; a ticker only drives the run it was spawned for.
    run: u64,
}

impl TimerState {
    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

struct Inner {
    state: Mutex<TimerState>,
    recorder: Arc<dyn SessionRecorder>,
    notifier: Arc<dyn Notifier>,
    stats: StatsStore,
    chime: Arc<dyn Chime>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.state.get_mut().stop_ticker();
    }
}

/// Handle to one page's focus timer. Clones share the same countdown; the
/// tick task stops once every handle is dropped.
#[derive(Clone)]
pub struct FocusTimer {
    inner: Arc<Inner>,
}

impl FocusTimer {
    pub fn new(
        duration: DurationMinutes,
        recorder: Arc<dyn SessionRecorder>,
        notifier: Arc<dyn Notifier>,
        stats: StatsStore,
        chime: Arc<dyn Chime>,
    ) -> Self {
        let state = TimerState {
            countdown: Countdown::new(duration),
            skill_id: None,
            notes: String::new(),
            ticker: None,
            run: 0,
        };
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                recorder,
                notifier,
                stats,
                chime,
            }),
        }
    }

    /// Starts or resumes the countdown. Returns false if it was already
    /// running.
    pub async fn start(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        if !state.countdown.start() {
            return false;
        }
        state.stop_ticker();
        state.run += 1;
        state.ticker = Some(tokio::spawn(run_ticker(Arc::downgrade(&self.inner), state.run)));
        info!(
            remaining = %state.countdown.display(),
            duration = %state.countdown.duration(),
            "focus timer started"
        );
        true
    }

    pub async fn pause(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        if !state.countdown.pause() {
            return false;
        }
        state.stop_ticker();
        info!(remaining = %state.countdown.display(), "focus timer paused");
        true
    }

    pub async fn reset(&self) {
        let mut state = self.inner.state.lock().await;
        state.stop_ticker();
        state.countdown.reset();
        debug!(remaining = %state.countdown.display(), "focus timer reset");
    }

    pub async fn set_duration(&self, duration: DurationMinutes) {
        let mut state = self.inner.state.lock().await;
        state.stop_ticker();
        state.countdown.set_duration(duration);
        info!(%duration, "focus duration changed");
    }

    /// Validates a picked duration before applying it. An unavailable length
    /// is reported to the user and leaves the timer untouched.
    pub async fn choose_duration(&self, minutes: u32) -> Result<DurationMinutes, InvalidDuration> {
        match DurationMinutes::try_from(minutes) {
            Ok(duration) => {
                self.set_duration(duration).await;
                Ok(duration)
            }
            Err(err) => {
                self.inner
                    .notifier
                    .notify("Please choose one of the available session lengths.", Level::Warning);
                Err(err)
            }
        }
    }

    /// Sets the skill and notes sent along with the next finished session.
    pub async fn select(&self, skill_id: Option<String>, notes: String) {
        let mut state = self.inner.state.lock().await;
        state.skill_id = skill_id.filter(|id| !id.trim().is_empty());
        state.notes = notes;
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        let state = self.inner.state.lock().await;
        let countdown = &state.countdown;
        TimerSnapshot {
            phase: countdown.phase(),
            duration_minutes: countdown.duration().get(),
            remaining_seconds: countdown.remaining_seconds(),
            display: countdown.display(),
            progress_percent: countdown.progress_percent(),
            skill_id: state.skill_id.clone(),
            notes: state.notes.clone(),
        }
    }

    /// One tick of the countdown. The interval task calls this every
    /// [`TICK_PERIOD`] while the timer runs.
    pub async fn tick(&self) -> Tick {
        self.advance(None).await
    }

    async fn advance(&self, run: Option<u64>) -> Tick {
        let mut state = self.inner.state.lock().await;
        if run.is_some_and(|run| run != state.run) {
            return Tick::Ignored;
        }
        match state.countdown.tick() {
            TickOutcome::Ignored => Tick::Ignored,
            TickOutcome::Counting(remaining) => {
                trace!(
                    display = %state.countdown.display(),
                    progress = state.countdown.progress_percent(),
                    "tick"
                );
                Tick::Counting(remaining)
            }
            TickOutcome::Completed => {
                // Detached, not aborted: the caller may be the ticker itself.
                state.ticker = None;
                info!(duration = %state.countdown.duration(), "focus session finished");
                Tick::Completed(SessionSubmission {
                    duration_minutes: state.countdown.duration().get(),
                    skill_id: state.skill_id.clone(),
                    notes: state.notes.clone(),
                })
            }
        }
    }

    /// Plays the chime, records the session and, when the tracker accepts
    /// it, adds it to today's stats. The timer goes back to idle afterwards
    /// unless a new run was started in the meantime.
    pub async fn complete(&self, session: SessionSubmission) -> Completion {
        if let Err(err) = self.inner.chime.play() {
            debug!("completion chime failed: {err}");
        }

        let completion = match self.inner.recorder.record(&session).await {
            Ok(points) => {
                self.inner
                    .notifier
                    .notify(&format!("Session completed! +{points} XP"), Level::Success);
                let today = match self
                    .inner
                    .stats
                    .record_session(stats::today(), session.duration_minutes)
                    .await
                {
                    Ok(today) => {
                        info!(
                            sessions = today.sessions,
                            focus_time = today.focus_time,
                            xp = today.xp,
                            "daily stats updated"
                        );
                        Some(today)
                    }
                    Err(err) => {
                        error!("failed to save daily stats: {err}");
                        None
                    }
                };
                Completion::Recorded { points, today }
            }
            Err(err) => {
                warn!("failed to record session: {err}");
                self.inner.notifier.notify("Error saving session", Level::Error);
                Completion::Failed(err)
            }
        };

        let mut state = self.inner.state.lock().await;
        if !state.countdown.finish() {
            debug!("new run started before the last session was recorded");
        }
        completion
    }
}

async fn run_ticker(inner: Weak<Inner>, run: u64) {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let Some(inner) = inner.upgrade() else {
            break;
        };
        let timer = FocusTimer { inner };
        match timer.advance(Some(run)).await {
            Tick::Counting(_) => {}
            Tick::Ignored => break,
            Tick::Completed(session) => {
                tokio::spawn(async move {
                    timer.complete(session).await;
                });
                break;
            }
        }
    }
}

//! Countdown state for a single focus session.
//!
//! `Countdown` is plain data with no clock attached; `crate::focus` drives it
//! from a one-second interval.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session lengths offered by the duration picker, in minutes.
pub const ALLOWED_DURATIONS: [u32; 5] = [15, 25, 30, 45, 60];

pub const DEFAULT_DURATION: u32 = 25;

/// A session length taken from [`ALLOWED_DURATIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DurationMinutes(u32);

impl DurationMinutes {
    pub fn get(self) -> u32 {
        self.0
    }

    pub fn total_seconds(self) -> u32 {
        self.0 * 60
    }
}

impl Default for DurationMinutes {
    fn default() -> Self {
        Self(DEFAULT_DURATION)
    }
}

impl TryFrom<u32> for DurationMinutes {
    type Error = InvalidDuration;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        if ALLOWED_DURATIONS.contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(InvalidDuration(minutes))
        }
    }
}

impl fmt::Display for DurationMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} minutes is not an available session length")]
pub struct InvalidDuration(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    /// Reached zero; the completion sequence has not finished yet.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was not running.
    Ignored,
    Counting(u32),
    /// This tick took the countdown from 1 to 0.
    Completed,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    duration: DurationMinutes,
    remaining_seconds: u32,
    phase: Phase,
}

impl Countdown {
    pub fn new(duration: DurationMinutes) -> Self {
        Self {
            duration,
            remaining_seconds: duration.total_seconds(),
            phase: Phase::Idle,
        }
    }

    /// Returns false when the countdown was already running.
    ///
    /// Starting from `Completed` begins a fresh full-length run.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::Running => false,
            Phase::Completed => {
                self.remaining_seconds = self.duration.total_seconds();
                self.phase = Phase::Running;
                true
            }
            Phase::Idle | Phase::Paused => {
                self.phase = Phase::Running;
                true
            }
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.remaining_seconds = self.duration.total_seconds();
        self.phase = Phase::Idle;
    }

    pub fn set_duration(&mut self, duration: DurationMinutes) {
        self.duration = duration;
        self.reset();
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = Phase::Completed;
            TickOutcome::Completed
        } else {
            TickOutcome::Counting(self.remaining_seconds)
        }
    }

    /// Moves a completed countdown back to `Idle` at full length.
    ///
    /// Returns false (and changes nothing) if a new run was started after
    /// the countdown completed.
    pub fn finish(&mut self) -> bool {
        if self.phase == Phase::Completed {
            self.reset();
            true
        } else {
            false
        }
    }

    pub fn duration(&self) -> DurationMinutes {
        self.duration
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.duration.total_seconds() - self.remaining_seconds
    }

    pub fn progress_fraction(&self) -> f64 {
        f64::from(self.elapsed_seconds()) / f64::from(self.duration.total_seconds())
    }

    /// Width of the progress bar, in percent.
    pub fn progress_percent(&self) -> f64 {
        self.progress_fraction() * 100.0
    }

    pub fn display(&self) -> String {
        format_mmss(self.remaining_seconds)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DurationMinutes::default())
    }
}

pub fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

//! Countdown state and the scheduled one-second tick.
//!
//! `Countdown` is the pure state machine; `TimerHandle` is the cancellable
//! tokio task that drives it. The engine owns both, so every path that ends
//! or restarts a session tears the ticker down deterministically.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

//
// ─── COUNTDOWN ─────────────────────────────────────────────────────────────────
//

/// Countdown phases: idle until armed, armed while ticking, expired exactly
/// once when the remaining time hits zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Countdown {
    #[default]
    Idle,
    Armed {
        remaining_secs: u32,
    },
    Expired,
}

/// Result of applying one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing armed; the tick was ignored.
    Noop,
    Running {
        remaining_secs: u32,
    },
    /// The countdown just reached zero. Reported exactly once.
    Expired,
}

impl Countdown {
    pub fn arm(&mut self, duration_secs: u32) {
        *self = Self::Armed {
            remaining_secs: duration_secs,
        };
    }

    pub fn disarm(&mut self) {
        *self = Self::Idle;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed { .. })
    }

    /// Seconds left, `Some(0)` once expired, `None` while idle.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        match self {
            Self::Armed { remaining_secs } => Some(*remaining_secs),
            Self::Expired => Some(0),
            Self::Idle => None,
        }
    }

    /// Remove one second. Ticks against an idle or already-expired countdown
    /// are no-ops.
    pub fn tick(&mut self) -> TickOutcome {
        match *self {
            Self::Idle | Self::Expired => TickOutcome::Noop,
            Self::Armed { remaining_secs } => {
                let remaining = remaining_secs.saturating_sub(1);
                if remaining == 0 {
                    *self = Self::Expired;
                    TickOutcome::Expired
                } else {
                    *self = Self::Armed {
                        remaining_secs: remaining,
                    };
                    TickOutcome::Running {
                        remaining_secs: remaining,
                    }
                }
            }
        }
    }
}

//
// ─── TICK TASK ─────────────────────────────────────────────────────────────────
//

/// Whether the ticker should keep running after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Cancellation handle for the scheduled tick task.
///
/// Dropping the handle aborts the task, so a stale ticker can never outlive
/// the engine state that spawned it.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Spawn a task invoking `on_tick` once per second until it asks to stop.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn<F>(mut on_tick: F) -> Self
    where
        F: FnMut() -> TickControl + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately; skip it so the
            // first callback lands a full second after arming.
            interval.tick().await;
            loop {
                interval.tick().await;
                if on_tick() == TickControl::Stop {
                    break;
                }
            }
        });
        Self { task }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn countdown_expires_exactly_once() {
        let mut countdown = Countdown::default();
        countdown.arm(60);

        let mut expirations = 0;
        for _ in 0..65 {
            if countdown.tick() == TickOutcome::Expired {
                expirations += 1;
            }
        }

        assert_eq!(expirations, 1);
        assert_eq!(countdown, Countdown::Expired);
        assert_eq!(countdown.remaining_secs(), Some(0));
    }

    #[test]
    fn idle_countdown_ignores_ticks() {
        let mut countdown = Countdown::default();
        assert_eq!(countdown.tick(), TickOutcome::Noop);
        assert_eq!(countdown.remaining_secs(), None);
    }

    #[test]
    fn disarm_stops_an_armed_countdown() {
        let mut countdown = Countdown::default();
        countdown.arm(120);
        assert_eq!(
            countdown.tick(),
            TickOutcome::Running { remaining_secs: 119 }
        );

        countdown.disarm();
        assert_eq!(countdown.tick(), TickOutcome::Noop);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_fires_once_per_second_until_stopped() {
        let ticks = Arc::new(Mutex::new(0_u32));
        let seen = Arc::clone(&ticks);
        let handle = TimerHandle::spawn(move || {
            let mut count = seen.lock().unwrap();
            *count += 1;
            if *count >= 3 {
                TickControl::Stop
            } else {
                TickControl::Continue
            }
        });

        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(1)).await;
            tokio::task::yield_now().await;
        }

        assert_eq!(*ticks.lock().unwrap(), 3);
        drop(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_ticker_stops_firing() {
        let ticks = Arc::new(Mutex::new(0_u32));
        let seen = Arc::clone(&ticks);
        let handle = TimerHandle::spawn(move || {
            *seen.lock().unwrap() += 1;
            TickControl::Continue
        });
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        let before = *ticks.lock().unwrap();

        handle.cancel();
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;

        assert_eq!(*ticks.lock().unwrap(), before);
    }
}

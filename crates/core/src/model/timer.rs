use thiserror::Error;

/// Shortest configurable countdown, one minute.
pub const MIN_TIMER_SECS: u32 = 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimerSettingsError {
    #[error("timer duration must be at least {MIN_TIMER_SECS} seconds, got {0}")]
    DurationTooShort(u32),
}

/// Countdown configuration, read once at session start.
///
/// Changing either field while a countdown is armed never alters the in-flight
/// session; the new values apply from the next start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    enabled: bool,
    duration_secs: u32,
}

impl TimerSettings {
    /// Creates timer settings with an explicit duration.
    ///
    /// # Errors
    ///
    /// Returns `TimerSettingsError::DurationTooShort` below one minute.
    pub fn new(enabled: bool, duration_secs: u32) -> Result<Self, TimerSettingsError> {
        if duration_secs < MIN_TIMER_SECS {
            return Err(TimerSettingsError::DurationTooShort(duration_secs));
        }
        Ok(Self {
            enabled,
            duration_secs,
        })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Reconfigure the countdown length in seconds.
    ///
    /// # Errors
    ///
    /// Returns `TimerSettingsError::DurationTooShort` below one minute.
    pub fn set_duration_secs(&mut self, duration_secs: u32) -> Result<(), TimerSettingsError> {
        if duration_secs < MIN_TIMER_SECS {
            return Err(TimerSettingsError::DurationTooShort(duration_secs));
        }
        self.duration_secs = duration_secs;
        Ok(())
    }

    /// Reconfigure the countdown length in whole minutes (minimum 1).
    ///
    /// # Errors
    ///
    /// Returns `TimerSettingsError::DurationTooShort` for zero minutes.
    pub fn set_duration_mins(&mut self, minutes: u32) -> Result<(), TimerSettingsError> {
        self.set_duration_secs(minutes.saturating_mul(60))
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            duration_secs: 5 * 60,
        }
    }
}

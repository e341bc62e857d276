#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod sessions;
pub mod timer;

pub use quiz_core::Clock;

pub use engine::{EngineEvent, EngineHandle};
pub use error::EngineError;
pub use sessions::{
    HighScores, QuestionOutcome, ScoreSummary, SessionProgress, SessionService, format_remaining,
};
pub use timer::{Countdown, TickControl, TickOutcome, TimerHandle};

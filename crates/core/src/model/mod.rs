mod bank;
mod ids;
mod question;
mod timer;

pub use ids::QuestionId;

pub use bank::{BankError, QuestionBank};
pub use question::{
    Answer, Choice, ChoiceKey, Question, QuestionDraft, QuestionType, QuestionValidationError,
    ValidatedQuestion,
};
pub use timer::{MIN_TIMER_SECS, TimerSettings, TimerSettingsError};

mod high_score;
mod service;
mod view;

pub use high_score::HighScores;
pub use service::SessionService;
pub use view::{QuestionOutcome, ScoreSummary, SessionProgress, format_remaining};

//! Answer evaluation.
//!
//! Pure functions comparing submitted answers against a question's canonical
//! answer. Multi-select is scored all-or-nothing under set equality; every
//! other type compares the single key exactly (case-sensitive).

use std::collections::BTreeMap;

use crate::model::{Answer, Question, QuestionId};

/// Submitted answers keyed by question id. Absence means "unanswered".
pub type AnswerMap = BTreeMap<QuestionId, Answer>;

/// Returns true if the submission matches the canonical answer.
///
/// An absent or shape-mismatched submission is simply incorrect, never an
/// error.
#[must_use]
pub fn is_correct(question: &Question, submitted: Option<&Answer>) -> bool {
    let Some(submitted) = submitted else {
        return false;
    };
    match (question.answer(), submitted) {
        (Answer::Multiple(canonical), Answer::Multiple(picked)) => canonical == picked,
        (Answer::Single(canonical), Answer::Single(picked)) => canonical == picked,
        _ => false,
    }
}

/// Number of correct answers over the questions in order, in `[0, len]`.
#[must_use]
pub fn score(questions: &[Question], answers: &AnswerMap) -> u32 {
    let correct = questions
        .iter()
        .filter(|question| is_correct(question, answers.get(&question.id())))
        .count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}

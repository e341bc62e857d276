use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

use quiz_core::model::{Answer, ChoiceKey, Question, QuestionId};
use quiz_core::scoring::{self, AnswerMap};

use super::view::{QuestionOutcome, SessionProgress};

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run-through of the question bank.
///
/// Holds a snapshot of the bank taken at start, so concurrent bank edits
/// never change what the session is scored against. Navigation self-clamps,
/// `finish` is idempotent, and answers freeze once the session completes
/// (read-only review mode).
pub struct SessionService {
    questions: Vec<Question>,
    current: usize,
    answers: AnswerMap,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    score: Option<u32>,
}

impl SessionService {
    /// Start a session over the given snapshot.
    ///
    /// An empty snapshot degrades to an instantly completed session scoring
    /// 0/0; there is no error path here.
    #[must_use]
    pub fn start(questions: Vec<Question>, started_at: DateTime<Utc>) -> Self {
        let mut session = Self {
            questions,
            current: 0,
            answers: AnswerMap::new(),
            started_at,
            completed_at: None,
            score: None,
        };
        if session.questions.is_empty() {
            session.finish(started_at);
        }
        session
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Number of questions with a recorded answer, full or partial.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn answer_for(&self, id: QuestionId) -> Option<&Answer> {
        self.answers.get(&id)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Final score, present once the session completed.
    #[must_use]
    pub fn score(&self) -> Option<u32> {
        self.score
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            current: self.current,
            total: self.total_questions(),
            answered: self.answered_count(),
            is_complete: self.is_complete(),
        }
    }

    /// Record a choice for the given question.
    ///
    /// Multi-select questions toggle membership of the key in the stored set
    /// (the toggle is its own inverse); the other types replace the stored
    /// answer. Returns false without touching anything when the session is
    /// already complete, the question is not part of the snapshot, or the key
    /// does not belong to the question.
    pub fn select_choice(&mut self, question_id: QuestionId, key: ChoiceKey) -> bool {
        if self.is_complete() {
            return false;
        }
        let Some(question) = self
            .questions
            .iter()
            .find(|question| question.id() == question_id)
        else {
            return false;
        };
        if question.choice(&key).is_none() {
            return false;
        }

        if question.kind().is_multi_select() {
            // Multi-select answers are only ever stored as sets.
            if let Answer::Multiple(selected) = self
                .answers
                .entry(question_id)
                .or_insert_with(|| Answer::Multiple(BTreeSet::new()))
            {
                if !selected.remove(&key) {
                    selected.insert(key);
                }
            }
        } else {
            self.answers.insert(question_id, Answer::Single(key));
        }
        true
    }

    /// Advance to the next question, or finish when already on the last one.
    ///
    /// Returns the final score when this call completed the session. Never
    /// out-of-range: the finish fallback is the clamp.
    pub fn next(&mut self, at: DateTime<Utc>) -> Option<u32> {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            None
        } else {
            Some(self.finish(at))
        }
    }

    /// Step back one question; no-op at the first one.
    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Complete the session and compute the final score.
    ///
    /// Idempotent: repeated calls return the stored score and leave the
    /// completion timestamp untouched.
    pub fn finish(&mut self, at: DateTime<Utc>) -> u32 {
        if let Some(score) = self.score {
            return score;
        }
        let score = scoring::score(&self.questions, &self.answers);
        self.score = Some(score);
        self.completed_at = Some(at);
        score
    }

    /// Per-question correctness in snapshot order.
    ///
    /// Computable while in progress (for answered counts), but correctness
    /// flags are only meant to be shown once the session completed.
    #[must_use]
    pub fn breakdown(&self) -> Vec<QuestionOutcome> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionOutcome {
                ordinal: index + 1,
                question_id: question.id(),
                correct: scoring::is_correct(question, self.answers.get(&question.id())),
            })
            .collect()
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised while validating a question draft.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionValidationError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question needs at least one non-empty choice")]
    NoValidChoices,

    #[error("answer does not reference any surviving choice")]
    NoValidAnswer,
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Interaction mode of a question.
///
/// Determines the shape of the canonical answer: a single choice key for
/// `SingleChoice` and `TrueFalse`, a key set for `MultiSelect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    SingleChoice,
    TrueFalse,
    MultiSelect,
}

impl QuestionType {
    #[must_use]
    pub fn is_multi_select(self) -> bool {
        matches!(self, Self::MultiSelect)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestionType::SingleChoice => "single-choice",
            QuestionType::TrueFalse => "true-false",
            QuestionType::MultiSelect => "multi-select",
        };
        write!(f, "{label}")
    }
}

/// Short key identifying a choice within a question (e.g. `"A"`, `"B"`).
///
/// Comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceKey(String);

impl ChoiceKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChoiceKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// One selectable choice. Insertion order defines display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub key: ChoiceKey,
    pub text: String,
}

impl Choice {
    #[must_use]
    pub fn new(key: impl Into<ChoiceKey>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// Canonical or submitted answer value.
///
/// The same shape serves both sides of evaluation: the bank stores the
/// canonical value, the session stores what the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Single(ChoiceKey),
    Multiple(BTreeSet<ChoiceKey>),
}

impl Answer {
    #[must_use]
    pub fn single(key: impl Into<ChoiceKey>) -> Self {
        Self::Single(key.into())
    }

    #[must_use]
    pub fn multiple<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ChoiceKey>,
    {
        Self::Multiple(keys.into_iter().map(Into::into).collect())
    }

    /// Returns true if the given key is part of this answer.
    #[must_use]
    pub fn contains(&self, key: &ChoiceKey) -> bool {
        match self {
            Answer::Single(selected) => selected == key,
            Answer::Multiple(selected) => selected.contains(key),
        }
    }
}

//
// ─── DRAFT → VALIDATED → QUESTION ──────────────────────────────────────────────
//

/// Editor-facing question draft, validated before it may enter the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub kind: QuestionType,
    pub prompt: String,
    pub choices: Vec<Choice>,
    pub answer: Answer,
}

impl QuestionDraft {
    /// Validate and normalize the draft.
    ///
    /// Choice text is trimmed; blank choices and duplicate keys are dropped
    /// (first occurrence wins). A multi-select answer set is filtered down to
    /// keys that survived normalization; stale references are stripped, not
    /// rejected, unless nothing survives at all.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPrompt` if the prompt is blank after trimming,
    /// `NoValidChoices` if no non-empty choice remains, and `NoValidAnswer`
    /// if the canonical answer no longer references any surviving choice.
    pub fn validate(self) -> Result<ValidatedQuestion, QuestionValidationError> {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionValidationError::EmptyPrompt);
        }

        let mut seen = BTreeSet::new();
        let mut choices = Vec::new();
        for choice in self.choices {
            let text = choice.text.trim().to_string();
            if text.is_empty() {
                continue;
            }
            if !seen.insert(choice.key.clone()) {
                continue;
            }
            choices.push(Choice {
                key: choice.key,
                text,
            });
        }
        if choices.is_empty() {
            return Err(QuestionValidationError::NoValidChoices);
        }

        let answer = if self.kind.is_multi_select() {
            let keys = match self.answer {
                Answer::Multiple(keys) => keys,
                Answer::Single(key) => BTreeSet::from([key]),
            };
            let kept: BTreeSet<ChoiceKey> =
                keys.into_iter().filter(|key| seen.contains(key)).collect();
            if kept.is_empty() {
                return Err(QuestionValidationError::NoValidAnswer);
            }
            Answer::Multiple(kept)
        } else {
            match self.answer {
                Answer::Single(key) if seen.contains(&key) => Answer::Single(key),
                _ => return Err(QuestionValidationError::NoValidAnswer),
            }
        };

        Ok(ValidatedQuestion {
            kind: self.kind,
            prompt,
            choices,
            answer,
        })
    }
}

/// A normalized question that passed validation but has no identity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    kind: QuestionType,
    prompt: String,
    choices: Vec<Choice>,
    answer: Answer,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            kind: self.kind,
            prompt: self.prompt,
            choices: self.choices,
            answer: self.answer,
        }
    }
}

/// A question as stored in the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    kind: QuestionType,
    prompt: String,
    choices: Vec<Choice>,
    answer: Answer,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    #[must_use]
    pub fn choice(&self, key: &ChoiceKey) -> Option<&Choice> {
        self.choices.iter().find(|choice| &choice.key == key)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

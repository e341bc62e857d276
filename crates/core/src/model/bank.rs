use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionDraft, QuestionValidationError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised by bank mutations. All of them leave the bank unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question {0} not found")]
    NotFound(QuestionId),

    #[error(transparent)]
    Validation(#[from] QuestionValidationError),
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// Ordered, editable collection of questions.
///
/// Ids are assigned from a watermark that only moves forward, so deleting the
/// highest-numbered question never causes its id to be handed out again
/// within the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
    next_id: u64,
}

impl QuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bank from drafts supplied by the embedding application,
    /// assigning sequential ids in order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Validation` for the first draft that fails
    /// normalization.
    pub fn seed<I>(drafts: I) -> Result<Self, BankError>
    where
        I: IntoIterator<Item = QuestionDraft>,
    {
        let mut bank = Self::new();
        for draft in drafts {
            bank.create(draft)?;
        }
        Ok(bank)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id() == id)
    }

    fn next_id(&self) -> QuestionId {
        let max_existing = self
            .questions
            .iter()
            .map(|question| question.id().value())
            .max()
            .unwrap_or(0);
        QuestionId::new(max_existing.max(self.next_id) + 1)
    }

    /// Validate a draft and append it to the end of the bank.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Validation` if the draft fails normalization.
    pub fn create(&mut self, draft: QuestionDraft) -> Result<QuestionId, BankError> {
        let validated = draft.validate()?;
        let id = self.next_id();
        self.next_id = id.value();
        self.questions.push(validated.assign_id(id));
        Ok(id)
    }

    /// Validate a draft and replace the existing question in place,
    /// preserving its id and ordinal position.
    ///
    /// # Errors
    ///
    /// Returns `BankError::NotFound` if `id` does not exist and
    /// `BankError::Validation` if the draft fails normalization.
    pub fn update(&mut self, id: QuestionId, draft: QuestionDraft) -> Result<(), BankError> {
        let position = self
            .questions
            .iter()
            .position(|question| question.id() == id)
            .ok_or(BankError::NotFound(id))?;
        let validated = draft.validate()?;
        self.questions[position] = validated.assign_id(id);
        Ok(())
    }

    /// Remove a question, keeping the order of the remaining entries.
    ///
    /// # Errors
    ///
    /// Returns `BankError::NotFound` if `id` does not exist.
    pub fn delete(&mut self, id: QuestionId) -> Result<Question, BankError> {
        let position = self
            .questions
            .iter()
            .position(|question| question.id() == id)
            .ok_or(BankError::NotFound(id))?;
        Ok(self.questions.remove(position))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

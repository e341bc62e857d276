//! JSON question-bank files supplied by the user.
//!
//! The engine itself defines no file format; this is binary glue turning a
//! JSON document into the drafts `QuestionBank::seed` expects. Records that
//! fail validation are reported by the bank, not here.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use quiz_core::model::{Answer, Choice, QuestionDraft, QuestionType};

const SAMPLE: &str = include_str!("sample_bank.json");

#[derive(Debug)]
pub enum BankFileError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for BankFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankFileError::Io(err) => write!(f, "failed to read bank file: {err}"),
            BankFileError::Json(err) => write!(f, "failed to parse bank file: {err}"),
        }
    }
}

impl std::error::Error for BankFileError {}

impl From<std::io::Error> for BankFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for BankFileError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Debug, Deserialize)]
struct BankFile {
    questions: Vec<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
struct QuestionRecord {
    #[serde(rename = "type")]
    kind: QuestionType,
    prompt: String,
    choices: Vec<ChoiceRecord>,
    answer: AnswerRecord,
}

#[derive(Debug, Deserialize)]
struct ChoiceRecord {
    key: String,
    text: String,
}

/// A single key for single-choice and true-false questions, a key array for
/// multi-select.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswerRecord {
    One(String),
    Many(Vec<String>),
}

impl QuestionRecord {
    fn into_draft(self) -> QuestionDraft {
        let answer = match self.answer {
            AnswerRecord::One(key) => Answer::single(key.as_str()),
            AnswerRecord::Many(keys) => Answer::multiple(keys.iter().map(String::as_str)),
        };
        QuestionDraft {
            kind: self.kind,
            prompt: self.prompt,
            choices: self
                .choices
                .into_iter()
                .map(|choice| Choice::new(choice.key.as_str(), choice.text))
                .collect(),
            answer,
        }
    }
}

fn parse(raw: &str) -> Result<Vec<QuestionDraft>, BankFileError> {
    let file: BankFile = serde_json::from_str(raw)?;
    Ok(file
        .questions
        .into_iter()
        .map(QuestionRecord::into_draft)
        .collect())
}

/// Load question drafts from a JSON bank file.
///
/// # Errors
///
/// Returns `BankFileError` when the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<QuestionDraft>, BankFileError> {
    let raw = std::fs::read_to_string(path)?;
    parse(&raw)
}

/// The embedded sample bank used when no file is given.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed, which would be a build defect.
#[must_use]
pub fn sample() -> Vec<QuestionDraft> {
    parse(SAMPLE).expect("embedded sample bank should be valid")
}

// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of options every multiple-choice question carries.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question as handed to a quiz session.
///
/// Preconditions (not re-checked by the session): `options` holds exactly
/// [`OPTION_COUNT`] entries and `correct_answer_index` is a valid index into it.
/// Inputs coming over HTTP are checked by [`QuestionInput`] first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

impl Question {
    pub fn new(question: impl Into<String>, options: [&str; OPTION_COUNT], correct_answer_index: usize) -> Self {
        Self {
            question: question.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer_index,
        }
    }

    /// Text of the correct option, if the index points at one.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer_index).map(String::as_str)
    }
}

/// Question as shown to a student while the attempt is running (no answer key).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub question: String,
    pub options: Vec<String>,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            question: q.question.clone(),
            options: q.options.clone(),
        }
    }
}

/// DTO for one question of a quiz submitted by the hosting page.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_answer_index))]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 1000), custom(function = validate_not_blank))]
    pub question: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

impl From<QuestionInput> for Question {
    fn from(input: QuestionInput) -> Self {
        Self {
            question: input.question.trim().to_string(),
            options: input.options.iter().map(|o| o.trim().to_string()).collect(),
            correct_answer_index: input.correct_answer_index,
        }
    }
}

/// Rejects text that is empty once surrounding whitespace is removed.
pub(crate) fn validate_not_blank(text: &str) -> Result<(), validator::ValidationError> {
    if text.trim().is_empty() {
        return Err(validator::ValidationError::new("cannot_be_blank"));
    }
    Ok(())
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() != OPTION_COUNT {
        return Err(validator::ValidationError::new("options_must_have_four_entries"));
    }
    for opt in options {
        validate_not_blank(opt)?;
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

fn validate_answer_index(input: &QuestionInput) -> Result<(), validator::ValidationError> {
    if input.correct_answer_index >= OPTION_COUNT {
        return Err(validator::ValidationError::new("correct_answer_index_out_of_range"));
    }
    Ok(())
}

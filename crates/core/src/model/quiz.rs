use serde::Serialize;
use thiserror::Error;

/// Fixed prompt shown above every sample-code question.
pub const SAMPLE_CODE_PROMPT: &str = "What output do you get when you input the following code?";

/// Number of answer choices in a complete question.
pub const CHOICES_PER_QUESTION: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizItemError {
    #[error("sample code cannot be empty")]
    EmptySampleCode,

    #[error("output cannot be empty")]
    EmptyOutput,
}

/// The quiz-relevant slice of a function: sample code and its output.
///
/// Both fields are guaranteed non-blank, so every `QuizItem` is eligible to
/// be asked and to serve as a distractor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QuizItem {
    sample_code: String,
    output: String,
}

impl QuizItem {
    /// Create a quiz item.
    ///
    /// # Errors
    ///
    /// Returns `QuizItemError` if either field is blank.
    pub fn new(
        sample_code: impl Into<String>,
        output: impl Into<String>,
    ) -> Result<Self, QuizItemError> {
        let sample_code = sample_code.into();
        let output = output.into();
        if sample_code.trim().is_empty() {
            return Err(QuizItemError::EmptySampleCode);
        }
        if output.trim().is_empty() {
            return Err(QuizItemError::EmptyOutput);
        }
        Ok(Self {
            sample_code,
            output,
        })
    }

    #[must_use]
    pub fn sample_code(&self) -> &str {
        &self.sample_code
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }
}

/// A multiple-choice question about the output of a code sample.
///
/// Built fresh for every request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    prompt_text: &'static str,
    sample_code: String,
    correct_answer: String,
    answer_choices: Vec<String>,
}

impl Question {
    /// Assemble a question. The caller guarantees `answer_choices` holds
    /// `correct_answer` exactly once.
    pub(crate) fn new(
        sample_code: String,
        correct_answer: String,
        answer_choices: Vec<String>,
    ) -> Self {
        debug_assert_eq!(
            answer_choices
                .iter()
                .filter(|c| **c == correct_answer)
                .count(),
            1
        );
        Self {
            prompt_text: SAMPLE_CODE_PROMPT,
            sample_code,
            correct_answer,
            answer_choices,
        }
    }

    #[must_use]
    pub fn prompt_text(&self) -> &str {
        self.prompt_text
    }

    #[must_use]
    pub fn sample_code(&self) -> &str {
        &self.sample_code
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn answer_choices(&self) -> &[String] {
        &self.answer_choices
    }

    /// Returns the choice at `index`, if any.
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&str> {
        self.answer_choices.get(index).map(String::as_str)
    }

    /// Position of the correct answer within `answer_choices`.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.answer_choices
            .iter()
            .position(|c| *c == self.correct_answer)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_item_rejects_blank_fields() {
        assert_eq!(QuizItem::new("", "1"), Err(QuizItemError::EmptySampleCode));
        assert_eq!(QuizItem::new("a", " \n"), Err(QuizItemError::EmptyOutput));
    }

    #[test]
    fn question_reports_correct_choice() {
        let question = Question::new(
            "print(2)".into(),
            "2".into(),
            vec!["1".into(), "2".into(), "3".into(), "4".into()],
        );
        assert_eq!(question.prompt_text(), SAMPLE_CODE_PROMPT);
        assert_eq!(question.correct_index(), 1);
        assert_eq!(question.choice(1), Some("2"));
        assert_eq!(question.choice(4), None);
        assert!(question.is_correct("2"));
        assert!(!question.is_correct("3"));
    }
}

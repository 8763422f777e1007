use std::collections::HashSet;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use thiserror::Error;

use crate::model::{CHOICES_PER_QUESTION, Question, QuizItem};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("no quiz items available")]
    EmptyPool,

    #[error("need {required} distinct outputs to build a question, found {available}")]
    InsufficientChoices { available: usize, required: usize },
}

//
// ─── GENERATOR ─────────────────────────────────────────────────────────────────
//

/// Build a multiple-choice question from a pool of quiz items.
///
/// One item is picked uniformly as the target. Its output is the correct
/// answer, and three more distinct outputs are drawn from the rest of the
/// pool as distractors. The finished choices are shuffled uniformly.
///
/// Distractors are drawn uniformly from the items whose output is not yet
/// among the choices, so an output shared by many items is proportionally
/// more likely to appear. This is the same distribution as repeatedly
/// drawing from the whole pool and discarding repeats, but it needs at most
/// three draws.
///
/// # Errors
///
/// * `QuestionError::EmptyPool` if `items` is empty.
/// * `QuestionError::InsufficientChoices` if the pool has fewer than
///   `CHOICES_PER_QUESTION` distinct outputs. No partial question is built.
///
/// # Examples
///
/// ```
/// # use quiz_core::generator::generate_question;
/// # use quiz_core::model::QuizItem;
/// let pool = vec![
///     QuizItem::new("len([1, 2])", "2")?,
///     QuizItem::new("1 + 2", "3")?,
///     QuizItem::new("'ab' * 2", "abab")?,
///     QuizItem::new("max(4, 1)", "4")?,
/// ];
/// let question = generate_question(&pool, &mut rand::rng())?;
/// assert_eq!(question.answer_choices().len(), 4);
/// assert!(question.answer_choices().iter().any(|c| c == question.correct_answer()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn generate_question<R: Rng + ?Sized>(
    items: &[QuizItem],
    rng: &mut R,
) -> Result<Question, QuestionError> {
    if items.is_empty() {
        return Err(QuestionError::EmptyPool);
    }

    let available = distinct_outputs(items);
    if available < CHOICES_PER_QUESTION {
        return Err(QuestionError::InsufficientChoices {
            available,
            required: CHOICES_PER_QUESTION,
        });
    }

    let target = items.choose(rng).ok_or(QuestionError::EmptyPool)?;

    let mut choices = Vec::with_capacity(CHOICES_PER_QUESTION);
    choices.push(target.output().to_owned());

    let mut candidates: Vec<&QuizItem> = items
        .iter()
        .filter(|item| item.output() != target.output())
        .collect();

    while choices.len() < CHOICES_PER_QUESTION {
        let Some(pick) = candidates.choose(rng).copied() else {
            return Err(QuestionError::InsufficientChoices {
                available: choices.len(),
                required: CHOICES_PER_QUESTION,
            });
        };
        choices.push(pick.output().to_owned());
        candidates.retain(|item| item.output() != pick.output());
    }

    choices.shuffle(rng);

    Ok(Question::new(
        target.sample_code().to_owned(),
        target.output().to_owned(),
        choices,
    ))
}

/// Number of distinct outputs in the pool.
#[must_use]
pub fn distinct_outputs(items: &[QuizItem]) -> usize {
    items
        .iter()
        .map(QuizItem::output)
        .collect::<HashSet<_>>()
        .len()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

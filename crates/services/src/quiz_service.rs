use std::sync::Arc;

use quiz_core::generate_question;
use quiz_core::model::{Level, Question, UserId};
use rand::Rng;
use serde::Serialize;
use storage::repository::{FunctionRepository, LevelRepository, UserRepository};

use crate::error::QuizServiceError;

/// Points awarded for each correctly answered question.
pub const POINTS_PER_CORRECT_ANSWER: u32 = 1;

/// Result of answering a question on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub level: Level,
    pub leveled_up: bool,
}

/// Asks sample-code questions and records answers against user progress.
#[derive(Clone)]
pub struct QuizService {
    users: Arc<dyn UserRepository>,
    levels: Arc<dyn LevelRepository>,
    functions: Arc<dyn FunctionRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        levels: Arc<dyn LevelRepository>,
        functions: Arc<dyn FunctionRepository>,
    ) -> Self {
        Self {
            users,
            levels,
            functions,
        }
    }

    /// Build a question from the current set of quiz-eligible functions.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Question` if there are no eligible functions
    /// or too few distinct outputs.
    /// Returns `QuizServiceError::Storage` if the functions cannot be loaded.
    pub async fn ask_question(&self) -> Result<Question, QuizServiceError> {
        let items = self.functions.eligible_quiz_items().await?;
        let question = generate_question(&items, &mut rand::rng())?;
        tracing::debug!(pool = items.len(), "generated question");
        Ok(question)
    }

    /// Same as [`QuizService::ask_question`] with a caller-supplied random source.
    ///
    /// # Errors
    ///
    /// See [`QuizService::ask_question`].
    pub async fn ask_question_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Question, QuizServiceError> {
        let items = self.functions.eligible_quiz_items().await?;
        Ok(generate_question(&items, rng)?)
    }

    /// Check the choice at `index` without touching any user's progress.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::InvalidChoice` if `index` is out of range.
    pub fn grade(question: &Question, index: usize) -> Result<bool, QuizServiceError> {
        let choice = question
            .choice(index)
            .ok_or(QuizServiceError::InvalidChoice {
                index,
                available: question.answer_choices().len(),
            })?;
        Ok(question.is_correct(choice))
    }

    /// Grade the choice at `index` and credit the user on a correct answer.
    ///
    /// Users without a progress row start from level 0.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::InvalidChoice` if `index` is out of range,
    /// `QuizServiceError::UnknownUser` if the user does not exist, and
    /// `QuizServiceError::Storage` if progress cannot be loaded or saved.
    pub async fn submit_answer(
        &self,
        user_id: UserId,
        question: &Question,
        index: usize,
    ) -> Result<AnswerOutcome, QuizServiceError> {
        let correct = Self::grade(question, index)?;

        let mut level = match self.levels.get_level(user_id).await? {
            Some(level) => level,
            None => {
                if self.users.get_user(user_id).await?.is_none() {
                    return Err(QuizServiceError::UnknownUser(user_id));
                }
                Level::new(user_id)
            }
        };

        let leveled_up = if correct {
            let changed = level.award_points(POINTS_PER_CORRECT_ANSWER);
            self.levels.upsert_level(&level).await?;
            changed
        } else {
            false
        };

        tracing::info!(
            user_id = %user_id,
            correct,
            points = level.points(),
            level = level.level(),
            "recorded answer"
        );

        Ok(AnswerOutcome {
            correct,
            correct_answer: question.correct_answer().to_owned(),
            level,
            leveled_up,
        })
    }
}

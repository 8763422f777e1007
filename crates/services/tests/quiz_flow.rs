use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::QuestionError;
use quiz_core::model::{Function, FunctionId, ModuleId, QuizItem};
use services::{AppServices, FunctionDraft, QuizService, QuizServiceError, Registration};
use storage::repository::{
    FunctionRepository, InMemoryRepository, NewFunctionRecord, Storage, StorageError,
};

fn registration() -> Registration {
    Registration {
        username: "user".into(),
        password: "pw".into(),
        first_name: "testf".into(),
        last_name: "testl".into(),
        email: "test@gmail.com".into(),
    }
}

#[tokio::test]
async fn learner_answers_until_level_up() {
    let app = AppServices::from_storage(&Storage::in_memory());
    let user_id = app.users().register(registration()).await.unwrap();

    let module_id = app
        .catalog()
        .create_module(user_id, "testmod".into(), "moddesc".into(), None)
        .await
        .unwrap();
    for i in 1..=4 {
        app.catalog()
            .add_function(
                user_id,
                FunctionDraft {
                    module_id,
                    name: format!("func{i}"),
                    description: "funcdesc".into(),
                    additional_info: None,
                    sample_code: Some(format!("code{i}")),
                    output: Some(format!("output{i}")),
                },
            )
            .await
            .unwrap();
    }

    let quiz = app.quiz();
    let mut leveled_up = false;
    for _ in 0..5 {
        let question = quiz.ask_question().await.unwrap();
        let choices: HashSet<_> = question.answer_choices().iter().cloned().collect();
        let expected: HashSet<_> = (1..=4).map(|i| format!("output{i}")).collect();
        assert_eq!(choices, expected);

        let outcome = quiz
            .submit_answer(user_id, &question, question.correct_index())
            .await
            .unwrap();
        assert!(outcome.correct);
        leveled_up |= outcome.leveled_up;
    }

    let progress = app.users().progress(user_id).await.unwrap();
    assert_eq!(progress.points(), 5);
    assert_eq!(progress.level(), 1);
    assert!(leveled_up);
}

#[tokio::test]
async fn functions_without_output_never_reach_the_quiz() {
    let app = AppServices::from_storage(&Storage::in_memory());
    let user_id = app.users().register(registration()).await.unwrap();
    app.catalog()
        .create_module(user_id, "testmod".into(), "moddesc".into(), None)
        .await
        .unwrap();

    for i in 1..=6 {
        let output = (i <= 3).then(|| format!("output{i}"));
        app.catalog()
            .add_function(
                user_id,
                FunctionDraft {
                    name: format!("func{i}"),
                    description: "funcdesc".into(),
                    sample_code: Some(format!("code{i}")),
                    output,
                    ..FunctionDraft::default()
                },
            )
            .await
            .unwrap();
    }

    let err = app.quiz().ask_question().await.unwrap_err();
    assert!(matches!(
        err,
        QuizServiceError::Question(QuestionError::InsufficientChoices {
            available: 3,
            required: 4
        })
    ));
}

struct UnavailableFunctions;

#[async_trait]
impl FunctionRepository for UnavailableFunctions {
    async fn insert_new_function(
        &self,
        _function: NewFunctionRecord,
    ) -> Result<FunctionId, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn get_function(&self, _id: FunctionId) -> Result<Option<Function>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn functions_in_module(
        &self,
        _module_id: ModuleId,
    ) -> Result<Vec<Function>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn eligible_quiz_items(&self) -> Result<Vec<QuizItem>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test]
async fn storage_failure_surfaces_to_caller() {
    let repo = InMemoryRepository::new();
    let quiz = QuizService::new(
        Arc::new(repo.clone()),
        Arc::new(repo),
        Arc::new(UnavailableFunctions),
    );

    let err = quiz.ask_question().await.unwrap_err();
    assert!(matches!(
        err,
        QuizServiceError::Storage(StorageError::Connection(_))
    ));
}

#[test]
fn grading_without_user_checks_choice_bounds() {
    let pool: Vec<QuizItem> = (1..=4)
        .map(|i| QuizItem::new(format!("code{i}"), format!("output{i}")).unwrap())
        .collect();
    let question = quiz_core::generate_question(&pool, &mut rand::rng()).unwrap();

    assert!(QuizService::grade(&question, question.correct_index()).unwrap());
    let wrong = (question.correct_index() + 1) % 4;
    assert!(!QuizService::grade(&question, wrong).unwrap());
    assert!(matches!(
        QuizService::grade(&question, 9),
        Err(QuizServiceError::InvalidChoice { index: 9, .. })
    ));
}

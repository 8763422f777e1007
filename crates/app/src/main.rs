use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use quiz_core::model::{Question, User, UserId};
use services::{AppServices, QuizService, QuizServiceError};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "codequiz", version, about = "Sample-code quiz for learning functions")]
struct Cli {
    /// SQLite URL
    #[arg(
        long = "db",
        global = true,
        env = "QUIZ_DB_URL",
        default_value = "sqlite:dev.sqlite3"
    )]
    db_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question and read the answer from stdin
    Ask {
        /// Credit this user on a correct answer
        #[arg(long, env = "QUIZ_USER_ID")]
        user_id: Option<UserId>,

        /// Print the question as JSON and exit without asking
        #[arg(long)]
        json: bool,
    },

    /// Show level and points for a user
    Progress {
        #[arg(long, env = "QUIZ_USER_ID")]
        user_id: UserId,
    },
}

#[derive(Debug, Error)]
enum InputError {
    #[error("expected a number between 1 and {count}, got {raw:?}")]
    NotAChoice { raw: String, count: usize },
    #[error("no answer given")]
    Eof,
}

/// Parse a 1-based menu selection into a 0-based choice index.
fn parse_choice(raw: &str, count: usize) -> Result<usize, InputError> {
    let trimmed = raw.trim();
    match trimmed.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
        _ => Err(InputError::NotAChoice {
            raw: trimmed.to_owned(),
            count,
        }),
    }
}

fn render_question(question: &Question) -> String {
    let mut out = format!("{}\n\n", question.prompt_text());
    for line in question.sample_code().lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    for (i, choice) in question.answer_choices().iter().enumerate() {
        out.push_str(&format!("  {}) {choice}\n", i + 1));
    }
    out
}

fn read_choice(question: &Question) -> Result<usize, Box<dyn std::error::Error>> {
    let count = question.answer_choices().len();
    let stdin = io::stdin();
    loop {
        print!("Your answer [1-{count}]: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(InputError::Eof.into());
        }
        match parse_choice(&line, count) {
            Ok(index) => return Ok(index),
            Err(err) => eprintln!("{err}"),
        }
    }
}

async fn require_user(
    app: &AppServices,
    user_id: UserId,
) -> Result<User, Box<dyn std::error::Error>> {
    app.users()
        .get_user(user_id)
        .await?
        .ok_or_else(|| format!("unknown user {user_id}").into())
}

/// An empty or degenerate catalog is reported as "no quiz available".
async fn next_question(quiz: &QuizService) -> Result<Question, Box<dyn std::error::Error>> {
    match quiz.ask_question().await {
        Ok(question) => Ok(question),
        Err(QuizServiceError::Question(err)) => {
            tracing::warn!(error = %err, "could not build a question");
            Err(format!("no quiz available: {err}").into())
        }
        Err(err) => Err(err.into()),
    }
}

async fn ask(
    app: &AppServices,
    user_id: Option<UserId>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(user_id) = user_id {
        require_user(app, user_id).await?;
    }

    let quiz = app.quiz();
    let question = next_question(&quiz).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&question)?);
        return Ok(());
    }

    print!("{}", render_question(&question));
    let index = read_choice(&question)?;

    let correct = match user_id {
        Some(user_id) => {
            let outcome = quiz.submit_answer(user_id, &question, index).await?;
            if outcome.leveled_up {
                println!("Level up! You are now level {}.", outcome.level.level());
            }
            outcome.correct
        }
        None => QuizService::grade(&question, index)?,
    };

    if correct {
        println!("Correct!");
    } else {
        println!("Not quite. The answer was: {}", question.correct_answer());
    }
    Ok(())
}

async fn progress(app: &AppServices, user_id: UserId) -> Result<(), Box<dyn std::error::Error>> {
    let user = require_user(app, user_id).await?;
    let level = app.users().progress(user_id).await?;
    println!(
        "{} ({} {}): level {}, {} points",
        user.username(),
        user.first_name(),
        user.last_name(),
        level.level(),
        level.points()
    );
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let app = AppServices::new_sqlite(&cli.db_url).await?;

    match cli.command {
        Commands::Ask { user_id, json } => ask(&app, user_id, json).await,
        Commands::Progress { user_id } => progress(&app, user_id).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::generate_question;
    use quiz_core::model::QuizItem;
    use services::{FunctionDraft, Registration};
    use storage::repository::Storage;

    async fn learner_app(outputs: usize) -> (AppServices, UserId) {
        let app = AppServices::from_storage(&Storage::in_memory());
        let user_id = app
            .users()
            .register(Registration {
                username: "user".into(),
                password: "pw".into(),
                first_name: "testf".into(),
                last_name: "testl".into(),
                email: "test@gmail.com".into(),
            })
            .await
            .unwrap();
        app.catalog()
            .create_module(user_id, "testmod".into(), "moddesc".into(), None)
            .await
            .unwrap();
        for i in 1..=outputs {
            app.catalog()
                .add_function(
                    user_id,
                    FunctionDraft {
                        name: format!("func{i}"),
                        description: "funcdesc".into(),
                        sample_code: Some(format!("code{i}")),
                        output: Some(format!("output{i}")),
                        ..FunctionDraft::default()
                    },
                )
                .await
                .unwrap();
        }
        (app, user_id)
    }

    #[tokio::test]
    async fn empty_catalog_reports_no_quiz_available() {
        let app = AppServices::from_storage(&Storage::in_memory());
        let err = next_question(&app.quiz()).await.unwrap_err();
        assert!(err.to_string().starts_with("no quiz available"), "{err}");
    }

    #[tokio::test]
    async fn too_few_outputs_reports_no_quiz_available() {
        let (app, _) = learner_app(3).await;
        let err = next_question(&app.quiz()).await.unwrap_err();
        assert!(err.to_string().starts_with("no quiz available"), "{err}");

        let (app, _) = learner_app(4).await;
        assert!(next_question(&app.quiz()).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_before_a_question_is_asked() {
        let (app, user_id) = learner_app(4).await;
        assert_eq!(require_user(&app, user_id).await.unwrap().id(), user_id);

        let err = ask(&app, Some(UserId::new(77)), false).await.unwrap_err();
        assert_eq!(err.to_string(), "unknown user 77");
    }

    #[test]
    fn parse_choice_is_one_based() {
        assert_eq!(parse_choice("1\n", 4).unwrap(), 0);
        assert_eq!(parse_choice(" 4 ", 4).unwrap(), 3);
    }

    #[test]
    fn parse_choice_rejects_out_of_range_and_garbage() {
        assert!(parse_choice("0", 4).is_err());
        assert!(parse_choice("5", 4).is_err());
        assert!(matches!(
            parse_choice("two", 4),
            Err(InputError::NotAChoice { raw, count: 4 }) if raw == "two"
        ));
    }

    #[test]
    fn render_lists_numbered_choices_under_indented_code() {
        let pool: Vec<QuizItem> = ["1", "2", "3", "4"]
            .iter()
            .map(|out| QuizItem::new(format!("x = {out}\nprint(x)"), *out).unwrap())
            .collect();
        let question = generate_question(&pool, &mut rand::rng()).unwrap();
        let rendered = render_question(&question);

        assert!(rendered.starts_with(question.prompt_text()));
        assert!(rendered.contains("    print(x)\n"));
        for (i, choice) in question.answer_choices().iter().enumerate() {
            assert!(rendered.contains(&format!("  {}) {choice}\n", i + 1)));
        }
    }

    #[test]
    fn cli_parses_ask_with_user() {
        let cli = Cli::try_parse_from([
            "codequiz",
            "--db",
            "sqlite::memory:",
            "ask",
            "--user-id",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.db_url, "sqlite::memory:");
        assert!(matches!(
            cli.command,
            Commands::Ask { user_id: Some(id), json: false } if id == UserId::new(3)
        ));
    }
}

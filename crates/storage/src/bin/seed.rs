use clap::Parser;
use quiz_core::model::{Function, FunctionId, Level, Module, ModuleId, User, UserId};
use storage::repository::{NewFunctionRecord, NewModuleRecord, NewUserRecord, Storage};

const MODULE_NAME: &str = "Python built-ins";

const SAMPLES: [(&str, &str, &str, &str); 8] = [
    ("len", "Number of items in a container.", "print(len([1, 2, 3]))", "3"),
    ("upper", "Uppercase copy of a string.", "print('hi'.upper())", "HI"),
    ("sum", "Add up the items of an iterable.", "print(sum([1, 2, 3]))", "6"),
    ("max", "Largest of the given values.", "print(max(4, 9, 2))", "9"),
    ("abs", "Absolute value of a number.", "print(abs(-7))", "7"),
    ("sorted", "New sorted list from an iterable.", "print(sorted([3, 1, 2]))", "[1, 2, 3]"),
    ("join", "Concatenate strings with a separator.", "print('-'.join(['a', 'b']))", "a-b"),
    ("range", "Sequence of integers.", "print(list(range(3)))", "[0, 1, 2]"),
];

/// Populate a quiz database with a sample user, module, and functions.
#[derive(Debug, Parser)]
#[command(name = "seed", version)]
struct Args {
    /// SQLite URL
    #[arg(long = "db", env = "QUIZ_DB_URL", default_value = "sqlite:dev.sqlite3")]
    db_url: String,

    /// Username of the sample user
    #[arg(long, default_value = "user")]
    username: String,

    /// Number of sample functions to insert
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(4..=8))]
    functions: u8,
}

#[derive(Debug, PartialEq, Eq)]
struct SeedReport {
    user_id: UserId,
    module_id: ModuleId,
    created_user: bool,
    created_module: bool,
    created_functions: usize,
}

/// Insert whatever part of the sample data is missing.
///
/// Each step checks for its rows first, so an interrupted run is completed
/// by the next one and a complete database is left untouched.
async fn seed(
    storage: &Storage,
    username: &str,
    functions: u8,
) -> Result<SeedReport, Box<dyn std::error::Error>> {
    let mut created_user = false;
    let mut created_module = false;
    let mut created_functions = 0;

    let user_id = match storage.users.find_by_username(username).await? {
        Some(existing) => existing.id(),
        None => {
            let draft = User::new(
                UserId::new(1),
                username,
                "pw",
                "testf",
                "testl",
                "test@gmail.com",
            )?;
            created_user = true;
            storage
                .users
                .insert_new_user(NewUserRecord::from_user(&draft))
                .await?
        }
    };
    if storage.levels.get_level(user_id).await?.is_none() {
        storage
            .levels
            .upsert_level(&Level::from_persisted(user_id, 5, 25))
            .await?;
    }

    let existing_module = storage
        .modules
        .list_modules(u32::MAX)
        .await?
        .into_iter()
        .find(|m| m.owner() == user_id && m.name() == MODULE_NAME);
    let module_id = match existing_module {
        Some(module) => module.id(),
        None => {
            let module = Module::new(
                ModuleId::new(1),
                user_id,
                MODULE_NAME,
                "Everyday functions that ship with the interpreter.",
                None,
            )?;
            created_module = true;
            storage
                .modules
                .insert_new_module(NewModuleRecord::from_module(&module))
                .await?
        }
    };
    let present: Vec<String> = storage
        .functions
        .functions_in_module(module_id)
        .await?
        .iter()
        .map(|f| f.name().to_owned())
        .collect();

    for (name, description, code, output) in SAMPLES.iter().take(usize::from(functions)) {
        if present.iter().any(|p| p.as_str() == *name) {
            continue;
        }
        let function = Function::new(FunctionId::new(1), module_id, user_id, *name, *description)?
            .with_sample(Some((*code).to_owned()), Some((*output).to_owned()))?;
        storage
            .functions
            .insert_new_function(NewFunctionRecord::from_function(&function))
            .await?;
        created_functions += 1;
    }

    tracing::info!(
        username,
        created_user,
        created_module,
        created_functions,
        "seed finished"
    );
    Ok(SeedReport {
        user_id,
        module_id,
        created_user,
        created_module,
        created_functions,
    })
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let storage = Storage::sqlite(&args.db_url).await?;
    let report = seed(&storage, &args.username, args.functions).await?;

    println!(
        "Seeded user {} with module {} ({} new functions) into {}",
        report.user_id, report.module_id, report.created_functions, args.db_url
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
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

    #[tokio::test]
    async fn seeding_twice_leaves_one_copy_of_the_data() {
        let storage = Storage::in_memory();

        let first = seed(&storage, "user", 8).await.unwrap();
        assert!(first.created_user);
        assert!(first.created_module);
        assert_eq!(first.created_functions, 8);

        let second = seed(&storage, "user", 8).await.unwrap();
        assert!(!second.created_user);
        assert!(!second.created_module);
        assert_eq!(second.created_functions, 0);
        assert_eq!(second.module_id, first.module_id);

        let functions = storage
            .functions
            .functions_in_module(first.module_id)
            .await
            .unwrap();
        assert_eq!(functions.len(), 8);
        assert_eq!(storage.modules.list_modules(10).await.unwrap().len(), 1);
        assert_eq!(storage.functions.eligible_quiz_items().await.unwrap().len(), 8);

        let level = storage
            .levels
            .get_level(first.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!((level.level(), level.points()), (5, 25));
    }

    #[tokio::test]
    async fn seeding_completes_an_interrupted_run() {
        let storage = Storage::in_memory();
        let user_id = storage
            .users
            .insert_new_user(NewUserRecord {
                username: "user".into(),
                password: "pw".into(),
                first_name: "testf".into(),
                last_name: "testl".into(),
                email: "test@gmail.com".into(),
            })
            .await
            .unwrap();

        let report = seed(&storage, "user", 4).await.unwrap();
        assert!(!report.created_user);
        assert!(report.created_module);
        assert_eq!(report.created_functions, 4);
        assert_eq!(report.user_id, user_id);
        assert!(storage.levels.get_level(user_id).await.unwrap().is_some());

        let grown = seed(&storage, "user", 6).await.unwrap();
        assert_eq!(grown.created_functions, 2);
    }
}
